//! [`Command`] definition.

pub mod assign_employee;
pub mod cancel_job;
pub mod complete_job;
pub mod complete_offer_signing;
pub mod convert_offer;
pub mod create_contract;
pub mod create_customer;
pub mod create_employee;
pub mod create_expense;
pub mod create_job;
pub mod create_offer;
pub mod delete_expense;
pub mod execute_dunning;
pub mod generate_invoice;
pub mod generate_schedule;
pub mod mark_invoice_paid;
pub mod pause_contract;
pub mod record_absence;
pub mod record_manual_time;
pub mod reset_dunning;
pub mod resume_contract;
pub mod send_invoice;
pub mod send_offer;
pub mod start_time_entry;
pub mod stop_time_entry;
pub mod unassign_employee;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    assign_employee::AssignEmployee, cancel_job::CancelJob,
    complete_job::CompleteJob,
    complete_offer_signing::CompleteOfferSigning,
    convert_offer::ConvertOffer, create_contract::CreateContract,
    create_customer::CreateCustomer, create_employee::CreateEmployee,
    create_expense::CreateExpense, create_job::CreateJob,
    create_offer::CreateOffer, delete_expense::DeleteExpense,
    execute_dunning::ExecuteDunning, generate_invoice::GenerateInvoice,
    generate_schedule::GenerateSchedule,
    mark_invoice_paid::MarkInvoicePaid, pause_contract::PauseContract,
    record_absence::RecordAbsence, record_manual_time::RecordManualTime,
    reset_dunning::ResetDunning, resume_contract::ResumeContract,
    send_invoice::SendInvoice, send_offer::SendOffer,
    start_time_entry::StartTimeEntry, stop_time_entry::StopTimeEntry,
    unassign_employee::UnassignEmployee,
};
