//! Background [`Task`]s definitions.

mod background;
pub mod escalate_overdue;
pub mod generate_jobs;

pub use common::Handler as Task;

pub use self::{
    background::Background, escalate_overdue::EscalateOverdue,
    generate_jobs::GenerateJobs,
};
