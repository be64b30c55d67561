//! [`EscalateOverdue`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Perform, Start, Update},
    Date,
};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::invoice,
    infra::{database, Database},
    read::invoice::Overdue,
    Service,
};
#[cfg(doc)]
use crate::domain::Invoice;

use super::Task;

/// Configuration for [`EscalateOverdue`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between overdue detection runs.
    pub interval: time::Duration,
}

/// [`Task`] for marking sent [`Invoice`]s past their due date as overdue.
///
/// Dunning itself is never triggered automatically: each escalation stays an
/// operator decision.
#[derive(Clone, Copy, Debug)]
pub struct EscalateOverdue<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Ext> Task<Start<By<EscalateOverdue<Self>, Config>>>
    for Service<Db, Ext>
where
    EscalateOverdue<Service<Db, Ext>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<EscalateOverdue<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = EscalateOverdue {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::EscalateOverdue` failed: {e}");
            });
        }
    }
}

impl<Db, Ext> Task<Perform<()>> for EscalateOverdue<Service<Db, Ext>>
where
    Db: Database<
        Update<By<Overdue<Vec<invoice::Id>>, Date>>,
        Ok = Overdue<Vec<invoice::Id>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let Overdue(ids) = self
            .service
            .database()
            .execute(Update(By::new(Date::today())))
            .await
            .map_err(tracerr::map_from_and_wrap!())?;
        if !ids.is_empty() {
            log::info!(count = ids.len(), "invoices marked overdue");
        }
        Ok(())
    }
}

/// Error of [`EscalateOverdue`] execution.
pub type ExecutionError = Traced<database::Error>;
