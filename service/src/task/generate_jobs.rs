//! [`GenerateJobs`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::{
    operations::{By, Perform, Start},
    Date,
};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    command::{generate_schedule, GenerateSchedule},
    Command, Service,
};
#[cfg(doc)]
use crate::domain::{Contract, Job};

use super::Task;

/// Configuration for [`GenerateJobs`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between [`Job`] generation runs.
    pub interval: time::Duration,
}

/// [`Task`] for periodically generating [`Job`]s out of due [`Contract`]s.
#[derive(Clone, Copy, Debug)]
pub struct GenerateJobs<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db, Ext> Task<Start<By<GenerateJobs<Self>, Config>>> for Service<Db, Ext>
where
    GenerateJobs<Service<Db, Ext>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<GenerateJobs<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = GenerateJobs {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::GenerateJobs` failed: {e}");
            });
        }
    }
}

impl<Db, Ext> Task<Perform<()>> for GenerateJobs<Service<Db, Ext>>
where
    Service<Db, Ext>: Command<
        GenerateSchedule,
        Ok = generate_schedule::Output,
        Err = Traced<generate_schedule::ExecutionError>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let out = self
            .service
            .execute(GenerateSchedule {
                today: Date::today(),
            })
            .await?;
        if !out.generated.is_empty() {
            log::info!(count = out.generated.len(), "jobs generated");
        }
        Ok(())
    }
}

/// Error of [`GenerateJobs`] execution.
pub type ExecutionError = Traced<generate_schedule::ExecutionError>;
