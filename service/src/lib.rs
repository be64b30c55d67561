//! Service contains the business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use std::time::Duration;

use common::operations::{By, Start};
use derive_more::{Debug, Error};

#[cfg(doc)]
use infra::{Database, External};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [JWT] encoding key for [`Offer`] signing tokens.
    ///
    /// [`Offer`]: domain::Offer
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub signing_encoding_key: jsonwebtoken::EncodingKey,

    /// [JWT] decoding key for [`Offer`] signing tokens.
    ///
    /// [`Offer`]: domain::Offer
    /// [JWT]: https://datatracker.ietf.org/doc/html/rfc7519
    #[debug(skip)]
    pub signing_decoding_key: jsonwebtoken::DecodingKey,

    /// [`Duration`] an [`Offer`] signing token remains valid for.
    ///
    /// [`Offer`]: domain::Offer
    pub signing_ttl: Duration,

    /// Payment terms of an [`Invoice`], counted from the moment it's sent.
    ///
    /// [`Invoice`]: domain::Invoice
    pub payment_terms: Duration,

    /// Minimum [`Duration`] between two dunning escalations of the same
    /// [`Invoice`].
    ///
    /// [`Invoice`]: domain::Invoice
    pub dunning_cooldown: Duration,

    /// [`task::GenerateJobs`] configuration.
    pub generate_jobs: task::generate_jobs::Config,

    /// [`task::EscalateOverdue`] configuration.
    pub escalate_overdue: task::escalate_overdue::Config,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db, Ext = infra::external::Log> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// [`External`] collaborator of this [`Service`].
    external: Ext,
}

impl<Db, Ext> Service<Db, Ext> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(
        config: Config,
        database: Db,
        external: Ext,
    ) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<task::GenerateJobs<Self>, task::generate_jobs::Config>,
                >,
                Ok = (),
                Err: Error,
            > + Task<
                Start<
                    By<
                        task::EscalateOverdue<Self>,
                        task::escalate_overdue::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let this = Service {
            config,
            database,
            external,
        };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().generate_jobs))).await
        });
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().escalate_overdue))).await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns the [`External`] collaborator of this [`Service`].
    #[must_use]
    pub fn external(&self) -> &Ext {
        &self.external
    }
}
