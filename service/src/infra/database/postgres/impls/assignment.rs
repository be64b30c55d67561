//! [`Assignment`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{employee, job, Assignment},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Maps a `row` of the `assignments` table into an [`Assignment`].
fn from_row(row: &tokio_postgres::Row) -> Assignment {
    Assignment {
        id: row.get("id"),
        job_id: row.get("job_id"),
        employee_id: row.get("employee_id"),
        status: row.get("status"),
        started_at: row.get("started_at"),
        finished_at: row.get("finished_at"),
        created_at: row.get("created_at"),
    }
}

// Plain `INSERT`: a duplicate `(job_id, employee_id)` pair must raise a
// unique violation.
impl<C> Database<Insert<Assignment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(assignment): Insert<Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        let Assignment {
            id,
            job_id,
            employee_id,
            status,
            started_at,
            finished_at,
            created_at,
        } = assignment;

        const SQL: &str = "\
            INSERT INTO assignments (\
                id, job_id, employee_id, \
                status, \
                started_at, finished_at, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::INT2, \
                $5::TIMESTAMPTZ, $6::TIMESTAMPTZ, $7::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &job_id,
                &employee_id,
                &status,
                &started_at,
                &finished_at,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Assignment>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(assignment): Update<Assignment>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE assignments \
            SET status = $2::INT2, \
                started_at = $3::TIMESTAMPTZ, \
                finished_at = $4::TIMESTAMPTZ \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[
                &assignment.id,
                &assignment.status,
                &assignment.started_at,
                &assignment.finished_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Assignment, (job::Id, employee::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Assignment, (job::Id, employee::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (job_id, employee_id) = by.into_inner();

        const SQL: &str = "\
            DELETE FROM assignments \
            WHERE job_id = $1::UUID \
              AND employee_id = $2::UUID";
        self.exec(SQL, &[&job_id, &employee_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Assignment>, job::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Assignment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Assignment>, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let job_id: job::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, job_id, employee_id, \
                   status, \
                   started_at, finished_at, created_at \
            FROM assignments \
            WHERE job_id = $1::UUID \
            ORDER BY created_at, id";
        Ok(self
            .query(SQL, &[&job_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Option<Assignment>, (job::Id, employee::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Assignment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Assignment>, (job::Id, employee::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (job_id, employee_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, job_id, employee_id, \
                   status, \
                   started_at, finished_at, created_at \
            FROM assignments \
            WHERE job_id = $1::UUID \
              AND employee_id = $2::UUID \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&job_id, &employee_id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Assignment>, (employee::Id, job::ScheduledDate)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Assignment>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Assignment>, (employee::Id, job::ScheduledDate)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (employee_id, date) = by.into_inner();

        const SQL: &str = "\
            SELECT a.id, a.job_id, a.employee_id, \
                   a.status, \
                   a.started_at, a.finished_at, a.created_at \
            FROM assignments AS a \
            JOIN jobs AS j ON j.id = a.job_id \
            WHERE a.employee_id = $1::UUID \
              AND j.scheduled_date = $2::DATE \
              AND j.status <> $3::INT2 \
            ORDER BY a.created_at, a.id";
        Ok(self
            .query(SQL, &[&employee_id, &date, &job::Status::Cancelled])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}
