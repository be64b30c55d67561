//! [`Absence`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

use crate::{
    domain::{employee, job, Absence},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Insert<Absence>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Absence>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(absence): Insert<Absence>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(absence))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Absence>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(absence): Update<Absence>,
    ) -> Result<Self::Ok, Self::Err> {
        let Absence {
            id,
            employee_id,
            kind,
            start_date,
            end_date,
            note,
            created_at,
        } = absence;

        const SQL: &str = "\
            INSERT INTO absences (\
                id, employee_id, kind, \
                start_date, end_date, \
                note, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::INT2, \
                $4::DATE, $5::DATE, \
                $6::VARCHAR, $7::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET employee_id = EXCLUDED.employee_id, \
                kind = EXCLUDED.kind, \
                start_date = EXCLUDED.start_date, \
                end_date = EXCLUDED.end_date, \
                note = EXCLUDED.note, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &employee_id,
                &kind,
                &start_date,
                &end_date,
                &note,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<Absence>, (employee::Id, job::ScheduledDate)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Absence>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Absence>, (employee::Id, job::ScheduledDate)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (employee_id, date) = by.into_inner();

        const SQL: &str = "\
            SELECT id, employee_id, kind, \
                   start_date, end_date, \
                   note, created_at \
            FROM absences \
            WHERE employee_id = $1::UUID \
              AND start_date <= $2::DATE \
              AND end_date >= $2::DATE \
            ORDER BY start_date";
        Ok(self
            .query(SQL, &[&employee_id, &date])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Absence {
                id: row.get("id"),
                employee_id: row.get("employee_id"),
                kind: row.get("kind"),
                start_date: row.get("start_date"),
                end_date: row.get("end_date"),
                note: row.get("note"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
