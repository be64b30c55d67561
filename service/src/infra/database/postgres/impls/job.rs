//! [`Job`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{customer, job, Job},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::{self, job::Unbilled},
};

impl<C, IDs> Database<Select<By<HashMap<job::Id, Job>, IDs>>> for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[job::Id]>,
{
    type Ok = HashMap<job::Id, Job>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<job::Id, Job>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[job::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, contract_id, customer_id, \
                   service_name, \
                   price, price_currency, vat, \
                   address, checklist, \
                   scheduled_date, status, \
                   actual_duration, invoice_id, \
                   completed_at, created_at \
            FROM jobs \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        let mut jobs = self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Job {
                        id,
                        contract_id: row.get("contract_id"),
                        customer_id: row.get("customer_id"),
                        service_name: row.get("service_name"),
                        price: Money {
                            amount: row.get("price"),
                            currency: row.get("price_currency"),
                        },
                        vat: row.get("vat"),
                        address: row.get("address"),
                        checklist: row.get("checklist"),
                        scheduled_date: row.get("scheduled_date"),
                        status: row.get("status"),
                        actual_duration: row.get("actual_duration"),
                        invoice_id: row.get("invoice_id"),
                        proofs: vec![],
                        completed_at: row.get("completed_at"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect::<HashMap<_, _>>();

        const PROOFS_SQL: &str = "\
            SELECT job_id, kind, reference, created_at \
            FROM job_proofs \
            WHERE job_id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            ORDER BY job_id, idx";
        for row in self
            .query(PROOFS_SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
        {
            let job_id: job::Id = row.get("job_id");
            if let Some(j) = jobs.get_mut(&job_id) {
                j.proofs.push(job::Proof {
                    kind: row.get("kind"),
                    reference: row.get("reference"),
                    created_at: row.get("created_at"),
                });
            }
        }

        Ok(jobs)
    }
}

impl<C> Database<Select<By<Option<Job>, job::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<job::Id, Job>, [job::Id; 1]>>,
        Ok = HashMap<job::Id, Job>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Job>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Job>, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

// Plain `INSERT`: a duplicate `(contract_id, scheduled_date)` pair must
// raise a unique violation.
impl<C> Database<Insert<Job>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(job): Insert<Job>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO jobs (\
                id, contract_id, customer_id, \
                service_name, \
                price, price_currency, vat, \
                address, checklist, \
                scheduled_date, status, \
                actual_duration, invoice_id, \
                completed_at, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::VARCHAR, \
                $5::NUMERIC, $6::INT2, $7::NUMERIC, \
                $8::VARCHAR, $9::VARCHAR[], \
                $10::DATE, $11::INT2, \
                $12::INT4, $13::UUID, \
                $14::TIMESTAMPTZ, $15::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &job.id,
                &job.contract_id,
                &job.customer_id,
                &job.service_name,
                &job.price.amount,
                &job.price.currency,
                &job.vat,
                &job.address,
                &job.checklist,
                &job.scheduled_date,
                &job.status,
                &job.actual_duration,
                &job.invoice_id,
                &job.completed_at,
                &job.created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Job>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(job): Update<Job>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            UPDATE jobs \
            SET status = $2::INT2, \
                actual_duration = $3::INT4, \
                invoice_id = $4::UUID, \
                completed_at = $5::TIMESTAMPTZ \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[
                &job.id,
                &job.status,
                &job.actual_duration,
                &job.invoice_id,
                &job.completed_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)?;

        const WIPE_PROOFS_SQL: &str = "\
            DELETE FROM job_proofs \
            WHERE job_id = $1::UUID";
        self.exec(WIPE_PROOFS_SQL, &[&job.id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        const PROOF_SQL: &str = "\
            INSERT INTO job_proofs (\
                job_id, idx, kind, reference, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::INT4, $3::INT2, $4::VARCHAR, $5::TIMESTAMPTZ\
            )";
        for (idx, proof) in job.proofs.iter().enumerate() {
            let idx = i32::try_from(idx).unwrap();
            self.exec(
                PROOF_SQL,
                &[
                    &job.id,
                    &idx,
                    &proof.kind,
                    &proof.reference,
                    &proof.created_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        }

        Ok(())
    }
}

impl<C> Database<Lock<By<Job, job::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Job, job::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: job::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO jobs_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Select<By<Unbilled<Vec<Job>>, customer::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<job::Id, Job>, Vec<job::Id>>>,
        Ok = HashMap<job::Id, Job>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Unbilled<Vec<Job>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Unbilled<Vec<Job>>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let customer_id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM jobs \
            WHERE customer_id = $1::UUID \
              AND status = $2::INT2 \
              AND invoice_id IS NULL \
            ORDER BY scheduled_date, id";
        let ids = self
            .query(SQL, &[&customer_id, &job::Status::Completed])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<job::Id>>();

        let mut jobs = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(Unbilled(
            ids.into_iter().filter_map(|id| jobs.remove(&id)).collect(),
        ))
    }
}

impl<C> Database<Select<By<read::job::list::Page, read::job::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::job::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::job::list::Page, read::job::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::job::list::Selector {
            arguments,
            filter:
                read::job::list::Filter {
                    contract_id,
                    customer_id,
                    status,
                    from,
                    until,
                },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
            ps.push(c);
            ps.len()
        });
        let contract_idx = contract_id.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let customer_idx = customer_id.as_ref().map(|c| {
            ps.push(c);
            ps.len()
        });
        let status_idx = status.as_ref().map(|s| {
            ps.push(s);
            ps.len()
        });
        let from_idx = from.as_ref().map(|d| {
            ps.push(d);
            ps.len()
        });
        let until_idx = until.as_ref().map(|d| {
            ps.push(d);
            ps.len()
        });

        let sql = format!(
            "SELECT id \
             FROM jobs \
             WHERE TRUE \
                   {cursor} \
                   {contract_filtering} \
                   {customer_filtering} \
                   {status_filtering} \
                   {from_filtering} \
                   {until_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            contract_filtering =
                contract_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND contract_id = ${idx}::UUID"))
                }),
            customer_filtering =
                customer_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND customer_id = ${idx}::UUID"))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
                }),
            from_filtering = from_idx.into_iter().format_with("", |idx, f| {
                f(&format_args!("AND scheduled_date >= ${idx}::DATE"))
            }),
            until_filtering =
                until_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND scheduled_date <= ${idx}::DATE"))
                }),
        );
        let rows = self
            .query(&sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?;

        let has_more = rows.len() > arguments.limit();
        let edges = rows
            .into_iter()
            .take(arguments.limit())
            .map(|row| {
                let id = row.get("id");
                (id, id)
            })
            .collect::<Vec<_>>();

        Ok(read::job::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::job::list::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::job::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::job::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM jobs";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
