//! [`Invoice`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Date, Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{invoice, Invoice},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::{self, invoice::DunningCandidates, invoice::Overdue},
};

impl<C, IDs> Database<Select<By<HashMap<invoice::Id, Invoice>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[invoice::Id]>,
{
    type Ok = HashMap<invoice::Id, Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<invoice::Id, Invoice>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[invoice::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, customer_id, \
                   number_year, number_seq, \
                   status, \
                   total_net, total_vat, total_gross, currency, \
                   issued_at, due_date, \
                   dunning_level, last_dunning_at, \
                   sent_at, paid_at, created_at \
            FROM invoices \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                let currency = row.get("currency");
                (
                    id,
                    Invoice {
                        id,
                        customer_id: row.get("customer_id"),
                        number: invoice::Number {
                            year: row.get("number_year"),
                            seq: row.get("number_seq"),
                        },
                        status: row.get("status"),
                        total_net: Money {
                            amount: row.get("total_net"),
                            currency,
                        },
                        total_vat: Money {
                            amount: row.get("total_vat"),
                            currency,
                        },
                        total_gross: Money {
                            amount: row.get("total_gross"),
                            currency,
                        },
                        issued_at: row.get("issued_at"),
                        due_date: row.get("due_date"),
                        dunning_level: row.get("dunning_level"),
                        last_dunning_at: row.get("last_dunning_at"),
                        sent_at: row.get("sent_at"),
                        paid_at: row.get("paid_at"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Invoice>, invoice::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<invoice::Id, Invoice>, [invoice::Id; 1]>>,
        Ok = HashMap<invoice::Id, Invoice>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Invoice>, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Invoice>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Invoice>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(invoice): Insert<Invoice>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(invoice))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Invoice>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(invoice): Update<Invoice>,
    ) -> Result<Self::Ok, Self::Err> {
        let Invoice {
            id,
            customer_id,
            number,
            status,
            total_net,
            total_vat,
            total_gross,
            issued_at,
            due_date,
            dunning_level,
            last_dunning_at,
            sent_at,
            paid_at,
            created_at,
        } = invoice;

        const SQL: &str = "\
            INSERT INTO invoices (\
                id, customer_id, \
                number_year, number_seq, \
                status, \
                total_net, total_vat, total_gross, currency, \
                issued_at, due_date, \
                dunning_level, last_dunning_at, \
                sent_at, paid_at, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::INT4, $4::INT4, \
                $5::INT2, \
                $6::NUMERIC, $7::NUMERIC, $8::NUMERIC, $9::INT2, \
                $10::TIMESTAMPTZ, $11::DATE, \
                $12::INT2, $13::TIMESTAMPTZ, \
                $14::TIMESTAMPTZ, $15::TIMESTAMPTZ, $16::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET customer_id = EXCLUDED.customer_id, \
                number_year = EXCLUDED.number_year, \
                number_seq = EXCLUDED.number_seq, \
                status = EXCLUDED.status, \
                total_net = EXCLUDED.total_net, \
                total_vat = EXCLUDED.total_vat, \
                total_gross = EXCLUDED.total_gross, \
                currency = EXCLUDED.currency, \
                issued_at = EXCLUDED.issued_at, \
                due_date = EXCLUDED.due_date, \
                dunning_level = EXCLUDED.dunning_level, \
                last_dunning_at = EXCLUDED.last_dunning_at, \
                sent_at = EXCLUDED.sent_at, \
                paid_at = EXCLUDED.paid_at, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &customer_id,
                &number.year,
                &number.seq,
                &status,
                &total_net.amount,
                &total_vat.amount,
                &total_gross.amount,
                &total_net.currency,
                &issued_at,
                &due_date,
                &dunning_level,
                &last_dunning_at,
                &sent_at,
                &paid_at,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Invoice, invoice::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Invoice, invoice::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: invoice::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO invoices_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

// Counter bump and `Invoice` insertion share the transaction, so a rollback
// never leaves a gap in the numbering.
impl<C> Database<Insert<By<invoice::Number, i32>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = invoice::Number;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(by): Insert<By<invoice::Number, i32>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let year: i32 = by.into_inner();

        const SQL: &str = "\
            INSERT INTO invoice_numbers (year, last_seq) \
            VALUES ($1::INT4, 1) \
            ON CONFLICT (year) DO UPDATE \
            SET last_seq = invoice_numbers.last_seq + 1 \
            RETURNING last_seq";
        self.query_opt(SQL, &[&year])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| invoice::Number {
                year,
                seq: row.expect("always exists").get("last_seq"),
            })
    }
}

impl<C> Database<Update<By<Overdue<Vec<invoice::Id>>, Date>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Overdue<Vec<invoice::Id>>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Overdue<Vec<invoice::Id>>, Date>>,
    ) -> Result<Self::Ok, Self::Err> {
        let today = by.into_inner();

        const SQL: &str = "\
            UPDATE invoices \
            SET status = $1::INT2 \
            WHERE status = $2::INT2 \
              AND due_date IS NOT NULL \
              AND due_date < $3::DATE \
            RETURNING id";
        Ok(Overdue(
            self.query(
                SQL,
                &[
                    &invoice::Status::Overdue,
                    &invoice::Status::Sent,
                    &today,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect(),
        ))
    }
}

impl<C> Database<Select<By<Vec<Invoice>, DunningCandidates>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<invoice::Id, Invoice>, Vec<invoice::Id>>>,
        Ok = HashMap<invoice::Id, Invoice>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Invoice>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Invoice>, DunningCandidates>>,
    ) -> Result<Self::Ok, Self::Err> {
        let DunningCandidates { now, cooldown } = by.into_inner();
        let threshold = now - cooldown;

        const SQL: &str = "\
            SELECT id \
            FROM invoices \
            WHERE status = $1::INT2 \
              AND dunning_level < $2::INT2 \
              AND (last_dunning_at IS NULL \
                   OR last_dunning_at <= $3::TIMESTAMPTZ) \
            ORDER BY number_year, number_seq";
        let ids = self
            .query(
                SQL,
                &[
                    &invoice::Status::Overdue,
                    &invoice::DunningLevel::MAX,
                    &threshold,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect::<Vec<invoice::Id>>();

        let mut invoices = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(ids.into_iter().filter_map(|id| invoices.remove(&id)).collect())
    }
}

impl<C>
    Database<
        Select<By<read::invoice::list::Page, read::invoice::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::invoice::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::invoice::list::Page, read::invoice::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::invoice::list::Selector {
            arguments,
            filter: read::invoice::list::Filter {
                customer_id,
                status,
            },
        } = by.into_inner();

        let limit = i32::try_from(arguments.limit()).unwrap() + 1;

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![&limit];

        let cursor_idx = arguments.cursor().map(|c| {
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

        let sql = format!(
            "SELECT id \
             FROM invoices \
             WHERE TRUE \
                   {cursor} \
                   {customer_filtering} \
                   {status_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            customer_filtering =
                customer_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND customer_id = ${idx}::UUID"))
                }),
            status_filtering =
                status_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND status = ${idx}::INT2"))
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

        Ok(read::invoice::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::invoice::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::invoice::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::invoice::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM invoices";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
