//! [`Offer`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{offer, Offer},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<offer::Id, Offer>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[offer::Id]>,
{
    type Ok = HashMap<offer::Id, Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<offer::Id, Offer>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[offer::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, customer_id, \
                   service_name, vat, \
                   interval, preferred_time, \
                   checklist, valid_until, \
                   status, \
                   sent_at, decided_at, \
                   signature_reference, created_at \
            FROM offers \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        let mut offers = self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Offer {
                        id,
                        customer_id: row.get("customer_id"),
                        service_name: row.get("service_name"),
                        items: vec![],
                        vat: row.get("vat"),
                        interval: row.get("interval"),
                        preferred_time: row.get("preferred_time"),
                        checklist: row.get("checklist"),
                        valid_until: row.get("valid_until"),
                        status: row.get("status"),
                        sent_at: row.get("sent_at"),
                        decided_at: row.get("decided_at"),
                        signature: row.get("signature_reference"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect::<HashMap<_, _>>();

        const ITEMS_SQL: &str = "\
            SELECT offer_id, description, \
                   price, price_currency \
            FROM offer_items \
            WHERE offer_id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            ORDER BY offer_id, idx";
        for row in self
            .query(ITEMS_SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
        {
            let offer_id: offer::Id = row.get("offer_id");
            if let Some(o) = offers.get_mut(&offer_id) {
                o.items.push(offer::LineItem {
                    description: row.get("description"),
                    price: Money {
                        amount: row.get("price"),
                        currency: row.get("price_currency"),
                    },
                });
            }
        }

        Ok(offers)
    }
}

impl<C> Database<Select<By<Option<Offer>, offer::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<offer::Id, Offer>, [offer::Id; 1]>>,
        Ok = HashMap<offer::Id, Offer>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Offer>, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Offer>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Offer>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(offer): Insert<Offer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(offer)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Offer>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(offer): Update<Offer>,
    ) -> Result<Self::Ok, Self::Err> {
        let Offer {
            id,
            customer_id,
            service_name,
            items,
            vat,
            interval,
            preferred_time,
            checklist,
            valid_until,
            status,
            sent_at,
            decided_at,
            signature,
            created_at,
        } = offer;

        const SQL: &str = "\
            INSERT INTO offers (\
                id, customer_id, \
                service_name, vat, \
                interval, preferred_time, \
                checklist, valid_until, \
                status, \
                sent_at, decided_at, \
                signature_reference, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::NUMERIC, \
                $5::INT2, $6::INT2, \
                $7::VARCHAR[], $8::DATE, \
                $9::INT2, \
                $10::TIMESTAMPTZ, $11::TIMESTAMPTZ, \
                $12::VARCHAR, $13::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET customer_id = EXCLUDED.customer_id, \
                service_name = EXCLUDED.service_name, \
                vat = EXCLUDED.vat, \
                interval = EXCLUDED.interval, \
                preferred_time = EXCLUDED.preferred_time, \
                checklist = EXCLUDED.checklist, \
                valid_until = EXCLUDED.valid_until, \
                status = EXCLUDED.status, \
                sent_at = EXCLUDED.sent_at, \
                decided_at = EXCLUDED.decided_at, \
                signature_reference = EXCLUDED.signature_reference, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &customer_id,
                &service_name,
                &vat,
                &interval,
                &preferred_time,
                &checklist,
                &valid_until,
                &status,
                &sent_at,
                &decided_at,
                &signature,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)?;

        const WIPE_ITEMS_SQL: &str = "\
            DELETE FROM offer_items \
            WHERE offer_id = $1::UUID";
        self.exec(WIPE_ITEMS_SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;

        const ITEM_SQL: &str = "\
            INSERT INTO offer_items (\
                offer_id, idx, \
                description, \
                price, price_currency\
            ) \
            VALUES (\
                $1::UUID, $2::INT4, \
                $3::VARCHAR, \
                $4::NUMERIC, $5::INT2\
            )";
        for (idx, item) in items.iter().enumerate() {
            let idx = i32::try_from(idx).unwrap();
            self.exec(
                ITEM_SQL,
                &[
                    &id,
                    &idx,
                    &item.description,
                    &item.price.amount,
                    &item.price.currency,
                ],
            )
            .await
            .map_err(tracerr::wrap!())
            .map(drop)?;
        }

        Ok(())
    }
}

impl<C> Database<Lock<By<Offer, offer::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Offer, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: offer::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO offers_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<Select<By<read::offer::list::Page, read::offer::list::Selector>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::offer::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::offer::list::Page, read::offer::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::offer::list::Selector {
            arguments,
            filter: read::offer::list::Filter {
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
             FROM offers \
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

        Ok(read::offer::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::offer::list::TotalCount, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::offer::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::offer::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM offers";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
