//! [`Expense`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    operations::{By, Delete, Insert, Select, Update},
    Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use tracerr::Traced;

use crate::{
    domain::{expense, Expense},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C, IDs> Database<Select<By<HashMap<expense::Id, Expense>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[expense::Id]>,
{
    type Ok = HashMap<expense::Id, Expense>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<expense::Id, Expense>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[expense::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let limit = i32::try_from(ids.len()).unwrap();

        const SQL: &str = "\
            SELECT id, description, \
                   amount, amount_currency, \
                   category, date, created_at \
            FROM expenses \
            WHERE id IN (SELECT unnest($1::UUID[]) LIMIT $2::INT4) \
            LIMIT $2::INT4";
        Ok(self
            .query(SQL, &[&ids, &limit])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| {
                let id = row.get("id");
                (
                    id,
                    Expense {
                        id,
                        description: row.get("description"),
                        amount: Money {
                            amount: row.get("amount"),
                            currency: row.get("amount_currency"),
                        },
                        category: row.get("category"),
                        date: row.get("date"),
                        created_at: row.get("created_at"),
                    },
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Expense>, expense::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<expense::Id, Expense>, [expense::Id; 1]>>,
        Ok = HashMap<expense::Id, Expense>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Expense>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Expense>, expense::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Insert<Expense>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Expense>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(expense): Insert<Expense>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(expense))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Expense>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(expense): Update<Expense>,
    ) -> Result<Self::Ok, Self::Err> {
        let Expense {
            id,
            description,
            amount,
            category,
            date,
            created_at,
        } = expense;

        const SQL: &str = "\
            INSERT INTO expenses (\
                id, description, \
                amount, amount_currency, \
                category, date, created_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, \
                $3::NUMERIC, $4::INT2, \
                $5::VARCHAR, $6::DATE, $7::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET description = EXCLUDED.description, \
                amount = EXCLUDED.amount, \
                amount_currency = EXCLUDED.amount_currency, \
                category = EXCLUDED.category, \
                date = EXCLUDED.date, \
                created_at = EXCLUDED.created_at";
        self.exec(
            SQL,
            &[
                &id,
                &description,
                &amount.amount,
                &amount.currency,
                &category,
                &date,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Expense, expense::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Expense, expense::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: expense::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM expenses \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C>
    Database<
        Select<By<read::expense::list::Page, read::expense::list::Selector>>,
    > for Postgres<C>
where
    C: Connection,
{
    type Ok = read::expense::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::expense::list::Page, read::expense::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::expense::list::Selector {
            arguments,
            filter: read::expense::list::Filter {
                category,
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
        let category_idx = category.as_ref().map(|c| {
            ps.push(c);
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
             FROM expenses \
             WHERE TRUE \
                   {cursor} \
                   {category_filtering} \
                   {from_filtering} \
                   {until_filtering} \
             ORDER BY id {order} \
             LIMIT $1::INT4",
            cursor = cursor_idx.into_iter().format_with("", |idx, f| {
                let op = arguments.kind().operator();
                f(&format_args!("AND id {op} ${idx}::UUID"))
            }),
            order = arguments.kind().order().sql(),
            category_filtering =
                category_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND category = ${idx}::VARCHAR"))
                }),
            from_filtering =
                from_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND date >= ${idx}::DATE"))
                }),
            until_filtering =
                until_idx.into_iter().format_with("", |idx, f| {
                    f(&format_args!("AND date <= ${idx}::DATE"))
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

        Ok(read::expense::list::Page::new(&arguments, edges, has_more))
    }
}

impl<C> Database<Select<By<read::expense::list::TotalCount, ()>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::expense::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<read::expense::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT COUNT(*)::INT4 \
            FROM expenses";
        self.query_opt(SQL, &[])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.expect("always exists").get::<_, i32>(0).into())
    }
}
