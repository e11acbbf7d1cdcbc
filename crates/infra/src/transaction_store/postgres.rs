//! Postgres-backed transaction store.
//!
//! The ownership index lives in the `clients` table; tenant scoping is a join
//! through it, never a match on any transaction column.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use txguard_auth::ScopePredicate;
use txguard_core::AccountId;

use crate::records::Transaction;

use super::{StoreError, TransactionStore};

/// Tables the store reads from.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    id       BIGSERIAL PRIMARY KEY,
    step     BIGINT NOT NULL,
    customer TEXT NOT NULL,
    age      BIGINT,
    gender   TEXT,
    merchant TEXT NOT NULL,
    category TEXT NOT NULL,
    amount   DOUBLE PRECISION NOT NULL,
    fraud    BOOLEAN NOT NULL DEFAULT FALSE
);
CREATE INDEX IF NOT EXISTS transactions_customer_idx ON transactions (customer);

CREATE TABLE IF NOT EXISTS clients (
    customer  TEXT PRIMARY KEY,
    client_id TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS clients_client_id_idx ON clients (client_id);
"#;

pub struct PostgresTransactionStore {
    pool: PgPool,
}

impl PostgresTransactionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TransactionStore for PostgresTransactionStore {
    async fn query(
        &self,
        scope: &ScopePredicate,
        limit: usize,
    ) -> Result<Vec<Transaction>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = match scope {
            ScopePredicate::Unrestricted => {
                sqlx::query(
                    r#"
                    SELECT id, step, customer, age, gender, merchant, category, amount, fraud
                    FROM transactions
                    ORDER BY id
                    LIMIT $1
                    "#,
                )
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            ScopePredicate::ByOwner { customer } => {
                sqlx::query(
                    r#"
                    SELECT id, step, customer, age, gender, merchant, category, amount, fraud
                    FROM transactions
                    WHERE customer = $1
                    ORDER BY id
                    LIMIT $2
                    "#,
                )
                .bind(customer.as_str())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            ScopePredicate::ByTenant { client_id } => {
                sqlx::query(
                    r#"
                    SELECT t.id, t.step, t.customer, t.age, t.gender, t.merchant, t.category, t.amount, t.fraud
                    FROM transactions t
                    JOIN clients c ON t.customer = c.customer
                    WHERE c.client_id = $1
                    ORDER BY t.id
                    LIMIT $2
                    "#,
                )
                .bind(client_id.as_str())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| map_sqlx_error("query_transactions", e))?;

        rows.iter().map(row_to_transaction).collect()
    }
}

fn row_to_transaction(row: &PgRow) -> Result<Transaction, StoreError> {
    let get_err = |e: sqlx::Error| StoreError::InvalidRow(e.to_string());

    let customer: String = row.try_get("customer").map_err(get_err)?;
    Ok(Transaction {
        id: row.try_get("id").map_err(get_err)?,
        step: row.try_get("step").map_err(get_err)?,
        customer: AccountId::parse(&customer).map_err(|e| StoreError::InvalidRow(e.to_string()))?,
        age: row.try_get("age").map_err(get_err)?,
        gender: row.try_get("gender").map_err(get_err)?,
        merchant: row.try_get("merchant").map_err(get_err)?,
        category: row.try_get("category").map_err(get_err)?,
        amount: row.try_get("amount").map_err(get_err)?,
        fraud: row.try_get("fraud").map_err(get_err)?,
    })
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    let message = match err {
        sqlx::Error::Database(db_err) => format!("database error: {}", db_err.message()),
        other => other.to_string(),
    };
    tracing::error!(operation, %message, "transaction store failure");
    StoreError::Backend { operation, message }
}
