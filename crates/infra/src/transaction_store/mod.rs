//! Record-store read boundary.
//!
//! The engine hands a [`ScopePredicate`] to a store and gets back a bounded page
//! of matching rows. Stores own the tenant join; the predicate only names the
//! tenant.

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use thiserror::Error;

use txguard_auth::ScopePredicate;

use crate::records::Transaction;

pub use in_memory::InMemoryTransactionStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresTransactionStore;

/// Fixed page cap for a single read.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error in {operation}: {message}")]
    Backend { operation: &'static str, message: String },

    #[error("invalid row: {0}")]
    InvalidRow(String),
}

/// Read access to transaction rows under a scope.
///
/// Rows come back in ascending `id` order, at most `limit` of them.
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    async fn query(
        &self,
        scope: &ScopePredicate,
        limit: usize,
    ) -> Result<Vec<Transaction>, StoreError>;
}

#[async_trait::async_trait]
impl<S> TransactionStore for std::sync::Arc<S>
where
    S: TransactionStore + ?Sized,
{
    async fn query(
        &self,
        scope: &ScopePredicate,
        limit: usize,
    ) -> Result<Vec<Transaction>, StoreError> {
        (**self).query(scope, limit).await
    }
}
