//! Infrastructure layer: record stores, the ownership index, and startup seeding.

pub mod ownership;
pub mod records;
pub mod seed;
pub mod transaction_store;

pub use ownership::{OwnershipIndex, OwnershipRecord};
pub use records::Transaction;
pub use transaction_store::{DEFAULT_PAGE_LIMIT, InMemoryTransactionStore, StoreError, TransactionStore};
