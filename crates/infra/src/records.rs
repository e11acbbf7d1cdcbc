use serde::{Deserialize, Serialize};

use txguard_core::AccountId;

/// One financial transaction row, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub step: i64,
    /// Owning account.
    pub customer: AccountId,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub merchant: String,
    pub category: String,
    pub amount: f64,
    pub fraud: bool,
}
