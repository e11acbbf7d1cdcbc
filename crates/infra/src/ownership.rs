//! Ownership index: which tenant owns which account.
//!
//! Built once per ingestion run, then shared read-only behind an `Arc`.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use txguard_core::{AccountId, DomainError, DomainResult, TenantId};

static NO_ACCOUNTS: BTreeSet<AccountId> = BTreeSet::new();

/// Binds an account (`customer`) to its owning tenant (`client_id`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub customer: AccountId,
    pub client_id: TenantId,
}

/// Account → tenant mapping with the tenant → accounts direction precomputed.
///
/// # Invariants
/// - Each account has at most one owning tenant.
/// - Both directions always agree.
#[derive(Debug, Clone, Default)]
pub struct OwnershipIndex {
    owner_of: HashMap<AccountId, TenantId>,
    accounts_of: HashMap<TenantId, BTreeSet<AccountId>>,
}

impl OwnershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = OwnershipRecord>) -> DomainResult<Self> {
        let mut index = Self::new();
        for record in records {
            index.insert(record)?;
        }
        Ok(index)
    }

    /// Record ownership. Re-inserting the same pair is a no-op; assigning an
    /// already-owned account to a different tenant is rejected.
    pub fn insert(&mut self, record: OwnershipRecord) -> DomainResult<()> {
        if let Some(existing) = self.owner_of.get(&record.customer) {
            if *existing == record.client_id {
                return Ok(());
            }
            return Err(DomainError::invariant(format!(
                "account '{}' already owned by '{}', refusing '{}'",
                record.customer, existing, record.client_id
            )));
        }

        self.accounts_of
            .entry(record.client_id.clone())
            .or_default()
            .insert(record.customer.clone());
        self.owner_of.insert(record.customer, record.client_id);
        Ok(())
    }

    /// Accounts owned by `client_id` (empty for an unknown tenant).
    pub fn accounts_for_tenant(&self, client_id: &TenantId) -> &BTreeSet<AccountId> {
        self.accounts_of.get(client_id).unwrap_or(&NO_ACCOUNTS)
    }

    /// Reverse lookup, used when building or auditing the index.
    pub fn tenant_of(&self, customer: &AccountId) -> Option<&TenantId> {
        self.owner_of.get(customer)
    }

    pub fn account_count(&self) -> usize {
        self.owner_of.len()
    }

    pub fn tenant_count(&self) -> usize {
        self.accounts_of.len()
    }
}
