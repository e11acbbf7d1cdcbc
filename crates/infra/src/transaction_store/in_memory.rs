use std::sync::Arc;

use txguard_auth::ScopePredicate;

use crate::ownership::OwnershipIndex;
use crate::records::Transaction;

use super::{StoreError, TransactionStore};

/// In-memory transaction store for tests/dev.
///
/// Immutable after construction: rows and the ownership index are fixed for
/// the life of the store.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    rows: Vec<Transaction>,
    ownership: Arc<OwnershipIndex>,
}

impl InMemoryTransactionStore {
    pub fn new(mut rows: Vec<Transaction>, ownership: Arc<OwnershipIndex>) -> Self {
        rows.sort_by_key(|t| t.id);
        Self { rows, ownership }
    }

    pub fn ownership(&self) -> &OwnershipIndex {
        &self.ownership
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Synchronous scan behind [`TransactionStore::query`].
    pub fn select(&self, scope: &ScopePredicate, limit: usize) -> Vec<Transaction> {
        match scope {
            ScopePredicate::Unrestricted => self.rows.iter().take(limit).cloned().collect(),
            ScopePredicate::ByOwner { customer } => self
                .rows
                .iter()
                .filter(|t| t.customer == *customer)
                .take(limit)
                .cloned()
                .collect(),
            ScopePredicate::ByTenant { client_id } => {
                // tenant -> owned accounts -> transactions
                let accounts = self.ownership.accounts_for_tenant(client_id);
                self.rows
                    .iter()
                    .filter(|t| accounts.contains(&t.customer))
                    .take(limit)
                    .cloned()
                    .collect()
            }
        }
    }
}

#[async_trait::async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn query(
        &self,
        scope: &ScopePredicate,
        limit: usize,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.select(scope, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ownership::OwnershipRecord;
    use crate::transaction_store::DEFAULT_PAGE_LIMIT;
    use std::collections::BTreeSet;
    use txguard_core::{AccountId, TenantId};

    fn tx(id: i64, customer: &str, category: &str) -> Transaction {
        Transaction {
            id,
            step: 0,
            customer: AccountId::parse(customer).unwrap(),
            age: Some(3),
            gender: Some("F".into()),
            merchant: "M348934600".into(),
            category: category.into(),
            amount: 10.0 + id as f64,
            fraud: false,
        }
    }

    fn own(customer: &str, client_id: &str) -> OwnershipRecord {
        OwnershipRecord {
            customer: AccountId::parse(customer).unwrap(),
            client_id: TenantId::parse(client_id).unwrap(),
        }
    }

    fn store() -> InMemoryTransactionStore {
        let ownership = OwnershipIndex::from_records([
            own("C1", "ACME1"),
            own("C2", "ACME1"),
            own("C3", "FINCORP"),
        ])
        .unwrap();

        // The category deliberately equals a tenant id on a non-owned row.
        let rows = vec![
            tx(4, "C3", "es_transportation"),
            tx(1, "C1", "es_transportation"),
            tx(2, "C2", "es_health"),
            tx(3, "C1", "es_food"),
            tx(5, "C9", "ACME1"),
        ];
        InMemoryTransactionStore::new(rows, Arc::new(ownership))
    }

    fn ids(rows: &[Transaction]) -> Vec<i64> {
        rows.iter().map(|t| t.id).collect()
    }

    #[test]
    fn unrestricted_sees_everything_in_id_order() {
        let rows = store().select(&ScopePredicate::Unrestricted, DEFAULT_PAGE_LIMIT);
        assert_eq!(ids(&rows), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn owner_sees_only_exact_customer() {
        let scope = ScopePredicate::ByOwner {
            customer: AccountId::parse("C1").unwrap(),
        };
        assert_eq!(ids(&store().select(&scope, DEFAULT_PAGE_LIMIT)), vec![1, 3]);
    }

    #[test]
    fn tenant_sees_exactly_transactions_of_owned_accounts() {
        let store = store();
        let client_id = TenantId::parse("ACME1").unwrap();
        let rows = store.select(
            &ScopePredicate::ByTenant {
                client_id: client_id.clone(),
            },
            DEFAULT_PAGE_LIMIT,
        );

        let owned = store.ownership().accounts_for_tenant(&client_id);
        let expected: BTreeSet<i64> = store
            .select(&ScopePredicate::Unrestricted, DEFAULT_PAGE_LIMIT)
            .into_iter()
            .filter(|t| owned.contains(&t.customer))
            .map(|t| t.id)
            .collect();

        assert_eq!(ids(&rows), vec![1, 2, 3]);
        assert_eq!(ids(&rows).into_iter().collect::<BTreeSet<_>>(), expected);
        // Row 5 matches the tenant only by category and must not leak in.
        assert!(!ids(&rows).contains(&5));
    }

    #[test]
    fn unknown_tenant_sees_nothing() {
        let scope = ScopePredicate::ByTenant {
            client_id: TenantId::parse("DELTA").unwrap(),
        };
        assert!(store().select(&scope, DEFAULT_PAGE_LIMIT).is_empty());
    }

    #[test]
    fn page_is_capped() {
        let rows: Vec<Transaction> = (1..=250).map(|i| tx(i, "C1", "es_food")).collect();
        let store = InMemoryTransactionStore::new(rows, Arc::new(OwnershipIndex::new()));

        let page = store.select(&ScopePredicate::Unrestricted, DEFAULT_PAGE_LIMIT);
        assert_eq!(page.len(), DEFAULT_PAGE_LIMIT);
        assert_eq!(page.first().map(|t| t.id), Some(1));
        assert_eq!(page.last().map(|t| t.id), Some(100));
    }

    #[tokio::test]
    async fn async_query_matches_select() {
        let store = Arc::new(store());
        let scope = ScopePredicate::ByOwner {
            customer: AccountId::parse("C3").unwrap(),
        };

        let rows = store.query(&scope, DEFAULT_PAGE_LIMIT).await.unwrap();
        assert_eq!(rows, store.select(&scope, DEFAULT_PAGE_LIMIT));
    }
}
