//! Startup seeding: principals and transaction datasets from JSON files.
//!
//! Seed data is loaded once before the server starts serving. Identifier
//! fields are quote-normalized on the way in, the same way the scope resolver
//! normalizes token subjects.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use txguard_auth::{AuthError, CredentialStore, Principal, Role};
use txguard_core::{AccountId, DomainError, TenantId, Username, strip_quotes};

use crate::ownership::{OwnershipIndex, OwnershipRecord};
use crate::records::Transaction;

/// Upper bound on transaction rows taken from a single dataset.
pub const MAX_INGEST_ROWS: usize = 10_000;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// On-disk principal entry. The credential is stored pre-hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct PrincipalRecord {
    pub username: Username,
    pub role: Role,
    pub password_hash: String,
}

/// Demo principals `(username, role, plaintext)`, hashed at startup.
pub const DEV_PRINCIPALS: [(&str, Role, &str); 5] = [
    ("C1760492708", Role::User, "pass123"),
    ("C671449181", Role::User, "pass123"),
    ("es_transportation", Role::Client, "client123"),
    ("es_health", Role::Client, "client123"),
    ("admin", Role::Admin, "admin123"),
];

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SeedError> {
    let bytes = std::fs::read(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| SeedError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Register every principal from a JSON array file. Returns how many were added.
pub fn load_principals(path: &Path, store: &mut CredentialStore) -> Result<usize, SeedError> {
    let records: Vec<PrincipalRecord> = read_json(path)?;
    let count = records.len();
    for record in records {
        store.insert(Principal::new(record.username, record.role, record.password_hash))?;
    }
    tracing::info!(path = %path.display(), count, "principals loaded");
    Ok(count)
}

/// Hash and register the demo principals.
pub fn seed_dev_principals(store: &mut CredentialStore) -> Result<usize, SeedError> {
    for (username, role, plaintext) in DEV_PRINCIPALS {
        store.provision(Username::parse(username)?, role, plaintext)?;
    }
    tracing::warn!(count = DEV_PRINCIPALS.len(), "demo principals seeded; not for production");
    Ok(DEV_PRINCIPALS.len())
}

/// Transaction row as exported upstream (loosely typed, possibly quoted).
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    pub id: Option<i64>,
    pub step: i64,
    pub customer: String,
    pub age: Option<i64>,
    pub gender: Option<String>,
    #[serde(default)]
    pub merchant: String,
    #[serde(default)]
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub fraud: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawOwnership {
    pub customer: String,
    pub client_id: String,
}

/// Dataset file shape: `{ "transactions": [...], "ownership": [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
    #[serde(default)]
    pub ownership: Vec<RawOwnership>,
}

/// Normalized dataset ready to back a store.
#[derive(Debug, Default)]
pub struct LoadedDataset {
    pub transactions: Vec<Transaction>,
    pub ownership: OwnershipIndex,
    /// Rows dropped for an empty customer, a non-finite amount, a duplicate id
    /// or the row cap.
    pub skipped: usize,
}

pub fn load_dataset(path: &Path) -> Result<LoadedDataset, SeedError> {
    let dataset: Dataset = read_json(path)?;
    let loaded = normalize_dataset(dataset)?;
    tracing::info!(
        path = %path.display(),
        transactions = loaded.transactions.len(),
        accounts = loaded.ownership.account_count(),
        tenants = loaded.ownership.tenant_count(),
        skipped = loaded.skipped,
        "dataset loaded"
    );
    Ok(loaded)
}

fn clean(value: &str) -> String {
    strip_quotes(value).to_string()
}

/// Smallest id at or above `candidate` that is not taken yet.
fn next_free_id(used: &HashSet<i64>, mut candidate: i64) -> Option<i64> {
    while used.contains(&candidate) {
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

/// Normalize raw rows: strip quotes, drop unusable rows, assign missing ids,
/// and build the ownership index.
///
/// Ids are unique in the result. A row whose explicit id is already taken is
/// skipped; a missing id gets the next free id after the highest seen so far.
pub fn normalize_dataset(dataset: Dataset) -> Result<LoadedDataset, SeedError> {
    let mut loaded = LoadedDataset::default();
    let mut used_ids = HashSet::new();
    let mut next_id: i64 = 1;

    for raw in dataset.transactions {
        if loaded.transactions.len() >= MAX_INGEST_ROWS {
            loaded.skipped += 1;
            continue;
        }
        let Ok(customer) = AccountId::parse(&raw.customer) else {
            loaded.skipped += 1;
            continue;
        };
        if !raw.amount.is_finite() {
            loaded.skipped += 1;
            continue;
        }

        let id = match raw.id {
            Some(id) => id,
            None => match next_free_id(&used_ids, next_id) {
                Some(id) => id,
                None => {
                    loaded.skipped += 1;
                    continue;
                }
            },
        };
        if !used_ids.insert(id) {
            tracing::warn!(id, "duplicate transaction id skipped");
            loaded.skipped += 1;
            continue;
        }
        if let Some(after) = id.checked_add(1) {
            next_id = next_id.max(after);
        }

        loaded.transactions.push(Transaction {
            id,
            step: raw.step,
            customer,
            age: raw.age,
            gender: raw.gender.as_deref().map(clean).filter(|g| !g.is_empty()),
            merchant: clean(&raw.merchant),
            category: clean(&raw.category),
            amount: raw.amount,
            fraud: raw.fraud != 0,
        });
    }

    for raw in dataset.ownership {
        let (Ok(customer), Ok(client_id)) = (AccountId::parse(&raw.customer), TenantId::parse(&raw.client_id))
        else {
            loaded.skipped += 1;
            continue;
        };
        loaded.ownership.insert(OwnershipRecord { customer, client_id })?;
    }

    Ok(loaded)
}
