//! Service wiring: credential store, token codec and record store.

use std::sync::Arc;

use anyhow::Context;

use txguard_auth::{CredentialHasher, CredentialStore, TokenCodec};
use txguard_infra::seed::{self, LoadedDataset};
use txguard_infra::{InMemoryTransactionStore, TransactionStore};
#[cfg(feature = "postgres")]
use txguard_infra::transaction_store::PostgresTransactionStore;

use crate::config::ApiConfig;

/// Everything a request handler needs; immutable once built.
#[derive(Clone)]
pub struct AppServices {
    pub credentials: Arc<CredentialStore>,
    pub codec: Arc<TokenCodec>,
    pub transactions: Arc<dyn TransactionStore>,
    pub page_limit: usize,
}

impl AppServices {
    pub fn new(
        credentials: CredentialStore,
        codec: TokenCodec,
        transactions: Arc<dyn TransactionStore>,
        page_limit: usize,
    ) -> Self {
        Self {
            credentials: Arc::new(credentials),
            codec: Arc::new(codec),
            transactions,
            page_limit,
        }
    }
}

/// Build services from configuration. Runs once, before the listener binds.
pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let credentials = build_credentials(config)?;
    let codec = TokenCodec::new(&config.jwt_secret, config.token_ttl);
    let transactions = build_transaction_store(config).await?;

    Ok(AppServices::new(credentials, codec, transactions, config.page_limit))
}

fn build_credentials(config: &ApiConfig) -> anyhow::Result<CredentialStore> {
    let mut store = CredentialStore::new(CredentialHasher::default())?;

    if let Some(path) = &config.principals_file {
        seed::load_principals(path, &mut store).context("loading principals")?;
    }
    if config.dev_seed_principals {
        seed::seed_dev_principals(&mut store).context("seeding demo principals")?;
    }
    if store.is_empty() {
        tracing::warn!("no principals registered; every login will be rejected");
    }

    Ok(store)
}

async fn build_transaction_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn TransactionStore>> {
    if let Some(database_url) = &config.database_url {
        #[cfg(feature = "postgres")]
        {
            let store = PostgresTransactionStore::connect(database_url)
                .await
                .context("connecting to Postgres")?;
            store.ensure_schema().await.context("preparing schema")?;
            tracing::info!("using Postgres transaction store");
            return Ok(Arc::new(store));
        }
        #[cfg(not(feature = "postgres"))]
        {
            let _ = database_url;
            tracing::warn!("DATABASE_URL set but postgres feature not enabled, falling back to in-memory");
        }
    }

    let dataset = match &config.dataset_file {
        Some(path) => seed::load_dataset(path).context("loading dataset")?,
        None => {
            tracing::warn!("no DATASET_FILE configured; transaction store is empty");
            LoadedDataset::default()
        }
    };

    Ok(Arc::new(InMemoryTransactionStore::new(
        dataset.transactions,
        Arc::new(dataset.ownership),
    )))
}
