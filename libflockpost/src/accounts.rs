//! Multi-account session pool
//!
//! The pool turns discovered credential sets into authenticated sessions
//! and addresses them by a stable 1-based ordinal. Ordinals follow
//! discovery order and hold for the process lifetime; a reload replaces
//! the whole pool and may reassign them. Other components never keep a
//! session handle; they keep the ordinal and re-resolve on each use.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::credentials;
use crate::error::SubmitError;
use crate::platforms::{Connector, Session};
use crate::types::AccountConfig;

/// One account that failed to load, with the reason.
#[derive(Debug, Clone)]
pub struct LoadFailure {
    pub username: String,
    pub message: String,
}

/// Outcome of a pool load.
///
/// A load succeeds overall iff at least one account came up; individual
/// failures are recorded here and do not abort the remaining candidates.
#[derive(Debug, Clone, Default)]
pub struct LoadResult {
    pub total_loaded: usize,
    pub failures: Vec<LoadFailure>,
}

impl LoadResult {
    pub fn success(&self) -> bool {
        self.total_loaded > 0
    }
}

/// A resolved account: ordinal, probed username, and the live session.
#[derive(Clone)]
pub struct Account {
    pub ordinal: usize,
    pub username: String,
    pub session: Arc<dyn Session>,
}

struct LoadedAccount {
    username: String,
    session: Arc<dyn Session>,
}

#[derive(Default)]
struct PoolState {
    ready: bool,
    accounts: Vec<LoadedAccount>,
}

/// Thread-safe pool of authenticated sessions addressed by ordinal.
#[derive(Clone)]
pub struct AccountPool {
    connector: Arc<dyn Connector>,
    state: Arc<RwLock<PoolState>>,
    max_slots: usize,
}

impl AccountPool {
    /// Create a pool that scans the default number of credential slots.
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self::with_max_slots(connector, credentials::MAX_ACCOUNT_SLOTS)
    }

    /// Create a pool with a custom slot scan limit.
    pub fn with_max_slots(connector: Arc<dyn Connector>, max_slots: usize) -> Self {
        Self {
            connector,
            state: Arc::new(RwLock::new(PoolState::default())),
            max_slots,
        }
    }

    /// Discover credential slots from the environment and load them.
    pub async fn load(&self) -> LoadResult {
        let configs = credentials::discover_slots(self.max_slots);
        self.load_from(configs).await
    }

    /// Load the given credential sets, fully replacing prior pool state.
    ///
    /// Candidates are authenticated sequentially in the order given; that
    /// order becomes the ordinal assignment. Each candidate gets one
    /// liveness probe (fetching its own identity); a candidate that fails
    /// either step is recorded and skipped without aborting the rest.
    pub async fn load_from(&self, configs: Vec<AccountConfig>) -> LoadResult {
        let mut accounts = Vec::new();
        let mut failures = Vec::new();

        for config in &configs {
            match self.connect_and_probe(config).await {
                Ok(account) => {
                    info!(
                        ordinal = accounts.len() + 1,
                        username = %account.username,
                        "account loaded"
                    );
                    accounts.push(account);
                }
                Err(message) => {
                    warn!(username = %config.username, %message, "account failed to load");
                    failures.push(LoadFailure {
                        username: config.username.clone(),
                        message,
                    });
                }
            }
        }

        let result = LoadResult {
            total_loaded: accounts.len(),
            failures,
        };

        let mut state = self.state.write().unwrap();
        state.ready = result.success();
        state.accounts = accounts;

        result
    }

    async fn connect_and_probe(
        &self,
        config: &AccountConfig,
    ) -> std::result::Result<LoadedAccount, String> {
        let session = self
            .connector
            .connect(config)
            .await
            .map_err(|e| format!("authentication failed: {}", e))?;
        let session: Arc<dyn Session> = Arc::from(session);

        // The probed identity is authoritative over the configured one.
        let username = session
            .current_user()
            .await
            .map_err(|e| format!("identity probe failed: {}", e))?;

        Ok(LoadedAccount { username, session })
    }

    /// Resolve an ordinal to its account.
    ///
    /// Fails with `InvalidOrdinal` when the pool is not ready or the
    /// ordinal is outside `[1, loaded_count]`.
    pub fn resolve(&self, ordinal: usize) -> std::result::Result<Account, SubmitError> {
        let state = self.state.read().unwrap();
        if !state.ready || ordinal == 0 || ordinal > state.accounts.len() {
            return Err(SubmitError::InvalidOrdinal(ordinal));
        }
        let loaded = &state.accounts[ordinal - 1];
        Ok(Account {
            ordinal,
            username: loaded.username.clone(),
            session: Arc::clone(&loaded.session),
        })
    }

    /// True once a load has succeeded and the pool holds at least one
    /// account.
    pub fn is_ready(&self) -> bool {
        self.state.read().unwrap().ready
    }

    /// Number of loaded accounts.
    pub fn loaded_count(&self) -> usize {
        self.state.read().unwrap().accounts.len()
    }

    /// Snapshot of (ordinal, username) pairs in ordinal order.
    pub fn usernames(&self) -> Vec<(usize, String)> {
        let state = self.state.read().unwrap();
        state
            .accounts
            .iter()
            .enumerate()
            .map(|(index, account)| (index + 1, account.username.clone()))
            .collect()
    }
}
