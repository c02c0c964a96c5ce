//! Credential slot discovery
//!
//! Accounts are supplied through environment variables, one slot per
//! account: `FLOCKPOST_ACCOUNT_{i}_CLIENT_ID`, `_CLIENT_SECRET`,
//! `_USERNAME`, `_PASSWORD`, `_USER_AGENT` for i starting at 1. A slot is
//! usable only when all five variables are set and non-empty; a partially
//! filled slot is skipped with a warning and never merged with another
//! slot. Deployments predating indexed slots may instead set the single
//! unindexed form (`FLOCKPOST_CLIENT_ID`, ...), which is consulted only
//! when no indexed slot yields a complete credential set.
//!
//! Discovery is a pure read of the environment; nothing here talks to the
//! network.

use tracing::{debug, warn};

use crate::types::AccountConfig;

/// Highest indexed slot scanned by [`discover`].
pub const MAX_ACCOUNT_SLOTS: usize = 30;

const FIELD_NAMES: [&str; 5] = [
    "CLIENT_ID",
    "CLIENT_SECRET",
    "USERNAME",
    "PASSWORD",
    "USER_AGENT",
];

enum Slot {
    Complete(AccountConfig),
    Partial(Vec<&'static str>),
    Empty,
}

fn read_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => None,
    }
}

fn read_slot(prefix: &str) -> Slot {
    let values: Vec<Option<String>> = FIELD_NAMES
        .iter()
        .map(|field| read_env(&format!("{}_{}", prefix, field)))
        .collect();

    let present = values.iter().filter(|value| value.is_some()).count();
    if present == 0 {
        return Slot::Empty;
    }
    if present < FIELD_NAMES.len() {
        let missing = FIELD_NAMES
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(field, _)| *field)
            .collect();
        return Slot::Partial(missing);
    }

    let mut values = values.into_iter().flatten();
    // Field order matches FIELD_NAMES.
    Slot::Complete(AccountConfig {
        client_id: values.next().unwrap_or_default(),
        client_secret: values.next().unwrap_or_default(),
        username: values.next().unwrap_or_default(),
        password: values.next().unwrap_or_default(),
        user_agent: values.next().unwrap_or_default(),
    })
}

/// Scan the default number of indexed slots. See [`discover_slots`].
pub fn discover() -> Vec<AccountConfig> {
    discover_slots(MAX_ACCOUNT_SLOTS)
}

/// Enumerate complete credential sets from the environment.
///
/// Indexed slots 1..=`max_slots` are scanned in order; that order becomes
/// the pool's ordinal assignment. When no indexed slot is complete, the
/// legacy unindexed slot is consulted as a fallback.
pub fn discover_slots(max_slots: usize) -> Vec<AccountConfig> {
    let mut configs = Vec::new();

    for index in 1..=max_slots {
        let prefix = format!("FLOCKPOST_ACCOUNT_{}", index);
        match read_slot(&prefix) {
            Slot::Complete(config) => {
                debug!(slot = index, username = %config.username, "credential slot discovered");
                configs.push(config);
            }
            Slot::Partial(missing) => {
                warn!(
                    slot = index,
                    missing = missing.join(", "),
                    "credential slot incomplete, skipping"
                );
            }
            Slot::Empty => {}
        }
    }

    if configs.is_empty() {
        match read_slot("FLOCKPOST") {
            Slot::Complete(config) => {
                debug!(username = %config.username, "legacy credential slot discovered");
                configs.push(config);
            }
            Slot::Partial(missing) => {
                warn!(
                    missing = missing.join(", "),
                    "legacy credential slot incomplete, skipping"
                );
            }
            Slot::Empty => {}
        }
    }

    configs
}
