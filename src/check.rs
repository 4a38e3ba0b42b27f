// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Check collaborator interface: the contract between the tree core and
//! policy checks, and the registry the scanning engine queries.
//!
//! The tree core itself never touches the registry; it is populated during
//! a single-threaded registration phase before concurrent scanning begins.

use crate::*;

use core::fmt;

use dashmap::DashMap;
use serde::Serialize;

type String = Rc<str>;

/// Outcome of evaluating one check against one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckResult {
    Passed,
    Failed,
    Skipped,
    /// The property under test was structurally opaque; neither a pass nor
    /// a fail can be asserted.
    Unknown,
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckResult::Passed => "PASSED",
            CheckResult::Failed => "FAILED",
            CheckResult::Skipped => "SKIPPED",
            CheckResult::Unknown => "UNKNOWN",
        })
    }
}

/// Category a check declares itself under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckCategory {
    ApplicationSecurity,
    BackupAndRecovery,
    Convention,
    Encryption,
    GeneralSecurity,
    Iam,
    Logging,
    Networking,
    Secrets,
    SupplyChain,
}

/// A policy check evaluated against entity configurations.
///
/// Checks read properties through `get_safe`/`items_safe`, combine
/// base and override configuration with `deep_merge`, and downgrade their
/// conclusion to [`CheckResult::Unknown`] when a property is structurally
/// opaque. Registration happens once, before scanning threads start, which
/// is why implementations are `Send + Sync`.
pub trait Check: Send + Sync {
    /// Stable identifier the registry is keyed by, e.g. `CFN_S3_1`.
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn categories(&self) -> &[CheckCategory];

    /// Entity type labels this check applies to.
    fn supported_entities(&self) -> &[&'static str];

    /// Template block the supported entities live under, e.g. `resources`.
    fn block_type(&self) -> &str;

    /// Evaluates `conf` for `entity_type`, returning the verdict and the
    /// effective (possibly traversal-expanded) configuration evaluated.
    fn scan_entity_conf(&self, conf: &Node, entity_type: &str) -> (CheckResult, Node);
}

/// Errors raised when registering a check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckRegistryError {
    #[error("check registration failed: a check with id '{0}' is already registered")]
    AlreadyExists(String),
    #[error("check registration failed: the id '{0}' is invalid (empty or whitespace-only ids are not allowed)")]
    InvalidId(String),
}

/// Thread-safe registry of checks keyed by check id.
#[derive(Clone, Default)]
pub struct CheckRegistry {
    inner: DashMap<String, Rc<dyn Check>>,
}

#[cfg(feature = "arc")]
lazy_static::lazy_static! {
    /// Process-wide check registry, populated during the single-threaded
    /// registration phase and queried by the scanning engine afterwards.
    /// Only available when using Arc (thread-safe) reference counting.
    pub static ref CHECK_REGISTRY: CheckRegistry = CheckRegistry::new();
}

impl CheckRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Register a check under its id. Returns Err for a duplicate or blank
    /// id.
    pub fn register(&self, check: Rc<dyn Check>) -> Result<(), CheckRegistryError> {
        let id: String = check.id().into();
        if id.trim().is_empty() {
            return Err(CheckRegistryError::InvalidId(id));
        }

        use dashmap::mapref::entry::Entry;
        match self.inner.entry(id) {
            Entry::Occupied(e) => Err(CheckRegistryError::AlreadyExists(e.key().clone())),
            Entry::Vacant(e) => {
                e.insert(check);
                Ok(())
            }
        }
    }

    /// Retrieve a check by id, if it exists.
    pub fn get(&self, id: &str) -> Option<Rc<dyn Check>> {
        self.inner.get(id).map(|entry| Rc::clone(entry.value()))
    }

    /// Check whether an id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.contains_key(id)
    }

    /// All checks declaring support for the given entity type.
    pub fn checks_for_entity(&self, entity_type: &str) -> Vec<Rc<dyn Check>> {
        self.inner
            .iter()
            .filter(|entry| {
                entry
                    .value()
                    .supported_entities()
                    .iter()
                    .any(|supported| *supported == entity_type)
            })
            .map(|entry| Rc::clone(entry.value()))
            .collect()
    }

    /// List all registered check ids.
    pub fn list_ids(&self) -> Vec<String> {
        self.inner.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Get the number of registered checks.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Clear all checks from the registry.
    pub fn clear(&self) {
        self.inner.clear();
    }
}
