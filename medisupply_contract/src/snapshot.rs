//! AppState snapshot loading
//!
//! The storage adapter persists the whole store as one JSON document. A
//! snapshot is only usable when it matches the current schema generation.

use crate::config::ValidationConfig;
use crate::errors::{ContractError, FieldIssue, IssueKind};
use crate::schema::EntityKind;
use crate::types::AppState;

/// Current schema generation of persisted snapshots
pub const STATE_VERSION: u32 = 1;

/// Parse, validate and version-check a persisted snapshot
pub fn load_snapshot(raw: &str) -> Result<AppState, ContractError> {
    load_snapshot_with(raw, &ValidationConfig::default())
}

pub fn load_snapshot_with(raw: &str, config: &ValidationConfig) -> Result<AppState, ContractError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| {
        ContractError::validation("", format!("Snapshot is not valid JSON: {}", e))
    })?;

    crate::validate_with(EntityKind::AppState, &value, config)?;
    check_version(&value)?;

    let state: AppState = serde_json::from_value(value).map_err(ContractError::from_serde)?;
    log::debug!(
        "Loaded snapshot v{}: {} medicines, {} suppliers, {} pharmacies, {} orders",
        state.version,
        state.medicines.len(),
        state.suppliers.len(),
        state.pharmacies.len(),
        state.orders.len()
    );
    Ok(state)
}

fn check_version(value: &serde_json::Value) -> Result<(), ContractError> {
    let version = value.get("version").and_then(|v| v.as_f64());
    if version == Some(f64::from(STATE_VERSION)) {
        return Ok(());
    }
    log::warn!(
        "Rejecting snapshot with version {:?}, expected {}",
        version,
        STATE_VERSION
    );
    Err(ContractError::from_issues(vec![FieldIssue::new(
        "version",
        IssueKind::VersionMismatch {
            expected: STATE_VERSION,
        },
    )]))
}

impl AppState {
    /// Empty store at the current schema generation
    pub fn current() -> Self {
        AppState::empty(STATE_VERSION)
    }

    pub fn is_current(&self) -> bool {
        self.version == f64::from(STATE_VERSION)
    }

    pub fn to_json(&self) -> Result<String, ContractError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ContractError::internal(format!("Failed to serialize snapshot: {}", e)))
    }
}
