//! Command handlers, one module per subcommand.

pub mod audit;
pub mod config_cmd;
pub mod overlap;
pub mod rules;

use std::path::Path;

use tracing::debug;
use unifly_audit_core::{CoreError, Snapshot};

use crate::error::CliError;

/// Load and validate a snapshot, naming the file when it cannot be read.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, CliError> {
    let snapshot = Snapshot::from_path(path).map_err(|err| match err {
        CoreError::Io(source) => CliError::SnapshotUnreadable {
            path: path.display().to_string(),
            source,
        },
        other => other.into(),
    })?;
    debug!(
        path = %path.display(),
        site = snapshot.site.as_deref().unwrap_or("-"),
        rules = snapshot.rules.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
