use serde::{Deserialize, Serialize};

/// Result of a successful connectivity probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbDiagnostic {
    /// Output of `SELECT version()`
    pub server_version: String,
    /// Output of `SELECT current_database()`
    pub current_database: String,
}
