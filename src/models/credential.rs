//! Admin credential record, persisted as its own JSON file.

use serde::{Deserialize, Serialize};

/// Hashed admin password as written to the credential file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    pub hashed_password: String,
    pub updated_at: String,
    pub version: String,
}
