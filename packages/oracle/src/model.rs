use audit_merkle::{canonical_json, AuditData};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// A single finding reported by the scanner.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct Vulnerability {
    pub id: u32,
    pub severity: Severity,
    pub title: String,
    /// Source line the finding points at.
    pub line: u32,
    pub description: String,
    pub impact: String,
    pub recommendation: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct Fix {
    pub code: String,
}

#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Completed,
    Failed,
}

/// An audit as kept by the document store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, JsonSchema)]
pub struct AuditRecord {
    pub id: String,
    pub user_id: String,
    pub contract_name: String,
    pub contract_code: String,
    pub risk_score: u32,
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_code: Option<String>,
    pub status: AuditStatus,
    /// IPFS identifier of the published report metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipfs_metadata_cid: Option<String>,
}

impl AuditRecord {
    /// Maps the record onto the four Merkle input groups.
    ///
    /// Every vulnerability is its own leaf. Patched code, when present,
    /// becomes a single fix. The model output leaf commits to the whole
    /// record, and the report reference is the metadata CID or an empty
    /// string when nothing was published.
    pub fn merkle_input(&self) -> Result<AuditData> {
        let vulnerabilities = self
            .vulnerabilities
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let fixes = self
            .fixed_code
            .iter()
            .map(|code| serde_json::to_value(Fix { code: code.clone() }))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(AuditData {
            vulnerabilities,
            fixes,
            model_output: canonical_json(self)?,
            report_reference: self.ipfs_metadata_cid.clone().unwrap_or_default(),
        })
    }
}
