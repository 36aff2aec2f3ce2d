use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::record::{FieldValue, RawRecord};

/// Manual monthly submission from the data-input form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDataInput {
    /// Reporting month as `YYYY-MM`.
    pub period: String,
    #[serde(default)]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OperationalRecord {
    pub id: String,
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    pub record: RawRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub source_name: String,
    pub period: String,
    pub imported: usize,
    #[serde(default)]
    pub record_ids: Vec<String>,
}
