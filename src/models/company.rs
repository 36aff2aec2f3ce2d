use serde::{Deserialize, Serialize};

pub const COMPLIANCE_LEVELS: [&str; 3] = ["basic", "intermediate", "certified"];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<i64>,
    /// Yearly fabric output in tons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yearly_output: Option<f64>,
    pub compliance_level: String,
    pub updated_at: String,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfileUpdate {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub subdomain: Option<String>,
    #[serde(default)]
    pub capacity: Option<f64>,
    #[serde(default)]
    pub employees: Option<i64>,
    #[serde(default)]
    pub yearly_output: Option<f64>,
    #[serde(default)]
    pub compliance_level: Option<String>,
}
