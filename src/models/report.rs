use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::record::RawRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ScoreBand {
    #[serde(rename = "High Performer")]
    HighPerformer,
    #[serde(rename = "Compliant")]
    Compliant,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl ScoreBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::HighPerformer => "High Performer",
            ScoreBand::Compliant => "Compliant",
            ScoreBand::NeedsImprovement => "Needs Improvement",
        }
    }

    /// Badge colour used by the inline and printable renderers.
    pub fn badge_color(&self) -> &'static str {
        match self {
            ScoreBand::HighPerformer => "#16a34a",
            ScoreBand::Compliant => "#d97706",
            ScoreBand::NeedsImprovement => "#dc2626",
        }
    }

    pub fn badge_rgb(&self) -> [u8; 3] {
        match self {
            ScoreBand::HighPerformer => [22, 163, 74],
            ScoreBand::Compliant => [217, 119, 6],
            ScoreBand::NeedsImprovement => [220, 38, 38],
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "High Performer" => Some(ScoreBand::HighPerformer),
            "Compliant" => Some(ScoreBand::Compliant),
            "Needs Improvement" => Some(ScoreBand::NeedsImprovement),
            _ => None,
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionBreakdownLine {
    pub source_label: String,
    pub usage_value: f64,
    pub usage_unit: String,
    pub emission_kg: f64,
    pub is_credit: bool,
}

/// Display row of the breakdown table, already formatted for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownRow {
    pub source: String,
    pub usage: String,
    pub emission: String,
    #[serde(default)]
    pub is_credit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionReport {
    pub id: String,
    pub company_name: String,
    pub generated_at: String,
    pub report_markup: String,
    #[serde(rename = "totalAnnualEmissionsTCO2e")]
    pub total_annual_emissions_tco2e: f64,
    pub sustainability_score: ScoreBand,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub breakdown: Vec<BreakdownRow>,
    #[serde(default)]
    pub breakdown_lines: Vec<EmissionBreakdownLine>,
    pub total_monthly_kg: f64,
    pub summary: String,
    pub projection: String,
    /// True when usage values were synthesized because no real data was supplied.
    pub is_sample_data: bool,
}

/// Where the input batch of a report comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ReportSource {
    Batch {
        #[serde(default)]
        records: Vec<RawRecord>,
    },
    Upload {
        path: String,
    },
    Periods {
        from: String,
        to: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub source: ReportSource,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// A persisted report as listed in the history view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummaryRecord {
    pub id: String,
    pub title: String,
    pub company_name: String,
    #[serde(rename = "totalAnnualEmissionsTCO2e")]
    pub total_annual_emissions_tco2e: f64,
    pub sustainability_score: ScoreBand,
    pub generated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub title: String,
    pub report: EmissionReport,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ReportExportFormat {
    Html,
    Markdown,
    Json,
    Print,
}

impl ReportExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ReportExportFormat::Html => "html",
            ReportExportFormat::Markdown => "md",
            ReportExportFormat::Json => "json",
            ReportExportFormat::Print => "print.json",
        }
    }
}

impl Default for ReportExportFormat {
    fn default() -> Self {
        ReportExportFormat::Html
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportExportResult {
    pub report_id: String,
    pub file_path: String,
    pub format: ReportExportFormat,
    pub generated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_band_serializes_as_label() {
        let json = serde_json::to_string(&ScoreBand::NeedsImprovement).expect("serialize");
        assert_eq!(json, "\"Needs Improvement\"");
        for band in [
            ScoreBand::HighPerformer,
            ScoreBand::Compliant,
            ScoreBand::NeedsImprovement,
        ] {
            assert_eq!(ScoreBand::from_label(band.as_str()), Some(band));
        }
    }

    #[test]
    fn report_source_is_tagged_by_kind() {
        let request: ReportRequest = serde_json::from_str(
            r#"{"source": {"kind": "periods", "from": "2024-01", "to": "2024-03"}}"#,
        )
        .expect("parse request");
        assert!(matches!(request.source, ReportSource::Periods { .. }));
        assert!(request.company_name.is_none());
    }
}
