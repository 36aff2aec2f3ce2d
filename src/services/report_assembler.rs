use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::models::record::RawRecord;
use crate::models::report::{BreakdownRow, EmissionBreakdownLine, EmissionReport, ScoreBand};
use crate::services::classifier::{annualize, classify};
use crate::services::emission_calculator::{calculate, EmissionCalculation};
use crate::services::normalizer::normalize;
use crate::services::recommendation_engine::recommend;
use crate::services::report_renderer::HtmlReportRenderer;
use crate::utils::format::format_number;

/// Reduction range quoted in the predictive statement, as fractions of annual emissions.
pub const REDUCTION_POTENTIAL: (f64, f64) = (0.15, 0.20);

/// Runs the full pipeline on a batch using the thread-local random source.
///
/// Reports built from an empty or unusable batch contain random sample values
/// and differ between calls; use [`compute_report_with_rng`] with a seeded
/// generator when exact output matters.
pub fn compute_report(batch: &[RawRecord], company_name: &str) -> EmissionReport {
    compute_report_with_rng(batch, company_name, &mut rand::thread_rng())
}

pub fn compute_report_with_rng<R: Rng + ?Sized>(
    batch: &[RawRecord],
    company_name: &str,
    rng: &mut R,
) -> EmissionReport {
    let averages = normalize(batch);
    let calculation = calculate(&averages, rng);
    assemble(company_name, calculation, Utc::now())
}

/// Composes the calculator output into a finished report, markup included.
pub fn assemble(
    company_name: &str,
    calculation: EmissionCalculation,
    generated_at: DateTime<Utc>,
) -> EmissionReport {
    let company_name = display_company_name(company_name);
    let total_annual = annualize(calculation.total_monthly_kg);
    let band = classify(total_annual);
    let recommendations = recommend(&calculation.usage);
    let breakdown = calculation.lines.iter().map(breakdown_row).collect();
    let summary = summary_text(
        &company_name,
        total_annual,
        calculation.total_monthly_kg,
        band,
        calculation.is_sample_data,
    );
    let projection = projection_text(&company_name, total_annual);

    info!(
        target: "app::report",
        company = %company_name,
        total_annual,
        band = %band,
        sample = calculation.is_sample_data,
        "report assembled"
    );

    let mut report = EmissionReport {
        id: Uuid::new_v4().to_string(),
        company_name,
        generated_at: generated_at.to_rfc3339(),
        report_markup: String::new(),
        total_annual_emissions_tco2e: total_annual,
        sustainability_score: band,
        recommendations,
        breakdown,
        breakdown_lines: calculation.lines,
        total_monthly_kg: calculation.total_monthly_kg,
        summary,
        projection,
        is_sample_data: calculation.is_sample_data,
    };
    report.report_markup = HtmlReportRenderer.render_markup(&report);
    report
}

pub fn breakdown_row(line: &EmissionBreakdownLine) -> BreakdownRow {
    BreakdownRow {
        source: line.source_label.clone(),
        usage: format!(
            "{} {}",
            format_number(line.usage_value, usage_decimals(line.usage_value)),
            line.usage_unit
        ),
        emission: format!("{} kg CO2e", format_number(line.emission_kg, 2)),
        is_credit: line.is_credit,
    }
}

fn usage_decimals(value: f64) -> usize {
    if value.abs() < 100.0 {
        2
    } else {
        0
    }
}

fn display_company_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "Your Company".to_string()
    } else {
        trimmed.to_string()
    }
}

fn summary_text(
    company_name: &str,
    total_annual: f64,
    total_monthly_kg: f64,
    band: ScoreBand,
    is_sample_data: bool,
) -> String {
    let mut summary = String::new();
    if is_sample_data {
        summary.push_str(
            "No usable operational data was supplied, so this report is based on sample values. ",
        );
    }
    summary.push_str(&format!(
        "{} has estimated annual carbon emissions of {} tCO2e ({} kg CO2e per month), earning a sustainability score of \"{}\".",
        company_name,
        format_number(total_annual, 2),
        format_number(total_monthly_kg, 2),
        band
    ));
    summary
}

fn projection_text(company_name: &str, total_annual: f64) -> String {
    let (low, high) = REDUCTION_POTENTIAL;
    format!(
        "If operations continue unchanged, {} will emit approximately {} tCO2e over the next 12 months. Adopting the recommendations in this report could cut annual emissions by an estimated {:.0}-{:.0}%, to between {} and {} tCO2e.",
        company_name,
        format_number(total_annual, 2),
        low * 100.0,
        high * 100.0,
        format_number(total_annual * (1.0 - high), 2),
        format_number(total_annual * (1.0 - low), 2),
    )
}
