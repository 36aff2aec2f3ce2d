use rand::Rng;
use tracing::{debug, info, warn};

use crate::models::emission::{NormalizedAverages, EMISSION_SOURCES};
use crate::models::report::EmissionBreakdownLine;

/// Largest monthly total whose annual figure still fits in an `f64`.
const MAX_MONTHLY_KG: f64 = f64::MAX / 16.0;

/// Per-source breakdown and monthly total for one input batch.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionCalculation {
    pub lines: Vec<EmissionBreakdownLine>,
    pub total_monthly_kg: f64,
    /// Usage values the lines were computed from; synthesized when `is_sample_data`.
    pub usage: NormalizedAverages,
    pub is_sample_data: bool,
}

/// Applies the emission registry to normalized usage values.
///
/// When no registry source carries a positive value, every source receives a
/// random usage drawn from its sample range so the report is never empty.
/// The output is therefore non-deterministic unless `rng` is seeded.
pub fn calculate<R: Rng + ?Sized>(averages: &NormalizedAverages, rng: &mut R) -> EmissionCalculation {
    let (lines, total_monthly_kg) = tally(averages);
    if !lines.is_empty() {
        return EmissionCalculation {
            lines,
            total_monthly_kg,
            usage: averages.clone(),
            is_sample_data: false,
        };
    }

    let usage = synthesize_usage(rng);
    let (lines, total_monthly_kg) = tally(&usage);
    info!(
        target: "app::report",
        total_monthly_kg,
        "no usable input data, report built from sample values"
    );

    EmissionCalculation {
        lines,
        total_monthly_kg,
        usage,
        is_sample_data: true,
    }
}

/// Emission lines in registry order plus their signed sum.
///
/// A source whose emission, or the running total it would produce, leaves the
/// finite range is skipped, so the total and its annual figure stay finite.
pub fn tally(usage: &NormalizedAverages) -> (Vec<EmissionBreakdownLine>, f64) {
    let mut lines = Vec::new();
    let mut total_monthly_kg = 0.0;

    for source in EMISSION_SOURCES.iter() {
        let value = match usage.get(source.key) {
            Some(value) if value > 0.0 && value.is_finite() => value,
            _ => continue,
        };

        let emission_kg = value * source.factor;
        let running_total = total_monthly_kg + emission_kg;
        if !emission_kg.is_finite() || running_total.abs() > MAX_MONTHLY_KG {
            warn!(
                target: "app::report",
                source = source.key,
                value,
                "emission outside the representable range, source skipped"
            );
            continue;
        }
        total_monthly_kg = running_total;
        debug!(
            target: "app::report",
            source = source.key,
            value,
            emission_kg,
            "emission source applied"
        );

        lines.push(EmissionBreakdownLine {
            source_label: source.label.to_string(),
            usage_value: value,
            usage_unit: source.unit.to_string(),
            emission_kg,
            is_credit: source.is_credit(),
        });
    }

    (lines, total_monthly_kg)
}

fn synthesize_usage<R: Rng + ?Sized>(rng: &mut R) -> NormalizedAverages {
    EMISSION_SOURCES
        .iter()
        .map(|source| {
            let raw = rng.gen_range(source.sample_range.clone());
            (source.key.to_string(), round_to_hundredths(raw))
        })
        .collect()
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
