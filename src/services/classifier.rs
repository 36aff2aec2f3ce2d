use crate::models::report::ScoreBand;

pub const MONTHS_PER_YEAR: f64 = 12.0;
pub const KG_PER_TONNE: f64 = 1000.0;

/// Upper bound (exclusive) of the High Performer band, in annual tCO2e.
pub const HIGH_PERFORMER_CEILING: f64 = 100.0;
/// Upper bound (inclusive) of the Compliant band, in annual tCO2e.
pub const COMPLIANT_CEILING: f64 = 250.0;

/// Converts a monthly kg CO2e total into annual tonnes.
pub fn annualize(total_monthly_kg: f64) -> f64 {
    (total_monthly_kg * MONTHS_PER_YEAR) / KG_PER_TONNE
}

pub fn classify(total_annual_tco2e: f64) -> ScoreBand {
    if total_annual_tco2e < HIGH_PERFORMER_CEILING {
        ScoreBand::HighPerformer
    } else if total_annual_tco2e <= COMPLIANT_CEILING {
        ScoreBand::Compliant
    } else {
        ScoreBand::NeedsImprovement
    }
}
