use crate::models::emission::{NormalizedAverages, EMISSION_SOURCES};

pub const EFFICIENT_OPERATIONS_RECOMMENDATION: &str = "Operations appear efficient: Recorded usage is within the recommended thresholds for every tracked source. Keep submitting monthly data to catch regressions early.";

/// Generic advice shown when no source crosses its threshold.
pub const FALLBACK_RECOMMENDATIONS: [&str; 4] = [
    EFFICIENT_OPERATIONS_RECOMMENDATION,
    "Renewable energy: Source at least 10% of electricity from solar, wind, or open-access renewable contracts.",
    "Water recycling: Route effluent through an ETP and reuse at least 30% of total process water.",
    "Waste management: Recycle at least 30% of fabric waste and keep solid waste below 10% of production weight.",
];

/// Tailored recommendations for every source whose usage strictly exceeds its
/// threshold, in registry order; the generic set when none does.
pub fn recommend(usage: &NormalizedAverages) -> Vec<String> {
    let tailored: Vec<String> = EMISSION_SOURCES
        .iter()
        .filter_map(|source| {
            let threshold = source.threshold?;
            let text = source.recommendation_text?;
            let value = usage.get(source.key)?;
            (value > threshold).then(|| text.to_string())
        })
        .collect();

    if tailored.is_empty() {
        FALLBACK_RECOMMENDATIONS
            .iter()
            .map(|text| text.to_string())
            .collect()
    } else {
        tailored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::emission::{COAL_RECOMMENDATION, ELECTRICITY_RECOMMENDATION};

    fn usage(pairs: &[(&str, f64)]) -> NormalizedAverages {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), *value))
            .collect()
    }

    #[test]
    fn threshold_must_be_strictly_exceeded() {
        let at_threshold = recommend(&usage(&[("electricity usage", 20_000.0)]));
        assert_eq!(at_threshold[0], EFFICIENT_OPERATIONS_RECOMMENDATION);

        let above = recommend(&usage(&[("electricity usage", 20_000.5)]));
        assert_eq!(above, vec![ELECTRICITY_RECOMMENDATION.to_string()]);
    }

    #[test]
    fn tailored_recommendations_follow_registry_order() {
        let result = recommend(&usage(&[
            ("coal usage", 4.0),
            ("electricity usage", 25_000.0),
            ("fabric waste", 9_000.0),
        ]));
        assert_eq!(
            result,
            vec![
                ELECTRICITY_RECOMMENDATION.to_string(),
                COAL_RECOMMENDATION.to_string()
            ]
        );
    }

    #[test]
    fn credits_never_trigger() {
        let result = recommend(&usage(&[("recycled water", 1.0e9)]));
        assert_eq!(result.len(), FALLBACK_RECOMMENDATIONS.len());
    }
}
