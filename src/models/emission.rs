use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// A registry entry describing how one measured quantity converts into kg CO2e.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionSourceDefinition {
    /// Canonical label: lowercase, trimmed.
    pub key: &'static str,
    /// Display label used in reports.
    pub label: &'static str,
    /// kg CO2e per unit; negative for credits.
    pub factor: f64,
    pub unit: &'static str,
    pub threshold: Option<f64>,
    pub recommendation_text: Option<&'static str>,
    /// Plausible monthly usage drawn when no real data is available.
    pub sample_range: RangeInclusive<f64>,
}

impl EmissionSourceDefinition {
    pub fn is_credit(&self) -> bool {
        self.factor < 0.0
    }
}

pub const ELECTRICITY_RECOMMENDATION: &str = "Electricity: Monthly consumption is above 20,000 kWh. Shift at least 10% of demand to rooftop solar or open-access renewables and replace older motors with BEE 4-star or higher rated units.";
pub const DIESEL_RECOMMENDATION: &str = "Diesel: Usage is above 1,500 litres per month. Switch boilers and generators to LPG or PNG where possible and schedule regular burner tuning to cut fuel losses.";
pub const COAL_RECOMMENDATION: &str = "Coal: More than 3 tons are burned each month. Plan a phased move to biomass briquettes or electric heat pumps for process heat, and recover condensate to lower boiler load.";

/// Emission sources in report order: direct sources first, credits last.
pub static EMISSION_SOURCES: [EmissionSourceDefinition; 9] = [
    EmissionSourceDefinition {
        key: "electricity usage",
        label: "Electricity Usage",
        factor: 0.82,
        unit: "kWh",
        threshold: Some(20_000.0),
        recommendation_text: Some(ELECTRICITY_RECOMMENDATION),
        sample_range: 12_000.0..=32_000.0,
    },
    EmissionSourceDefinition {
        key: "diesel usage",
        label: "Diesel Usage",
        factor: 2.68,
        unit: "litres",
        threshold: Some(1_500.0),
        recommendation_text: Some(DIESEL_RECOMMENDATION),
        sample_range: 600.0..=2_400.0,
    },
    EmissionSourceDefinition {
        key: "coal usage",
        label: "Coal Usage",
        factor: 2420.0,
        unit: "tons",
        threshold: Some(3.0),
        recommendation_text: Some(COAL_RECOMMENDATION),
        sample_range: 0.5..=5.0,
    },
    EmissionSourceDefinition {
        key: "lpg usage",
        label: "LPG Usage",
        factor: 1.51,
        unit: "kg",
        threshold: None,
        recommendation_text: None,
        sample_range: 200.0..=900.0,
    },
    EmissionSourceDefinition {
        key: "transport distance",
        label: "Transport Distance",
        factor: 0.27,
        unit: "km",
        threshold: None,
        recommendation_text: None,
        sample_range: 1_500.0..=8_000.0,
    },
    EmissionSourceDefinition {
        key: "water used",
        label: "Water Used",
        factor: 0.0003,
        unit: "liters",
        threshold: None,
        recommendation_text: None,
        sample_range: 150_000.0..=600_000.0,
    },
    EmissionSourceDefinition {
        key: "fabric waste",
        label: "Fabric Waste",
        factor: 0.5,
        unit: "kg",
        threshold: None,
        recommendation_text: None,
        sample_range: 300.0..=1_500.0,
    },
    EmissionSourceDefinition {
        key: "recycled fabric waste",
        label: "Recycled Fabric Waste",
        factor: -0.2,
        unit: "kg",
        threshold: None,
        recommendation_text: None,
        sample_range: 100.0..=500.0,
    },
    EmissionSourceDefinition {
        key: "recycled water",
        label: "Recycled Water",
        factor: -0.0001,
        unit: "liters",
        threshold: None,
        recommendation_text: None,
        sample_range: 40_000.0..=180_000.0,
    },
];

/// Finds a registry entry by canonical key.
pub fn find_source(key: &str) -> Option<&'static EmissionSourceDefinition> {
    EMISSION_SOURCES.iter().find(|source| source.key == key)
}

/// Mean value per canonical label across an input batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedAverages {
    values: BTreeMap<String, f64>,
}

impl NormalizedAverages {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl FromIterator<(String, f64)> for NormalizedAverages {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
