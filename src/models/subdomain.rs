use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubdomainInput {
    pub name: &'static str,
    pub unit: &'static str,
    pub emission_type: &'static str,
}

/// A factory type offered in the data-input form, with the inputs it reports.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subdomain {
    pub name: &'static str,
    pub description: &'static str,
    pub inputs: &'static [SubdomainInput],
}

pub const SUBDOMAINS: [Subdomain; 6] = [
    Subdomain {
        name: "Spinning Units",
        description: "Track power consumption, yarn output, and boiler fuel usage.",
        inputs: &[
            SubdomainInput { name: "Power Consumption", unit: "kWh", emission_type: "Energy" },
            SubdomainInput { name: "Yarn Output", unit: "kg", emission_type: "Production" },
            SubdomainInput { name: "Boiler Fuel", unit: "liters/kg", emission_type: "Energy" },
        ],
    },
    Subdomain {
        name: "Weaving Mills",
        description: "Monitor loom electricity, lubrication, and fabric output.",
        inputs: &[
            SubdomainInput { name: "Loom Electricity", unit: "kWh", emission_type: "Energy" },
            SubdomainInput { name: "Lubrication Oil Used", unit: "liters", emission_type: "Chemical" },
            SubdomainInput { name: "Fabric Output", unit: "meters", emission_type: "Production" },
        ],
    },
    Subdomain {
        name: "Garment Manufacturing",
        description: "Log machine usage, fabric waste, and transport metrics.",
        inputs: &[
            SubdomainInput { name: "Machine Usage Time", unit: "hours", emission_type: "Energy" },
            SubdomainInput { name: "Fabric Waste", unit: "kg", emission_type: "Solid Waste" },
            SubdomainInput { name: "Transport Distance", unit: "km", emission_type: "Transport" },
        ],
    },
    Subdomain {
        name: "Dyeing & Processing",
        description: "Measure water, chemical, and effluent quantities.",
        inputs: &[
            SubdomainInput { name: "Water Used", unit: "liters", emission_type: "Water" },
            SubdomainInput { name: "Chemical Quantity", unit: "kg", emission_type: "Chemical" },
            SubdomainInput { name: "Effluent Volume", unit: "liters", emission_type: "Water" },
        ],
    },
    Subdomain {
        name: "Packaging & Logistics",
        description: "Analyze transport distance, packaging types, and shipment modes.",
        inputs: &[
            SubdomainInput { name: "Truck Distance", unit: "km", emission_type: "Transport" },
            SubdomainInput { name: "Packaging Material Weight", unit: "kg", emission_type: "Solid Waste" },
            SubdomainInput { name: "Shipment Mode", unit: "Air/Sea/Land", emission_type: "Transport" },
        ],
    },
    Subdomain {
        name: "Recycling & Waste Units",
        description: "Quantify waste processed and energy used in recycling.",
        inputs: &[
            SubdomainInput { name: "Textile Waste Processed", unit: "kg", emission_type: "Recycling" },
            SubdomainInput { name: "Energy Used", unit: "kWh", emission_type: "Energy" },
            SubdomainInput { name: "By-product Output", unit: "kg", emission_type: "Production" },
        ],
    },
];

/// Case-insensitive lookup by subdomain name.
pub fn find_subdomain(name: &str) -> Option<&'static Subdomain> {
    let needle = name.trim();
    SUBDOMAINS
        .iter()
        .find(|subdomain| subdomain.name.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case_and_padding() {
        let found = find_subdomain("  dyeing & processing ").expect("subdomain");
        assert_eq!(found.name, "Dyeing & Processing");
        assert_eq!(found.inputs.len(), 3);
        assert!(find_subdomain("Knitting").is_none());
    }
}
