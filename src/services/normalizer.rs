use std::collections::HashMap;

use tracing::debug;

use crate::models::emission::NormalizedAverages;
use crate::models::record::RawRecord;

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: u32,
}

/// Lowercased, trimmed form of a field label.
pub fn canonical_key(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Averages every numeric field across the batch, keyed by canonical label.
///
/// Values that do not coerce to a finite number are left out of the mean
/// instead of counting as zero. Labels outside the emission registry are kept;
/// the calculator simply never asks for them.
pub fn normalize(batch: &[RawRecord]) -> NormalizedAverages {
    let mut totals: HashMap<String, Accumulator> = HashMap::new();

    for record in batch {
        for (label, value) in record.iter() {
            let Some(number) = value.as_finite_number() else {
                continue;
            };
            let entry = totals.entry(canonical_key(label)).or_default();
            entry.sum += number;
            entry.count += 1;
        }
    }

    debug!(
        target: "app::report",
        records = batch.len(),
        keys = totals.len(),
        "normalized input batch"
    );

    totals
        .into_iter()
        .map(|(key, acc)| (key, acc.sum / f64::from(acc.count)))
        .collect()
}
