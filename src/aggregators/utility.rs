use crate::query::AttributeRecord;

/// `part` as a percentage of `whole`. Returns 0.0 when `whole` is zero.
pub fn pct(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        (part / whole) * 100.0
    }
}

/// Arithmetic mean of a precomputed sum. Returns 0.0 for an empty set.
pub fn mean_of(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Sum of `field` across `records`, missing values counting as zero.
pub fn sum_field(records: &[AttributeRecord], field: &str) -> f64 {
    records.iter().map(|r| r.number(field)).sum()
}
