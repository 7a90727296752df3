//! Inventory line-chart series.
//!
//! Records are mapped to buckets by position: the n-th record returned by
//! the query fills bucket n. The price field is never consulted, so bucket
//! membership follows service order rather than the range labels.

use crate::aggregators::types::{INVENTORY_BUCKETS, InventoryBuckets};
use crate::query::AttributeRecord;

pub const QUERY_FIELDS: [&str; 2] = ["UDS_TOT", "ABS_MES"];

pub fn aggregate_inventory(records: &[AttributeRecord]) -> InventoryBuckets {
    let mut buckets = InventoryBuckets::default();

    for (i, record) in records.iter().take(INVENTORY_BUCKETS).enumerate() {
        buckets.total_units[i] = record.number("UDS_TOT");
        buckets.monthly_absorption[i] = record.number("ABS_MES");
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(total: f64, absorption: f64) -> AttributeRecord {
        AttributeRecord::new()
            .with("UDS_TOT", total)
            .with("ABS_MES", absorption)
    }

    #[test]
    fn test_empty_records_all_zero() {
        assert_eq!(aggregate_inventory(&[]), InventoryBuckets::default());
    }

    #[test]
    fn test_positional_mapping() {
        let records = vec![project(120.0, 3.5), project(40.0, 1.0)];
        let buckets = aggregate_inventory(&records);

        assert_eq!(buckets.total_units, [120.0, 40.0, 0.0, 0.0, 0.0]);
        assert_eq!(buckets.monthly_absorption, [3.5, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_records_past_fifth_ignored() {
        let records: Vec<_> = (1..=8).map(|n| project(n as f64, 0.0)).collect();
        let buckets = aggregate_inventory(&records);
        assert_eq!(buckets.total_units, [1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_missing_fields_are_zero() {
        let records = vec![AttributeRecord::new().with("UDS_TOT", 9)];
        let buckets = aggregate_inventory(&records);
        assert_eq!(buckets.total_units[0], 9.0);
        assert_eq!(buckets.monthly_absorption[0], 0.0);
    }
}
