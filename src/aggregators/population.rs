//! Age-band population sums for the pyramid chart.
//!
//! Male counts live in `POB1..POB25`, female counts in `POB2_R..POB25_R`;
//! the municipality layer has no `POB1_R`, so female band 0 reads as zero.
//! Only the first [`AGE_BANDS`] field pairs are summed.

use crate::aggregators::types::{AGE_BANDS, PopulationSeries};
use crate::query::AttributeRecord;

/// Highest numbered population field published by the layer.
pub const LAST_FIELD: usize = 25;

pub fn male_field(band: usize) -> String {
    format!("POB{}", band + 1)
}

pub fn female_field(band: usize) -> String {
    format!("POB{}_R", band + 1)
}

/// Field list for the population query. `POB1_R` does not exist on the
/// layer and `POB3_R` has never been part of the request.
pub fn query_fields() -> Vec<String> {
    let male = (1..=LAST_FIELD).map(|n| format!("POB{n}"));
    let female = (2..=LAST_FIELD)
        .filter(|n| *n != 3)
        .map(|n| format!("POB{n}_R"));
    male.chain(female).collect()
}

/// Sums each band's male and female fields across `records`.
///
/// Counts are never negative: a negative attribute is treated like a
/// missing one.
pub fn aggregate_population(records: &[AttributeRecord]) -> PopulationSeries {
    let fields: Vec<(String, String)> = (0..AGE_BANDS)
        .map(|band| (male_field(band), female_field(band)))
        .collect();

    let mut series = PopulationSeries::default();

    for record in records {
        for (band, (male, female)) in fields.iter().enumerate() {
            series.male[band] += record.number(male).max(0.0);
            series.female[band] += record.number(female).max(0.0);
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_records_all_zero() {
        let series = aggregate_population(&[]);
        assert_eq!(series.male, [0.0; AGE_BANDS]);
        assert_eq!(series.female, [0.0; AGE_BANDS]);
    }

    #[test]
    fn test_sums_bands_across_records() {
        let records = vec![
            AttributeRecord::new().with("POB1", 3).with("POB2", 5),
            AttributeRecord::new().with("POB1", 2),
        ];
        let series = aggregate_population(&records);

        let mut expected = [0.0; AGE_BANDS];
        expected[0] = 5.0;
        expected[1] = 5.0;
        assert_eq!(series.male, expected);
        assert_eq!(series.female, [0.0; AGE_BANDS]);
    }

    #[test]
    fn test_female_fields_use_r_suffix() {
        let records = vec![
            AttributeRecord::new()
                .with("POB2_R", 7)
                .with("POB18_R", 1.5)
                .with("POB1_R", 100),
        ];
        let series = aggregate_population(&records);

        // POB1_R is summed if a service ever sends it; the layer never does.
        assert_eq!(series.female[0], 100.0);
        assert_eq!(series.female[1], 7.0);
        assert_eq!(series.female[17], 1.5);
    }

    #[test]
    fn test_fields_past_last_band_ignored() {
        let records = vec![AttributeRecord::new().with("POB19", 40).with("POB25_R", 9)];
        let series = aggregate_population(&records);
        assert_eq!(series.total(), 0.0);
    }

    #[test]
    fn test_nulls_and_negatives_count_as_zero() {
        let records = vec![
            AttributeRecord::new()
                .with("POB4", serde_json::Value::Null)
                .with("POB5", -3)
                .with("POB6", 2),
        ];
        let series = aggregate_population(&records);
        assert_eq!(series.male[3], 0.0);
        assert_eq!(series.male[4], 0.0);
        assert_eq!(series.male[5], 2.0);
        assert!(series.male.iter().chain(series.female.iter()).all(|v| *v >= 0.0));
    }

    #[test]
    fn test_total_matches_sum_of_consumed_fields() {
        let records: Vec<AttributeRecord> = (0..4)
            .map(|r| {
                (0..AGE_BANDS).fold(AttributeRecord::new(), |rec, band| {
                    rec.with(&male_field(band), (r * 10 + band) as f64)
                        .with(&female_field(band), (band + 1) as f64 * 0.5)
                })
            })
            .collect();

        let expected: f64 = records
            .iter()
            .map(|rec| {
                (0..AGE_BANDS)
                    .map(|b| rec.number(&male_field(b)) + rec.number(&female_field(b)))
                    .sum::<f64>()
            })
            .sum();

        assert_eq!(aggregate_population(&records).total(), expected);
    }

    #[test]
    fn test_query_fields() {
        let fields = query_fields();
        assert_eq!(fields.len(), 25 + 23);
        assert_eq!(fields[0], "POB1");
        assert_eq!(fields[24], "POB25");
        assert_eq!(fields[25], "POB2_R");
        assert_eq!(fields[26], "POB4_R");
        assert!(!fields.contains(&"POB1_R".to_string()));
        assert!(!fields.contains(&"POB3_R".to_string()));
    }
}
