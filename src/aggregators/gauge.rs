use crate::aggregators::types::UnitsGauge;
use crate::aggregators::utility::pct;
use crate::query::AttributeRecord;

pub const QUERY_FIELDS: [&str; 3] = ["PROYECTO", "UDS_TOT", "UDS_VEND"];

/// `sold / (total + sold) * 100`, or 0 unless that denominator is positive.
///
/// The denominator adds sold units on top of `UDS_TOT`, as the project
/// popup always has. Inputs are used as stored; only the result is bounded
/// to `0..=100`.
pub fn completion_percentage(total: f64, sold: f64) -> f64 {
    let denominator = total + sold;
    if denominator > 0.0 {
        pct(sold, denominator).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Gauge for one project feature.
pub fn units_gauge(record: &AttributeRecord) -> UnitsGauge {
    let total = record.number("UDS_TOT");
    let sold = record.number("UDS_VEND");

    UnitsGauge {
        project: record.text("PROYECTO").map(str::to_string),
        total,
        sold,
        percentage: completion_percentage(total, sold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_third() {
        let record = AttributeRecord::new().with("UDS_TOT", 10).with("UDS_VEND", 5);
        let gauge = units_gauge(&record);
        assert!((gauge.percentage - 33.333_333).abs() < 1e-4);
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(completion_percentage(0.0, 0.0), 0.0);
        assert_eq!(units_gauge(&AttributeRecord::new()).percentage, 0.0);
    }

    #[test]
    fn test_bounds() {
        for (total, sold) in [(0.0, 7.0), (7.0, 0.0), (1.0, 1e9), (1e9, 1.0), (-5.0, 3.0), (3.0, -5.0)] {
            let p = completion_percentage(total, sold);
            assert!((0.0..=100.0).contains(&p), "{total}/{sold} -> {p}");
        }
        assert_eq!(completion_percentage(0.0, 7.0), 100.0);
    }

    #[test]
    fn test_negative_total_uses_unclamped_sum() {
        // -5 + 3 is not a positive denominator.
        assert_eq!(completion_percentage(-5.0, 3.0), 0.0);
        assert_eq!(completion_percentage(-5.0, 10.0), 100.0);
        assert_eq!(completion_percentage(10.0, -5.0), 0.0);
    }

    #[test]
    fn test_carries_project_name() {
        let record = AttributeRecord::new()
            .with("PROYECTO", "Torre Marina")
            .with("UDS_TOT", 3)
            .with("UDS_VEND", 1);
        let gauge = units_gauge(&record);
        assert_eq!(gauge.project.as_deref(), Some("Torre Marina"));
        assert_eq!(gauge.total, 3.0);
        assert_eq!(gauge.sold, 1.0);
        assert_eq!(gauge.percentage, 25.0);
    }
}
