//! Output shapes of the aggregators.

use serde::Serialize;

/// Number of five-year age bands in the population pyramid.
pub const AGE_BANDS: usize = 18;

/// Number of inventory buckets on the line chart.
pub const INVENTORY_BUCKETS: usize = 5;

/// Fixed labels of the inventory buckets, in bucket order.
pub const RANGE_LABELS: [&str; INVENTORY_BUCKETS] = ["0-20", "21-40", "41-60", "61-80", "81-100"];

/// Population per age band, index `i` covering ages `5i..=5i+4`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PopulationSeries {
    pub male: [f64; AGE_BANDS],
    pub female: [f64; AGE_BANDS],
}

impl PopulationSeries {
    /// `"0-4"`, `"5-9"`, … `"85-89"`.
    pub fn labels() -> Vec<String> {
        (0..AGE_BANDS)
            .map(|i| format!("{}-{}", i * 5, i * 5 + 4))
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.male.iter().chain(self.female.iter()).sum()
    }

    /// Largest single bucket across both sexes.
    pub fn peak(&self) -> f64 {
        self.male
            .iter()
            .chain(self.female.iter())
            .copied()
            .fold(0.0, f64::max)
    }
}

/// Inventory line-chart series aligned to [`RANGE_LABELS`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryBuckets {
    pub total_units: [f64; INVENTORY_BUCKETS],
    pub monthly_absorption: [f64; INVENTORY_BUCKETS],
}

/// Scalar project statistics for the KPI panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiSummary {
    pub count: usize,
    pub total_units: f64,
    pub total_available: f64,
    /// Mean monthly absorption per project; 0 when there are no projects.
    pub average_metric: f64,
}

/// Sold share of a single project's units.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitsGauge {
    pub project: Option<String>,
    pub total: f64,
    pub sold: f64,
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_labels() {
        let labels = PopulationSeries::labels();
        assert_eq!(labels.len(), AGE_BANDS);
        assert_eq!(labels[0], "0-4");
        assert_eq!(labels[1], "5-9");
        assert_eq!(labels[17], "85-89");
    }

    #[test]
    fn test_peak_and_total_of_default() {
        let series = PopulationSeries::default();
        assert_eq!(series.peak(), 0.0);
        assert_eq!(series.total(), 0.0);
    }
}
