//! Chart-ready shapes derived from aggregator output.
//!
//! Nothing here queries or reduces records; these functions only scale,
//! label and format numbers the way the dashboard widgets display them.

use serde::Serialize;

use crate::aggregators::types::{RANGE_LABELS, UnitsGauge};
use crate::aggregators::{InventoryBuckets, KpiSummary, PopulationSeries};

/// One age band of the pyramid, with bar lengths scaled to the largest
/// bucket of either sex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationBar {
    pub label: String,
    pub male: f64,
    pub female: f64,
    pub male_len: usize,
    pub female_len: usize,
}

/// Bars for every band. With no population at all every length is zero.
pub fn population_bars(series: &PopulationSeries, width: usize) -> Vec<PopulationBar> {
    let peak = series.peak();
    let scale = |v: f64| {
        if peak > 0.0 {
            ((v / peak) * width as f64).round() as usize
        } else {
            0
        }
    };

    PopulationSeries::labels()
        .into_iter()
        .enumerate()
        .map(|(i, label)| PopulationBar {
            label,
            male: series.male[i],
            female: series.female[i],
            male_len: scale(series.male[i]),
            female_len: scale(series.female[i]),
        })
        .collect()
}

/// Bar value label, one decimal place.
pub fn format_count(v: f64) -> String {
    format!("{v:.1}")
}

/// A row of the inventory data table: `[Rango, UDS Totales, ABS/MEN]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryRow(pub &'static str, pub f64, pub f64);

/// Line chart document in data-table form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: &'static str,
    pub h_axis: &'static str,
    pub v_axis: &'static str,
    pub columns: [&'static str; 3],
    pub rows: Vec<InventoryRow>,
}

pub fn inventory_chart(buckets: &InventoryBuckets) -> LineChart {
    LineChart {
        title: "Inventario Total por Precio",
        h_axis: "Rango",
        v_axis: "Cantidad",
        columns: ["Rango", "UDS Totales", "ABS/MEN"],
        rows: RANGE_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                InventoryRow(*label, buckets.total_units[i], buckets.monthly_absorption[i])
            })
            .collect(),
    }
}

/// KPI panel text: integers for counts and totals, two decimals for the
/// average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiDisplay {
    pub total_projects: String,
    pub total_units: String,
    pub total_available_units: String,
    pub average_per_project: String,
}

pub fn kpi_display(kpis: &KpiSummary) -> KpiDisplay {
    KpiDisplay {
        total_projects: kpis.count.to_string(),
        total_units: format!("{:.0}", kpis.total_units),
        total_available_units: format!("{:.0}", kpis.total_available),
        average_per_project: format!("{:.2}", kpis.average_metric),
    }
}

/// Fill height of the circular gauge, e.g. `"33.33%"`.
pub fn gauge_fill(gauge: &UnitsGauge) -> String {
    format!("{:.2}%", gauge.percentage)
}
