//! The presentation boundary.
//!
//! Dashboard pipelines hand finished numbers to a [`Presenter`] and never
//! look at how they are drawn. Two presenters ship with the crate: text
//! panels for a terminal and one JSON document per panel for other tools.

use serde::Serialize;
use std::io::{self, Write};
use std::sync::Mutex;
use tracing::warn;

use crate::aggregators::{InventoryBuckets, KpiSummary, PopulationSeries, UnitsGauge};
use crate::charts::{
    format_count, gauge_fill, inventory_chart, kpi_display, population_bars,
};

pub trait Presenter: Send + Sync {
    fn population(&self, series: &PopulationSeries);
    fn inventory(&self, buckets: &InventoryBuckets);
    fn kpis(&self, kpis: &KpiSummary);
    /// `None` when no project matched.
    fn gauge(&self, gauge: Option<&UnitsGauge>);
    fn municipalities(&self, names: &[String]);
}

/// Renders the pyramid as two bars per band, male (`#`) then female (`=`).
pub fn render_population(series: &PopulationSeries, width: usize) -> String {
    let mut out = String::from("Población por edad (hombres # / mujeres =)\n");
    for bar in population_bars(series, width) {
        out.push_str(&format!(
            "{:>6} H {:<w$} {}\n{:>6} M {:<w$} {}\n",
            bar.label,
            "#".repeat(bar.male_len),
            format_count(bar.male),
            "",
            "=".repeat(bar.female_len),
            format_count(bar.female),
            w = width,
        ));
    }
    out
}

pub fn render_inventory(buckets: &InventoryBuckets) -> String {
    let chart = inventory_chart(buckets);
    let mut out = format!(
        "{}\n{:>8} {:>12} {:>10}\n",
        chart.title, chart.columns[0], chart.columns[1], chart.columns[2]
    );
    for row in &chart.rows {
        out.push_str(&format!("{:>8} {:>12} {:>10}\n", row.0, row.1, row.2));
    }
    out
}

pub fn render_kpis(kpis: &KpiSummary) -> String {
    let d = kpi_display(kpis);
    format!(
        "Proyectos: {}\nUnidades totales: {}\nUnidades disponibles: {}\nABS/MES promedio: {}\n",
        d.total_projects, d.total_units, d.total_available_units, d.average_per_project
    )
}

pub fn render_gauge(gauge: Option<&UnitsGauge>) -> String {
    match gauge {
        Some(g) => format!(
            "{}\nUnidades Totales: {}\nUnidades Vendidas: {}\nAvance: {}\n",
            g.project.as_deref().unwrap_or("(sin nombre)"),
            g.total,
            g.sold,
            gauge_fill(g)
        ),
        None => "Sin datos\n".to_string(),
    }
}

/// Human-readable panels written to `W` (stdout by default).
pub struct TerminalPresenter<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
    bar_width: usize,
}

impl TerminalPresenter {
    pub fn stdout(bar_width: usize) -> Self {
        Self::new(io::stdout(), bar_width)
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W, bar_width: usize) -> Self {
        Self {
            out: Mutex::new(out),
            bar_width,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{text}").and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write panel");
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn population(&self, series: &PopulationSeries) {
        self.write(&render_population(series, self.bar_width));
    }

    fn inventory(&self, buckets: &InventoryBuckets) {
        self.write(&render_inventory(buckets));
    }

    fn kpis(&self, kpis: &KpiSummary) {
        self.write(&render_kpis(kpis));
    }

    fn gauge(&self, gauge: Option<&UnitsGauge>) {
        self.write(&render_gauge(gauge));
    }

    fn municipalities(&self, names: &[String]) {
        self.write(&names.join("\n"));
    }
}

#[derive(Serialize)]
struct PanelDocument<'a, T: Serialize> {
    panel: &'a str,
    data: T,
}

/// One JSON line per panel: `{"panel": "...", "data": {...}}`.
pub struct JsonPresenter<W: Write + Send = io::Stdout> {
    out: Mutex<W>,
}

impl JsonPresenter {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> JsonPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn emit<T: Serialize>(&self, panel: &str, data: T) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let result = serde_json::to_writer(&mut *out, &PanelDocument { panel, data })
            .map_err(io::Error::from)
            .and_then(|_| writeln!(out))
            .and_then(|_| out.flush());
        if let Err(e) = result {
            warn!(panel, error = %e, "Failed to write panel");
        }
    }
}

#[derive(Serialize)]
struct PopulationChart {
    labels: Vec<String>,
    male: Vec<f64>,
    female: Vec<f64>,
}

impl<W: Write + Send> Presenter for JsonPresenter<W> {
    fn population(&self, series: &PopulationSeries) {
        self.emit(
            "population",
            PopulationChart {
                labels: PopulationSeries::labels(),
                male: series.male.to_vec(),
                female: series.female.to_vec(),
            },
        );
    }

    fn inventory(&self, buckets: &InventoryBuckets) {
        self.emit("inventory", inventory_chart(buckets));
    }

    fn kpis(&self, kpis: &KpiSummary) {
        self.emit("kpis", kpi_display(kpis));
    }

    fn gauge(&self, gauge: Option<&UnitsGauge>) {
        self.emit("gauge", gauge);
    }

    fn municipalities(&self, names: &[String]) {
        self.emit("municipalities", names);
    }
}
