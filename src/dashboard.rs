//! Query → aggregate → present pipelines behind the dashboard triggers.
//!
//! Each panel runs its own query and reduction. A failed query never
//! reaches the caller: it is logged, recorded on the panel, and the panel
//! falls back to the zero result so presentation still has something to
//! draw.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinError, JoinSet};
use tracing::{Instrument, debug, error, info, info_span, warn};

use crate::aggregators::{
    InventoryBuckets, KpiSummary, PopulationSeries, UnitsGauge, aggregate_inventory,
    aggregate_kpis, aggregate_population, gauge, inventory, kpi, population, units_gauge,
};
use crate::output::{HistoryRow, append_record};
use crate::presenter::Presenter;
use crate::query::{AttributeRecord, Extent, FeatureQuery, FeatureSource, Filter, QueryError};

/// Categorical field shared by both layers that the selector filters on.
pub const MUNICIPALITY_FIELD: &str = "NOMGEO";

/// Project name field on the project layer.
pub const PROJECT_FIELD: &str = "PROYECTO";

/// What the user is looking at: the selector value and the map viewport.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub municipality: Option<String>,
    pub viewport: Option<Extent>,
}

impl AppState {
    pub fn filter(&self) -> Filter {
        Filter::matching(MUNICIPALITY_FIELD, self.municipality.as_deref())
    }
}

/// A panel's value plus the error that forced it to the zero result, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel<T> {
    pub value: T,
    pub error: Option<String>,
}

impl<T> Panel<T> {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Result of one refresh across all three aggregate panels.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub timestamp: DateTime<Utc>,
    pub state: AppState,
    pub population: Panel<PopulationSeries>,
    pub inventory: Panel<InventoryBuckets>,
    pub kpis: Panel<KpiSummary>,
}

impl DashboardSnapshot {
    /// Flat row for the KPI history file.
    pub fn history_row(&self) -> HistoryRow {
        let errors: Vec<&str> = [&self.population.error, &self.inventory.error, &self.kpis.error]
            .into_iter()
            .filter_map(|e| e.as_deref())
            .collect();

        HistoryRow {
            timestamp: self.timestamp,
            municipality: self.state.municipality.clone(),
            viewport: self.state.viewport.map(|e| e.to_geometry_param()),
            projects: self.kpis.value.count,
            total_units: self.kpis.value.total_units,
            total_available: self.kpis.value.total_available,
            average_absorption: self.kpis.value.average_metric,
            population_total: self.population.value.total(),
            error_message: if errors.is_empty() {
                None
            } else {
                Some(errors.join("; "))
            },
        }
    }
}

/// Hands every panel of `snapshot` to `presenter`.
pub fn present<P: Presenter + ?Sized>(snapshot: &DashboardSnapshot, presenter: &P) {
    presenter.population(&snapshot.population.value);
    presenter.inventory(&snapshot.inventory.value);
    presenter.kpis(&snapshot.kpis.value);
}

/// Runs `query` and reduces its records with `reduce`. On failure the
/// reduction of an empty record set stands in.
async fn run_panel<T, Q>(panel: &'static str, query: Q, reduce: fn(&[AttributeRecord]) -> T) -> Panel<T>
where
    Q: Future<Output = Result<Vec<AttributeRecord>, QueryError>>,
{
    match query.await {
        Ok(records) => {
            if records.is_empty() {
                warn!(panel, "No records matched, showing empty panel");
            } else {
                debug!(panel, records = records.len(), "Aggregating records");
            }
            Panel {
                value: reduce(&records),
                error: None,
            }
        }
        Err(e) => {
            error!(panel, error = %e, "Query failed, showing empty panel");
            Panel {
                value: reduce(&[]),
                error: Some(e.to_string()),
            }
        }
    }
}

/// The two feature layers the dashboard binds to.
pub struct Dashboard<S> {
    municipios: S,
    proyectos: S,
}

impl<S: FeatureSource> Dashboard<S> {
    pub fn new(municipios: S, proyectos: S) -> Self {
        Self {
            municipios,
            proyectos,
        }
    }

    /// Distinct municipality names in service order, for the selector.
    /// A failed query yields an empty list.
    pub async fn municipalities(&self) -> Vec<String> {
        let query = FeatureQuery::new(Filter::All, [MUNICIPALITY_FIELD]);

        match self.municipios.query_features(&query).await {
            Ok(records) => {
                let mut names: Vec<String> = Vec::new();
                for name in records.iter().filter_map(|r| r.text(MUNICIPALITY_FIELD)) {
                    // Kept verbatim: the name is echoed back in the `NOMGEO = '...'` filter.
                    if !name.trim().is_empty() && !names.iter().any(|n| n == name) {
                        names.push(name.to_string());
                    }
                }
                info!(count = names.len(), layer = self.municipios.name(), "Municipality list loaded");
                names
            }
            Err(e) => {
                error!(error = %e, layer = self.municipios.name(), "Failed to load municipality list");
                Vec::new()
            }
        }
    }

    /// Pyramid for the selection, restricted to the viewport.
    pub async fn population(&self, state: &AppState) -> Panel<PopulationSeries> {
        let query = FeatureQuery::new(state.filter(), population::query_fields())
            .intersecting(state.viewport);

        run_panel("population", self.municipios.query_features(&query), aggregate_population)
            .instrument(info_span!("panel", panel = "population", municipality = ?state.municipality))
            .await
    }

    pub async fn inventory(&self, state: &AppState) -> Panel<InventoryBuckets> {
        let query = FeatureQuery::new(state.filter(), inventory::QUERY_FIELDS);

        run_panel("inventory", self.proyectos.query_features(&query), aggregate_inventory)
            .instrument(info_span!("panel", panel = "inventory", municipality = ?state.municipality))
            .await
    }

    pub async fn kpis(&self, state: &AppState) -> Panel<KpiSummary> {
        let query = FeatureQuery::new(state.filter(), kpi::QUERY_FIELDS);

        run_panel("kpis", self.proyectos.query_features(&query), aggregate_kpis)
            .instrument(info_span!("panel", panel = "kpis", municipality = ?state.municipality))
            .await
    }

    /// All three panels, queried concurrently and failing independently.
    pub async fn refresh(&self, state: &AppState) -> DashboardSnapshot {
        let (population, inventory, kpis) =
            tokio::join!(self.population(state), self.inventory(state), self.kpis(state));

        let failed = [population.is_ok(), inventory.is_ok(), kpis.is_ok()]
            .iter()
            .filter(|ok| !**ok)
            .count();
        if failed > 0 {
            warn!(failed, municipality = ?state.municipality, "Refresh completed with empty panels");
        } else {
            debug!(municipality = ?state.municipality, "Refresh complete");
        }

        DashboardSnapshot {
            timestamp: Utc::now(),
            state: state.clone(),
            population,
            inventory,
            kpis,
        }
    }

    /// Selector change: the new municipality applies to every panel.
    pub async fn select(&self, state: &mut AppState, municipality: Option<String>) -> DashboardSnapshot {
        state.municipality = municipality.filter(|m| !m.is_empty());
        info!(municipality = ?state.municipality, "Selection changed");
        self.refresh(state).await
    }

    /// The map stopped moving over `extent`.
    pub async fn viewport_stationary(&self, state: &mut AppState, extent: Extent) -> DashboardSnapshot {
        state.viewport = Some(extent);
        debug!(%extent, "Viewport stationary");
        self.refresh(state).await
    }

    /// Gauge for the first project named `name`, or `None` when no project
    /// matches.
    pub async fn project_gauge(&self, name: &str) -> Result<Option<UnitsGauge>, QueryError> {
        let query = FeatureQuery::new(Filter::equals(PROJECT_FIELD, name), gauge::QUERY_FIELDS);
        let records = self.proyectos.query_features(&query).await?;

        if records.len() > 1 {
            debug!(matches = records.len(), project = name, "Several projects matched, using the first");
        }
        Ok(records.first().map(units_gauge))
    }
}

/// Settings for [`watch`].
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub interval: Duration,
    /// Rounds to run; 0 runs until the process is stopped.
    pub samples: usize,
    /// CSV file each completed round is appended to.
    pub history: Option<String>,
}

/// Re-triggers the dashboard every `interval`.
///
/// Each round runs as its own task and is not awaited before the next one
/// starts, so a slow round can finish after a later one and overwrite what
/// the presenter shows. Superseded rounds are never cancelled. Returns once
/// every spawned round has completed.
pub async fn watch<S, P>(
    dashboard: Arc<Dashboard<S>>,
    state: AppState,
    presenter: Arc<P>,
    options: WatchOptions,
) -> usize
where
    S: FeatureSource + 'static,
    P: Presenter + ?Sized + 'static,
{
    let mut rounds: JoinSet<()> = JoinSet::new();
    let mut round = 0usize;
    let mut completed = 0usize;

    loop {
        if options.samples > 0 && round >= options.samples {
            break;
        }
        round += 1;

        // Only rounds still in flight stay in the set.
        while let Some(result) = rounds.try_join_next() {
            completed += reap(result);
        }

        let dashboard = dashboard.clone();
        let presenter = presenter.clone();
        let state = state.clone();
        let history = options.history.clone();

        let span = info_span!("round", round);
        rounds.spawn(
            async move {
                let snapshot = dashboard.refresh(&state).await;
                present(&snapshot, presenter.as_ref());

                if let Some(path) = history {
                    if let Err(e) = append_record(&path, &snapshot.history_row()) {
                        error!(error = %e, path = %path, "Failed to append history row");
                    }
                }
                info!("Round complete");
            }
            .instrument(span),
        );

        if options.samples == 0 || round < options.samples {
            tokio::time::sleep(options.interval).await;
        }
    }

    while let Some(result) = rounds.join_next().await {
        completed += reap(result);
    }
    completed
}

fn reap(result: Result<(), JoinError>) -> usize {
    match result {
        Ok(()) => 1,
        Err(e) => {
            error!(error = %e, "Round task failed");
            0
        }
    }
}
