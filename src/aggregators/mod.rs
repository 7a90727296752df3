//! Reductions from attribute rows to chart-ready numbers.
//!
//! Every aggregator here is a pure function of the records it is handed:
//! no state survives between calls, and an empty slice yields the
//! all-zero result of the declared shape.

pub mod gauge;
pub mod inventory;
pub mod kpi;
pub mod population;
pub mod types;
pub mod utility;

pub use gauge::{completion_percentage, units_gauge};
pub use inventory::aggregate_inventory;
pub use kpi::aggregate_kpis;
pub use population::aggregate_population;
pub use types::{InventoryBuckets, KpiSummary, PopulationSeries, UnitsGauge};
