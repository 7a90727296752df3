use crate::aggregators::types::KpiSummary;
use crate::aggregators::utility::{mean_of, sum_field};
use crate::query::AttributeRecord;

pub const QUERY_FIELDS: [&str; 4] = ["UDS_TOT", "UDS_DISP", "UDS_VEND", "ABS_MES"];

/// Project count, unit totals and mean monthly absorption over `records`.
pub fn aggregate_kpis(records: &[AttributeRecord]) -> KpiSummary {
    let count = records.len();

    KpiSummary {
        count,
        total_units: sum_field(records, "UDS_TOT"),
        total_available: sum_field(records, "UDS_DISP"),
        average_metric: mean_of(sum_field(records, "ABS_MES"), count),
    }
}
