use feature_dashboard::aggregators::{
    aggregate_inventory, aggregate_kpis, aggregate_population, units_gauge,
};
use feature_dashboard::charts::{inventory_chart, kpi_display};
use feature_dashboard::infra::arcgis::parse_query_response;
use feature_dashboard::query::QueryError;

const MUNICIPIOS: &[u8] = include_bytes!("fixtures/municipios_query.json");
const PROYECTOS: &[u8] = include_bytes!("fixtures/proyectos_query.json");
const SERVICE_ERROR: &[u8] = include_bytes!("fixtures/service_error.json");

#[test]
fn test_population_pipeline() {
    let records = parse_query_response(MUNICIPIOS).expect("Failed to parse municipios");
    let series = aggregate_population(&records);

    assert_eq!(series.male.len(), 18);
    assert_eq!(series.female.len(), 18);
    assert_eq!(series.male[0], 11250.0 + 14021.5 + 2980.0);
    assert_eq!(series.male[1], 10980.0);
    assert_eq!(series.male[17], 812.0 + 433.0);
    assert_eq!(series.female[0], 0.0);
    assert_eq!(series.female[1], 10710.0 + 13550.0);
    assert_eq!(series.female[17], 1034.0);

    // POB19 and POB25_R are beyond the last band.
    let consumed = 11250.0 + 10980.0 + 812.0 + 10710.0 + 1034.0 + 14021.5 + 433.0 + 13550.0 + 2980.0;
    assert_eq!(series.total(), consumed);
}

#[test]
fn test_inventory_pipeline_takes_first_five_in_order() {
    let records = parse_query_response(PROYECTOS).expect("Failed to parse proyectos");
    let buckets = aggregate_inventory(&records);

    assert_eq!(buckets.total_units, [120.0, 60.0, 200.0, 0.0, 48.0]);
    assert_eq!(buckets.monthly_absorption, [3.5, 0.0, 6.25, 0.0, 2.25]);

    let chart = inventory_chart(&buckets);
    assert_eq!(chart.rows[2].0, "41-60");
    assert_eq!(chart.rows[2].1, 200.0);
}

#[test]
fn test_kpi_pipeline() {
    let records = parse_query_response(PROYECTOS).expect("Failed to parse proyectos");
    let kpis = aggregate_kpis(&records);

    assert_eq!(kpis.count, 6);
    assert_eq!(kpis.total_units, 518.0);
    assert_eq!(kpis.total_available, 167.0);
    assert_eq!(kpis.average_metric, 16.0 / 6.0);

    let display = kpi_display(&kpis);
    assert_eq!(display.total_projects, "6");
    assert_eq!(display.total_units, "518");
    assert_eq!(display.average_per_project, "2.67");
}

#[test]
fn test_gauge_per_feature() {
    let records = parse_query_response(PROYECTOS).expect("Failed to parse proyectos");
    let gauges: Vec<_> = records.iter().map(units_gauge).collect();

    assert_eq!(gauges[0].project.as_deref(), Some("Torre Marina"));
    assert!((gauges[0].percentage - 75.0 / 195.0 * 100.0).abs() < 1e-9);
    assert_eq!(gauges[1].percentage, 0.0);
    assert_eq!(gauges[3].percentage, 0.0);
    assert!(gauges.iter().all(|g| (0.0..=100.0).contains(&g.percentage)));
}

#[test]
fn test_service_error_surfaces() {
    match parse_query_response(SERVICE_ERROR) {
        Err(QueryError::Service { code, message }) => {
            assert_eq!(code, 400);
            assert!(message.contains("Invalid query parameters"));
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[test]
fn test_failed_query_degrades_to_zero_panels() {
    let records = parse_query_response(SERVICE_ERROR).unwrap_or_default();

    assert_eq!(aggregate_population(&records).total(), 0.0);
    assert_eq!(aggregate_inventory(&records).total_units, [0.0; 5]);
    assert_eq!(aggregate_kpis(&records).average_metric, 0.0);
}
