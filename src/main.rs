//! CLI entry point for the feature dashboard.
//!
//! Provides subcommands for listing municipalities, rendering the dashboard
//! panels once, looking up a single project's sales gauge, and re-rendering
//! on an interval the way a map view refreshes while the user pans.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use feature_dashboard::config::{DEFAULT_MUNICIPIOS_URL, DEFAULT_PROYECTOS_URL, DashboardConfig};
use feature_dashboard::dashboard::{AppState, WatchOptions, present, watch};
use feature_dashboard::fetch::auth::TokenMode;
use feature_dashboard::output::{append_record, print_json, print_pretty};
use feature_dashboard::presenter::{JsonPresenter, Presenter, TerminalPresenter};
use feature_dashboard::query::Extent;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "feature_dashboard")]
#[command(about = "Population, inventory and KPI panels over ArcGIS feature layers", long_about = None)]
struct Cli {
    #[command(flatten)]
    layers: LayerArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LayerArgs {
    /// Municipality layer (population fields, NOMGEO)
    #[arg(long, global = true, env = "MUNICIPIOS_LAYER_URL", default_value = DEFAULT_MUNICIPIOS_URL)]
    municipios_url: String,

    /// Project layer (UDS_TOT, UDS_DISP, UDS_VEND, ABS_MES, PROYECTO)
    #[arg(long, global = true, env = "PROYECTOS_LAYER_URL", default_value = DEFAULT_PROYECTOS_URL)]
    proyectos_url: String,

    /// ArcGIS token for secured services
    #[arg(long, global = true, env = "ARCGIS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Send the token as a `query` parameter or an X-Esri-Authorization `header`
    #[arg(long, global = true, env = "ARCGIS_TOKEN_MODE", default_value = "query")]
    token_mode: TokenMode,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    timeout: u64,

    /// Output style for panels
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct ViewArgs {
    /// Municipality to filter on (NOMGEO); all municipalities when omitted
    #[arg(short, long)]
    municipality: Option<String>,

    /// Viewport for the population panel as xmin,ymin,xmax,ymax
    #[arg(short, long, allow_hyphen_values = true)]
    extent: Option<Extent>,

    /// Query population over the whole layer instead of a viewport
    #[arg(long, conflicts_with = "extent")]
    whole_layer: bool,

    /// CSV file to append a KPI history row to after each refresh
    #[arg(long)]
    history: Option<String>,
}

impl ViewArgs {
    fn state(&self) -> AppState {
        let viewport = if self.whole_layer {
            None
        } else {
            Some(self.extent.unwrap_or_else(DashboardConfig::default_extent))
        };
        AppState {
            municipality: self.municipality.clone().filter(|m| !m.is_empty()),
            viewport,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the municipalities available to the selector
    Municipalities,
    /// Query, aggregate and render every panel once
    Dashboard {
        #[command(flatten)]
        view: ViewArgs,

        /// Also log the full snapshot as JSON
        #[arg(long, default_value_t = false)]
        dump: bool,
    },
    /// Show the units-sold gauge for a project
    Project {
        /// Project name (PROYECTO)
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Refresh the panels on an interval
    Watch {
        #[command(flatten)]
        view: ViewArgs,

        /// Seconds between refreshes
        #[arg(short = 'r', long, default_value_t = 60)]
        sample_rate: u64,

        /// Number of refreshes (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        num_samples: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/feature_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("feature_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = DashboardConfig {
        municipios_url: cli.layers.municipios_url,
        proyectos_url: cli.layers.proyectos_url,
        token: cli.layers.token,
        token_mode: cli.layers.token_mode,
        timeout: Duration::from_secs(cli.layers.timeout),
    };
    let presenter: Arc<dyn Presenter> = match cli.layers.format {
        OutputFormat::Text => Arc::new(TerminalPresenter::stdout(40)),
        OutputFormat::Json => Arc::new(JsonPresenter::stdout()),
    };
    let dashboard = config.dashboard()?;

    match cli.command {
        Commands::Municipalities => {
            let names = dashboard.municipalities().await;
            presenter.municipalities(&names);
        }
        Commands::Dashboard { view, dump } => {
            let state = view.state();
            let snapshot = dashboard.refresh(&state).await;
            present(&snapshot, presenter.as_ref());

            print_pretty(&snapshot);
            if dump {
                print_json(&snapshot)?;
            }
            if let Some(path) = &view.history {
                append_record(path, &snapshot.history_row())?;
            }
        }
        Commands::Project { name } => {
            let gauge = match dashboard.project_gauge(&name).await {
                Ok(gauge) => gauge,
                Err(e) => {
                    warn!(error = %e, project = %name, "Project lookup failed");
                    None
                }
            };
            presenter.gauge(gauge.as_ref());
        }
        Commands::Watch {
            view,
            sample_rate,
            num_samples,
        } => {
            if num_samples == 0 {
                info!(sample_rate, "Refreshing indefinitely. Press Ctrl+C to stop.");
            } else {
                info!(num_samples, sample_rate, "Starting refresh rounds");
            }

            let completed = watch(
                Arc::new(dashboard),
                view.state(),
                presenter,
                WatchOptions {
                    interval: Duration::from_secs(sample_rate),
                    samples: num_samples,
                    history: view.history.clone(),
                },
            )
            .await;
            info!(completed, "Finished refreshing");
        }
    }

    Ok(())
}
