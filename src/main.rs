//! Battery cell simulator entry point: CLI wiring and session construction.

use std::path::PathBuf;
use std::process;

use chrono::Local;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cell_sim::config::{ConfigError, ScenarioConfig};
use cell_sim::io::export::export_all;
use cell_sim::sim::session::Session;

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "cell_sim=info";

/// Parsed CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "cell-sim")]
#[command(about = "Battery cell telemetry simulator and task ledger")]
#[command(version)]
struct Args {
    /// Load scenario from TOML config file (takes priority over --preset)
    #[arg(long, value_name = "PATH")]
    scenario: Option<PathBuf>,

    /// Built-in preset: empty, demo, stress
    #[arg(long, default_value = "demo")]
    preset: String,

    /// Override random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks in a headless run
    #[arg(long, default_value_t = 10)]
    ticks: u64,

    /// Write cells, tasks and history CSVs into this directory
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Serve the REST API instead of a headless run
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Launch the live terminal UI
    #[cfg(feature = "tui")]
    #[arg(long)]
    tui: bool,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn fail(errors: &[ConfigError]) -> ! {
    for e in errors {
        eprintln!("{e}");
    }
    process::exit(1);
}

/// Resolves the scenario: `--scenario` wins over `--preset`; `--seed`
/// overrides either.
fn load_scenario(args: &Args) -> ScenarioConfig {
    let loaded = match &args.scenario {
        Some(path) => ScenarioConfig::from_toml_file(path),
        None => ScenarioConfig::from_preset(&args.preset),
    };
    let mut scenario = loaded.unwrap_or_else(|e| fail(&[e]));

    if let Some(seed) = args.seed {
        scenario.simulation.seed = Some(seed);
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        fail(&errors);
    }
    scenario
}

/// Ticks the session `ticks` times, advancing task progress once per tick,
/// and prints a status line per tick and the final summary.
fn run_headless(session: &mut Session, ticks: u64) {
    for _ in 0..ticks {
        session.tick();
        session.advance_progress();
        println!("{}", session.summary().status_line());
    }
    println!("\n{}", session.summary());
}

fn export(session: &Session, dir: &std::path::Path) {
    match export_all(session, dir, Local::now().naive_local()) {
        Ok(paths) => {
            for p in paths {
                eprintln!("Exported {}", p.display());
            }
        }
        Err(e) => {
            eprintln!("error: failed to export CSV: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();

    #[cfg(feature = "tui")]
    if args.tui {
        let scenario = load_scenario(&args);
        let dir = args.export_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        if let Err(e) = cell_sim::tui::run(scenario, dir) {
            eprintln!("error: TUI crashed: {e}");
            process::exit(1);
        }
        return;
    }

    init_logging();
    let scenario = load_scenario(&args);
    let mut session = Session::from_config(&scenario).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        process::exit(1);
    });

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;
        use std::time::Duration;

        let state = Arc::new(cell_sim::api::AppState::new(session));
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let tick_every = Duration::from_millis(scenario.simulation.tick_interval_ms);
        let progress_every = Duration::from_millis(scenario.simulation.progress_interval_ms);
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(cell_sim::api::serve(state, addr, tick_every, progress_every)) {
            eprintln!("error: API server failed: {e}");
            process::exit(1);
        }
        return;
    }

    run_headless(&mut session, args.ticks);

    if let Some(dir) = &args.export_dir {
        export(&session, dir);
    }
}
