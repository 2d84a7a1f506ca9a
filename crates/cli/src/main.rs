use std::{path::PathBuf, sync::Arc};

use {
    anyhow::{Context, bail},
    clap::Parser,
    modhost_config::{ModhostConfig, Severity},
    modhost_mods::{CommandRuntime, HostModule, LoadReport, LoaderSettings, ModLoader},
    tracing::{info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "modhost", about = "Discover and load mods for a host program")]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Config file to use instead of searching the standard locations.
    #[arg(long, env = "MODHOST_CONFIG")]
    config: Option<PathBuf>,

    /// Base mods directory (overrides config value).
    #[arg(long, env = "MODHOST_MODS_DIR")]
    mods_dir: Option<PathBuf>,

    /// Print the load report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Arguments forwarded to the host, e.g. `loadmods /path/to/packages`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    host_args: Vec<String>,
}

/// State every mod can reach through the host module.
#[derive(Debug)]
struct HostInfo {
    version: &'static str,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<ModhostConfig> {
    let mut config = match &cli.config {
        Some(path) => modhost_config::load_config(path)?,
        None => modhost_config::discover_and_load(),
    };

    if let Some(dir) = &cli.mods_dir {
        config.mods.dir = dir.clone();
    }

    let result = modhost_config::validate(&config);
    for diagnostic in &result.diagnostics {
        match diagnostic.severity {
            Severity::Error => eprintln!("{diagnostic}"),
            Severity::Warning => warn!(path = diagnostic.path, "{}", diagnostic.message),
        }
    }
    if result.has_errors() {
        bail!(
            "invalid configuration ({} error(s))",
            result.count(Severity::Error)
        );
    }

    Ok(config)
}

fn print_report(report: &LoadReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for name in report.loaded_mods.iter() {
        println!("{name}");
    }
    println!("{}", summary(report));
    Ok(())
}

/// One-line summary. Attempts include duplicates that were never imported.
fn summary(report: &LoadReport) -> String {
    format!(
        "{} mod(s) attempted, {} imported, {} duplicate module path(s)",
        report.loaded_mods.len(),
        report.registry.len(),
        report.duplicates.len()
    )
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "modhost starting");

    let config = load_config(&cli)?;

    let host = Arc::new(HostModule::new(config.host.name.clone(), HostInfo {
        version: env!("CARGO_PKG_VERSION"),
    }));
    let runtime = CommandRuntime::new(
        config.mods.entry_extension.clone(),
        config.mods.interpreters.clone(),
    );
    let loader = ModLoader::new(LoaderSettings::from(&config.mods), Arc::clone(&host), runtime);

    let report = loader
        .bootstrap(&cli.host_args)
        .context("mod loading failed")?;

    if let Some(state) = host.state::<HostInfo>() {
        info!(host = host.name(), version = state.version, "host ready");
    }

    print_report(&report, cli.json)
}
