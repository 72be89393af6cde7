use anyhow::{Context, Result};
use log::{error, info, LevelFilter};
use owidfetch::{
    cli::{Cli, VERSION},
    config::Config,
    download::OwidClient,
    writer::{sync_reports, Database},
};
use std::env;
use std::time::Instant;

fn init_logging() {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if env::var("RUST_LOG").is_err() {
        builder.filter_module("owidfetch", LevelFilter::Info);
    }
    builder.format_timestamp_millis().init();
}

fn main() {
    let cli = Cli::parse_args();
    if cli.version {
        println!("{}", VERSION);
        return;
    }
    init_logging();

    if let Err(err) = run(&cli) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let start = Instant::now();

    info!("Parsing configuration {:?}", cli.config);
    let config = Config::load(&cli.config)
        .with_context(|| format!("Loading configuration from {:?}", cli.config))?;
    let names = config.table_names()?;

    info!("Configured data source: {}", config.data_url);
    let results = OwidClient::new()?
        .fetch(&config.data_url)
        .with_context(|| format!("Fetching {}", config.data_url))?;

    info!("Connecting to {} database {} ...", config.driver, config.dsn);
    let db = Database::open(&config.dsn)
        .with_context(|| format!("Opening database {}", config.dsn))?;
    info!("Database connection succeeded");

    let summary = sync_reports(&db, &names, &results)?;

    info!(
        "Wrote {} locations and {} reports ({} skipped, {} new continents) in {:.1}s",
        summary.upsert.locations,
        summary.upsert.reports,
        summary.upsert.skipped,
        summary.schema.continents_added.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
