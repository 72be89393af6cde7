use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// Version printed by `-v`: major and minor only
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR")
);

#[derive(Parser, Debug)]
#[command(name = "owidfetch")]
#[command(
    version = VERSION,
    disable_version_flag = true,
    about = "Fetch the OWID COVID-19 dataset and upsert it into a database"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Print version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
