use log::{debug, info};
use reqwest::blocking::Client;

use crate::error::Result;
use crate::parser::{aggregate_count, parse_results, Results};

/// Public location of the OWID "latest" dataset
pub const DEFAULT_DATA_URL: &str =
    "https://covid.ourworldindata.org/data/latest/owid-covid-latest.json";

pub struct OwidClient {
    client: Client,
}

impl OwidClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("owidfetch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }

    /// Fetch and decode the report set at `url`.
    ///
    /// Non-2xx responses and bodies that do not decode are errors.
    pub fn fetch(&self, url: &str) -> Result<Results> {
        debug!("GET {}", url);
        let response = self.client.get(url).send()?.error_for_status()?;

        let text = response.text()?;
        debug!("Received {}", format_bytes(text.len() as u64));

        let results = parse_results(&text)?;
        let aggregates = aggregate_count(&results);
        info!(
            "Fetched data for {} countries and {} aggregate regions",
            results.len() - aggregates,
            aggregates
        );

        Ok(results)
    }
}

/// Format bytes as human-readable string
fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000_000 {
        format!("{:.1} GB", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{:.1} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.1} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{} B", bytes)
    }
}
