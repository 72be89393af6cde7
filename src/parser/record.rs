use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use crate::error::Result;

/// Reports keyed by country code (`"USA"`, `"OWID_WRL"`, ...)
pub type Results = BTreeMap<String, Report>;

/// Prefix OWID uses for aggregate regions that are not countries
pub const AGGREGATE_PREFIX: &str = "OWID_";

macro_rules! report_metrics {
    ($($field:ident),+ $(,)?) => {
        /// One country's statistics for a single reporting day
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        #[serde(default)]
        pub struct Report {
            pub continent: Option<String>,
            #[serde(deserialize_with = "null_as_empty")]
            pub location: String,
            pub last_updated_date: Option<String>,
            pub tests_units: Option<String>,
            $(pub $field: Option<f64>,)+
        }

        /// Numeric report fields, in detail-table column order
        pub const METRIC_FIELDS: &[&str] = &[$(stringify!($field)),+];

        impl Report {
            /// Metric values in the same order as [`METRIC_FIELDS`]
            pub fn metrics(&self) -> Vec<Option<f64>> {
                vec![$(self.$field),+]
            }
        }
    };
}

report_metrics! {
    total_cases,
    new_cases,
    new_cases_smoothed,
    total_deaths,
    new_deaths,
    new_deaths_smoothed,
    total_cases_per_million,
    new_cases_per_million,
    new_cases_smoothed_per_million,
    total_deaths_per_million,
    new_deaths_per_million,
    new_deaths_smoothed_per_million,
    reproduction_rate,
    icu_patients,
    icu_patients_per_million,
    hosp_patients,
    hosp_patients_per_million,
    weekly_icu_admissions,
    weekly_icu_admissions_per_million,
    weekly_hosp_admissions,
    weekly_hosp_admissions_per_million,
    new_tests,
    total_tests,
    total_tests_per_thousand,
    new_tests_per_thousand,
    new_tests_smoothed,
    new_tests_smoothed_per_thousand,
    positive_rate,
    tests_per_case,
    total_vaccinations,
    people_vaccinated,
    people_fully_vaccinated,
    new_vaccinations,
    new_vaccinations_smoothed,
    total_vaccinations_per_hundred,
    people_vaccinated_per_hundred,
    people_fully_vaccinated_per_hundred,
    new_vaccinations_smoothed_per_million,
    stringency_index,
    population,
    population_density,
    median_age,
    aged_65_older,
    aged_70_older,
    gdp_per_capita,
    extreme_poverty,
    cardiovasc_death_rate,
    diabetes_prevalence,
    female_smokers,
    male_smokers,
    handwashing_facilities,
    hospital_beds_per_thousand,
    life_expectancy,
    human_development_index,
}

impl Report {
    /// The raw label used to group this report: the continent, or the
    /// location itself when the continent is missing or blank.
    pub fn continent_label(&self) -> &str {
        match self.continent.as_deref().map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => self.location.trim(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a response body into a report set
pub fn parse_results(body: &str) -> Result<Results> {
    let results: Results = serde_json::from_str(body)?;
    Ok(results)
}

/// Number of aggregate regions (`OWID_*` codes) in a report set
pub fn aggregate_count(results: &Results) -> usize {
    results
        .keys()
        .filter(|code| code.starts_with(AGGREGATE_PREFIX))
        .count()
}

/// A value ready to be bound to a statement parameter
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Null => stmt.raw_bind_parameter(idx, rusqlite::types::Null)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

impl From<Option<f64>> for SqlValue {
    fn from(value: Option<f64>) -> Self {
        value.map(SqlValue::Real).unwrap_or(SqlValue::Null)
    }
}

impl From<Option<&str>> for SqlValue {
    fn from(value: Option<&str>) -> Self {
        value
            .map(|s| SqlValue::Text(s.to_string()))
            .unwrap_or(SqlValue::Null)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "USA": {
            "continent": "North America",
            "location": "United States",
            "last_updated_date": "2023-03-08",
            "total_cases": 103436829.0,
            "new_cases": null,
            "tests_units": "tests performed",
            "excess_mortality": 11.2
        },
        "OWID_WRL": {
            "continent": null,
            "location": "World",
            "total_cases": 676570149.0
        }
    }"#;

    #[test]
    fn test_parse_results() {
        let results = parse_results(SAMPLE).unwrap();
        assert_eq!(results.len(), 2);

        let usa = &results["USA"];
        assert_eq!(usa.location, "United States");
        assert_eq!(usa.total_cases, Some(103436829.0));
        assert_eq!(usa.new_cases, None);
        assert_eq!(usa.tests_units.as_deref(), Some("tests performed"));
        assert_eq!(usa.last_updated_date.as_deref(), Some("2023-03-08"));

        let world = &results["OWID_WRL"];
        assert_eq!(world.continent, None);
        assert_eq!(world.last_updated_date, None);
    }

    #[test]
    fn test_malformed_body_is_rejected() {
        assert!(parse_results("[1, 2, 3]").is_err());
        assert!(parse_results("{\"USA\": {\"total_cases\": \"many\"}}").is_err());
    }

    #[test]
    fn test_null_location_decodes_as_empty() {
        let results = parse_results(
            r#"{"XKX": {"continent": null, "location": null, "total_cases": 3.0},
                "USA": {"continent": "North America", "location": "United States"}}"#,
        )
        .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results["XKX"].location, "");
        assert_eq!(results["XKX"].continent_label(), "");
        assert_eq!(results["XKX"].total_cases, Some(3.0));
    }

    #[test]
    fn test_continent_label_falls_back_to_location() {
        let mut report = Report {
            location: "Antarctica".to_string(),
            ..Default::default()
        };
        assert_eq!(report.continent_label(), "Antarctica");

        report.continent = Some("  ".to_string());
        assert_eq!(report.continent_label(), "Antarctica");

        report.continent = Some("Europe".to_string());
        assert_eq!(report.continent_label(), "Europe");
    }

    #[test]
    fn test_metrics_match_fields() {
        let report = Report {
            total_cases: Some(1.0),
            human_development_index: Some(0.9),
            ..Default::default()
        };
        let metrics = report.metrics();
        assert_eq!(metrics.len(), METRIC_FIELDS.len());
        assert_eq!(metrics[0], Some(1.0));
        assert_eq!(METRIC_FIELDS[0], "total_cases");
        assert_eq!(metrics[METRIC_FIELDS.len() - 1], Some(0.9));
        assert_eq!(METRIC_FIELDS.last(), Some(&"human_development_index"));
    }

    #[test]
    fn test_aggregate_count() {
        let results = parse_results(SAMPLE).unwrap();
        assert_eq!(aggregate_count(&results), 1);
    }
}
