// src/config.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::tdl::{SubstitutionSet, SubstitutionValue};

/// Engine variable the request falls back to when no company is named.
pub const CURRENT_COMPANY: &str = "##SVCurrentCompany";

fn yes() -> bool {
    true
}

/// One export job, as posted to the server or read by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    /// Path to the YAML export definition.
    pub definition: PathBuf,
    pub from_date: String,
    pub to_date: String,
    #[serde(default)]
    pub company: Option<String>,
    pub server: String,
    pub port: u16,
    #[serde(default = "yes")]
    pub import_master: bool,
    #[serde(default = "yes")]
    pub import_transaction: bool,
}

fn parse_date(name: &'static str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ConfigError::InvalidDate {
        name,
        value: value.to_string(),
    })
}

impl JobConfig {
    /// The company the request targets, or the engine's current company.
    pub fn company(&self) -> &str {
        self.company
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(CURRENT_COMPANY)
    }

    pub fn period(&self) -> Result<(NaiveDate, NaiveDate), ConfigError> {
        Ok((
            parse_date("fromDate", &self.from_date)?,
            parse_date("toDate", &self.to_date)?,
        ))
    }

    /// Values shared by every table of the run.
    pub fn substitutions(&self) -> Result<SubstitutionSet, ConfigError> {
        let (from, to) = self.period()?;
        Ok(SubstitutionSet::new()
            .with("fromDate", from)
            .with("toDate", to)
            .with("targetCompany", SubstitutionValue::Text(self.company().to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn job(json: &str) -> JobConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn reads_camel_case_with_defaults() {
        let cfg = job(
            r#"{"definition":"export.yaml","fromDate":"2024-04-01","toDate":"2025-03-31",
                "server":"localhost","port":9000}"#,
        );
        assert_eq!(cfg.definition, PathBuf::from("export.yaml"));
        assert!(cfg.import_master);
        assert!(cfg.import_transaction);
        assert_eq!(cfg.company(), CURRENT_COMPANY);
    }

    #[test]
    fn substitutions_cover_the_run() -> Result<()> {
        let cfg = job(
            r#"{"definition":"d.yaml","fromDate":"2024-04-01","toDate":"2025-03-31",
                "company":"Acme & Co","server":"localhost","port":9000,"importMaster":false}"#,
        );
        assert!(!cfg.import_master);

        let set = cfg.substitutions()?;
        assert_eq!(set.len(), 3);
        assert_eq!(
            set.get("fromDate"),
            Some(&SubstitutionValue::Scalar("20240401".into()))
        );
        assert_eq!(
            set.get("toDate"),
            Some(&SubstitutionValue::Scalar("20250331".into()))
        );
        assert_eq!(
            set.get("targetCompany"),
            Some(&SubstitutionValue::Text("Acme & Co".into()))
        );
        Ok(())
    }

    #[test]
    fn empty_company_means_current() {
        let cfg = job(
            r#"{"definition":"d","fromDate":"2024-04-01","toDate":"2024-04-30",
                "company":"","server":"h","port":1}"#,
        );
        assert_eq!(cfg.company(), CURRENT_COMPANY);
    }

    #[test]
    fn bad_dates_are_config_errors() {
        let cfg = job(
            r#"{"definition":"d","fromDate":"01/04/2024","toDate":"2024-04-30",
                "server":"h","port":1}"#,
        );
        let err = cfg.substitutions().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDate { name: "fromDate", .. }));
    }
}
