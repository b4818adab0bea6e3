use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::error::{ContractError, ContractResult};
use crate::manifests::DEFAULT_MANIFEST_PATH;

#[derive(Debug, Parser)]
#[command(
    name = "storeintel-contract",
    about = "contract tests for the store intelligence top apps endpoints"
)]
pub struct Args {
    #[arg(long, env = "STOREINTEL_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    #[arg(long, env = "STOREINTEL_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,
    #[arg(long, env = "STOREINTEL_CATEGORIES")]
    pub categories: Option<PathBuf>,
    #[arg(long, env = "STOREINTEL_MANIFEST", default_value = DEFAULT_MANIFEST_PATH)]
    pub manifest: PathBuf,
    #[arg(long, env = "STOREINTEL_RESULTS", default_value = "results")]
    pub results_dir: PathBuf,
    #[arg(long, env = "STOREINTEL_LABEL", default_value = "local")]
    pub label: String,
    #[arg(long, value_enum, default_value_t = RequestMethod::Post)]
    pub method: RequestMethod,
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
    #[arg(long, default_value = "info")]
    pub log_level: String,
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RequestMethod {
    /// Filters travel as an urlencoded form body.
    Post,
    /// Filters travel in the query string next to the token.
    Get,
}

impl RequestMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Get => "get",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    List {
        #[arg(default_value = "all")]
        target: String,
    },
    Run {
        #[arg(long, default_value = "all")]
        target: String,
        #[arg(long = "case")]
        case_filter: Option<String>,
        #[arg(long = "override")]
        overrides: Vec<String>,
    },
    Doctor,
}

pub fn validate_label(label: &str) -> ContractResult<()> {
    if label.is_empty() {
        return Err(ContractError::InvalidArgument(
            "label must not be empty".to_string(),
        ));
    }
    if matches!(label, "." | "..") {
        return Err(ContractError::InvalidArgument(format!(
            "label '{label}' is not allowed"
        )));
    }
    if !label
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'_'))
    {
        return Err(ContractError::InvalidArgument(
            "label contains invalid characters; allowed: [A-Za-z0-9._-]".to_string(),
        ));
    }
    Ok(())
}

pub fn parse_overrides(entries: &[String]) -> ContractResult<BTreeMap<String, String>> {
    let mut overrides = BTreeMap::new();
    for entry in entries {
        let Some((key, value)) = entry.split_once('=') else {
            return Err(ContractError::InvalidArgument(format!(
                "invalid override '{entry}'; expected KEY=VALUE"
            )));
        };
        if key.trim().is_empty() {
            return Err(ContractError::InvalidArgument(format!(
                "invalid override '{entry}'; key must not be empty"
            )));
        }
        overrides.insert(key.trim().to_string(), value.to_string());
    }
    Ok(overrides)
}
