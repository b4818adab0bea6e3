use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::assertions::CaseAssertion;
use crate::error::{ContractError, ContractResult};
use crate::response::MeasureField;

pub const DEFAULT_MANIFEST_PATH: &str = "contract/manifests/store-intel.yaml";

#[derive(Clone, Debug, Deserialize)]
pub struct ContractManifest {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub cases: Vec<ManifestCase>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ManifestCase {
    pub id: String,
    pub target: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub assertions: Vec<ManifestAssertion>,
    /// Known misbehaviour of the live service that this case is expected to
    /// expose. The case still fails; the note travels with the report.
    #[serde(default)]
    pub known_anomaly: Option<String>,
}

const fn default_enabled() -> bool {
    true
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ManifestAssertion {
    Status { value: u16 },
    FlatError { value: String },
    ErrorTitle { value: String },
    StrictlyDescending { value: MeasureField },
    PrimaryCategory { value: String },
}

impl ManifestAssertion {
    pub fn to_case_assertion(&self) -> CaseAssertion {
        match self {
            Self::Status { value } => CaseAssertion::Status(*value),
            Self::FlatError { value } => CaseAssertion::FlatError(value.clone()),
            Self::ErrorTitle { value } => CaseAssertion::ErrorTitle(value.clone()),
            Self::StrictlyDescending { value } => CaseAssertion::StrictlyDescending(*value),
            Self::PrimaryCategory { value } => CaseAssertion::PrimaryCategory(value.clone()),
        }
    }
}

pub fn load_manifest(path: impl AsRef<Path>) -> ContractResult<ContractManifest> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    serde_yaml::from_slice::<ContractManifest>(&bytes).map_err(|error| {
        ContractError::InvalidArgument(format!("invalid manifest '{}': {error}", path.display()))
    })
}

/// Relative paths are tried against the working directory first, then
/// against the workspace root.
pub fn resolve_manifest_path(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..").join(path)
}
