use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ContractError, ContractResult};
use crate::filters::Platform;

const BUNDLED_CATEGORY_IDS: &str = include_str!("../../../fixtures/mappings/category-ids.json");

/// Read-only lookup from human category names to the service's category ids,
/// partitioned by platform.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct CategoryTable {
    platforms: BTreeMap<Platform, BTreeMap<String, String>>,
}

impl CategoryTable {
    pub fn bundled() -> ContractResult<Self> {
        Self::from_json(BUNDLED_CATEGORY_IDS)
    }

    pub fn from_json(raw: &str) -> ContractResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ContractResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|error| {
            ContractError::InvalidArgument(format!(
                "invalid category table '{}': {error}",
                path.display()
            ))
        })
    }

    pub fn resolve(&self, platform: Platform, name: &str) -> ContractResult<&str> {
        self.platforms
            .get(&platform)
            .and_then(|names| names.get(name))
            .map(String::as_str)
            .ok_or_else(|| ContractError::UnknownCategory {
                platform,
                name: name.to_string(),
            })
    }

    pub fn len(&self, platform: Platform) -> usize {
        self.platforms.get(&platform).map_or(0, BTreeMap::len)
    }
}
