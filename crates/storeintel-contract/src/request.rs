use std::collections::BTreeMap;
use std::sync::Arc;

use url::Url;

use crate::categories::CategoryTable;
use crate::cli::RequestMethod;
use crate::config::ServiceConfig;
use crate::error::{ContractError, ContractResult};
use crate::filters::{FilterSet, Platform};

pub const TOP_APPS_PATH: &str = "sales_report_estimates_comparison_attributes";
pub const AUTH_TOKEN_PARAM: &str = "auth_token";

/// A fully built top-apps query. In `Post` mode the filters are the form
/// body; in `Get` mode they are already folded into `url` and `form` is kept
/// only for reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopAppsRequest {
    pub platform: Platform,
    pub method: RequestMethod,
    pub url: Url,
    pub form: Vec<(String, String)>,
}

impl TopAppsRequest {
    pub fn redacted_url(&self) -> String {
        redact_token(&self.url)
    }
}

#[derive(Clone, Debug)]
pub struct RequestBuilder {
    config: ServiceConfig,
    categories: Arc<CategoryTable>,
}

impl RequestBuilder {
    pub fn new(config: ServiceConfig, categories: Arc<CategoryTable>) -> Self {
        Self { config, categories }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn category_id(&self, platform: Platform, name: &str) -> ContractResult<&str> {
        self.categories.resolve(platform, name)
    }

    pub fn endpoint(&self, platform: Platform) -> ContractResult<Url> {
        let mut url = self.config.base_url().clone();
        url.path_segments_mut()
            .map_err(|_| {
                ContractError::InvalidArgument(format!(
                    "base url '{}' cannot carry a path",
                    self.config.base_url()
                ))
            })?
            .pop_if_empty()
            .push(platform.as_str())
            .push(TOP_APPS_PATH);
        Ok(url)
    }

    /// Builds the request without validating any filter value; rejecting bad
    /// input is the service's job and the thing under test.
    pub fn build(
        &self,
        platform: Platform,
        filters: &FilterSet,
        overrides: &BTreeMap<String, String>,
    ) -> ContractResult<TopAppsRequest> {
        let form = merge_overrides(filters.form_pairs(), overrides);

        let mut url = self.endpoint(platform)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(AUTH_TOKEN_PARAM, self.config.auth_token());
            if self.config.method() == RequestMethod::Get {
                for (key, value) in &form {
                    query.append_pair(key, value);
                }
            }
        }

        Ok(TopAppsRequest {
            platform,
            method: self.config.method(),
            url,
            form,
        })
    }
}

pub fn merge_overrides(
    mut pairs: Vec<(String, String)>,
    overrides: &BTreeMap<String, String>,
) -> Vec<(String, String)> {
    for (key, value) in overrides {
        match pairs.iter_mut().find(|(existing, _)| existing == key) {
            Some(pair) => pair.1 = value.clone(),
            None => pairs.push((key.clone(), value.clone())),
        }
    }
    pairs
}

pub fn redact_token(url: &Url) -> String {
    let mut redacted = url.clone();
    let pairs = url
        .query_pairs()
        .map(|(key, value)| {
            if key == AUTH_TOKEN_PARAM {
                (key.into_owned(), "***".to_string())
            } else {
                (key.into_owned(), value.into_owned())
            }
        })
        .collect::<Vec<_>>();
    if pairs.is_empty() {
        return redacted.to_string();
    }
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
