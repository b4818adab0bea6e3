use std::time::Instant;

use reqwest::Client;
use tracing::debug;

use crate::cli::RequestMethod;
use crate::config::ServiceConfig;
use crate::error::ContractResult;
use crate::request::TopAppsRequest;
use crate::response::{ApiResponse, ResponseBody};

/// Thin reqwest wrapper: one request in, one response out. No retries and no
/// status-based error mapping; every status is handed back for assertion.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
}

impl ApiClient {
    pub fn new(config: &ServiceConfig) -> ContractResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("storeintel-contract/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    pub async fn send(&self, request: &TopAppsRequest) -> ContractResult<ApiResponse> {
        debug!(
            url = %request.redacted_url(),
            method = request.method.as_str(),
            form = ?request.form,
            "sending top apps request"
        );
        let builder = match request.method {
            RequestMethod::Post => self.http.post(request.url.clone()).form(&request.form),
            RequestMethod::Get => self.http.get(request.url.clone()),
        };

        let start = Instant::now();
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        debug!(status, bytes = bytes.len(), elapsed_ms, "received response");
        Ok(ApiResponse {
            status,
            body: ResponseBody::parse(&bytes),
            elapsed_ms,
        })
    }
}
