// In-process stand-in for the top apps endpoint. It mirrors the live
// service's validation quirks: comparison attribute errors come back as a bare
// JSON string, category errors as `{"errors": [{"title": ...}]}`.

use std::collections::HashMap;
use std::net::TcpListener as StdTcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::runtime::Builder;
use tokio::sync::oneshot;

pub const STUB_TOKEN: &str = "stub-token";

const COMPARISON_ATTRIBUTES: [&str; 4] = ["absolute", "delta", "transformed_delta", "revenue_absolute"];
const MEASURE_FIELDS: [&str; 6] = [
    "absolute",
    "delta",
    "transformed_delta",
    "revenue_absolute",
    "revenue_delta",
    "revenue_transformed_delta",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StubMode {
    /// Rows sorted and all in the requested category.
    Conforming,
    /// Last row tagged "Reference", as the live service does.
    LeaksReference,
    /// Rows 1 and 2 swapped.
    Unsorted,
    /// Every request gets an empty list.
    Empty,
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub platform: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Looks a filter up wherever it travelled, body first.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.form
            .iter()
            .chain(self.query.iter())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct StubState {
    mode: StubMode,
    categories: Arc<HashMap<&'static str, &'static str>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct ServiceStubHandle {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    join: Option<thread::JoinHandle<()>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ServiceStubHandle {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .map_or_else(|_| Vec::new(), |entries| entries.clone())
    }
}

impl Drop for ServiceStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

pub fn spawn_service_stub(mode: StubMode) -> ServiceStubHandle {
    let listener = StdTcpListener::bind("127.0.0.1:0").expect("stub bind");
    listener.set_nonblocking(true).expect("stub nonblocking");
    let addr = listener.local_addr().expect("stub addr");
    let base_url = format!("http://{addr}/v1");

    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        mode,
        categories: Arc::new(HashMap::from([
            ("6018", "Books"),
            ("6006", "Reference"),
            ("BOOKS_AND_REFERENCE", "Books"),
        ])),
        requests: Arc::clone(&requests),
    };
    let app = Router::new()
        .route(
            "/v1/:platform/sales_report_estimates_comparison_attributes",
            get(handle_top_apps).post(handle_top_apps),
        )
        .with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let join = thread::spawn(move || {
        let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
            return;
        };
        runtime.block_on(async move {
            let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
                return;
            };
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            let _ = server.await;
        });
    });

    ServiceStubHandle {
        base_url,
        shutdown: Some(shutdown_tx),
        join: Some(join),
        requests,
    }
}

async fn handle_top_apps(
    State(state): State<StubState>,
    Path(platform): Path<String>,
    method: Method,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> Response {
    let form = url::form_urlencoded::parse(&body)
        .into_owned()
        .collect::<Vec<_>>();
    let recorded = RecordedRequest {
        method: method.to_string(),
        platform,
        query,
        form,
    };
    if let Ok(mut entries) = state.requests.lock() {
        entries.push(recorded.clone());
    }

    if recorded
        .query
        .iter()
        .find(|(k, _)| k == "auth_token")
        .map(|(_, v)| v.as_str())
        != Some(STUB_TOKEN)
    {
        return (StatusCode::UNAUTHORIZED, "Invalid authentication credentials").into_response();
    }

    let category = match recorded.param("category").filter(|v| !v.is_empty()) {
        None => {
            return unprocessable(json!({"errors": [{"title": "Required parameter: category is missing"}]}));
        }
        Some(id) => match state.categories.get(id) {
            Some(label) => *label,
            None => return unprocessable(json!({"errors": [{"title": "Invalid category"}]})),
        },
    };

    if !recorded
        .param("comparison_attribute")
        .is_some_and(|value| COMPARISON_ATTRIBUTES.contains(&value))
    {
        return unprocessable(json!("Comparison attribute is not included in the list"));
    }

    (StatusCode::OK, Json(rows(state.mode, category))).into_response()
}

fn unprocessable(body: Value) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

fn rows(mode: StubMode, category: &str) -> Value {
    if mode == StubMode::Empty {
        return json!([]);
    }
    let mut rows = (0..5u64)
        .map(|idx| {
            let mut row = serde_json::Map::new();
            row.insert("app_id".to_string(), json!(1000 + idx));
            for (offset, field) in MEASURE_FIELDS.iter().enumerate() {
                let value = (5 - idx) as f64 * 10.0 + offset as f64 * 0.5;
                row.insert(field.to_string(), json!(value));
            }
            row.insert(
                "custom_tags".to_string(),
                json!({"Primary Category": category}),
            );
            Value::Object(row)
        })
        .collect::<Vec<_>>();

    match mode {
        StubMode::LeaksReference => {
            if let Some(last) = rows.last_mut() {
                last["custom_tags"]["Primary Category"] = json!("Reference");
            }
        }
        StubMode::Unsorted => rows.swap(1, 2),
        StubMode::Conforming | StubMode::Empty => {}
    }
    Value::Array(rows)
}
