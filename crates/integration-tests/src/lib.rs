//! Integration test support for Settlement Sync.
//!
//! Runs an in-process fake of the AtVenu GraphQL endpoint on `127.0.0.1:0`.
//! Each test scripts the fake with a responder closure keyed on the request's
//! `operationName` and variables, then runs the real client against it.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p settlement-sync-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use secrecy::SecretString;
use serde_json::{Value, json};
use settlement_sync::{AtVenuClient, AtVenuConfig};
use tokio::task::JoinHandle;
use url::Url;

/// API key the fake expects tests to send.
pub const TEST_API_KEY: &str = "test-atvenu-key-7Qz9xW2m";

/// One request the fake received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub operation_name: String,
    pub variables: Value,
    pub api_key: Option<String>,
}

impl RecordedRequest {
    /// A string variable, or `None` if absent or null.
    #[must_use]
    pub fn var(&self, name: &str) -> Option<&str> {
        self.variables.get(name).and_then(Value::as_str)
    }

    /// The `cursor` variable.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.var("cursor")
    }
}

/// What the fake sends back.
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// `{"data": ...}`
    Data(Value),
    /// `{"data": null, "errors": [...]}`
    Errors(Vec<&'static str>),
    /// A bare non-success HTTP status with a text body.
    Status(u16, &'static str),
}

impl IntoResponse for FakeReply {
    fn into_response(self) -> Response {
        match self {
            Self::Data(data) => axum::Json(json!({ "data": data })).into_response(),
            Self::Errors(messages) => {
                let errors: Vec<Value> = messages
                    .into_iter()
                    .map(|message| json!({ "message": message, "locations": [], "path": [] }))
                    .collect();
                axum::Json(json!({ "data": null, "errors": errors })).into_response()
            }
            Self::Status(status, body) => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                body,
            )
                .into_response(),
        }
    }
}

type Responder = dyn Fn(&RecordedRequest) -> FakeReply + Send + Sync;

struct FakeState {
    responder: Box<Responder>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// A running fake AtVenu server. Shut down on drop.
pub struct FakeAtVenu {
    endpoint: Url,
    state: Arc<FakeState>,
    handle: JoinHandle<()>,
}

impl FakeAtVenu {
    /// Bind a fresh port and start serving `responder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start<F>(responder: F) -> std::io::Result<Self>
    where
        F: Fn(&RecordedRequest) -> FakeReply + Send + Sync + 'static,
    {
        let state = Arc::new(FakeState {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/", post(graphql))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let endpoint = Url::parse(&format!("http://{addr}/"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            endpoint,
            state,
            handle,
        })
    }

    /// GraphQL endpoint URL of this fake.
    #[must_use]
    pub fn endpoint(&self) -> Url {
        self.endpoint.clone()
    }

    /// Config pointing at this fake with [`TEST_API_KEY`].
    #[must_use]
    pub fn config(&self) -> AtVenuConfig {
        AtVenuConfig::new(SecretString::from(TEST_API_KEY), self.endpoint())
    }

    /// Client pointing at this fake.
    #[must_use]
    pub fn client(&self) -> AtVenuClient {
        AtVenuClient::new(&self.config())
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Requests received for one operation.
    #[must_use]
    pub fn count(&self, operation_name: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.operation_name == operation_name)
            .count()
    }
}

impl Drop for FakeAtVenu {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn graphql(
    State(state): State<Arc<FakeState>>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> FakeReply {
    let request = RecordedRequest {
        operation_name: body
            .get("operationName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        variables: body.get("variables").cloned().unwrap_or(Value::Null),
        api_key: headers
            .get("x-api-key")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    };

    let reply = (state.responder)(&request);
    if let Ok(mut requests) = state.requests.lock() {
        requests.push(request);
    }
    reply
}

// =============================================================================
// Response builders
// =============================================================================

/// Canonical UUID string for a small test number.
#[must_use]
pub fn uuid(n: u128) -> String {
    format!("00000000-0000-0000-0000-{n:012x}")
}

/// A connection page. `next` is the cursor of the following page, if any.
#[must_use]
pub fn connection(nodes: Vec<Value>, next: Option<&str>) -> Value {
    json!({
        "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next },
        "nodes": nodes,
    })
}

/// `accounts` payload.
#[must_use]
pub fn accounts_data(accounts: Vec<Value>, next: Option<&str>) -> Value {
    json!({ "organization": { "accounts": connection(accounts, next) } })
}

/// An account node.
#[must_use]
pub fn account(id: u128, name: &str) -> Value {
    json!({ "uuid": uuid(id), "artistName": name })
}

/// `tours` payload.
#[must_use]
pub fn tours_data(tours: Vec<Value>) -> Value {
    json!({ "account": { "tours": connection(tours, None) } })
}

/// A tour node.
#[must_use]
pub fn tour(id: u128, name: &str) -> Value {
    json!({ "uuid": uuid(id), "tourName": name })
}

/// `shows` payload.
#[must_use]
pub fn shows_data(shows: Vec<Value>) -> Value {
    json!({ "tour": { "shows": connection(shows, None) } })
}

/// A single-day show in Austin.
#[must_use]
pub fn show(id: u128, date: &str) -> Value {
    json!({
        "uuid": uuid(id),
        "showDate": date,
        "showEndDate": null,
        "state": "settled",
        "attendance": 1200,
        "capacity": 1500,
        "currencyFormat": { "code": "USD" },
        "location": {
            "capacity": 1500,
            "city": "Austin",
            "stateProvince": "TX",
            "country": "US"
        }
    })
}

/// `merchandise` payload.
#[must_use]
pub fn merchandise_data(account_id: u128, items: Vec<Value>) -> Value {
    json!({
        "account": {
            "uuid": uuid(account_id),
            "merchItems": connection(items, None)
        }
    })
}

/// A merchandise item.
#[must_use]
pub fn merch_item(id: u128, name: &str, variants: Vec<Value>) -> Value {
    json!({
        "uuid": uuid(id),
        "name": name,
        "category": "Apparel",
        "productType": { "name": "Shirt" },
        "merchVariants": variants,
    })
}

/// A merchandise variant; `price` is a decimal string or null.
#[must_use]
pub fn variant(id: u128, sku: &str, size: &str, price: Option<&str>) -> Value {
    json!({ "uuid": uuid(id), "sku": sku, "size": size, "price": price })
}

/// `counts` payload with one settlement per page in `settlements`.
#[must_use]
pub fn counts_data(settlements: Vec<Value>) -> Value {
    let settlements: Vec<Value> = settlements
        .into_iter()
        .enumerate()
        .map(|(i, page)| json!({ "path": format!("settlement-{i}"), "mainCounts": page }))
        .collect();
    json!({ "show": { "settlements": settlements } })
}

/// A count row.
#[must_use]
pub fn count(variant_id: u128, count_in: i64, count_out: i64, comps: i64, adds: &[i64]) -> Value {
    let adds: Vec<Value> = adds.iter().map(|q| json!({ "quantity": q })).collect();
    json!({
        "merchVariantUuid": uuid(variant_id),
        "priceOverride": null,
        "countIn": count_in,
        "countOut": count_out,
        "comps": comps,
        "merchAdds": adds,
    })
}

// =============================================================================
// Scenarios
// =============================================================================

/// Account `BandX` (1) with tour `TourY` (2) serving `shows`.
///
/// The catalog holds item `Logo Tee` (10) with variants 11 (`A1`, M, 30.00)
/// and 12 (`B2`, L, no price). Every show's single settlement counts
/// variant 11 as 10 in / 2 out and variant 12 as 5 in / 1 out / 1 comp / 2
/// added, so each show sells 8 of `A1` and 5 of `B2`.
#[must_use]
pub fn band_x_world(shows: Vec<Value>) -> impl Fn(&RecordedRequest) -> FakeReply + Send + Sync + 'static {
    move |request: &RecordedRequest| match request.operation_name.as_str() {
        "accounts" => FakeReply::Data(accounts_data(vec![account(1, "BandX")], None)),
        "tours" => FakeReply::Data(tours_data(vec![tour(2, "TourY")])),
        "shows" => FakeReply::Data(shows_data(shows.clone())),
        "merchandise" => FakeReply::Data(merchandise_data(1, vec![logo_tee()])),
        "counts" => FakeReply::Data(counts_data(vec![connection(band_x_counts(), None)])),
        _ => FakeReply::Status(400, "unknown operation"),
    }
}

/// The `Logo Tee` item of [`band_x_world`].
#[must_use]
pub fn logo_tee() -> Value {
    merch_item(
        10,
        "Logo Tee",
        vec![
            variant(11, "A1", "M", Some("30.00")),
            variant(12, "B2", "L", None),
        ],
    )
}

/// The per-show counts of [`band_x_world`].
#[must_use]
pub fn band_x_counts() -> Vec<Value> {
    vec![count(11, 10, 2, 0, &[]), count(12, 5, 1, 1, &[2])]
}
