use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::service::make_service_fn;
use hyper::service::service_fn;
use hyper::Body;
use hyper::Method;
use hyper::Request;
use hyper::Response;
use hyper::Server;
use hyper::StatusCode;
use percent_encoding::percent_decode_str;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::contract::{ContractFunction, SmartContract};
use crate::error::ContractError;
use crate::traits::LedgerState;

/// HTTP front-end for the tender contract.
///
/// # Routes
/// - GET /health
/// - GET /init_ledger - seed the ten sample tenders
/// - GET /get_tender/{key} - raw record JSON
/// - GET /add_tender/{key}-{type}-{size}-{timestamp}-{lots}
/// - GET /get_all_tenders - JSON array of `{"Key", "Record"}`
///
/// Path segments are split on `-` first and percent-decoded afterwards, so a
/// field may carry a literal dash as `%2D`. A segment that does not decode
/// to UTF-8 is rejected with 400.
///
/// Contract failures are returned as `{"error": "<message>"}` with 400 for
/// a wrong argument count, 404 for a missing tender and 500 otherwise.
/// Contract calls run on the blocking pool since the ledger may do disk I/O.
pub struct HttpGateway<L> {
    /// Address to bind the HTTP server to (e.g., "127.0.0.1:3000")
    bind_addr: String,
    contract: Arc<SmartContract<L>>,
    /// Actual bound address (set after server starts)
    actual_addr: Arc<Mutex<Option<SocketAddr>>>,
    /// Server shutdown signal
    shutdown_tx: Arc<Mutex<Option<tokio::sync::oneshot::Sender<()>>>>,
    /// Spawned server task, awaited on close
    server_handle: Option<JoinHandle<()>>,
}

impl<L: LedgerState + 'static> HttpGateway<L> {
    pub fn new(bind_addr: String, contract: SmartContract<L>) -> Self {
        Self {
            bind_addr,
            contract: Arc::new(contract),
            actual_addr: Arc::new(Mutex::new(None)),
            shutdown_tx: Arc::new(Mutex::new(None)),
            server_handle: None,
        }
    }

    pub fn name(&self) -> &'static str {
        "http-gateway"
    }

    /// Get the actual bound address (available after server starts).
    pub async fn actual_addr(&self) -> Option<SocketAddr> {
        *self.actual_addr.lock().await
    }

    /// Bind and spawn the server.
    pub async fn open(&mut self) -> Result<()> {
        info!("Starting {} on {}", self.name(), self.bind_addr);

        let socket_addr: SocketAddr = self
            .bind_addr
            .parse()
            .with_context(|| format!("invalid bind address: {}", self.bind_addr))?;

        let contract = Arc::clone(&self.contract);
        let make_svc = make_service_fn(move |_conn| {
            let contract = Arc::clone(&contract);
            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    Self::handle_request(req, Arc::clone(&contract))
                }))
            }
        });

        let server = Server::try_bind(&socket_addr)
            .with_context(|| format!("failed to bind {}", socket_addr))?
            .serve(make_svc);
        let addr = server.local_addr();

        {
            let mut actual_addr_guard = self.actual_addr.lock().await;
            *actual_addr_guard = Some(addr);
        }

        info!("HTTP gateway listening on http://{}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        {
            let mut shutdown_guard = self.shutdown_tx.lock().await;
            *shutdown_guard = Some(shutdown_tx);
        }

        let handle = tokio::spawn(async move {
            let graceful = server.with_graceful_shutdown(async {
                shutdown_rx.await.ok();
                info!("HTTP gateway shutdown signal received");
            });

            if let Err(e) = graceful.await {
                error!("HTTP gateway error: {}", e);
            } else {
                info!("HTTP gateway stopped gracefully");
            }
        });
        self.server_handle = Some(handle);

        Ok(())
    }

    /// Signal the server to stop and wait for in-flight requests to drain.
    pub async fn close(&mut self) -> Result<()> {
        info!("Closing {}", self.name());

        {
            let mut shutdown_guard = self.shutdown_tx.lock().await;
            if let Some(shutdown_tx) = shutdown_guard.take() {
                if shutdown_tx.send(()).is_err() {
                    warn!("Failed to send shutdown signal (receiver already dropped)");
                }
            }
        }

        if let Some(handle) = self.server_handle.take() {
            handle.await.context("HTTP gateway task failed")?;
        }

        Ok(())
    }

    async fn handle_request(
        req: Request<Body>,
        contract: Arc<SmartContract<L>>,
    ) -> Result<Response<Body>, Infallible> {
        let method = req.method();
        let path = req.uri().path();

        debug!("HTTP request: {} {}", method, path);

        if method != Method::GET {
            return Ok(json_error(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"));
        }
        if path == "/health" {
            return Ok(json_response(StatusCode::OK, r#"{"status":"ok"}"#.into()));
        }

        let (function, args) = match route(path) {
            Ok(call) => call,
            Err(e @ RouteError::NotFound) => {
                return Ok(json_error(StatusCode::NOT_FOUND, &e.to_string()))
            }
            Err(e @ RouteError::InvalidEncoding(_)) => {
                warn!("Rejecting {}: {}", path, e);
                return Ok(json_error(StatusCode::BAD_REQUEST, &e.to_string()));
            }
        };
        let key = args.first().cloned().unwrap_or_default();

        let outcome = tokio::task::spawn_blocking(move || contract.dispatch(function, &args)).await;
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                error!("{} via HTTP did not complete: {}", function, e);
                return Ok(json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error"));
            }
        };

        let response = match result {
            Ok(payload) => match function {
                ContractFunction::QueryTender | ContractFunction::QueryAllTenders => {
                    json_response(StatusCode::OK, Body::from(payload))
                }
                ContractFunction::RecordTender => json_response(
                    StatusCode::OK,
                    serde_json::json!({ "status": "ok", "key": key })
                        .to_string()
                        .into(),
                ),
                ContractFunction::InitLedger => {
                    json_response(StatusCode::OK, r#"{"status":"ok"}"#.into())
                }
            },
            Err(e) => {
                warn!("{} via HTTP failed: {}", function, e);
                json_error(error_status(&e), &e.to_string())
            }
        };
        Ok(response)
    }
}

#[derive(Debug, PartialEq, Eq, Error)]
enum RouteError {
    #[error("not_found")]
    NotFound,
    #[error("path segment is not valid UTF-8 after decoding: {0}")]
    InvalidEncoding(String),
}

/// Map a request path onto a contract call.
fn route(path: &str) -> Result<(ContractFunction, Vec<String>), RouteError> {
    let trimmed = path.trim_start_matches('/');
    let (head, rest) = match trimmed.split_once('/') {
        Some((head, rest)) => (head, Some(rest)),
        None => (trimmed, None),
    };

    match (head, rest) {
        ("init_ledger", None) => Ok((ContractFunction::InitLedger, Vec::new())),
        ("get_all_tenders", None) => Ok((ContractFunction::QueryAllTenders, Vec::new())),
        ("get_tender", Some(key)) if !key.is_empty() => {
            Ok((ContractFunction::QueryTender, vec![decode_segment(key)?]))
        }
        ("add_tender", Some(tender)) if !tender.is_empty() => {
            let args = tender
                .split('-')
                .map(decode_segment)
                .collect::<Result<Vec<_>, _>>()?;
            Ok((ContractFunction::RecordTender, args))
        }
        _ => Err(RouteError::NotFound),
    }
}

fn decode_segment(segment: &str) -> Result<String, RouteError> {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| RouteError::InvalidEncoding(segment.to_string()))
}

fn error_status(e: &ContractError) -> StatusCode {
    if e.is_argument_error() {
        StatusCode::BAD_REQUEST
    } else if e.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn json_response(status: StatusCode, body: Body) -> Response<Body> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn json_error(status: StatusCode, message: &str) -> Response<Body> {
    json_response(
        status,
        serde_json::json!({ "error": message }).to_string().into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{MemoryLedger, MockFaults, MockLedger, RocksDbLedger};
    use crate::types::{Tender, TenderEntry};

    async fn start<L: LedgerState + 'static>(
        contract: SmartContract<L>,
    ) -> (HttpGateway<L>, SocketAddr) {
        let mut gateway = HttpGateway::new("127.0.0.1:0".to_string(), contract);
        gateway.open().await.unwrap();
        let addr = gateway
            .actual_addr()
            .await
            .expect("Server should have bound address");
        (gateway, addr)
    }

    async fn get(addr: SocketAddr, path: &str) -> (StatusCode, Vec<u8>) {
        let client = hyper::Client::new();
        let uri = format!("http://{}{}", addr, path);
        let response = client.get(uri.parse().unwrap()).await.unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, body.to_vec())
    }

    #[test]
    fn test_route_table() {
        assert_eq!(route("/init_ledger"), Ok((ContractFunction::InitLedger, vec![])));
        assert_eq!(
            route("/get_all_tenders"),
            Ok((ContractFunction::QueryAllTenders, vec![]))
        );
        assert_eq!(
            route("/get_tender/7"),
            Ok((ContractFunction::QueryTender, vec!["7".to_string()]))
        );
        let (function, args) = route("/add_tender/11-Work-5-1500000000-20").unwrap();
        assert_eq!(function, ContractFunction::RecordTender);
        assert_eq!(args, vec!["11", "Work", "5", "1500000000", "20"]);

        assert_eq!(route("/get_tender/"), Err(RouteError::NotFound));
        assert_eq!(route("/get_all_tenders/extra"), Err(RouteError::NotFound));
        assert_eq!(route("/change_holder/x"), Err(RouteError::NotFound));
        assert_eq!(route("/"), Err(RouteError::NotFound));
    }

    #[test]
    fn test_route_decodes_segments() {
        assert_eq!(
            route("/get_tender/tender%20a"),
            Ok((ContractFunction::QueryTender, vec!["tender a".to_string()]))
        );
        assert_eq!(
            route("/get_tender/tender-%C3%A4"),
            Ok((ContractFunction::QueryTender, vec!["tender-ä".to_string()]))
        );

        // Split happens before decoding, so %2D stays inside its field.
        let (_, args) = route("/add_tender/7%2Da-Supply%20Goods-10-1500000000-100").unwrap();
        assert_eq!(args, vec!["7-a", "Supply Goods", "10", "1500000000", "100"]);
    }

    #[test]
    fn test_route_rejects_invalid_utf8() {
        assert_eq!(
            route("/get_tender/%FF"),
            Err(RouteError::InvalidEncoding("%FF".to_string()))
        );
        assert!(matches!(
            route("/add_tender/1-%C3-1-1-1"),
            Err(RouteError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_error_status() {
        assert_eq!(
            error_status(&ContractError::InvalidArgumentCount { expected: 5, got: 3 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_status(&ContractError::TenderNotFound("1".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&ContractError::Ledger(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_http_gateway_new() {
        let gateway = HttpGateway::new(
            "127.0.0.1:9999".to_string(),
            SmartContract::new(MemoryLedger::new()),
        );
        assert_eq!(gateway.bind_addr, "127.0.0.1:9999");
        assert_eq!(gateway.name(), "http-gateway");
    }

    #[tokio::test]
    async fn test_http_gateway_invalid_bind_addr() {
        let mut gateway =
            HttpGateway::new("not-an-address".to_string(), SmartContract::new(MemoryLedger::new()));
        assert!(gateway.open().await.is_err());
    }

    #[tokio::test]
    async fn test_http_health_endpoint() {
        let (mut gateway, addr) = start(SmartContract::new(MemoryLedger::new())).await;

        let (status, body) = get(addr, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("ok"));

        gateway.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_seed_add_and_query() {
        let (mut gateway, addr) = start(SmartContract::new(MemoryLedger::new())).await;

        let (status, _) = get(addr, "/init_ledger").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(addr, "/add_tender/11-Work-5-1500000000-20").await;
        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["key"], "11");

        let (status, body) = get(addr, "/get_tender/11").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            Tender::from_bytes(&body).unwrap(),
            Tender::new("Work", "5", "1500000000", "20")
        );

        let (status, body) = get(addr, "/get_all_tenders").await;
        assert_eq!(status, StatusCode::OK);
        let entries: Vec<TenderEntry> = serde_json::from_slice(&body).unwrap();
        assert_eq!(entries.len(), 11);
        assert_eq!(entries[1].key, "10");
        assert_eq!(entries[2].key, "11");

        gateway.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_statuses() {
        let (mut gateway, addr) = start(SmartContract::new(MemoryLedger::new())).await;

        let (status, body) = get(addr, "/get_tender/404").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Could not locate tender");

        let (status, body) = get(addr, "/add_tender/1-Work-5").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Incorrect number of arguments. Expecting 5");

        let (status, _) = get(addr, "/delete_tender/1").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        gateway.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_encoded_key_and_fields_round_trip() {
        let (mut gateway, addr) = start(SmartContract::new(MemoryLedger::new())).await;

        let (status, body) = get(
            addr,
            "/add_tender/tender%20%C3%A4%2D1-Supply%20Goods-10-1500000000-100",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["key"], "tender ä-1");

        let (status, body) = get(addr, "/get_tender/tender%20%C3%A4%2D1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            Tender::from_bytes(&body).unwrap(),
            Tender::new("Supply Goods", "10", "1500000000", "100")
        );

        let (status, body) = get(addr, "/get_tender/%FF").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(body["error"].as_str().unwrap().contains("%FF"));

        gateway.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_rocksdb_ledger() {
        let temp_dir = tempfile::tempdir().unwrap();
        let ledger = RocksDbLedger::open(temp_dir.path()).unwrap();
        let (mut gateway, addr) = start(SmartContract::new(ledger)).await;

        let (status, _) = get(addr, "/init_ledger").await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = get(addr, "/get_all_tenders").await;
        assert_eq!(status, StatusCode::OK);
        let entries: Vec<TenderEntry> = serde_json::from_slice(&body).unwrap();
        assert_eq!(entries.len(), 10);

        gateway.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_close_waits_for_server_exit() {
        let (mut gateway, addr) = start(SmartContract::new(MemoryLedger::new())).await;
        let (status, _) = get(addr, "/health").await;
        assert_eq!(status, StatusCode::OK);

        gateway.close().await.unwrap();
        assert!(gateway.server_handle.is_none());

        // Listener is gone once close returns.
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());

        // Closing twice is harmless.
        gateway.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_http_ledger_failure_is_500() {
        let ledger = MockLedger::with_faults(MockFaults {
            fail_put: true,
            ..MockFaults::default()
        });
        let (mut gateway, addr) = start(SmartContract::new(ledger)).await;

        let (status, body) = get(addr, "/add_tender/9-Work-1-2-3").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Failed to record Tender: 9");

        gateway.close().await.unwrap();
    }
}
