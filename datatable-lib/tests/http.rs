//! End-to-end tests of `ListClient` against a local HTTP server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;

use datatable_lib::ListClient;
use datatable_lib::TableConfig;
use datatable_lib::TableController;
use datatable_lib::TableStatus;
use datatable_lib::error::FetchErrorKind;
use datatable_lib::model::RecordId;
use datatable_lib::query::Direction;
use datatable_lib::query::QueryEncoding;
use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

const CATEGORIES: &str = r#"{
    "count": 2,
    "next": null,
    "previous": null,
    "results": [
        {"pk": 1, "name": "Capacitors", "structural": false, "parent": null},
        {"pk": 2, "name": "Resistors", "structural": true, "parent": null}
    ]
}"#;

/// Requests seen by the server: path with query, and the authorization header.
type Seen = Arc<Mutex<Vec<(String, Option<String>)>>>;

fn respond(req: &Request<Incoming>, seen: &Seen) -> Response<Full<Bytes>> {
    let uri = req
        .uri()
        .path_and_query()
        .map(|pq| pq.to_string())
        .unwrap_or_default();
    let auth = req
        .headers()
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    seen.lock().unwrap().push((uri, auth));

    let (status, body) = match req.uri().path() {
        "/api/part/category/" => (StatusCode::OK, CATEGORIES),
        "/api/broken/" => (StatusCode::INTERNAL_SERVER_ERROR, "boom"),
        "/api/garbage/" => (StatusCode::OK, "not json"),
        _ => (StatusCode::NOT_FOUND, "{\"detail\": \"Not found.\"}"),
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

async fn start_server() -> (SocketAddr, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Seen = Arc::default();

    let server_seen = Arc::clone(&seen);
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let seen = Arc::clone(&server_seen);
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let response = respond(&req, &seen);
                    async move { Ok::<_, Infallible>(response) }
                });
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    (addr, seen)
}

fn client(addr: SocketAddr) -> ListClient {
    ListClient::builder()
        .url(format!("http://{}/api", addr))
        .bearer_token("secret")
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_fetch_page_over_http() {
    let (addr, seen) = start_server().await;
    let config = TableConfig::new("part/category/")
        .with_id_field("pk")
        .with_param("parent", "null");
    let controller = TableController::new(client(addr), config);

    controller.set_filter("cascade", true);
    let snapshot = controller.settled().await;

    assert_eq!(snapshot.status, TableStatus::Ready);
    assert_eq!(snapshot.total_count(), Some(2));
    let ids: Vec<_> = snapshot.records().iter().map(|r| r.id().clone()).collect();
    assert_eq!(ids, vec![RecordId::from(1), RecordId::from(2)]);
    assert_eq!(snapshot.records()[1].get_bool("structural"), Some(true));

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0].0,
        "/api/part/category/?cascade=true&parent=null&page=1&pageSize=25"
    );
    assert_eq!(seen[0].1.as_deref(), Some("Bearer secret"));
}

#[tokio::test]
async fn test_limit_offset_encoding_over_http() {
    let (addr, seen) = start_server().await;
    let config = TableConfig::new("/part/category/")
        .with_id_field("pk")
        .with_page_size(10)
        .with_encoding(QueryEncoding::django());
    let controller = TableController::new(client(addr), config);

    controller.set_sort("name", Direction::Desc);
    controller.settled().await;

    assert_eq!(
        seen.lock().unwrap()[0].0,
        "/api/part/category/?ordering=-name&limit=10&offset=0"
    );
}

#[tokio::test]
async fn test_server_error_over_http() {
    let (addr, _seen) = start_server().await;
    let controller = TableController::new(client(addr), TableConfig::new("broken/"));

    controller.load();
    let snapshot = controller.settled().await;

    assert_eq!(snapshot.status, TableStatus::Failed);
    let error = snapshot.error.unwrap();
    assert_eq!(error.kind(), FetchErrorKind::ServerError);
    assert_eq!(error.status_code(), Some(500));
    assert_eq!(error.detail(), "boom");
}

#[tokio::test]
async fn test_malformed_body_over_http() {
    let (addr, _seen) = start_server().await;
    let controller = TableController::new(client(addr), TableConfig::new("garbage/"));

    controller.load();
    let snapshot = controller.settled().await;

    assert_eq!(snapshot.status, TableStatus::Failed);
    let error = snapshot.error.unwrap();
    assert_eq!(error.kind(), FetchErrorKind::DecodeError);
    assert_eq!(error.status_code(), None);
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let controller = TableController::new(client(addr), TableConfig::new("part/category/"));
    controller.load();
    let snapshot = controller.settled().await;

    assert_eq!(snapshot.status, TableStatus::Failed);
    let error = snapshot.error.unwrap();
    assert_eq!(error.kind(), FetchErrorKind::NetworkError);
    assert_eq!(error.status_code(), None);
    assert!(snapshot.page.is_none());
}

#[tokio::test]
async fn test_download_url_drops_pagination() {
    let (addr, seen) = start_server().await;
    let controller = TableController::new(
        client(addr),
        TableConfig::new("part/category/").with_id_field("pk"),
    );

    controller.set_filter("cascade", true);
    controller.set_search("cap");
    controller.set_page(2);
    controller.settled().await;

    let url = controller.download_url("csv").unwrap();
    assert_eq!(
        url.as_str(),
        format!(
            "http://{}/api/part/category/?cascade=true&search=cap&format=csv",
            addr
        )
    );
    assert!(seen.lock().unwrap().iter().all(|(uri, _)| !uri.contains("format=")));
}
