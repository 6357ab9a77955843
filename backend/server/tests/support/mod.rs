#![allow(dead_code)]

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    routing::post,
};
use reqwest::Url;
use serde_json::Value;
use server::{
    forward::{Destination, build_client},
    handler::SubmissionHandler,
};
use tokio::net::TcpListener;

/// One request as the fake spreadsheet saw it.
#[derive(Debug, Clone)]
pub struct Received {
    pub content_type: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
pub struct FakeSheet {
    pub url: Url,
    received: Arc<Mutex<Vec<Received>>>,
}

impl FakeSheet {
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn handler(&self) -> SubmissionHandler {
        handler_for(Destination::Endpoint(self.url.clone()), Duration::from_secs(5))
    }
}

#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    received: Arc<Mutex<Vec<Received>>>,
}

async fn sheet_endpoint(
    State(reply): State<Reply>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
    reply.received.lock().unwrap().push(Received {
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    tokio::time::sleep(reply.delay).await;

    (reply.status, reply.body)
}

pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Spreadsheet stand-in answering every POST to `/exec` the same way.
pub async fn fake_sheet(status: StatusCode, body: &'static str) -> FakeSheet {
    slow_sheet(status, body, Duration::ZERO).await
}

pub async fn slow_sheet(status: StatusCode, body: &'static str, delay: Duration) -> FakeSheet {
    let received = Arc::new(Mutex::new(Vec::new()));
    let reply = Reply {
        status,
        body,
        delay,
        received: received.clone(),
    };

    let app = Router::new()
        .route("/exec", post(sheet_endpoint))
        .with_state(reply);
    let address = serve(app).await;

    FakeSheet {
        url: Url::parse(&format!("http://{address}/exec")).unwrap(),
        received,
    }
}

/// An address nothing listens on.
pub fn closed_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    Url::parse(&format!("http://{address}/exec")).unwrap()
}

pub fn handler_for(destination: Destination, timeout: Duration) -> SubmissionHandler {
    SubmissionHandler::new(destination, build_client(timeout).unwrap())
}
