#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Oaep, RsaPrivateKey};
use serde_json::{Value, json};
use sha2::Sha256;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use switch_cms_client::domain::ports::SecureChannel;
use switch_cms_client::error::Result;
use tokio::sync::Mutex;

pub const DETAILS_PATH: &str = "/api/v1/customer/details";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Decrypts switch-bound ciphertext with the test-only private key.
pub fn decrypt(ciphertext: &str) -> String {
    let pem = std::fs::read_to_string(fixture("switch_private_key.pem")).unwrap();
    let private_key = RsaPrivateKey::from_pkcs8_pem(&pem).unwrap();
    let bytes = STANDARD.decode(ciphertext).unwrap();
    String::from_utf8(private_key.decrypt(Oaep::new::<Sha256>(), &bytes).unwrap()).unwrap()
}

pub fn contact_reply(flag: &str, mobile: &str, email: &str) -> Value {
    json!({ "apiRespFlag": flag, "mobileNumber": mobile, "emailId": email })
}

/// In-process stand-in for the switch: echoes the request trace id into a
/// fixed reply and records every request body it receives.
pub struct FakeSwitch {
    reply: Value,
    pub received: Mutex<Vec<Value>>,
}

impl FakeSwitch {
    pub fn new(reply: Value) -> Self {
        Self {
            reply,
            received: Mutex::new(Vec::new()),
        }
    }

    pub async fn calls(&self) -> usize {
        self.received.lock().await.len()
    }
}

#[async_trait]
impl SecureChannel for FakeSwitch {
    async fn post(&self, _url: &str, body: String) -> Result<String> {
        let request: Value = serde_json::from_str(&body).unwrap();
        let mut reply = self.reply.clone();
        reply["traceId"] = request["traceId"].clone();
        self.received.lock().await.push(request);
        Ok(reply.to_string())
    }
}

/// Router answering like the switch, with the request's trace id echoed back.
pub fn switch_router(reply: Value) -> Router {
    Router::new().route(
        DETAILS_PATH,
        post(move |axum::Json(request): axum::Json<Value>| {
            let mut reply = reply.clone();
            async move {
                reply["traceId"] = request["traceId"].clone();
                axum::Json(reply)
            }
        }),
    )
}

pub fn status_router(status: StatusCode) -> Router {
    Router::new().route(DETAILS_PATH, post(move || async move { status.into_response() }))
}

pub fn slow_router(delay: Duration) -> Router {
    Router::new().route(
        DETAILS_PATH,
        post(move || async move {
            tokio::time::sleep(delay).await;
            StatusCode::OK.into_response()
        }),
    )
}

/// Replies 200 with a JSON body of roughly `size` bytes.
pub fn oversized_router(size: usize) -> Router {
    Router::new().route(
        DETAILS_PATH,
        post(move || async move {
            let padding = "9".repeat(size);
            axum::Json(json!({ "traceId": "abc123", "apiRespFlag": "SUCCESS", "pad": padding }))
        }),
    )
}

/// Serves `router` over TLS with a certificate for `localhost` issued by the
/// fixture CA `local-ca.pem`.
pub async fn spawn_tls_switch(router: Router) -> SocketAddr {
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = RustlsConfig::from_pem_file(fixture("server.pem"), fixture("server-key.pem"))
        .await
        .unwrap();
    let handle = Handle::new();
    let server = axum_server::bind_rustls("127.0.0.1:0".parse().unwrap(), config)
        .handle(handle.clone());
    tokio::spawn(async move {
        server.serve(router.into_make_service()).await.unwrap();
    });

    handle.listening().await.unwrap()
}

pub fn endpoint(addr: SocketAddr) -> String {
    format!("https://localhost:{}{DETAILS_PATH}", addr.port())
}
