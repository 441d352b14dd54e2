#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Once};
use std::time::{Duration, SystemTime};

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use writer_core::Clock;
use writer_engine::{Credentials, WeChatClient, WeChatSettings};

pub const APP_ID: &str = "wx-app-id";
pub const APP_SECRET: &str = "wx-secret";
pub const TOKEN: &str = "ACCESS_TOKEN";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(writer_logging::initialize_for_tests);
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl ManualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
        })
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}

pub fn client_for(server: &MockServer, clock: Arc<ManualClock>) -> WeChatClient {
    let settings = WeChatSettings {
        base_url: server.uri(),
        status_delay: Duration::ZERO,
        ..WeChatSettings::default()
    };
    let credentials =
        Credentials::new(Some(APP_ID.to_string()), Some(APP_SECRET.to_string())).unwrap();
    WeChatClient::with_clock(credentials, settings, clock).unwrap()
}

pub async fn mount_token(server: &MockServer, expected_calls: u64) {
    mount_token_response(
        server,
        json!({"access_token": TOKEN, "expires_in": 7200}),
        expected_calls,
    )
    .await;
}

pub async fn mount_token_response(server: &MockServer, body: Value, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/cgi-bin/token"))
        .and(query_param("grant_type", "client_credential"))
        .and(query_param("appid", APP_ID))
        .and(query_param("secret", APP_SECRET))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_post(server: &MockServer, endpoint: &str, body: Value, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}
