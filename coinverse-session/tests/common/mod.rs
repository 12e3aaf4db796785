#![allow(dead_code)]

use axum::Router;
use coinverse_session::{Services, Settings};

/// Serve `app` on a random local port and return its base address.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// A port nothing is listening on.
pub async fn closed_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn services(server_url: &str) -> Services {
    let settings = Settings {
        server_url: server_url.to_string(),
        connect_timeout_secs: 2,
        read_timeout_secs: 2,
        settle_delay_ms: 0,
        ..Settings::default()
    };
    Services::in_memory(settings).unwrap()
}
