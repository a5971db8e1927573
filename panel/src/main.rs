mod app;
mod mqtt;
mod routes;

use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use acremote_common::{NetworkConfig, PanelConfig};

use crate::app::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = PanelConfig::default();
    config.sanitize();
    let network = network_from_env();

    let (client, eventloop) = mqtt::client(&network);
    mqtt::subscribe_commands(&client).await?;

    let state = AppState::new(config, client);
    mqtt::spawn_event_loop(state.clone(), eventloop);

    let app = routes::router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", network.http_port)
        .parse()
        .context("invalid panel listen address")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind panel server at {addr}"))?;

    info!("panel listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn network_from_env() -> NetworkConfig {
    let mut network = NetworkConfig::default();
    if let Ok(host) = std::env::var("MQTT_HOST") {
        network.mqtt_host = host;
    }
    if let Some(port) = std::env::var("MQTT_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
    {
        network.mqtt_port = port;
    }
    if let Ok(user) = std::env::var("MQTT_USER") {
        network.mqtt_user = user;
    }
    if let Ok(pass) = std::env::var("MQTT_PASS") {
        network.mqtt_pass = pass;
    }
    if let Some(port) = std::env::var("PANEL_HTTP_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
    {
        network.http_port = port;
    }
    network
}
