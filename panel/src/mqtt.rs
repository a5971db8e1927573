use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, Incoming, MqttOptions, QoS};
use tracing::{info, warn};

use acremote_common::{
    NetworkConfig, SyncUpdate, TOPIC_AC_STATE, TOPIC_CMD_POWER, TOPIC_CMD_TEMPERATURE,
    TOPIC_CMD_TIMER,
};

use crate::app::AppState;

const MAX_COMMAND_PAYLOAD_BYTES: usize = 64;

pub fn client(network: &NetworkConfig) -> (AsyncClient, EventLoop) {
    let mut options = MqttOptions::new(
        "acremote-panel",
        network.mqtt_host.clone(),
        network.mqtt_port,
    );
    if !network.mqtt_user.is_empty() {
        options.set_credentials(network.mqtt_user.clone(), network.mqtt_pass.clone());
    }
    AsyncClient::new(options, 32)
}

pub async fn subscribe_commands(mqtt: &AsyncClient) -> anyhow::Result<()> {
    let topics = [TOPIC_CMD_POWER, TOPIC_CMD_TEMPERATURE, TOPIC_CMD_TIMER];

    for topic in topics {
        mqtt.subscribe(topic, QoS::AtMostOnce).await?;
    }
    Ok(())
}

pub fn spawn_event_loop(state: AppState, mut eventloop: EventLoop) {
    tokio::spawn(async move {
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Incoming::Publish(message))) => {
                    handle_publish(&state, message.topic, message.payload.to_vec()).await;
                }
                Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                    info!("mqtt connected");
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("mqtt poll error: {err}");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    });
}

async fn handle_publish(state: &AppState, topic: String, payload: Vec<u8>) {
    if payload.len() > MAX_COMMAND_PAYLOAD_BYTES {
        warn!(
            "dropping oversized command payload on topic {} ({} bytes)",
            topic,
            payload.len()
        );
        return;
    }

    let Ok(payload) = String::from_utf8(payload) else {
        warn!("dropping non utf8 command payload on topic {topic}");
        return;
    };

    state.handle_command(&topic, &payload).await;
}

/// Best-effort push of a partial-state update to the remote endpoint. A
/// failure is logged and discarded; the local transition that produced the
/// update is never rolled back.
pub async fn publish_update(mqtt: &AsyncClient, update: &SyncUpdate) {
    let payload = match serde_json::to_vec(update) {
        Ok(payload) => payload,
        Err(err) => {
            warn!("sync payload serialization failed: {err}");
            return;
        }
    };

    if let Err(err) = mqtt
        .publish(TOPIC_AC_STATE, QoS::AtLeastOnce, false, payload)
        .await
    {
        warn!("sync publish failed: {err}");
    }
}
