use std::{sync::Arc, time::Duration};

use rumqttc::AsyncClient;
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::info;

use acremote_common::{
    PanelConfig, PanelEffect, PanelEngine, PanelSnapshot, TOPIC_CMD_POWER, TOPIC_CMD_TEMPERATURE,
    TOPIC_CMD_TIMER,
};

use crate::mqtt;

/// Shared runtime state: the engine behind one lock, the MQTT client, and the
/// handle of the countdown task currently driving `tick()`.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<PanelEngine>>,
    countdown: Arc<Mutex<Option<JoinHandle<()>>>>,
    mqtt: AsyncClient,
}

impl AppState {
    pub fn new(config: PanelConfig, mqtt: AsyncClient) -> Self {
        Self {
            engine: Arc::new(Mutex::new(PanelEngine::new(config))),
            countdown: Arc::new(Mutex::new(None)),
            mqtt,
        }
    }

    pub async fn snapshot(&self) -> PanelSnapshot {
        self.engine.lock().await.snapshot()
    }

    pub async fn toggle_power(&self) -> PanelSnapshot {
        let (effects, snapshot) = {
            let mut engine = self.engine.lock().await;
            (engine.toggle_power(), engine.snapshot())
        };
        self.apply(effects).await;
        snapshot
    }

    pub async fn increase_temp(&self) -> PanelSnapshot {
        let (effects, snapshot) = {
            let mut engine = self.engine.lock().await;
            (engine.increase_temp(), engine.snapshot())
        };
        self.apply(effects).await;
        snapshot
    }

    pub async fn decrease_temp(&self) -> PanelSnapshot {
        let (effects, snapshot) = {
            let mut engine = self.engine.lock().await;
            (engine.decrease_temp(), engine.snapshot())
        };
        self.apply(effects).await;
        snapshot
    }

    /// Arms the shut-off timer. Rejections already rendered their message
    /// into the timer label, so the caller gets a fresh snapshot either way.
    pub async fn arm_timer(&self, input: &str) -> PanelSnapshot {
        let (effects, snapshot) = {
            let mut engine = self.engine.lock().await;
            let effects = match engine.arm_timer(input) {
                Ok(effects) => effects,
                Err(err) => {
                    info!("timer arm rejected: {err}");
                    Vec::new()
                }
            };
            (effects, engine.snapshot())
        };
        self.apply(effects).await;
        snapshot
    }

    /// Dispatches an inbound command to the same operations the HTTP surface
    /// uses. Unknown topics and payloads are ignored.
    pub async fn handle_command(&self, topic: &str, payload: &str) {
        match topic {
            TOPIC_CMD_POWER => {
                if payload.trim().eq_ignore_ascii_case("toggle") {
                    self.toggle_power().await;
                }
            }
            TOPIC_CMD_TEMPERATURE => match payload.trim().to_ascii_lowercase().as_str() {
                "up" => {
                    self.increase_temp().await;
                }
                "down" => {
                    self.decrease_temp().await;
                }
                _ => {}
            },
            TOPIC_CMD_TIMER => {
                self.arm_timer(payload).await;
            }
            _ => {}
        }
    }

    /// Interprets engine effects. `HaltCountdown` only ever comes out of a
    /// tick and is handled inside the countdown task itself.
    async fn apply(&self, effects: Vec<PanelEffect>) {
        for effect in effects {
            match effect {
                PanelEffect::Publish(update) => mqtt::publish_update(&self.mqtt, &update).await,
                PanelEffect::RestartCountdown => self.restart_countdown().await,
                PanelEffect::HaltCountdown => {}
            }
        }
    }

    /// Aborts the running countdown task, if any, then starts the
    /// replacement. The abort comes first so two decrement streams can never
    /// race against the same counter.
    async fn restart_countdown(&self) {
        let mut slot = self.countdown.lock().await;
        if let Some(handle) = slot.take() {
            handle.abort();
        }

        let state = self.clone();
        *slot = Some(tokio::spawn(async move {
            state.run_countdown().await;
        }));
    }

    async fn run_countdown(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // The first interval tick completes immediately; the first countdown
        // tick is due a full second after arming.
        interval.tick().await;

        loop {
            interval.tick().await;

            let effects = { self.engine.lock().await.tick() };
            let halt = effects
                .iter()
                .any(|effect| matches!(effect, PanelEffect::HaltCountdown));

            for effect in effects {
                if let PanelEffect::Publish(update) = effect {
                    mqtt::publish_update(&self.mqtt, &update).await;
                }
            }

            if halt {
                info!("shut-off timer expired, AC powered off");
                break;
            }
        }
    }
}
