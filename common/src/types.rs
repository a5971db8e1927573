use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimerPhase {
    Idle,
    Running,
}

impl TimerPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
        }
    }
}

/// Partial-state payload pushed to the remote endpoint. Fields left at `None`
/// are omitted from the JSON entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_off: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<String>,
}

impl SyncUpdate {
    pub fn on_off(on: bool) -> Self {
        Self {
            on_off: Some(if on { 1 } else { 0 }),
            temperature: None,
            timer: None,
        }
    }

    pub fn temperature(value: i32) -> Self {
        Self {
            on_off: None,
            temperature: Some(value),
            timer: None,
        }
    }

    pub fn timer(time: impl Into<String>) -> Self {
        Self {
            on_off: None,
            temperature: None,
            timer: Some(time.into()),
        }
    }
}

/// What the runtime must do after a transition. The engine never performs I/O
/// itself; it hands these back to whoever drove the transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEffect {
    /// Push a partial-state update to the remote endpoint, best effort.
    Publish(SyncUpdate),
    /// A countdown was armed; cancel any running countdown task before
    /// starting the replacement.
    RestartCountdown,
    /// The countdown expired; the running countdown task must stop.
    HaltCountdown,
}

/// The rendered panel: every label the UI shows, derived from current state.
#[derive(Debug, Clone, Serialize)]
pub struct PanelSnapshot {
    #[serde(rename = "powerOn")]
    pub power_on: bool,
    #[serde(rename = "powerLabel")]
    pub power_label: &'static str,
    #[serde(rename = "powerColor")]
    pub power_color: String,
    pub temperature: i32,
    #[serde(rename = "temperatureLabel")]
    pub temperature_label: String,
    #[serde(rename = "timerPhase")]
    pub timer_phase: &'static str,
    #[serde(rename = "timerLabel")]
    pub timer_label: String,
    #[serde(rename = "timerRemainingSeconds")]
    pub timer_remaining_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sync_update_omits_absent_fields() {
        let update = SyncUpdate::temperature(21);

        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"temperature":21}"#
        );
    }

    #[test]
    fn sync_update_encodes_power_flag_as_one_or_zero() {
        assert_eq!(
            serde_json::to_string(&SyncUpdate::on_off(true)).unwrap(),
            r#"{"on_off":1}"#
        );
        assert_eq!(
            serde_json::to_string(&SyncUpdate::on_off(false)).unwrap(),
            r#"{"on_off":0}"#
        );
    }

    #[test]
    fn sync_update_carries_timer_string() {
        assert_eq!(
            serde_json::to_string(&SyncUpdate::timer("05:00")).unwrap(),
            r#"{"timer":"05:00"}"#
        );
    }
}
