use crate::{
    config::PanelConfig,
    power::PowerState,
    temperature::TemperatureState,
    timer::{format_mmss, ArmError, ShutoffTimer, TickOutcome},
    types::{PanelEffect, PanelSnapshot, SyncUpdate},
};

pub const TIMER_IDLE_LABEL: &str = "Time: --:--";
pub const TIMER_EXPIRED_LABEL: &str = "AC turned OFF";

/// Composition root for the three state holders. Every operation is a
/// synchronous transition that re-renders the derived labels and returns the
/// effects the runtime must carry out. The timer label is sticky: rejection
/// and expiry messages stay visible until the next timer transition.
#[derive(Debug, Clone)]
pub struct PanelEngine {
    config: PanelConfig,
    power: PowerState,
    temperature: TemperatureState,
    timer: ShutoffTimer,
    timer_label: String,
}

impl PanelEngine {
    pub fn new(mut config: PanelConfig) -> Self {
        config.sanitize();
        let temperature = TemperatureState::new(&config.temperature);
        Self {
            config,
            power: PowerState::new(),
            temperature,
            timer: ShutoffTimer::new(),
            timer_label: TIMER_IDLE_LABEL.to_string(),
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn power_on(&self) -> bool {
        self.power.is_on()
    }

    pub fn temperature(&self) -> i32 {
        self.temperature.value()
    }

    pub fn timer(&self) -> &ShutoffTimer {
        &self.timer
    }

    pub fn timer_label(&self) -> &str {
        &self.timer_label
    }

    pub fn toggle_power(&mut self) -> Vec<PanelEffect> {
        let on = self.power.toggle();
        vec![PanelEffect::Publish(SyncUpdate::on_off(on))]
    }

    pub fn increase_temp(&mut self) -> Vec<PanelEffect> {
        if self.temperature.increase() {
            vec![PanelEffect::Publish(SyncUpdate::temperature(
                self.temperature.value(),
            ))]
        } else {
            Vec::new()
        }
    }

    pub fn decrease_temp(&mut self) -> Vec<PanelEffect> {
        if self.temperature.decrease() {
            vec![PanelEffect::Publish(SyncUpdate::temperature(
                self.temperature.value(),
            ))]
        } else {
            Vec::new()
        }
    }

    /// Arms the shut-off timer from raw user input. A rejection renders its
    /// message into the timer label and changes no other state; a success
    /// replaces any running countdown and asks the runtime to restart the
    /// tick task.
    pub fn arm_timer(&mut self, input: &str) -> Result<Vec<PanelEffect>, ArmError> {
        match self.timer.arm(input, self.power.is_on()) {
            Ok(minutes) => {
                let time_str = format_mmss(minutes * 60);
                self.timer_label = format!("Time: {time_str}");
                Ok(vec![
                    PanelEffect::RestartCountdown,
                    PanelEffect::Publish(SyncUpdate::timer(time_str)),
                ])
            }
            Err(err) => {
                self.timer_label = err.to_string();
                Err(err)
            }
        }
    }

    /// One countdown tick. Stray ticks while idle produce no effects; the
    /// expiry transition forces power off and halts the tick task.
    pub fn tick(&mut self) -> Vec<PanelEffect> {
        match self.timer.tick() {
            TickOutcome::Idle => Vec::new(),
            TickOutcome::Running { remaining_seconds } => {
                let time_str = format_mmss(remaining_seconds);
                self.timer_label = format!("Time: {time_str}");
                vec![PanelEffect::Publish(SyncUpdate::timer(time_str))]
            }
            TickOutcome::Expired => {
                self.power.force_off();
                self.timer_label = TIMER_EXPIRED_LABEL.to_string();
                vec![
                    PanelEffect::Publish(SyncUpdate::on_off(false)),
                    PanelEffect::HaltCountdown,
                ]
            }
        }
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        let palette = &self.config.palette;
        PanelSnapshot {
            power_on: self.power.is_on(),
            power_label: self.power.label(),
            power_color: if self.power.is_on() {
                palette.on_color.clone()
            } else {
                palette.off_color.clone()
            },
            temperature: self.temperature.value(),
            temperature_label: self.temperature.label(),
            timer_phase: self.timer.phase().as_str(),
            timer_label: self.timer_label.clone(),
            timer_remaining_seconds: self.timer.remaining_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::config::TemperatureConfig;

    use super::*;

    fn engine() -> PanelEngine {
        PanelEngine::new(PanelConfig::default())
    }

    fn powered_engine() -> PanelEngine {
        let mut engine = engine();
        engine.toggle_power();
        engine
    }

    #[test]
    fn toggle_power_syncs_new_flag() {
        let mut engine = engine();

        let effects = engine.toggle_power();
        assert!(engine.power_on());
        assert_eq!(effects, vec![PanelEffect::Publish(SyncUpdate::on_off(true))]);

        let effects = engine.toggle_power();
        assert!(!engine.power_on());
        assert_eq!(
            effects,
            vec![PanelEffect::Publish(SyncUpdate::on_off(false))]
        );
    }

    #[test]
    fn temperature_steps_sync_only_real_transitions() {
        let mut engine = engine();

        let effects = engine.increase_temp();
        assert_eq!(
            effects,
            vec![PanelEffect::Publish(SyncUpdate::temperature(17))]
        );

        // Already at the lower bound after stepping back down.
        engine.decrease_temp();
        let effects = engine.decrease_temp();
        assert!(effects.is_empty());
        assert_eq!(engine.temperature(), 16);
    }

    #[test]
    fn temperature_labels_are_independent_of_power() {
        let mut engine = engine();
        assert!(!engine.power_on());

        engine.increase_temp();
        assert_eq!(engine.snapshot().temperature_label, "17°C");
        engine.increase_temp();
        assert_eq!(engine.snapshot().temperature_label, "18°C");
        engine.increase_temp();
        assert_eq!(engine.snapshot().temperature_label, "19°C");
    }

    #[test]
    fn repeated_increase_clamps_at_thirty() {
        let mut engine = engine();
        for _ in 0..20 {
            engine.increase_temp();
        }

        assert_eq!(engine.temperature(), 30);
        assert!(engine.increase_temp().is_empty());
    }

    #[test]
    fn unbounded_policy_steps_past_the_default_bound() {
        let mut engine = PanelEngine::new(PanelConfig {
            temperature: TemperatureConfig {
                initial: 30,
                limits: None,
            },
            ..PanelConfig::default()
        });

        let effects = engine.increase_temp();
        assert_eq!(
            effects,
            vec![PanelEffect::Publish(SyncUpdate::temperature(31))]
        );
    }

    #[test]
    fn arm_while_off_renders_rejection_and_starts_nothing() {
        let mut engine = engine();

        let result = engine.arm_timer("5");
        assert_eq!(result, Err(ArmError::PowerOff));
        assert_eq!(engine.timer_label(), "AC is OFF - Can't set timer!");
        assert!(!engine.timer().is_running());
    }

    #[test]
    fn arm_with_garbage_input_renders_invalid_message() {
        let mut engine = powered_engine();

        let result = engine.arm_timer("abc");
        assert_eq!(result, Err(ArmError::Invalid));
        assert_eq!(engine.timer_label(), "Invalid time!");
        assert_eq!(engine.snapshot().timer_phase, "IDLE");
    }

    #[test]
    fn arm_out_of_range_then_valid_minutes() {
        let mut engine = powered_engine();

        assert_eq!(engine.arm_timer("61"), Err(ArmError::OutOfRange));
        assert_eq!(engine.timer_label(), "Enter 1 to 60 minutes only!");
        assert!(!engine.timer().is_running());

        let effects = engine.arm_timer("5").unwrap();
        assert_eq!(
            effects,
            vec![
                PanelEffect::RestartCountdown,
                PanelEffect::Publish(SyncUpdate::timer("05:00")),
            ]
        );
        assert_eq!(engine.timer().remaining_seconds(), Some(300));
        assert_eq!(engine.timer_label(), "Time: 05:00");
    }

    #[test]
    fn tick_decrements_and_syncs_the_new_time() {
        let mut engine = powered_engine();
        engine.arm_timer("5").unwrap();

        let effects = engine.tick();
        assert_eq!(
            effects,
            vec![PanelEffect::Publish(SyncUpdate::timer("04:59"))]
        );
        assert_eq!(engine.timer().remaining_seconds(), Some(299));
        assert_eq!(engine.timer_label(), "Time: 04:59");
    }

    #[test]
    fn rearm_counts_down_from_the_new_duration() {
        let mut engine = powered_engine();
        engine.arm_timer("3").unwrap();
        engine.tick();

        engine.arm_timer("2").unwrap();
        let effects = engine.tick();
        assert_eq!(
            effects,
            vec![PanelEffect::Publish(SyncUpdate::timer("01:59"))]
        );
        assert_eq!(engine.timer().remaining_seconds(), Some(119));
    }

    #[test]
    fn expiry_forces_power_off_exactly_once() {
        let mut engine = powered_engine();
        engine.arm_timer("1").unwrap();

        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.timer_label(), "Time: 00:00");
        assert!(engine.power_on());

        let effects = engine.tick();
        assert_eq!(
            effects,
            vec![
                PanelEffect::Publish(SyncUpdate::on_off(false)),
                PanelEffect::HaltCountdown,
            ]
        );
        assert!(!engine.power_on());
        assert_eq!(engine.timer_label(), "AC turned OFF");
        assert_eq!(engine.snapshot().timer_phase, "IDLE");

        // A stray tick after expiry must not re-fire.
        assert!(engine.tick().is_empty());
        assert_eq!(engine.timer_label(), "AC turned OFF");
    }

    #[test]
    fn panel_recovers_after_expiry() {
        let mut engine = powered_engine();
        engine.arm_timer("1").unwrap();
        for _ in 0..61 {
            engine.tick();
        }
        assert!(!engine.power_on());

        engine.toggle_power();
        let effects = engine.arm_timer("2").unwrap();
        assert!(effects.contains(&PanelEffect::RestartCountdown));
        assert_eq!(engine.timer().remaining_seconds(), Some(120));
    }

    #[test]
    fn snapshot_color_follows_the_power_flag() {
        let mut engine = engine();
        let palette = engine.config().palette.clone();

        assert_eq!(engine.snapshot().power_color, palette.off_color);
        engine.toggle_power();
        assert_eq!(engine.snapshot().power_color, palette.on_color);
    }

    #[test]
    fn snapshot_starts_with_idle_placeholders() {
        let snapshot = engine().snapshot();

        assert_eq!(snapshot.power_label, "AC is OFF");
        assert_eq!(snapshot.temperature_label, "16°C");
        assert_eq!(snapshot.timer_label, "Time: --:--");
        assert_eq!(snapshot.timer_remaining_seconds, None);
    }
}
