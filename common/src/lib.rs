pub mod config;
pub mod panel;
pub mod power;
pub mod temperature;
pub mod timer;
pub mod topics;
pub mod types;

pub use config::{
    NetworkConfig, Palette, PanelConfig, TemperatureConfig, TemperatureLimits, WindowSize,
};
pub use panel::PanelEngine;
pub use power::PowerState;
pub use temperature::TemperatureState;
pub use timer::{ArmError, ShutoffTimer, TickOutcome, MAX_TIMER_MINUTES, MIN_TIMER_MINUTES};
pub use topics::*;
pub use types::{PanelEffect, PanelSnapshot, SyncUpdate, TimerPhase};
