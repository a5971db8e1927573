use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemperatureLimits {
    pub min: i32,
    pub max: i32,
}

impl Default for TemperatureLimits {
    fn default() -> Self {
        Self { min: 16, max: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureConfig {
    pub initial: i32,
    /// `None` disables clamping entirely (the unbounded policy).
    pub limits: Option<TemperatureLimits>,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            initial: 16,
            limits: Some(TemperatureLimits::default()),
        }
    }
}

impl TemperatureConfig {
    pub fn sanitize(&mut self) {
        if let Some(limits) = &mut self.limits {
            if limits.min > limits.max {
                std::mem::swap(&mut limits.min, &mut limits.max);
            }
            self.initial = self.initial.clamp(limits.min, limits.max);
        }
    }
}

/// Label colors keyed off the power flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palette {
    pub on_color: String,
    pub off_color: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            on_color: "#00c853".to_string(),
            off_color: "#d50000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 300,
            height: 550,
        }
    }
}

impl WindowSize {
    pub fn sanitize(&mut self) {
        self.width = self.width.clamp(240, 3840);
        self.height = self.height.clamp(320, 3840);
    }
}

/// Everything the composition root needs at construction. There is no
/// process-wide mutable configuration anywhere in the crate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelConfig {
    pub temperature: TemperatureConfig,
    pub palette: Palette,
    pub window: WindowSize,
}

impl PanelConfig {
    pub fn sanitize(&mut self) {
        self.temperature.sanitize();
        self.window.sanitize();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_user: String,
    pub mqtt_pass: String,
    pub http_port: u16,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            mqtt_host: "127.0.0.1".to_string(),
            mqtt_port: 1883,
            mqtt_user: String::new(),
            mqtt_pass: String::new(),
            http_port: 8080,
        }
    }
}
