//! The config surface: a `serde`-deserializable description of the
//! executor's own scalar settings. Not a model description language, models
//! are always registered programmatically by the host.

use serde::{Deserialize, Serialize};

use crate::time::Time;

/// Virtual time advances purely by `time_step` per tick; real time paces
/// each tick to wall-clock seconds equal to `time_step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimMode {
    VirtualTime,
    RealTime,
}

impl Default for SimMode {
    fn default() -> Self {
        SimMode::VirtualTime
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorConfig {
    #[serde(default = "default_time_step")]
    pub time_step: Time,
    #[serde(default)]
    pub sim_mode: SimMode,
    #[serde(default)]
    pub input_ports: Vec<String>,
}

fn default_time_step() -> Time {
    1.0
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            time_step: default_time_step(),
            sim_mode: SimMode::default(),
            input_ports: Vec::new(),
        }
    }
}

impl ExecutorConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
