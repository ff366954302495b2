//! SleepPhase - Whether the buddy is awake or asleep

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SleepPhase {
    #[default]
    Awake,
    Asleep,
}

impl std::fmt::Display for SleepPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SleepPhase::Awake => write!(f, "awake"),
            SleepPhase::Asleep => write!(f, "asleep"),
        }
    }
}

impl std::str::FromStr for SleepPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "awake" => Ok(SleepPhase::Awake),
            "asleep" => Ok(SleepPhase::Asleep),
            _ => Err(format!("Unknown sleep phase: {}", s)),
        }
    }
}
