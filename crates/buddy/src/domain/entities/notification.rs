//! VitalsNotification - Low-vitals alerts raised by the engine

use serde::{Deserialize, Serialize};

/// Which vital crossed its threshold
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    LowHp,
    LowEnergy,
}

/// Alert meant for the buddy's owner
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VitalsNotification {
    pub kind: NotificationKind,
    pub message: String,
}

impl VitalsNotification {
    pub fn low_hp(buddy_name: &str) -> Self {
        Self {
            kind: NotificationKind::LowHp,
            message: format!("{}'s HP is getting low. Time for some food!", buddy_name),
        }
    }

    pub fn low_energy(buddy_name: &str) -> Self {
        Self {
            kind: NotificationKind::LowEnergy,
            message: format!(
                "{}'s energy is low. They should get some sleep!",
                buddy_name
            ),
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::LowHp => write!(f, "low-hp"),
            NotificationKind::LowEnergy => write!(f, "low-energy"),
        }
    }
}
