// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Root boards.

use hwtopo_core::{BoardHardware, HardwareType, Pin};
use serde::{Deserialize, Serialize};

/// Raspberry Pi 3 Model B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pi3ModelB {
    /// Board revision code, e.g. `a02082`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    /// Activity LED.
    pub status_led: Pin,
}

impl Default for Pi3ModelB {
    fn default() -> Self {
        Self {
            revision: None,
            status_led: Pin::named(47, "ACT"),
        }
    }
}

impl HardwareType for Pi3ModelB {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Pi3ModelB");
}
impl BoardHardware for Pi3ModelB {}

/// Raspberry Pi 4 Model B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pi4ModelB {
    /// Installed RAM in MiB (1024, 2048, 4096 or 8192).
    pub memory_mb: u32,
    /// Activity LED.
    pub status_led: Pin,
}

impl Default for Pi4ModelB {
    fn default() -> Self {
        Self {
            memory_mb: 4096,
            status_led: Pin::named(42, "ACT"),
        }
    }
}

impl HardwareType for Pi4ModelB {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Pi4ModelB");
}
impl BoardHardware for Pi4ModelB {}
