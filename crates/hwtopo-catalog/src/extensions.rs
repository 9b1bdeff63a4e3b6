// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! HAT-style extension boards.

use hwtopo_core::{ExtensionHardware, HardwareType, Pin};
use serde::{Deserialize, Serialize};

/// Blank prototyping HAT; whatever is wired onto it hangs off its buses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProtoHat {
    /// Free-form label written on the silkscreen.
    #[serde(default)]
    pub label: String,
}

impl ProtoHat {
    /// HAT with the given label.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl HardwareType for ProtoHat {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::ProtoHat");
}
impl ExtensionHardware for ProtoHat {}

/// Relay HAT driven directly from GPIO.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RelayHat {
    /// One control pin per relay, in channel order.
    pub channels: Vec<Pin>,
}

impl HardwareType for RelayHat {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::RelayHat");
}
impl ExtensionHardware for RelayHat {}
