// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Physical pin assignments.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A physical pin assignment.
///
/// Pins carry no polymorphic behavior, so they are never registered with a
/// discriminator: whatever shape is stored, decoding always yields this one
/// concrete type. Accepted shapes are a bare pin number (`17`) or an object
/// with `number` (alias `address`) and an optional `name`; a `type` key or
/// any other extra field is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "PinShape")]
pub struct Pin {
    /// Header/GPIO number.
    pub number: u32,
    /// Optional board label (e.g. `GPIO_17`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Pin {
    /// Unlabeled pin.
    pub const fn new(number: u32) -> Self {
        Self { number, name: None }
    }

    /// Labeled pin.
    pub fn named(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: Some(name.into()),
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} (pin {})", self.number),
            None => write!(f, "pin {}", self.number),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PinShape {
    Number(u32),
    Fields {
        #[serde(alias = "address")]
        number: u32,
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<PinShape> for Pin {
    fn from(shape: PinShape) -> Self {
        match shape {
            PinShape::Number(number) => Self::new(number),
            PinShape::Fields { number, name } => Self { number, name },
        }
    }
}
