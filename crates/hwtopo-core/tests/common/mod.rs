// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(dead_code)]

use hwtopo_core::{
    configure, Board, BoardHardware, BusComponent, BusDevice, Capability, Codec, Extension,
    ExtensionHardware, HardwareType, I2c, Implementation, Pin, Spi, Uart,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// TEST HARDWARE
// =============================================================================

/// Root board with a couple of properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pi {
    pub model: String,
    #[serde(default)]
    pub status_led: Option<Pin>,
}

impl HardwareType for Pi {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Pi");
}
impl BoardHardware for Pi {}

/// Extension that also declares a field literally named `parent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hat {
    pub label: String,
    #[serde(default)]
    pub parent: Option<String>,
}

impl HardwareType for Hat {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Hat");
}
impl ExtensionHardware for Hat {}

/// Strict I2C sensor: unknown fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sensor {
    pub address: u8,
    pub interrupt: Pin,
}

impl HardwareType for Sensor {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Sensor");
}
impl BusDevice<I2c> for Sensor {}

/// Bridge chip reachable over I2C or SPI; hosts further buses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    pub channels: u8,
}

impl HardwareType for Bridge {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Bridge");
}
impl BusDevice<I2c> for Bridge {}
impl BusDevice<Spi> for Bridge {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modem {
    pub baud: u32,
}

impl HardwareType for Modem {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Modem");
}
impl BusDevice<Uart> for Modem {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adc {
    pub chip_select: Pin,
}

impl HardwareType for Adc {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Adc");
}
impl BusDevice<Spi> for Adc {}

/// I2C device that is never handed to the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unlisted {}

impl HardwareType for Unlisted {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Unlisted");
}
impl BusDevice<I2c> for Unlisted {}

/// Generic node usable under every capability (property tests).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Probe {
    pub id: u8,
}

impl HardwareType for Probe {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Probe");
}
impl BoardHardware for Probe {}
impl ExtensionHardware for Probe {}
impl BusDevice<I2c> for Probe {}
impl BusDevice<Uart> for Probe {}
impl BusDevice<Spi> for Probe {}

// =============================================================================
// DISCOVERY + CODEC
// =============================================================================

/// Discovery snapshot covering every test type except [`Unlisted`].
pub fn enumerator(capability: Capability) -> Vec<Implementation> {
    match capability {
        Capability::Board => vec![Implementation::board::<Pi>(), Implementation::board::<Probe>()],
        Capability::Extension => vec![
            Implementation::extension::<Hat>(),
            Implementation::extension::<Probe>(),
        ],
        Capability::I2c => vec![
            Implementation::bus_device::<I2c, Sensor>(),
            Implementation::bus_device::<I2c, Bridge>(),
            Implementation::bus_device::<I2c, Probe>(),
        ],
        Capability::Uart => vec![
            Implementation::bus_device::<Uart, Modem>(),
            Implementation::bus_device::<Uart, Probe>(),
        ],
        Capability::Spi => vec![
            Implementation::bus_device::<Spi, Bridge>(),
            Implementation::bus_device::<Spi, Adc>(),
            Implementation::bus_device::<Spi, Probe>(),
        ],
    }
}

pub fn codec() -> Codec {
    match configure(&enumerator) {
        Ok(codec) => codec,
        Err(err) => panic!("test registry must build: {err}"),
    }
}

/// Board → hat (I2C sensor + bridge hosting SPI adc) plus an on-board modem.
pub fn sample_board() -> Board {
    let bridge = BusComponent::<I2c>::new(Bridge { channels: 2 })
        .with_device(BusComponent::<Spi>::new(Adc {
            chip_select: Pin::named(8, "CE0"),
        }));
    let hat = Extension::new(Hat {
        label: "sense".into(),
        parent: None,
    })
    .with_device(BusComponent::<I2c>::new(Sensor {
        address: 0x77,
        interrupt: Pin::new(4),
    }))
    .with_device(bridge)
    .with_role::<Uart>();

    Board::new(Pi {
        model: "3B".into(),
        status_led: Some(Pin::named(47, "ACT")),
    })
    .with_extension(hat)
    .with_device(BusComponent::<Uart>::new(Modem { baud: 115_200 }))
}
