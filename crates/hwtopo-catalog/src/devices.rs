// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bus-attached peripherals.

use hwtopo_core::{BusDevice, HardwareType, I2c, Pin, Spi, Uart};
use serde::{Deserialize, Serialize};

/// Bosch BMP180 barometric pressure sensor (I2C).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bmp180 {
    /// 7-bit bus address; fixed at `0x77` on real parts.
    #[serde(default = "Bmp180::default_address")]
    pub address: u8,
    /// Oversampling setting, 0..=3.
    #[serde(default)]
    pub oversampling: u8,
}

impl Bmp180 {
    const fn default_address() -> u8 {
        0x77
    }
}

impl Default for Bmp180 {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            oversampling: 0,
        }
    }
}

impl HardwareType for Bmp180 {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Bmp180");
}
impl BusDevice<I2c> for Bmp180 {}

/// Microchip MCP23017 16-bit GPIO expander (I2C).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcp23017 {
    /// 7-bit bus address, `0x20..=0x27`.
    pub address: u8,
    /// Host pin wired to INTA, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt: Option<Pin>,
}

impl HardwareType for Mcp23017 {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Mcp23017");
}
impl BusDevice<I2c> for Mcp23017 {}

/// NXP SC16IS752 dual UART bridge, reachable over I2C or SPI.
///
/// Hosts up to two UART devices of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sc16is752 {
    /// 7-bit address when attached over I2C; ignored on SPI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<u8>,
    /// Chip select when attached over SPI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chip_select: Option<Pin>,
    /// Crystal frequency in Hz.
    #[serde(default = "Sc16is752::default_crystal_hz")]
    pub crystal_hz: u32,
}

impl Sc16is752 {
    const fn default_crystal_hz() -> u32 {
        14_745_600
    }

    /// Bridge at an I2C address.
    pub const fn at(address: u8) -> Self {
        Self {
            address: Some(address),
            chip_select: None,
            crystal_hz: Self::default_crystal_hz(),
        }
    }

    /// Bridge selected by an SPI chip-select pin.
    pub const fn selected_by(chip_select: Pin) -> Self {
        Self {
            address: None,
            chip_select: Some(chip_select),
            crystal_hz: Self::default_crystal_hz(),
        }
    }
}

impl HardwareType for Sc16is752 {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Sc16is752");
}
impl BusDevice<I2c> for Sc16is752 {}
impl BusDevice<Spi> for Sc16is752 {}

/// NMEA GPS receiver (UART).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpsReceiver {
    /// Line rate.
    pub baud: u32,
    /// Host pin wired to the 1PPS output, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pps: Option<Pin>,
}

impl GpsReceiver {
    /// Receiver at `baud` without a PPS line.
    pub const fn new(baud: u32) -> Self {
        Self { baud, pps: None }
    }
}

impl HardwareType for GpsReceiver {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::GpsReceiver");
}
impl BusDevice<Uart> for GpsReceiver {}

/// Microchip MCP3008 8-channel 10-bit ADC (SPI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcp3008 {
    /// Chip-select line.
    pub chip_select: Pin,
    /// Reference voltage in millivolts.
    pub vref_mv: u32,
}

impl HardwareType for Mcp3008 {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Mcp3008");
}
impl BusDevice<Spi> for Mcp3008 {}

/// Semtech SX1276 LoRa transceiver (SPI).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sx1276 {
    /// Chip-select line.
    pub chip_select: Pin,
    /// Carrier frequency in Hz.
    pub frequency_hz: u64,
    /// Reset line, if wired.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<Pin>,
}

impl HardwareType for Sx1276 {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::Sx1276");
}
impl BusDevice<Spi> for Sx1276 {}
