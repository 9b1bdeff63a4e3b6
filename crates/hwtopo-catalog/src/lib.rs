// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! hwtopo-catalog: stock hardware for emulated topologies.
//!
//! Every type here is a plain serde struct with a fully qualified
//! discriminator and the capability markers it can be registered under.
//! [`StockEnumerator`] is the discovery snapshot covering all of them.
#![forbid(unsafe_code)]

pub mod boards;
pub mod devices;
pub mod extensions;

use hwtopo_core::{
    Board, BusComponent, Capability, Extension, HardwareEnumerator, I2c, Implementation, Pin, Spi,
    Uart,
};

use crate::boards::{Pi3ModelB, Pi4ModelB};
use crate::devices::{Bmp180, GpsReceiver, Mcp23017, Mcp3008, Sc16is752, Sx1276};
use crate::extensions::{ProtoHat, RelayHat};

/// Discovery snapshot listing every stock type under each capability it
/// supports.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockEnumerator;

impl HardwareEnumerator for StockEnumerator {
    fn implementations(&self, capability: Capability) -> Vec<Implementation> {
        match capability {
            Capability::Board => vec![
                Implementation::board::<Pi3ModelB>(),
                Implementation::board::<Pi4ModelB>(),
            ],
            Capability::Extension => vec![
                Implementation::extension::<ProtoHat>(),
                Implementation::extension::<RelayHat>(),
            ],
            Capability::I2c => vec![
                Implementation::bus_device::<I2c, Bmp180>(),
                Implementation::bus_device::<I2c, Mcp23017>(),
                Implementation::bus_device::<I2c, Sc16is752>(),
            ],
            Capability::Uart => vec![Implementation::bus_device::<Uart, GpsReceiver>()],
            Capability::Spi => vec![
                Implementation::bus_device::<Spi, Mcp3008>(),
                Implementation::bus_device::<Spi, Sx1276>(),
                Implementation::bus_device::<Spi, Sc16is752>(),
            ],
        }
    }
}

/// A small bench setup touching every capability.
///
/// Pi 3 Model B with a prototyping HAT carrying a pressure sensor and a
/// UART bridge (hosting a GPS receiver), a relay HAT, and an ADC plus a
/// LoRa radio on the board's own SPI bus.
pub fn sample_topology() -> Board {
    let bridge = BusComponent::<I2c>::new(Sc16is752::at(0x48))
        .with_device(BusComponent::<Uart>::new(GpsReceiver::new(9600)));
    let proto = Extension::new(ProtoHat::labelled("weather"))
        .with_device(BusComponent::<I2c>::new(Bmp180::default()))
        .with_device(bridge);
    let relays = Extension::new(RelayHat {
        channels: vec![Pin::named(5, "RELAY1"), Pin::named(6, "RELAY2")],
    });

    Board::new(Pi3ModelB::default())
        .with_extension(proto)
        .with_extension(relays)
        .with_device(BusComponent::<Spi>::new(Mcp3008 {
            chip_select: Pin::named(8, "CE0"),
            vref_mv: 3300,
        }))
        .with_device(BusComponent::<Spi>::new(Sx1276 {
            chip_select: Pin::named(7, "CE1"),
            frequency_hz: 868_000_000,
            reset: Some(Pin::new(22)),
        }))
}
