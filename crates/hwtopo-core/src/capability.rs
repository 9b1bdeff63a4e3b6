// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Capabilities a concrete hardware type can be registered under.

use std::fmt;

/// Role a concrete hardware type plays in a topology.
///
/// Each capability owns an independent type registry; a single Rust type may
/// be registered under several capabilities (for example a bridge chip that
/// is reachable over both I2C and SPI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    /// Root circuit board.
    Board,
    /// GPIO-attached extension board.
    Extension,
    /// Device attached to an I2C bus.
    I2c,
    /// Device attached to a UART.
    Uart,
    /// Device attached to an SPI bus.
    Spi,
}

impl Capability {
    /// Every capability, in registry build order.
    pub const ALL: [Self; 5] = [Self::Board, Self::Extension, Self::Uart, Self::I2c, Self::Spi];

    /// Short lowercase label used in logs and error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Board => "board",
            Self::Extension => "extension",
            Self::I2c => "i2c",
            Self::Uart => "uart",
            Self::Spi => "spi",
        }
    }

    /// Whether nodes of this capability always sit under a parent.
    pub const fn has_parent(self) -> bool {
        !matches!(self, Self::Board)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
