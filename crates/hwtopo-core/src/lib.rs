// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! hwtopo-core: persisted hardware-emulation topologies.
//!
//! A topology is a tree rooted at a [`Board`]. The board owns GPIO-attached
//! [`Extension`]s, and any node may host I2C, UART or SPI
//! [`BusComponent`]s, which may in turn host further bus components of any
//! kind. Every child carries a non-owning back-reference ([`NodePath`]) to its
//! immediate parent.
//!
//! The set of concrete hardware types is open: implementations are discovered
//! at runtime through a [`HardwareEnumerator`] and registered per
//! [`Capability`] in a [`TopologyRegistry`]. [`configure`] turns a discovery
//! snapshot into a [`Codec`], which writes topologies to JSON text with a
//! `type` discriminator on every polymorphic node and reads them back,
//! re-deriving every back-reference with [`restore`].
//!
//! ```text
//! discovery ──► TypeRegistry ×5 (+ DelegateBoard) ──► Codec
//! Codec::write(board) ──► exclusion policy ──► JSON
//! Codec::read(json)   ──► decode ──► restore ──► linked Board
//! ```
#![forbid(unsafe_code)]

mod bus;
mod capability;
mod codec;
mod delegate;
pub mod exclusion;
mod hardware;
mod node;
mod pin;
mod registry;
mod restore;

pub use bus::{BusChildren, BusComponent, BusKind, I2c, Spi, Uart};
pub use capability::Capability;
pub use codec::{
    configure, Codec, DecodingError, EncodingError, EXTENSIONS_KEY, STRUCTURAL_KEYS, TYPE_KEY,
};
pub use delegate::{ensure_delegate, DelegateBoard};
pub use hardware::{BoardHardware, BusDevice, ExtensionHardware, Hardware, HardwareType};
pub use node::{Board, Extension, NodePath, NodeRef, PathStep};
pub use pin::Pin;
pub use registry::{
    ConfigurationError, HardwareEnumerator, Implementation, TopologyRegistry, TypeRegistry,
};
pub use restore::{restore, verify_links, LinkError};
