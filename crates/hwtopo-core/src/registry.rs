// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-capability type registries built from a runtime discovery snapshot.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::bus::BusKind;
use crate::capability::Capability;
use crate::delegate::ensure_delegate;
use crate::hardware::{BoardHardware, BusDevice, ExtensionHardware, Hardware, HardwareType};

/// Object-safe constructor turning decoded properties into a concrete value.
trait ErasedConstructor: Send + Sync {
    fn construct(&self, properties: Value) -> Result<Box<dyn Hardware>, serde_json::Error>;
}

struct ConstructorImpl<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: HardwareType> ErasedConstructor for ConstructorImpl<T> {
    fn construct(&self, properties: Value) -> Result<Box<dyn Hardware>, serde_json::Error> {
        let value: T = serde_json::from_value(properties)?;
        Ok(Box::new(value))
    }
}

/// A discovered concrete implementation, claimed for one capability.
pub struct Implementation {
    capability: Capability,
    type_name: &'static str,
    constructor: Box<dyn ErasedConstructor>,
}

impl Implementation {
    fn of<T: HardwareType>(capability: Capability) -> Self {
        Self {
            capability,
            type_name: T::TYPE_NAME,
            constructor: Box::new(ConstructorImpl::<T> {
                _marker: PhantomData,
            }),
        }
    }

    /// Board implementation `T`.
    pub fn board<T: BoardHardware>() -> Self {
        Self::of::<T>(Capability::Board)
    }

    /// Extension implementation `T`.
    pub fn extension<T: ExtensionHardware>() -> Self {
        Self::of::<T>(Capability::Extension)
    }

    /// Bus device `T` on bus kind `K`.
    pub fn bus_device<K: BusKind, T: BusDevice<K>>() -> Self {
        Self::of::<T>(K::CAPABILITY)
    }

    /// Capability this implementation was discovered for.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Discriminator of the concrete type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Build the concrete value from its properties object.
    ///
    /// # Errors
    /// Returns the deserializer error when `properties` does not describe a
    /// valid value of the concrete type.
    pub fn construct(&self, properties: Value) -> Result<Box<dyn Hardware>, serde_json::Error> {
        self.constructor.construct(properties)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("capability", &self.capability)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Discovery port: lists the concrete implementations available per capability.
///
/// Supplied by the host. Returned lists may contain implementations of other
/// capabilities; registry construction skips them.
pub trait HardwareEnumerator {
    /// Every implementation discovered for `capability`.
    fn implementations(&self, capability: Capability) -> Vec<Implementation>;
}

impl<F> HardwareEnumerator for F
where
    F: Fn(Capability) -> Vec<Implementation>,
{
    fn implementations(&self, capability: Capability) -> Vec<Implementation> {
        self(capability)
    }
}

/// Errors raised while building registries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// An implementation declared an empty discriminator, which could never
    /// be told apart on decode.
    #[error("{capability} implementation has an empty discriminator")]
    EmptyDiscriminator {
        /// Capability being built.
        capability: Capability,
    },
}

/// Discriminated-union descriptor for one capability.
///
/// Maps each discriminator to the constructor of its concrete type.
/// Iteration is sorted by discriminator.
#[derive(Debug)]
pub struct TypeRegistry {
    capability: Capability,
    entries: BTreeMap<&'static str, Implementation>,
}

impl TypeRegistry {
    /// Build the registry for `capability` from discovered implementations.
    ///
    /// Implementations claimed for another capability are skipped. When two
    /// implementations share a discriminator the later one wins.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::EmptyDiscriminator`] for an
    /// implementation with an empty type name.
    pub fn build<I>(capability: Capability, implementations: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = Implementation>,
    {
        let mut entries = BTreeMap::new();
        for implementation in implementations {
            if implementation.capability != capability {
                debug!(
                    %capability,
                    type_name = implementation.type_name,
                    claimed = %implementation.capability,
                    "skipping implementation of another capability"
                );
                continue;
            }
            if implementation.type_name.is_empty() {
                return Err(ConfigurationError::EmptyDiscriminator { capability });
            }
            if let Some(previous) = entries.insert(implementation.type_name, implementation) {
                warn!(
                    %capability,
                    type_name = previous.type_name,
                    "duplicate discriminator; keeping the last registration"
                );
            }
        }
        Ok(Self {
            capability,
            entries,
        })
    }

    /// Capability this registry describes.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// Implementation registered under `type_name`.
    pub fn get(&self, type_name: &str) -> Option<&Implementation> {
        self.entries.get(type_name)
    }

    /// Whether `type_name` is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    /// Registered discriminators in sorted order.
    pub fn discriminators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Number of registered implementations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The five capability registries composed into one codec configuration.
#[derive(Debug)]
pub struct TopologyRegistry {
    board: TypeRegistry,
    extension: TypeRegistry,
    uart: TypeRegistry,
    i2c: TypeRegistry,
    spi: TypeRegistry,
}

impl TopologyRegistry {
    /// Build every registry from a discovery snapshot.
    ///
    /// The board registry always contains [`DelegateBoard`](crate::DelegateBoard).
    ///
    /// # Errors
    /// Propagates [`ConfigurationError`] from [`TypeRegistry::build`].
    #[instrument(skip_all)]
    pub fn discover(enumerator: &dyn HardwareEnumerator) -> Result<Self, ConfigurationError> {
        let mut boards = enumerator.implementations(Capability::Board);
        ensure_delegate(&mut boards);
        let registry = Self {
            board: TypeRegistry::build(Capability::Board, boards)?,
            extension: TypeRegistry::build(
                Capability::Extension,
                enumerator.implementations(Capability::Extension),
            )?,
            uart: TypeRegistry::build(
                Capability::Uart,
                enumerator.implementations(Capability::Uart),
            )?,
            i2c: TypeRegistry::build(Capability::I2c, enumerator.implementations(Capability::I2c))?,
            spi: TypeRegistry::build(Capability::Spi, enumerator.implementations(Capability::Spi))?,
        };
        debug!(
            boards = registry.board.len(),
            extensions = registry.extension.len(),
            uart = registry.uart.len(),
            i2c = registry.i2c.len(),
            spi = registry.spi.len(),
            "type registries built"
        );
        Ok(registry)
    }

    /// Registry for `capability`.
    pub fn get(&self, capability: Capability) -> &TypeRegistry {
        match capability {
            Capability::Board => &self.board,
            Capability::Extension => &self.extension,
            Capability::I2c => &self.i2c,
            Capability::Uart => &self.uart,
            Capability::Spi => &self.spi,
        }
    }
}
