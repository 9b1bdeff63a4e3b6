// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! JSON encoder/decoder for topologies.
//!
//! Node objects carry the `type` discriminator first, then the concrete
//! properties flattened, then child collections (`extensions` on the board,
//! `i2c`/`uart`/`spi` on any node playing that parent role). Back-references
//! never appear in the text.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::instrument;

use crate::bus::{BusChildren, BusComponent, BusKind, I2c, Spi, Uart};
use crate::capability::Capability;
use crate::exclusion::retain_included;
use crate::hardware::Hardware;
use crate::node::{Board, Extension, NodePath, PathStep};
use crate::registry::{ConfigurationError, HardwareEnumerator, TopologyRegistry};
use crate::restore::restore;

/// Discriminator field present on every node object.
pub const TYPE_KEY: &str = "type";
/// Board field holding the extension list.
pub const EXTENSIONS_KEY: &str = "extensions";
/// Field names reserved for structure; concrete properties may not use them.
pub const STRUCTURAL_KEYS: [&str; 5] = [TYPE_KEY, EXTENSIONS_KEY, I2c::FIELD, Uart::FIELD, Spi::FIELD];

/// Errors raised by [`Codec::write`].
#[derive(Debug, Error)]
pub enum EncodingError {
    /// A reachable node's type is missing from its capability's registry.
    #[error("{capability} type `{type_name}` is not registered")]
    Unregistered {
        /// Registry that was consulted.
        capability: Capability,
        /// Discriminator of the node.
        type_name: String,
    },
    /// Concrete properties used a structural field name.
    #[error("`{type_name}` declares reserved field `{field}`")]
    ReservedKey {
        /// Discriminator of the node.
        type_name: String,
        /// Offending field.
        field: String,
    },
    /// Concrete properties did not serialize to a JSON object.
    #[error("`{type_name}` does not serialize to a JSON object")]
    NotAnObject {
        /// Discriminator of the node.
        type_name: String,
    },
    /// Serializer failure.
    #[error("serialize failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by [`Codec::read`] and [`Codec::decode`].
#[derive(Debug, Error)]
pub enum DecodingError {
    /// Input is not valid JSON.
    #[error("malformed topology text: {0}")]
    Malformed(#[source] serde_json::Error),
    /// A node is not a JSON object.
    #[error("{path}: expected a JSON object")]
    NotAnObject {
        /// Location of the node.
        path: NodePath,
    },
    /// A required structural field is absent.
    #[error("{path}: missing required field `{field}`")]
    MissingField {
        /// Location of the node.
        path: NodePath,
        /// Missing field.
        field: &'static str,
    },
    /// A structural field has the wrong shape or is not allowed here.
    #[error("{path}: field `{field}` {reason}")]
    InvalidField {
        /// Location of the node.
        path: NodePath,
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// The discriminator matches nothing registered for the capability.
    #[error("{path}: unknown {capability} type `{type_name}`")]
    UnknownDiscriminator {
        /// Location of the node.
        path: NodePath,
        /// Registry that was consulted.
        capability: Capability,
        /// Discriminator found in the text.
        type_name: String,
    },
    /// The concrete constructor rejected the node's properties.
    #[error("{path}: invalid properties for `{type_name}`: {source}")]
    Properties {
        /// Location of the node.
        path: NodePath,
        /// Discriminator of the node.
        type_name: String,
        /// Deserializer error.
        #[source]
        source: serde_json::Error,
    },
}

/// Build a [`Codec`] from a discovery snapshot.
///
/// # Errors
/// Propagates [`ConfigurationError`] from registry construction.
#[instrument(skip_all)]
pub fn configure(enumerator: &dyn HardwareEnumerator) -> Result<Codec, ConfigurationError> {
    TopologyRegistry::discover(enumerator).map(Codec::new)
}

/// Reads and writes topologies against an immutable [`TopologyRegistry`].
///
/// `Send + Sync`; share it between callers working on separate topologies.
#[derive(Debug)]
pub struct Codec {
    registry: TopologyRegistry,
}

impl Codec {
    /// Codec over prebuilt registries.
    pub fn new(registry: TopologyRegistry) -> Self {
        Self { registry }
    }

    /// Registries this codec encodes and decodes against.
    pub fn registry(&self) -> &TopologyRegistry {
        &self.registry
    }

    /// Encode `board` and its whole forward tree as pretty-printed JSON.
    ///
    /// # Errors
    /// See [`EncodingError`].
    pub fn write(&self, board: &Board) -> Result<String, EncodingError> {
        let value = self.to_value(board)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Encode `board` as a JSON value.
    ///
    /// # Errors
    /// See [`EncodingError`].
    pub fn to_value(&self, board: &Board) -> Result<Value, EncodingError> {
        let mut object = self.encode_node(Capability::Board, board.hardware())?;
        let extensions = board
            .extensions()
            .iter()
            .map(|extension| self.encode_extension(extension))
            .collect::<Result<Vec<_>, _>>()?;
        object.insert(EXTENSIONS_KEY.to_owned(), Value::Array(extensions));
        self.encode_bus(board.bus(), &mut object)?;
        Ok(Value::Object(object))
    }

    /// Decode text into a fully linked topology.
    ///
    /// # Errors
    /// See [`DecodingError`].
    pub fn read(&self, text: &str) -> Result<Board, DecodingError> {
        let mut board = self.decode(text)?;
        restore(&mut board);
        Ok(board)
    }

    /// Decode text without restoring back-references.
    ///
    /// Nesting depth is not limited: the parser grows its stack on demand
    /// instead of stopping at serde_json's default recursion limit.
    ///
    /// # Errors
    /// See [`DecodingError`].
    pub fn decode(&self, text: &str) -> Result<Board, DecodingError> {
        let mut json = serde_json::Deserializer::from_str(text);
        json.disable_recursion_limit();
        let value = Value::deserialize(serde_stacker::Deserializer::new(&mut json))
            .map_err(DecodingError::Malformed)?;
        json.end().map_err(DecodingError::Malformed)?;
        self.decode_value(value)
    }

    /// Decode a JSON value without restoring back-references.
    ///
    /// # Errors
    /// See [`DecodingError`].
    pub fn decode_value(&self, value: Value) -> Result<Board, DecodingError> {
        let path = NodePath::root();
        let mut object = into_object(value, &path)?;
        let extensions = match object.remove(EXTENSIONS_KEY) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    self.decode_extension(item, &path.child(PathStep::Extension(index)))
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(DecodingError::InvalidField {
                    path,
                    field: EXTENSIONS_KEY,
                    reason: "must be an array",
                })
            }
        };
        let bus = self.decode_bus(&mut object, &path)?;
        let hardware = self.decode_hardware(Capability::Board, object, &path)?;
        Ok(Board::from_parts(hardware, extensions, bus))
    }

    fn encode_node(
        &self,
        capability: Capability,
        hardware: &dyn Hardware,
    ) -> Result<Map<String, Value>, EncodingError> {
        let type_name = hardware.type_name();
        if !self.registry.get(capability).contains(type_name) {
            return Err(EncodingError::Unregistered {
                capability,
                type_name: type_name.to_owned(),
            });
        }
        let mut properties = match hardware.properties()? {
            Value::Object(map) => map,
            _ => {
                return Err(EncodingError::NotAnObject {
                    type_name: type_name.to_owned(),
                })
            }
        };
        retain_included(capability, &mut properties);

        let mut object = Map::with_capacity(properties.len() + 1);
        object.insert(TYPE_KEY.to_owned(), Value::String(type_name.to_owned()));
        for (field, value) in properties {
            if STRUCTURAL_KEYS.contains(&field.as_str()) {
                return Err(EncodingError::ReservedKey {
                    type_name: type_name.to_owned(),
                    field,
                });
            }
            object.insert(field, value);
        }
        Ok(object)
    }

    fn encode_extension(&self, extension: &Extension) -> Result<Value, EncodingError> {
        let mut object = self.encode_node(Capability::Extension, extension.hardware())?;
        self.encode_bus(extension.bus(), &mut object)?;
        Ok(Value::Object(object))
    }

    fn encode_device<K: BusKind>(&self, device: &BusComponent<K>) -> Result<Value, EncodingError> {
        let mut object = self.encode_node(K::CAPABILITY, device.hardware())?;
        self.encode_bus(device.bus(), &mut object)?;
        Ok(Value::Object(object))
    }

    fn encode_bus(
        &self,
        bus: &BusChildren,
        object: &mut Map<String, Value>,
    ) -> Result<(), EncodingError> {
        self.encode_role::<I2c>(bus, object)?;
        self.encode_role::<Uart>(bus, object)?;
        self.encode_role::<Spi>(bus, object)
    }

    fn encode_role<K: BusKind>(
        &self,
        bus: &BusChildren,
        object: &mut Map<String, Value>,
    ) -> Result<(), EncodingError> {
        if let Some(devices) = bus.role::<K>() {
            let items = devices
                .iter()
                .map(|device| self.encode_device(device))
                .collect::<Result<Vec<_>, _>>()?;
            object.insert(K::FIELD.to_owned(), Value::Array(items));
        }
        Ok(())
    }

    fn decode_extension(&self, value: Value, path: &NodePath) -> Result<Extension, DecodingError> {
        let mut object = into_object(value, path)?;
        if object.contains_key(EXTENSIONS_KEY) {
            return Err(DecodingError::InvalidField {
                path: path.clone(),
                field: EXTENSIONS_KEY,
                reason: "is only allowed on the board",
            });
        }
        let bus = self.decode_bus(&mut object, path)?;
        let hardware = self.decode_hardware(Capability::Extension, object, path)?;
        Ok(Extension::from_parts(hardware, bus))
    }

    fn decode_device<K: BusKind>(
        &self,
        value: Value,
        path: &NodePath,
    ) -> Result<BusComponent<K>, DecodingError> {
        let mut object = into_object(value, path)?;
        if object.contains_key(EXTENSIONS_KEY) {
            return Err(DecodingError::InvalidField {
                path: path.clone(),
                field: EXTENSIONS_KEY,
                reason: "is only allowed on the board",
            });
        }
        let bus = self.decode_bus(&mut object, path)?;
        let hardware = self.decode_hardware(K::CAPABILITY, object, path)?;
        Ok(BusComponent::from_parts(hardware, bus))
    }

    fn decode_bus(
        &self,
        object: &mut Map<String, Value>,
        path: &NodePath,
    ) -> Result<BusChildren, DecodingError> {
        let mut bus = BusChildren::default();
        self.decode_role::<I2c>(object, path, &mut bus)?;
        self.decode_role::<Uart>(object, path, &mut bus)?;
        self.decode_role::<Spi>(object, path, &mut bus)?;
        Ok(bus)
    }

    fn decode_role<K: BusKind>(
        &self,
        object: &mut Map<String, Value>,
        path: &NodePath,
        bus: &mut BusChildren,
    ) -> Result<(), DecodingError> {
        let items = match object.remove(K::FIELD) {
            None => return Ok(()),
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(DecodingError::InvalidField {
                    path: path.clone(),
                    field: K::FIELD,
                    reason: "must be an array",
                })
            }
        };
        let devices = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.decode_device::<K>(item, &path.child(K::step(index))))
            .collect::<Result<Vec<_>, _>>()?;
        *K::slot_mut(bus) = Some(devices);
        Ok(())
    }

    fn decode_hardware(
        &self,
        capability: Capability,
        mut object: Map<String, Value>,
        path: &NodePath,
    ) -> Result<Box<dyn Hardware>, DecodingError> {
        let type_name = match object.remove(TYPE_KEY) {
            Some(Value::String(type_name)) => type_name,
            Some(_) => {
                return Err(DecodingError::InvalidField {
                    path: path.clone(),
                    field: TYPE_KEY,
                    reason: "must be a string",
                })
            }
            None => {
                return Err(DecodingError::MissingField {
                    path: path.clone(),
                    field: TYPE_KEY,
                })
            }
        };
        let Some(implementation) = self.registry.get(capability).get(&type_name) else {
            return Err(DecodingError::UnknownDiscriminator {
                path: path.clone(),
                capability,
                type_name,
            });
        };
        retain_included(capability, &mut object);
        implementation
            .construct(Value::Object(object))
            .map_err(|source| DecodingError::Properties {
                path: path.clone(),
                type_name,
                source,
            })
    }
}

fn into_object(value: Value, path: &NodePath) -> Result<Map<String, Value>, DecodingError> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(DecodingError::NotAnObject { path: path.clone() }),
    }
}
