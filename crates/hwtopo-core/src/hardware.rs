// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Concrete hardware types and their object-safe, type-erased form.

use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::bus::BusKind;

/// A concrete hardware implementation that can be persisted in a topology.
///
/// Implementations are plain serde types whose serialized form is a JSON
/// object (declare field-less types as `struct Foo {}`); its fields are
/// flattened into the node object next to the `type` discriminator.
///
/// Implement exactly the capability markers the type can be registered
/// under: [`BoardHardware`], [`ExtensionHardware`] or [`BusDevice`] for a
/// bus kind.
pub trait HardwareType:
    Serialize + DeserializeOwned + Clone + PartialEq + fmt::Debug + Send + Sync + 'static
{
    /// Fully qualified discriminator written to the `type` field.
    ///
    /// Conventionally `concat!(module_path!(), "::TypeName")`. Must be unique
    /// among the implementations registered for one capability.
    const TYPE_NAME: &'static str;
}

/// Marker for types that can be the root board of a topology.
pub trait BoardHardware: HardwareType {}

/// Marker for types that can be plugged into a board's GPIO header.
pub trait ExtensionHardware: HardwareType {}

/// Marker for types that can sit on a bus of kind `K`.
pub trait BusDevice<K: BusKind>: HardwareType {}

/// Object-safe view of a [`HardwareType`] stored inside a topology node.
///
/// Blanket-implemented for every [`HardwareType`]; nodes hold
/// `Box<dyn Hardware>` so the tree can mix types discovered at runtime.
pub trait Hardware: fmt::Debug + Send + Sync {
    /// Discriminator of the concrete type.
    fn type_name(&self) -> &'static str;

    /// Serialize the concrete properties (without discriminator or children).
    ///
    /// # Errors
    /// Returns the serializer error when the concrete type fails to serialize.
    fn properties(&self) -> Result<Value, serde_json::Error>;

    /// Clone into a new box.
    fn clone_boxed(&self) -> Box<dyn Hardware>;

    /// Structural equality across erased values; false when types differ.
    fn eq_dyn(&self, other: &dyn Hardware) -> bool;

    /// Borrow as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<T: HardwareType> Hardware for T {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn properties(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn clone_boxed(&self) -> Box<dyn Hardware> {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Hardware) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<'a> dyn Hardware + 'a {
    /// Returns the concrete value when it is a `T`.
    pub fn downcast_ref<T: HardwareType>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Whether the concrete value is a `T`.
    pub fn is<T: HardwareType>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl Clone for Box<dyn Hardware> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

impl PartialEq for dyn Hardware {
    fn eq(&self, other: &Self) -> bool {
        self.eq_dyn(other)
    }
}
