// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Bus components and the three parent roles (I2C, UART, SPI).
//!
//! Every node carries a [`BusChildren`] with one optional ordered collection
//! per bus kind. `None` means the node does not play that parent role;
//! `Some` (possibly empty) means it does. Components are typed by their bus
//! kind so a UART device can never end up in an I2C collection.

use std::fmt;
use std::marker::PhantomData;

use crate::capability::Capability;
use crate::hardware::{BusDevice, Hardware};
use crate::node::{NodePath, NodeRef, PathStep};

mod sealed {
    pub trait Sealed {}
}

/// Zero-sized marker for one of the three bus kinds.
///
/// Sealed: the only implementors are [`I2c`], [`Uart`] and [`Spi`].
pub trait BusKind:
    sealed::Sealed + fmt::Debug + Clone + Copy + PartialEq + Eq + Default + Send + Sync + 'static
{
    /// Capability whose registry holds devices of this kind.
    const CAPABILITY: Capability;
    /// JSON field holding the children of this kind.
    const FIELD: &'static str;

    /// Path step addressing the `index`-th child of this kind.
    fn step(index: usize) -> PathStep;

    /// Children of this kind, when the owner plays the role.
    fn slot(children: &BusChildren) -> Option<&[BusComponent<Self>]>;

    /// Mutable collection slot of this kind.
    fn slot_mut(children: &mut BusChildren) -> &mut Option<Vec<BusComponent<Self>>>;

    /// Wrap a component of this kind as a [`NodeRef`].
    fn node_ref(component: &BusComponent<Self>) -> NodeRef<'_>;
}

macro_rules! bus_kind {
    ($(#[$doc:meta])* $name:ident, $field:ident, $capability:ident, $variant:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl BusKind for $name {
            const CAPABILITY: Capability = Capability::$capability;
            const FIELD: &'static str = stringify!($field);

            fn step(index: usize) -> PathStep {
                PathStep::$variant(index)
            }

            fn slot(children: &BusChildren) -> Option<&[BusComponent<Self>]> {
                children.$field.as_deref()
            }

            fn slot_mut(children: &mut BusChildren) -> &mut Option<Vec<BusComponent<Self>>> {
                &mut children.$field
            }

            fn node_ref(component: &BusComponent<Self>) -> NodeRef<'_> {
                NodeRef::$variant(component)
            }
        }
    };
}

bus_kind!(
    /// Inter-Integrated Circuit bus.
    I2c, i2c, I2c, I2c
);
bus_kind!(
    /// Serial UART link.
    Uart, uart, Uart, Uart
);
bus_kind!(
    /// Serial Peripheral Interface bus.
    Spi, spi, Spi, Spi
);

/// Bus children owned by one node, one optional collection per parent role.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BusChildren {
    pub(crate) i2c: Option<Vec<BusComponent<I2c>>>,
    pub(crate) uart: Option<Vec<BusComponent<Uart>>>,
    pub(crate) spi: Option<Vec<BusComponent<Spi>>>,
}

impl BusChildren {
    /// Children of kind `K`, or `None` when the owner does not play that role.
    pub fn role<K: BusKind>(&self) -> Option<&[BusComponent<K>]> {
        K::slot(self)
    }

    /// Whether the owner plays the `K` parent role.
    pub fn plays<K: BusKind>(&self) -> bool {
        self.role::<K>().is_some()
    }

    /// I2C children.
    pub fn i2c(&self) -> Option<&[BusComponent<I2c>]> {
        self.i2c.as_deref()
    }

    /// UART children.
    pub fn uart(&self) -> Option<&[BusComponent<Uart>]> {
        self.uart.as_deref()
    }

    /// SPI children.
    pub fn spi(&self) -> Option<&[BusComponent<Spi>]> {
        self.spi.as_deref()
    }

    /// True when the owner plays none of the parent roles.
    pub fn is_leaf(&self) -> bool {
        !self.plays::<I2c>() && !self.plays::<Uart>() && !self.plays::<Spi>()
    }

    pub(crate) fn enable<K: BusKind>(&mut self) -> &mut Vec<BusComponent<K>> {
        K::slot_mut(self).get_or_insert_with(Vec::new)
    }
}

/// A peripheral attached to a bus of kind `K`.
///
/// The back-reference to the owning node is set when the component's subtree
/// is attached to a [`Board`](crate::Board), or by [`restore`](crate::restore)
/// after decoding. A component that is still being assembled has no parent.
#[derive(Debug, Clone)]
pub struct BusComponent<K: BusKind> {
    pub(crate) hardware: Box<dyn Hardware>,
    pub(crate) bus: BusChildren,
    pub(crate) parent: Option<NodePath>,
    kind: PhantomData<K>,
}

impl<K: BusKind> BusComponent<K> {
    /// Create a component with no children and no parent roles.
    pub fn new<T: BusDevice<K>>(hardware: T) -> Self {
        Self::from_parts(Box::new(hardware), BusChildren::default())
    }

    pub(crate) fn from_parts(hardware: Box<dyn Hardware>, bus: BusChildren) -> Self {
        Self {
            hardware,
            bus,
            parent: None,
            kind: PhantomData,
        }
    }

    /// Concrete hardware of this component.
    pub fn hardware(&self) -> &dyn Hardware {
        self.hardware.as_ref()
    }

    /// Bus children hosted by this component.
    pub fn bus(&self) -> &BusChildren {
        &self.bus
    }

    /// Path of the immediate parent, once linked.
    pub fn parent(&self) -> Option<&NodePath> {
        self.parent.as_ref()
    }

    /// Declare the `J` parent role without adding children.
    pub fn with_role<J: BusKind>(mut self) -> Self {
        self.bus.enable::<J>();
        self
    }

    /// Append a child on the `J` bus, declaring the role if needed.
    pub fn with_device<J: BusKind>(mut self, device: BusComponent<J>) -> Self {
        self.bus.enable::<J>().push(device);
        self
    }
}

impl<K: BusKind> PartialEq for BusComponent<K> {
    fn eq(&self, other: &Self) -> bool {
        *self.hardware == *other.hardware && self.bus == other.bus && self.parent == other.parent
    }
}
