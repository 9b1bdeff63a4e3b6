// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Topology nodes: the root [`Board`], its [`Extension`]s, and node addressing.
//!
//! Ownership flows strictly downwards. A child's back-reference is a
//! [`NodePath`] from the root to its parent; it is never serialized and is
//! resolved on demand with [`Board::node`].

use std::fmt;

use crate::bus::{BusChildren, BusComponent, BusKind, I2c, Spi, Uart};
use crate::capability::Capability;
use crate::hardware::{BoardHardware, ExtensionHardware, Hardware};
use crate::restore;

/// One hop from a node to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    /// `index`-th extension of the board.
    Extension(usize),
    /// `index`-th I2C child.
    I2c(usize),
    /// `index`-th UART child.
    Uart(usize),
    /// `index`-th SPI child.
    Spi(usize),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension(i) => write!(f, "extensions[{i}]"),
            Self::I2c(i) => write!(f, "i2c[{i}]"),
            Self::Uart(i) => write!(f, "uart[{i}]"),
            Self::Spi(i) => write!(f, "spi[{i}]"),
        }
    }
}

/// Address of a node, as the sequence of steps from the root board.
///
/// The empty path is the board itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NodePath(Vec<PathStep>);

impl NodePath {
    /// Path of the root board.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Whether this addresses the root board.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Steps from the root, outermost first.
    pub fn steps(&self) -> &[PathStep] {
        &self.0
    }

    /// Path of a child of this node.
    pub fn child(&self, step: PathStep) -> Self {
        let mut steps = Vec::with_capacity(self.0.len() + 1);
        steps.extend_from_slice(&self.0);
        steps.push(step);
        Self(steps)
    }

    /// Path of this node's parent; `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for step in &self.0 {
            write!(f, "/{step}")?;
        }
        Ok(())
    }
}

/// Borrowed view of any node in a topology.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// The root board.
    Board(&'a Board),
    /// A GPIO extension.
    Extension(&'a Extension),
    /// An I2C device.
    I2c(&'a BusComponent<I2c>),
    /// A UART device.
    Uart(&'a BusComponent<Uart>),
    /// An SPI device.
    Spi(&'a BusComponent<Spi>),
}

impl<'a> NodeRef<'a> {
    /// Capability whose registry the node's type belongs to.
    pub const fn capability(self) -> Capability {
        match self {
            Self::Board(_) => Capability::Board,
            Self::Extension(_) => Capability::Extension,
            Self::I2c(_) => Capability::I2c,
            Self::Uart(_) => Capability::Uart,
            Self::Spi(_) => Capability::Spi,
        }
    }

    /// Concrete hardware of the node.
    pub fn hardware(self) -> &'a dyn Hardware {
        match self {
            Self::Board(n) => n.hardware(),
            Self::Extension(n) => n.hardware(),
            Self::I2c(n) => n.hardware(),
            Self::Uart(n) => n.hardware(),
            Self::Spi(n) => n.hardware(),
        }
    }

    /// Bus children of the node.
    pub fn bus(self) -> &'a BusChildren {
        match self {
            Self::Board(n) => n.bus(),
            Self::Extension(n) => n.bus(),
            Self::I2c(n) => n.bus(),
            Self::Uart(n) => n.bus(),
            Self::Spi(n) => n.bus(),
        }
    }

    /// Back-reference of the node; always `None` for the board.
    pub fn parent(self) -> Option<&'a NodePath> {
        match self {
            Self::Board(_) => None,
            Self::Extension(n) => n.parent(),
            Self::I2c(n) => n.parent(),
            Self::Uart(n) => n.parent(),
            Self::Spi(n) => n.parent(),
        }
    }

    /// Child reached by `step`, if it exists.
    pub fn child(self, step: PathStep) -> Option<Self> {
        match (self, step) {
            (Self::Board(board), PathStep::Extension(i)) => {
                board.extensions.get(i).map(NodeRef::Extension)
            }
            (_, PathStep::Extension(_)) => None,
            (node, PathStep::I2c(i)) => node.bus().i2c()?.get(i).map(NodeRef::I2c),
            (node, PathStep::Uart(i)) => node.bus().uart()?.get(i).map(NodeRef::Uart),
            (node, PathStep::Spi(i)) => node.bus().spi()?.get(i).map(NodeRef::Spi),
        }
    }
}

/// Root of a topology.
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) hardware: Box<dyn Hardware>,
    pub(crate) extensions: Vec<Extension>,
    pub(crate) bus: BusChildren,
}

impl Board {
    /// Create a board with no extensions and no parent roles.
    pub fn new<T: BoardHardware>(hardware: T) -> Self {
        Self::from_parts(Box::new(hardware), Vec::new(), BusChildren::default())
    }

    pub(crate) fn from_parts(
        hardware: Box<dyn Hardware>,
        extensions: Vec<Extension>,
        bus: BusChildren,
    ) -> Self {
        Self {
            hardware,
            extensions,
            bus,
        }
    }

    /// Concrete hardware of the board.
    pub fn hardware(&self) -> &dyn Hardware {
        self.hardware.as_ref()
    }

    /// GPIO-attached extensions, in attachment order.
    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// On-board bus children.
    pub fn bus(&self) -> &BusChildren {
        &self.bus
    }

    /// Attach an extension, linking its whole subtree.
    pub fn attach_extension(&mut self, mut extension: Extension) -> NodePath {
        let root = NodePath::root();
        let index = self.extensions.len();
        restore::link_extension(&mut extension, &root, index);
        self.extensions.push(extension);
        root.child(PathStep::Extension(index))
    }

    /// Attach an on-board bus device, linking its whole subtree.
    pub fn attach_device<K: BusKind>(&mut self, mut device: BusComponent<K>) -> NodePath {
        let root = NodePath::root();
        let devices = self.bus.enable::<K>();
        let index = devices.len();
        restore::link_device(&mut device, &root, index);
        devices.push(device);
        root.child(K::step(index))
    }

    /// Builder form of [`Board::attach_extension`].
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.attach_extension(extension);
        self
    }

    /// Builder form of [`Board::attach_device`].
    pub fn with_device<K: BusKind>(mut self, device: BusComponent<K>) -> Self {
        self.attach_device(device);
        self
    }

    /// Declare the `K` parent role on the board without adding children.
    pub fn with_role<K: BusKind>(mut self) -> Self {
        self.bus.enable::<K>();
        self
    }

    /// Resolve a path to the node it addresses.
    pub fn node(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        path.steps()
            .iter()
            .try_fold(NodeRef::Board(self), |node, step| node.child(*step))
    }

    /// Resolve the back-reference of the node at `path`.
    pub fn parent_of(&self, path: &NodePath) -> Option<NodeRef<'_>> {
        let parent = self.node(path)?.parent()?;
        self.node(parent)
    }

    /// Visit every node depth-first: the board, then each extension with its
    /// bus subtree, then the board's own I2C, UART and SPI subtrees.
    pub fn visit<'a, F>(&'a self, mut visitor: F)
    where
        F: FnMut(&NodePath, NodeRef<'a>),
    {
        let root = NodePath::root();
        visitor(&root, NodeRef::Board(self));
        for (index, extension) in self.extensions.iter().enumerate() {
            let path = root.child(PathStep::Extension(index));
            visitor(&path, NodeRef::Extension(extension));
            visit_bus(&extension.bus, &path, &mut visitor);
        }
        visit_bus(&self.bus, &root, &mut visitor);
    }

    /// Number of nodes in the topology, the board included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(|_, _| count += 1);
        count
    }
}

fn visit_bus<'a, F>(bus: &'a BusChildren, owner: &NodePath, visitor: &mut F)
where
    F: FnMut(&NodePath, NodeRef<'a>),
{
    visit_role::<I2c, F>(bus, owner, visitor);
    visit_role::<Uart, F>(bus, owner, visitor);
    visit_role::<Spi, F>(bus, owner, visitor);
}

fn visit_role<'a, K, F>(bus: &'a BusChildren, owner: &NodePath, visitor: &mut F)
where
    K: BusKind,
    F: FnMut(&NodePath, NodeRef<'a>),
{
    for (index, device) in bus.role::<K>().unwrap_or_default().iter().enumerate() {
        let path = owner.child(K::step(index));
        visitor(&path, K::node_ref(device));
        visit_bus(&device.bus, &path, visitor);
    }
}

// Manual impls: a derived `==` on `Box<dyn Hardware>` tries to move out of
// the box (rust-lang/rust#31740).
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        *self.hardware == *other.hardware
            && self.extensions == other.extensions
            && self.bus == other.bus
    }
}

/// A board plugged into the root board's GPIO header.
#[derive(Debug, Clone)]
pub struct Extension {
    pub(crate) hardware: Box<dyn Hardware>,
    pub(crate) bus: BusChildren,
    pub(crate) parent: Option<NodePath>,
}

impl Extension {
    /// Create an extension with no children and no parent roles.
    pub fn new<T: ExtensionHardware>(hardware: T) -> Self {
        Self::from_parts(Box::new(hardware), BusChildren::default())
    }

    pub(crate) fn from_parts(hardware: Box<dyn Hardware>, bus: BusChildren) -> Self {
        Self {
            hardware,
            bus,
            parent: None,
        }
    }

    /// Concrete hardware of the extension.
    pub fn hardware(&self) -> &dyn Hardware {
        self.hardware.as_ref()
    }

    /// Bus children hosted by the extension.
    pub fn bus(&self) -> &BusChildren {
        &self.bus
    }

    /// Path of the owning board, once linked.
    pub fn parent(&self) -> Option<&NodePath> {
        self.parent.as_ref()
    }

    /// Declare the `K` parent role without adding children.
    pub fn with_role<K: BusKind>(mut self) -> Self {
        self.bus.enable::<K>();
        self
    }

    /// Append a child on the `K` bus, declaring the role if needed.
    pub fn with_device<K: BusKind>(mut self, device: BusComponent<K>) -> Self {
        self.bus.enable::<K>().push(device);
        self
    }
}

impl PartialEq for Extension {
    fn eq(&self, other: &Self) -> bool {
        *self.hardware == *other.hardware && self.bus == other.bus && self.parent == other.parent
    }
}
