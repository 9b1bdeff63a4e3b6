// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Back-reference restoration and verification.
//!
//! Back-references are never serialized. After a decode, [`restore`] walks
//! the tree in topology order and points every child at its owner. Each edge
//! is set independently, so the pass is idempotent and order-insensitive.

use thiserror::Error;

use crate::bus::{BusChildren, BusComponent, BusKind, I2c, Spi, Uart};
use crate::node::{Board, Extension, NodePath, PathStep};

/// Point every non-root node's back-reference at its immediate parent.
///
/// Extensions are linked to the board; every I2C, UART and SPI child is
/// linked to the node owning the collection and then recursed into as a
/// potential parent of all three kinds.
pub fn restore(board: &mut Board) {
    let root = NodePath::root();
    for (index, extension) in board.extensions.iter_mut().enumerate() {
        link_extension(extension, &root, index);
    }
    link_bus(&mut board.bus, &root);
}

pub(crate) fn link_extension(extension: &mut Extension, board: &NodePath, index: usize) {
    extension.parent = Some(board.clone());
    let here = board.child(PathStep::Extension(index));
    link_bus(&mut extension.bus, &here);
}

pub(crate) fn link_device<K: BusKind>(
    device: &mut BusComponent<K>,
    owner: &NodePath,
    index: usize,
) {
    device.parent = Some(owner.clone());
    let here = owner.child(K::step(index));
    link_bus(&mut device.bus, &here);
}

fn link_bus(bus: &mut BusChildren, owner: &NodePath) {
    link_role::<I2c>(bus, owner);
    link_role::<Uart>(bus, owner);
    link_role::<Spi>(bus, owner);
}

fn link_role<K: BusKind>(bus: &mut BusChildren, owner: &NodePath) {
    if let Some(devices) = K::slot_mut(bus) {
        for (index, device) in devices.iter_mut().enumerate() {
            link_device(device, owner, index);
        }
    }
}

/// Back-reference invariant violations reported by [`verify_links`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// A non-root node has no back-reference.
    #[error("{path}: back-reference is not set")]
    Missing {
        /// Node missing its back-reference.
        path: NodePath,
    },
    /// A back-reference points somewhere other than the owning node.
    #[error("{path}: back-reference points to {found}, expected {expected}")]
    Foreign {
        /// Node holding the wrong back-reference.
        path: NodePath,
        /// Path of the node that actually owns it.
        expected: NodePath,
        /// Path stored in the back-reference.
        found: NodePath,
    },
}

/// Check that every non-root node points at the node that owns it.
///
/// # Errors
/// Returns the first violation in visit order.
pub fn verify_links(board: &Board) -> Result<(), LinkError> {
    let mut outcome = Ok(());
    board.visit(|path, node| {
        if outcome.is_err() {
            return;
        }
        let Some(expected) = path.parent() else {
            return;
        };
        match node.parent() {
            None => outcome = Err(LinkError::Missing { path: path.clone() }),
            Some(found) if *found != expected => {
                outcome = Err(LinkError::Foreign {
                    path: path.clone(),
                    expected,
                    found: found.clone(),
                });
            }
            Some(_) => {}
        }
    });
    outcome
}
