// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Topology persistence service and storage port for hwtopo tools.

use hwtopo_core::{Board, Codec, DecodingError, EncodingError};
use thiserror::Error;
use tracing::{debug, warn};

/// Storage port for raw config blobs (keyed by logical name).
pub trait ConfigStore {
    /// Load a raw config blob. Returns `NotFound` when missing.
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError>;
    /// Persist a raw config blob.
    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError>;
}

/// Error type for config operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Key not present in store.
    #[error("not found")]
    NotFound,
    /// Key cannot name a stored blob.
    #[error("invalid key `{0}`")]
    InvalidKey(String),
    /// I/O error while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored blob is not UTF-8 text.
    #[error("stored topology is not utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// Topology could not be encoded.
    #[error("encode error: {0}")]
    Encoding(#[from] EncodingError),
    /// Stored topology could not be decoded.
    #[error("decode error: {0}")]
    Decoding(#[from] DecodingError),
    /// Catch-all error variant.
    #[error("other: {0}")]
    Other(String),
}

/// Thin service that encodes topologies and delegates storage to a `ConfigStore`.
pub struct ConfigService<S> {
    store: S,
}

impl<S> ConfigService<S> {
    /// Create a new service using the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Borrow the inner store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service and return the inner store.
    pub fn into_inner(self) -> S {
        self.store
    }
}

impl<S> ConfigService<S>
where
    S: ConfigStore,
{
    /// Load and decode the topology stored under `key`, with every
    /// back-reference restored. Returns `Ok(None)` if missing.
    pub fn load_topology(&self, key: &str, codec: &Codec) -> Result<Option<Board>, ConfigError> {
        match self.store.load_raw(key) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    return Ok(None);
                }
                let text = std::str::from_utf8(&bytes)?;
                let board = codec.read(text)?;
                debug!(key, nodes = board.node_count(), "topology loaded");
                Ok(Some(board))
            }
            Err(ConfigError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Encode and persist `board` under `key`.
    pub fn save_topology(&self, key: &str, codec: &Codec, board: &Board) -> Result<(), ConfigError> {
        let text = codec.write(board)?;
        self.store.save_raw(key, text.as_bytes())?;
        debug!(key, nodes = board.node_count(), "topology saved");
        Ok(())
    }

    /// Load the topology under `key`, falling back to `default()` when it is
    /// missing or cannot be read.
    pub fn load_topology_or_else<F>(&self, key: &str, codec: &Codec, default: F) -> Board
    where
        F: FnOnce() -> Board,
    {
        match self.load_topology(key, codec) {
            Ok(Some(board)) => board,
            Ok(None) => default(),
            Err(err) => {
                warn!(key, error = %err, "stored topology unreadable; using default");
                default()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use hwtopo_catalog::{sample_topology, StockEnumerator};
    use hwtopo_core::{configure, verify_links, DelegateBoard};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemStore {
        blobs: RefCell<HashMap<String, Vec<u8>>>,
    }

    impl ConfigStore for MemStore {
        fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
            self.blobs
                .borrow()
                .get(key)
                .cloned()
                .ok_or(ConfigError::NotFound)
        }

        fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
            self.blobs.borrow_mut().insert(key.to_owned(), data.to_vec());
            Ok(())
        }
    }

    fn codec() -> Codec {
        configure(&StockEnumerator).unwrap()
    }

    #[test]
    fn save_then_load_restores_linked_topology() {
        let codec = codec();
        let service = ConfigService::new(MemStore::default());
        let board = sample_topology();

        service.save_topology("bench", &codec, &board).unwrap();
        let loaded = service.load_topology("bench", &codec).unwrap().unwrap();
        assert_eq!(loaded, board);
        verify_links(&loaded).unwrap();
    }

    #[test]
    fn missing_and_empty_blobs_load_as_none() {
        let codec = codec();
        let service = ConfigService::new(MemStore::default());
        assert!(service.load_topology("absent", &codec).unwrap().is_none());

        service.store().save_raw("blank", b"").unwrap();
        assert!(service.load_topology("blank", &codec).unwrap().is_none());
    }

    #[test]
    fn corrupt_blobs_surface_typed_errors() {
        let codec = codec();
        let service = ConfigService::new(MemStore::default());
        service.store().save_raw("binary", &[0xff, 0xfe]).unwrap();
        service.store().save_raw("garbled", b"{ nope").unwrap();

        assert!(matches!(
            service.load_topology("binary", &codec),
            Err(ConfigError::Utf8(_))
        ));
        assert!(matches!(
            service.load_topology("garbled", &codec),
            Err(ConfigError::Decoding(DecodingError::Malformed(_)))
        ));
    }

    #[test]
    fn unreadable_topology_falls_back_to_default() {
        let codec = codec();
        let service = ConfigService::new(MemStore::default());
        service.store().save_raw("garbled", b"[]").unwrap();

        let board = service.load_topology_or_else("garbled", &codec, || {
            hwtopo_core::Board::new(DelegateBoard::named("fallback"))
        });
        assert_eq!(
            board.hardware().downcast_ref::<DelegateBoard>(),
            Some(&DelegateBoard::named("fallback"))
        );
    }
}
