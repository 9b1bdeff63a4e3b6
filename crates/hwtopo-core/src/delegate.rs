// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Generic fallback board, always present in the board registry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::hardware::{BoardHardware, HardwareType};
use crate::registry::Implementation;

/// Board with no specialized model.
///
/// Keeps every property verbatim as raw JSON, so a board whose layout is not
/// one of the modeled kinds still round-trips whatever its fields hold.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DelegateBoard {
    /// Every property of the board, in document order.
    pub properties: Map<String, Value>,
}

impl DelegateBoard {
    /// Property holding the display name.
    pub const NAME_KEY: &'static str = "name";

    /// Delegate board with a display name and no other properties.
    pub fn named(name: impl Into<String>) -> Self {
        let mut properties = Map::new();
        properties.insert(Self::NAME_KEY.to_owned(), Value::String(name.into()));
        Self { properties }
    }

    /// Display name, when the `name` property is a string.
    pub fn name(&self) -> Option<&str> {
        self.properties.get(Self::NAME_KEY).and_then(Value::as_str)
    }
}

impl HardwareType for DelegateBoard {
    const TYPE_NAME: &'static str = concat!(module_path!(), "::DelegateBoard");
}

impl BoardHardware for DelegateBoard {}

/// Append [`DelegateBoard`] to discovered board implementations unless one
/// is already there. Idempotent.
pub fn ensure_delegate(boards: &mut Vec<Implementation>) {
    if !boards
        .iter()
        .any(|implementation| implementation.type_name() == DelegateBoard::TYPE_NAME)
    {
        boards.push(Implementation::board::<DelegateBoard>());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn delegate_count(boards: &[Implementation]) -> usize {
        boards
            .iter()
            .filter(|i| i.type_name() == DelegateBoard::TYPE_NAME)
            .count()
    }

    #[test]
    fn fallback_is_added_once() {
        let mut boards = Vec::new();
        ensure_delegate(&mut boards);
        ensure_delegate(&mut boards);
        assert_eq!(delegate_count(&boards), 1);
    }

    #[test]
    fn discovered_delegate_is_not_duplicated() {
        let mut boards = vec![Implementation::board::<DelegateBoard>()];
        ensure_delegate(&mut boards);
        assert_eq!(boards.len(), 1);
    }

    #[test]
    fn discriminator_is_fully_qualified() {
        assert_eq!(DelegateBoard::TYPE_NAME, "hwtopo_core::delegate::DelegateBoard");
    }

    #[test]
    fn name_is_read_from_properties() {
        assert_eq!(DelegateBoard::named("rig").name(), Some("rig"));
        assert_eq!(DelegateBoard::default().name(), None);
    }

    #[test]
    fn non_string_name_is_kept_verbatim() {
        let board: DelegateBoard = serde_json::from_value(json!({ "name": 42, "pins": 40 })).unwrap();
        assert_eq!(board.name(), None);
        assert_eq!(board.properties.get("name"), Some(&json!(42)));
        assert_eq!(
            serde_json::to_value(&board).unwrap(),
            json!({ "name": 42, "pins": 40 })
        );
    }

    #[test]
    fn properties_round_trip_unchanged() {
        let mut properties = Map::new();
        properties.insert("name".into(), json!("rig"));
        properties.insert("clock_hz".into(), json!(48_000_000));
        let board = DelegateBoard { properties };

        let back: DelegateBoard =
            serde_json::from_value(serde_json::to_value(&board).unwrap()).unwrap();
        assert_eq!(back, board);
        assert_eq!(back.name(), Some("rig"));
    }
}
