// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs, clippy::unwrap_used, clippy::panic)]

mod common;

use common::{codec, sample_board, Adc, Bridge, Hat, Modem, Pi, Sensor};
use hwtopo_core::{
    configure, verify_links, Board, BusComponent, Capability, DelegateBoard, Extension,
    HardwareType, Implementation, NodePath, PathStep, Pin, Uart, TYPE_KEY,
};
use serde_json::{json, Value};

fn objects_with_key<'a>(value: &'a Value, key: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            if map.contains_key(key) {
                out.push(value);
            }
            for child in map.values() {
                objects_with_key(child, key, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                objects_with_key(child, key, out);
            }
        }
        _ => {}
    }
}

#[test]
fn read_of_write_reproduces_the_linked_tree() {
    let codec = codec();
    let board = sample_board();

    let text = codec.write(&board).unwrap();
    let back = codec.read(&text).unwrap();

    assert_eq!(back, board);
    verify_links(&back).unwrap();
    assert_eq!(back.node_count(), 6);
}

#[test]
fn write_is_deterministic_and_stable_across_a_round_trip() {
    let codec = codec();
    let board = sample_board();
    let first = codec.write(&board).unwrap();
    let second = codec.write(&board).unwrap();
    assert_eq!(first, second);

    let again = codec.write(&codec.read(&first).unwrap()).unwrap();
    assert_eq!(again, first);
}

#[test]
fn encoded_layout_matches_schema() {
    let codec = codec();
    let value = codec.to_value(&sample_board()).unwrap();
    assert_eq!(
        value,
        json!({
            "type": Pi::TYPE_NAME,
            "model": "3B",
            "status_led": { "number": 47, "name": "ACT" },
            "extensions": [{
                "type": Hat::TYPE_NAME,
                "label": "sense",
                "i2c": [
                    { "type": Sensor::TYPE_NAME, "address": 0x77, "interrupt": { "number": 4 } },
                    {
                        "type": Bridge::TYPE_NAME,
                        "channels": 2,
                        "spi": [{ "type": Adc::TYPE_NAME, "chip_select": { "number": 8, "name": "CE0" } }]
                    }
                ],
                "uart": []
            }],
            "uart": [{ "type": Modem::TYPE_NAME, "baud": 115_200 }]
        })
    );

    // Discriminator leads every node object.
    let text = codec.write(&sample_board()).unwrap();
    assert!(text.trim_start().starts_with("{\n  \"type\""));
}

#[test]
fn back_reference_never_reaches_the_text() {
    let codec = codec();
    let board = Board::new(Pi {
        model: "4B".into(),
        status_led: None,
    })
    .with_extension(Extension::new(Hat {
        label: "loop".into(),
        parent: Some("should not leak".into()),
    }));

    let text = codec.write(&board).unwrap();
    assert!(!text.contains("should not leak"));
    let value: Value = serde_json::from_str(&text).unwrap();
    let mut leaking = Vec::new();
    objects_with_key(&value, "parent", &mut leaking);
    assert!(leaking.is_empty(), "{leaking:?}");

    // The excluded field comes back at its default.
    let back = codec.read(&text).unwrap();
    let hat = back.extensions()[0].hardware().downcast_ref::<Hat>().unwrap();
    assert_eq!(hat.parent, None);
    assert_eq!(back.extensions()[0].parent(), Some(&NodePath::root()));
}

#[test]
fn hand_authored_parent_fields_are_ignored_on_decode() {
    // Sensor denies unknown fields; `parent` must be dropped before it sees them.
    let text = json!({
        "type": Pi::TYPE_NAME,
        "model": "zero",
        "extensions": [{
            "type": Hat::TYPE_NAME,
            "label": "x",
            "parent": "bogus",
            "i2c": [{
                "type": Sensor::TYPE_NAME,
                "address": 64,
                "interrupt": 17,
                "parent": { "type": Pi::TYPE_NAME }
            }]
        }]
    })
    .to_string();

    let board = codec().read(&text).unwrap();
    let sensor_path = NodePath::root()
        .child(PathStep::Extension(0))
        .child(PathStep::I2c(0));
    let sensor = board.node(&sensor_path).unwrap();
    assert_eq!(
        sensor.hardware().downcast_ref::<Sensor>(),
        Some(&Sensor {
            address: 64,
            interrupt: Pin::new(17)
        })
    );
    assert_eq!(sensor.capability(), Capability::I2c);
    verify_links(&board).unwrap();
}

#[test]
fn delegate_board_round_trips_arbitrary_properties() {
    // Nothing discovered: only the delegate is available.
    let empty = |_: Capability| -> Vec<Implementation> { Vec::new() };
    let codec = configure(&empty).unwrap();

    let text = json!({
        "type": DelegateBoard::TYPE_NAME,
        "name": "custom rig",
        "clock_hz": 48_000_000,
        "notes": ["hand wired"],
        "extensions": []
    })
    .to_string();

    let board = codec.read(&text).unwrap();
    let delegate = board.hardware().downcast_ref::<DelegateBoard>().unwrap();
    assert_eq!(delegate.name(), Some("custom rig"));
    assert_eq!(delegate.properties.get("clock_hz"), Some(&json!(48_000_000)));
    assert!(!delegate.properties.contains_key(TYPE_KEY));

    let back = codec.read(&codec.write(&board).unwrap()).unwrap();
    assert_eq!(back, board);
}

#[test]
fn delegate_board_accepts_any_name_shape() {
    let empty = |_: Capability| -> Vec<Implementation> { Vec::new() };
    let codec = configure(&empty).unwrap();

    let text = json!({
        "type": DelegateBoard::TYPE_NAME,
        "name": 42,
        "extensions": []
    })
    .to_string();
    let board = codec.read(&text).unwrap();
    let delegate = board.hardware().downcast_ref::<DelegateBoard>().unwrap();
    assert_eq!(delegate.name(), None);
    assert_eq!(delegate.properties.get("name"), Some(&json!(42)));

    let value = codec.to_value(&board).unwrap();
    assert_eq!(value["name"], json!(42));
    assert_eq!(codec.read(&value.to_string()).unwrap(), board);
}

#[test]
fn declared_but_empty_roles_survive() {
    let codec = codec();
    let board = Board::new(Pi {
        model: "cm4".into(),
        status_led: None,
    })
    .with_role::<Uart>()
    .with_device(BusComponent::<Uart>::new(Modem { baud: 9600 }).with_role::<Uart>());

    let back = codec.read(&codec.write(&board).unwrap()).unwrap();
    assert!(back.bus().plays::<Uart>());
    assert!(!back.bus().plays::<hwtopo_core::I2c>());
    let modem = &back.bus().uart().unwrap()[0];
    assert_eq!(modem.bus().uart().map(<[_]>::len), Some(0));
    assert!(!modem.bus().is_leaf());
    assert_eq!(back, board);
}
