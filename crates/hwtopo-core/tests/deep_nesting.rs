// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use common::{codec, Bridge, Hat, Modem, Pi, Probe};
use hwtopo_core::{
    verify_links, Board, BusComponent, Capability, Extension, HardwareType, I2c, NodePath,
    PathStep, Spi, Uart,
};

/// Board → extension → I2C bridge → SPI bridge → UART modem.
fn chain() -> Board {
    let modem = BusComponent::<Uart>::new(Modem { baud: 57_600 });
    let spi_bridge = BusComponent::<Spi>::new(Bridge { channels: 1 }).with_device(modem);
    let i2c_bridge = BusComponent::<I2c>::new(Bridge { channels: 4 }).with_device(spi_bridge);
    let hat = Extension::new(Hat {
        label: "chain".into(),
        parent: None,
    })
    .with_device(i2c_bridge);
    Board::new(Pi {
        model: "4B".into(),
        status_led: None,
    })
    .with_extension(hat)
}

fn chain_paths() -> Vec<NodePath> {
    let mut paths = vec![NodePath::root()];
    for step in [
        PathStep::Extension(0),
        PathStep::I2c(0),
        PathStep::Spi(0),
        PathStep::Uart(0),
    ] {
        let next = paths[paths.len() - 1].child(step);
        paths.push(next);
    }
    paths
}

#[test]
fn every_level_links_to_its_immediate_parent_after_read() {
    let codec = codec();
    let board = codec.read(&codec.write(&chain()).unwrap()).unwrap();
    verify_links(&board).unwrap();

    let paths = chain_paths();
    let expected = [
        Capability::Board,
        Capability::Extension,
        Capability::I2c,
        Capability::Spi,
        Capability::Uart,
    ];
    for (path, capability) in paths.iter().zip(expected) {
        assert_eq!(board.node(path).unwrap().capability(), capability, "{path}");
    }
    for pair in paths.windows(2) {
        let (parent, child) = (&pair[0], &pair[1]);
        let resolved = board.parent_of(child).unwrap();
        assert_eq!(board.node(child).unwrap().parent(), Some(parent));
        assert_eq!(
            resolved.hardware().type_name(),
            board.node(parent).unwrap().hardware().type_name()
        );
    }
    assert!(board.parent_of(&NodePath::root()).is_none());
}

#[test]
fn decode_alone_leaves_links_for_restore() {
    let codec = codec();
    let text = codec.write(&chain()).unwrap();

    let mut bare = codec.decode(&text).unwrap();
    assert!(verify_links(&bare).is_err());

    hwtopo_core::restore(&mut bare);
    verify_links(&bare).unwrap();
    assert_eq!(bare, codec.read(&text).unwrap());
}

#[test]
fn same_type_under_two_bus_kinds_keeps_each_capability() {
    let board = chain();
    let i2c = &board.extensions()[0].bus().i2c().unwrap()[0];
    let spi = &i2c.bus().spi().unwrap()[0];
    assert!(i2c.hardware().is::<Bridge>());
    assert!(spi.hardware().is::<Bridge>());
    assert!(!i2c.hardware().eq_dyn(spi.hardware()));

    let encoded = codec().to_value(&board).unwrap();
    let nested = &encoded["extensions"][0]["i2c"][0]["spi"][0];
    assert_eq!(nested["type"], Bridge::TYPE_NAME);
    assert_eq!(nested["uart"][0]["baud"], 57_600);
}

#[test]
fn chains_deeper_than_the_default_parser_limit_round_trip() {
    // Each level costs an object and an array; 200 levels is well past the
    // 128-deep limit serde_json applies by default.
    const DEPTH: u8 = 200;
    let mut device = BusComponent::<I2c>::new(Probe { id: DEPTH });
    for id in (1..DEPTH).rev() {
        device = BusComponent::<I2c>::new(Probe { id }).with_device(device);
    }
    let board = Board::new(Probe { id: 0 }).with_device(device);

    let codec = codec();
    let text = codec.write(&board).unwrap();
    let back = codec.read(&text).unwrap();

    assert_eq!(back.node_count(), usize::from(DEPTH) + 1);
    verify_links(&back).unwrap();
    assert_eq!(back, board);

    let deepest = (0..DEPTH).fold(NodePath::root(), |path, _| path.child(PathStep::I2c(0)));
    let leaf = back.node(&deepest).unwrap();
    assert_eq!(leaf.hardware().downcast_ref::<Probe>(), Some(&Probe { id: DEPTH }));
}

#[test]
fn trailing_text_after_the_topology_is_malformed() {
    let codec = codec();
    let mut text = codec.write(&chain()).unwrap();
    text.push_str(" {}");
    assert!(matches!(
        codec.read(&text),
        Err(hwtopo_core::DecodingError::Malformed(_))
    ));
}
