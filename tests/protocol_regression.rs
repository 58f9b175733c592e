//! End-to-end wire flow: client-serialized messages parsed, dispatched, and
//! processed against the in-memory storage collaborator.

use trackdb::{
    message::{parse_message, MESSAGE_GET_ACTION, PROTOCOL_VERSION},
    ActionDirectory, DescriptorTable, EaddData, EaddMessage, GetActionMessage, MemoryTable,
    Message, PropertyType, Record, SchemaManager, TrackError,
};

fn sample_eadd() -> EaddMessage {
    EaddMessage::new(
        42,
        1_351_700_000_000,
        "checkout",
        vec![
            EaddData {
                key: "plan".into(),
                value: b"pro".to_vec(),
            },
            EaddData {
                key: "total".into(),
                value: b"100.2".to_vec(),
            },
        ],
    )
}

#[test]
fn eadd_wire_bytes_reach_the_table() {
    let table = MemoryTable::new();
    let bytes = sample_eadd().serialize();

    let Message::Eadd(parsed) = parse_message(&bytes).unwrap() else {
        panic!("expected an eadd message");
    };
    parsed.process(&table).unwrap();

    let events = table.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].object_id, 42);
    assert_eq!(events[0].timestamp, 1_351_700_000_000);
    assert_eq!(events[0].data.len(), 2);
    assert_eq!(events[0].data[0].key, "plan");

    // Processing registered the action under id 1.
    let action = table.lookup_action(1).unwrap().unwrap();
    assert_eq!(action.name, "checkout");
}

#[test]
fn get_action_round_trip_against_populated_table() {
    let table = MemoryTable::new();
    let defined = table.define_action("checkout");

    let bytes = GetActionMessage::new(defined.id).serialize();
    let Message::GetAction(parsed) = parse_message(&bytes).unwrap() else {
        panic!("expected a get-action message");
    };
    assert_eq!(parsed.header.version, PROTOCOL_VERSION);
    assert_eq!(parsed.header.kind, MESSAGE_GET_ACTION);

    let mut response = Vec::new();
    parsed.process(&table, &mut response).unwrap();

    let mut expected = Vec::new();
    defined.serialize(&mut expected);
    assert_eq!(response, expected);
}

#[test]
fn get_action_miss_is_an_error_not_a_crash() {
    let table = MemoryTable::new();
    let message = GetActionMessage::new(7);

    let mut response = Vec::new();
    let err = message.process(&table, &mut response).unwrap_err();
    assert!(matches!(err, TrackError::ActionNotFound(7)));
    assert!(response.is_empty());
}

#[test]
fn schema_layout_materializes_decoded_values() {
    let dir = tempfile::tempdir().unwrap();
    let manager = SchemaManager::load(dir.path().join("properties.json")).unwrap();

    let total = manager.define("total", PropertyType::Integer).unwrap();
    let price = manager.define("price", PropertyType::Float).unwrap();
    let plan = manager.define("plan", PropertyType::String).unwrap();

    let (table, capacity) = manager.build_descriptor().unwrap();
    let mut record = Record::with_capacity(capacity);

    let int_buf = [0xD1, 0x03, 0xE8];
    let float_buf = [0xCB, 0x40, 0x59, 0x0C, 0xCC, 0xCC, 0xCC, 0xCC, 0xCD];
    let str_buf = [0xA3, 0x66, 0x6F, 0x6F];

    assert_eq!(table.set_value(&mut record, total.id, &int_buf).unwrap(), 3);
    assert_eq!(
        table.set_value(&mut record, price.id, &float_buf).unwrap(),
        9
    );
    assert_eq!(table.set_value(&mut record, plan.id, &str_buf).unwrap(), 4);

    let total_offset = table.descriptor(total.id).unwrap().offset;
    assert_eq!(record.read_i64(total_offset).unwrap(), 1000);

    let price_offset = table.descriptor(price.id).unwrap().offset;
    assert!((record.read_f64(price_offset).unwrap() - 100.2).abs() < 0.1);

    let plan_offset = table.descriptor(plan.id).unwrap().offset;
    let view = record.read_str_ref(plan_offset).unwrap();
    assert_eq!(view.resolve(&str_buf).unwrap(), b"foo");
}

#[test]
fn mixed_sign_ranges_resolve_every_id() {
    for (min, max) in [(-20, 30), (-1, 0), (0, 0), (-5, 5)] {
        let table = DescriptorTable::new(min, max).unwrap();
        for id in min..=max {
            assert_eq!(table.descriptor(id).unwrap().property_id, id);
        }
        assert!(matches!(
            table.descriptor(max + 1),
            Err(TrackError::UnknownProperty(_))
        ));
        assert!(matches!(
            table.descriptor(min - 1),
            Err(TrackError::UnknownProperty(_))
        ));
    }
}
