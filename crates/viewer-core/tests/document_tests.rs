// Integration tests for scene export/import through the store.

use rand::prelude::*;
use viewer_core::*;

fn populated_store() -> Store {
    let mut store = Store::new();
    let commands = vec![
        Command::SetScale(2.5),
        Command::SetPosition(Axis::X, -12.3),
        Command::SetPosition(Axis::Z, 40.0),
        Command::SetRotation(Axis::Y, 0.25),
        Command::AddMarker(
            Marker::new("door".into())
                .with_position(MarkerPosition::new(1.5, 0.1, -3.0))
                .with_title(Language::En, "Door")
                .with_title(Language::De, "Tür"),
        ),
        Command::AddMarker(Marker::new("roof".into())),
    ];
    for c in commands {
        store.dispatch(c).unwrap();
    }
    store
}

#[test]
fn export_has_documented_shape_and_order() {
    let store = populated_store();
    let text = store.export().unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    for key in [
        "scale",
        "positionX",
        "positionY",
        "positionZ",
        "rotationX",
        "rotationY",
        "rotationZ",
        "items",
    ] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["items"][0]["id"], "door");
    assert_eq!(value["items"][0]["position"]["x"], 1.5);
    assert_eq!(value["items"][0]["content"]["de"]["title"], "Tür");
    assert_eq!(value["items"][1]["content"]["en"]["description"], "");

    // Field order follows the struct, not alphabetical order.
    let scale_at = text.find("\"scale\"").unwrap();
    let items_at = text.find("\"items\"").unwrap();
    assert!(scale_at < items_at);
    // Two-space indentation.
    assert!(text.contains("\n  \"scale\": 2.5"));
}

#[test]
fn export_import_export_round_trips_exactly() {
    let store = populated_store();
    let first = store.export().unwrap();

    let mut other = Store::new();
    other.dispatch(Command::Import(first.clone())).unwrap();
    let second = other.export().unwrap();
    assert_eq!(first, second);
}

#[test]
fn malformed_json_leaves_state_untouched() {
    let mut store = populated_store();
    let before = store.export().unwrap();
    let revision = store.revision();

    let err = store
        .dispatch(Command::Import("{\"scale\": 3,".to_string()))
        .unwrap_err();
    assert!(matches!(err, StoreError::Import(ImportError::Parse(_))));
    assert_eq!(store.export().unwrap(), before);
    assert_eq!(store.revision(), revision);
}

#[test]
fn ill_typed_field_rejects_whole_document() {
    let mut store = populated_store();
    let before = store.export().unwrap();
    let err = store
        .dispatch(Command::Import(
            r#"{"scale": 9, "items": [{"position": {"x": 1}}]}"#.to_string(),
        ))
        .unwrap_err();
    match err {
        StoreError::Import(ImportError::Field { key, .. }) => assert_eq!(key, "items"),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(store.export().unwrap(), before);
}

#[test]
fn import_merges_only_present_keys() {
    let mut store = populated_store();
    let changes = store
        .dispatch(Command::Import(r#"  {"positionY": 7, "extra": true}  "#.to_string()))
        .unwrap();
    assert_eq!(changes, Changes::TRANSFORM);

    let t = store.state().transform;
    assert_eq!(t.scale, 2.5);
    assert_eq!(t.position.x, -12.3);
    assert_eq!(t.position.y, 7.0);
    assert_eq!(store.state().markers.len(), 2);

    let report = store.last_import().unwrap();
    assert_eq!(report.applied, vec!["positionY".to_string()]);
    assert_eq!(report.ignored, vec!["extra".to_string()]);
}

#[test]
fn import_replacing_items_clears_dangling_active_marker() {
    let mut store = populated_store();
    store
        .dispatch(Command::SetActiveMarker(Some("door".into())))
        .unwrap();
    let changes = store
        .dispatch(Command::Import(
            r#"{"items": [{"id": "new", "position": [1, 2, 3]}]}"#.to_string(),
        ))
        .unwrap();
    assert!(changes.contains(Changes::MARKERS | Changes::ACTIVE));
    let markers = &store.state().markers;
    assert_eq!(markers.active(), None);
    assert_eq!(
        markers.get(&"new".into()).unwrap().position,
        MarkerPosition::new(1.0, 2.0, 3.0)
    );
}

#[test]
fn import_accepts_visibility_and_active_id() {
    let mut store = populated_store();
    store
        .dispatch(Command::Import(
            r#"{"modelIsHidden": true, "activeItemId": "roof"}"#.to_string(),
        ))
        .unwrap();
    assert!(store.state().model_hidden);
    assert_eq!(
        store.state().markers.active().map(MarkerId::as_str),
        Some("roof")
    );
}

#[test]
fn non_object_and_empty_imports_are_errors() {
    let mut store = Store::new();
    assert!(matches!(
        store.dispatch(Command::Import("42".into())),
        Err(StoreError::Import(ImportError::NotAnObject { .. }))
    ));
    assert!(matches!(
        store.dispatch(Command::Import("   ".into())),
        Err(StoreError::Import(ImportError::Empty))
    ));
}

#[test]
fn import_rejects_numbers_beyond_f32_range() {
    let mut store = populated_store();
    let before = store.export().unwrap();
    for doc in [
        r#"{"positionX": 1e39}"#,
        r#"{"scale": "-1e40"}"#,
        r#"{"items": [{"id": "far", "position": {"x": 1e39}}]}"#,
    ] {
        let err = store.dispatch(Command::Import(doc.to_string())).unwrap_err();
        assert!(
            matches!(err, StoreError::Import(ImportError::Field { .. })),
            "{doc}: {err:?}"
        );
    }
    assert_eq!(store.export().unwrap(), before);
}

#[test]
fn export_refuses_non_finite_values() {
    let mut store = populated_store();
    store.dispatch(Command::SetScale(f32::NAN)).unwrap();
    match store.export() {
        Err(ExportError::NonFinite { key }) => assert_eq!(key, "scale"),
        other => panic!("unexpected {other:?}"),
    }

    let mut store = populated_store();
    let moved = Marker::new("door".into())
        .with_position(MarkerPosition::new(0.0, f32::INFINITY, 0.0));
    store
        .dispatch(Command::UpdateMarker {
            id: "door".into(),
            marker: moved,
        })
        .unwrap();
    match store.export() {
        Err(ExportError::NonFinite { key }) => assert_eq!(key, "items[0].position"),
        other => panic!("unexpected {other:?}"),
    }
}

const EDGE_VALUES: [f32; 9] = [
    0.0,
    -0.0,
    1.0,
    f32::MAX,
    f32::MIN,
    f32::MIN_POSITIVE,
    1e-45,
    -3.5e-40,
    f32::EPSILON,
];

const NON_FINITE: [f32; 3] = [f32::NAN, f32::INFINITY, f32::NEG_INFINITY];

fn random_value(rng: &mut StdRng) -> f32 {
    match rng.gen_range(0..10) {
        0..=3 => *EDGE_VALUES.choose(rng).unwrap(),
        4 => *NON_FINITE.choose(rng).unwrap(),
        _ => rng.gen_range(-1.0e6f32..1.0e6),
    }
}

fn random_marker(rng: &mut StdRng, id: &str) -> Marker {
    let position = MarkerPosition::new(random_value(rng), random_value(rng), random_value(rng));
    let mut m = Marker::new(id.into()).with_position(position);
    if rng.gen_bool(0.5) {
        m = m.with_title(Language::En, format!("title {}", rng.gen::<u16>()));
    }
    if rng.gen_bool(0.3) {
        m.content.de.description = "<p>Beschreibung &amp; \"Zitat\"</p>".to_string();
    }
    m
}

fn random_command(rng: &mut StdRng, ids: &[String]) -> Command {
    let axis = *Axis::ALL.choose(rng).unwrap();
    let id = ids.choose(rng).unwrap().as_str();
    match rng.gen_range(0..8) {
        0 => Command::SetScale(random_value(rng)),
        1 => Command::SetPosition(axis, random_value(rng)),
        2 => Command::SetRotation(axis, random_value(rng)),
        3 | 4 => Command::AddMarker(random_marker(rng, id)),
        5 => Command::UpdateMarker {
            id: id.into(),
            marker: random_marker(rng, id),
        },
        6 => Command::RemoveMarker(id.into()),
        _ => Command::MoveMarker {
            from: rng.gen_range(0..4),
            to: rng.gen_range(0..4),
        },
    }
}

// Property: export(import(export(s))) == export(s) for every exportable state,
// and states holding NaN or infinity refuse to export.
#[test]
fn export_round_trips_under_random_commands() {
    let mut rng = StdRng::seed_from_u64(0xe4_90_47);
    let ids: Vec<String> = (0..5).map(|i| format!("m{i}")).collect();
    let mut store = Store::new();
    let mut exported = 0;

    for step in 0..1_500 {
        store.dispatch(random_command(&mut rng, &ids)).unwrap();

        let t = store.state().transform;
        let finite = [t.scale, t.position.x, t.position.y, t.position.z]
            .into_iter()
            .chain([t.rotation.x, t.rotation.y, t.rotation.z])
            .all(f32::is_finite)
            && store.state().markers.iter().all(|m| m.position.is_finite());

        match store.export() {
            Ok(first) => {
                assert!(finite, "step {step}: exported a non-finite state");
                let mut other = Store::new();
                other
                    .dispatch(Command::Import(first.clone()))
                    .unwrap_or_else(|e| panic!("step {step}: re-import failed: {e}\n{first}"));
                assert_eq!(other.export().unwrap(), first, "step {step}");
                exported += 1;
            }
            Err(ExportError::NonFinite { .. }) => assert!(!finite, "step {step}"),
            Err(e) => panic!("step {step}: {e}"),
        }

        // Keep the walk from getting stuck on a poisoned value.
        if !finite && rng.gen_bool(0.5) {
            store
                .dispatch(Command::Import(
                    r#"{"scale": 1, "positionX": 0, "positionY": 0, "positionZ": 0,
                        "rotationX": 0, "rotationY": 0, "rotationZ": 0, "items": []}"#
                        .to_string(),
                ))
                .unwrap();
        }
    }
    assert!(exported > 300, "only {exported} exportable states visited");
}

// Property: applying the same update twice changes nothing the second time.
#[test]
fn update_is_idempotent_under_random_records() {
    let mut rng = StdRng::seed_from_u64(0x1d_e4);
    let ids: Vec<String> = (0..4).map(|i| format!("m{i}")).collect();
    let mut store = Store::new();
    for id in &ids {
        store
            .dispatch(Command::AddMarker(Marker::new(id.as_str().into())))
            .unwrap();
    }

    for step in 0..500 {
        let id = ids.choose(&mut rng).unwrap().clone();
        // Incoming record may carry another id; the addressed one is kept.
        let carried = ids.choose(&mut rng).unwrap().clone();
        let mut record = random_marker(&mut rng, &carried);
        if !record.position.is_finite() {
            record.position = MarkerPosition::new(EDGE_VALUES[step % EDGE_VALUES.len()], 0.0, -0.0);
        }
        let update = Command::UpdateMarker {
            id: id.as_str().into(),
            marker: record,
        };
        store.dispatch(update.clone()).unwrap();
        let once = store.state().markers.clone();
        let revision = store.revision();

        assert_eq!(store.dispatch(update).unwrap(), Changes::NONE, "step {step}");
        assert_eq!(store.state().markers, once);
        assert_eq!(store.revision(), revision);
    }
}
