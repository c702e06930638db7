// Integration tests for debounced edits.

use instant::Instant;
use std::time::Duration;
use viewer_core::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn collection(ids: &[&str]) -> MarkerCollection {
    let mut c = MarkerCollection::new();
    for id in ids {
        c.add(Marker::new((*id).into()));
    }
    c
}

#[test]
fn pending_edit_waits_for_quiet_period() {
    let t0 = Instant::now();
    let mut edit = PendingEdit::default();
    edit.stage("a".to_string(), t0);
    assert!(edit.is_pending());
    assert_eq!(edit.take_due(t0 + ms(EDIT_DEBOUNCE_MS - 1)), None);

    // Typing again restarts the timer.
    edit.stage("ab".to_string(), t0 + ms(400));
    assert_eq!(edit.take_due(t0 + ms(600)), None);
    assert_eq!(edit.take_due(t0 + ms(900)), Some("ab".to_string()));
    assert!(!edit.is_pending());
    assert_eq!(edit.take_due(t0 + ms(5_000)), None);
}

#[test]
fn flush_and_cancel_bypass_the_timer() {
    let t0 = Instant::now();
    let mut edit = PendingEdit::new(ms(10_000));
    edit.stage(1, t0);
    assert_eq!(edit.flush(), Some(1));
    edit.stage(2, t0);
    edit.cancel();
    assert_eq!(edit.flush(), None);
}

#[test]
fn marker_edits_commit_field_patches_on_current_record() {
    let t0 = Instant::now();
    let mut store = Store::new();
    store
        .dispatch(Command::AddMarker(
            Marker::new("a".into()).with_title(Language::De, "Alt"),
        ))
        .unwrap();

    let mut edits = MarkerEdits::default();
    let id = MarkerId::from("a");
    edits.stage(&id, t0, |p| p.set_title(Language::En, "Door"));
    edits.stage(&id, t0 + ms(100), |p| {
        p.position = Some(MarkerPosition::new(1.0, 2.0, 3.0))
    });
    assert_eq!(edits.pending_position(&id), Some(MarkerPosition::new(1.0, 2.0, 3.0)));

    // A direct store write to another field lands before the commit.
    let mut current = store.state().markers.get(&id).unwrap().clone();
    current.content.de.description = "neu".into();
    store
        .dispatch(Command::UpdateMarker {
            id: id.clone(),
            marker: current,
        })
        .unwrap();

    assert!(edits.take_due(t0 + ms(550), &store.state().markers).is_empty());
    let commands = edits.take_due(t0 + ms(600), &store.state().markers);
    assert_eq!(commands.len(), 1);
    for c in commands {
        store.dispatch(c).unwrap();
    }
    assert!(edits.is_empty());

    let m = store.state().markers.get(&id).unwrap();
    assert_eq!(m.content.en.title, "Door");
    assert_eq!(m.content.de.title, "Alt");
    assert_eq!(m.content.de.description, "neu");
    assert_eq!(m.position, MarkerPosition::new(1.0, 2.0, 3.0));
}

#[test]
fn edits_for_removed_markers_are_dropped() {
    let t0 = Instant::now();
    let markers = collection(&["a", "b"]);
    let mut edits = MarkerEdits::default();
    edits.stage(&"a".into(), t0, |p| p.set_description(Language::En, "x"));
    edits.stage(&"gone".into(), t0, |p| p.set_title(Language::En, "y"));

    let commands = edits.flush_all(&markers);
    assert_eq!(commands.len(), 1);
    match &commands[0] {
        Command::UpdateMarker { id, marker } => {
            assert_eq!(id.as_str(), "a");
            assert_eq!(marker.content.en.description, "x");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(edits.is_empty());
}

#[test]
fn flush_one_marker_leaves_others_pending() {
    let t0 = Instant::now();
    let markers = collection(&["a", "b"]);
    let mut edits = MarkerEdits::default();
    edits.stage(&"a".into(), t0, |p| p.set_title(Language::De, "A"));
    edits.stage(&"b".into(), t0, |p| p.set_title(Language::De, "B"));

    assert!(edits.flush(&"a".into(), &markers).is_some());
    assert!(edits.pending(&"a".into()).is_none());
    assert_eq!(edits.pending(&"b".into()).and_then(|p| p.title(Language::De)), Some("B"));

    edits.cancel(&"b".into());
    assert!(edits.is_empty());
}

#[test]
fn due_commands_come_out_in_id_order() {
    let t0 = Instant::now();
    let markers = collection(&["c", "a", "b"]);
    let mut edits = MarkerEdits::new(ms(0));
    for id in ["c", "b", "a"] {
        edits.stage(&id.into(), t0, |p| p.set_title(Language::En, id));
    }
    let ids: Vec<String> = edits
        .take_due(t0, &markers)
        .into_iter()
        .filter_map(|c| match c {
            Command::UpdateMarker { id, .. } => Some(id.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);
}
