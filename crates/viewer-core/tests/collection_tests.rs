// Integration tests for the ordered marker collection.

use rand::prelude::*;
use std::collections::HashSet;
use viewer_core::*;

fn marker(id: &str) -> Marker {
    Marker::new(MarkerId::from(id))
}

fn ids(c: &MarkerCollection) -> Vec<&str> {
    c.iter().map(|m| m.id.as_str()).collect()
}

#[test]
fn add_move_remove_example_sequence() {
    let mut c = MarkerCollection::new();
    assert!(c.add(marker("m1")));
    assert!(c.add(marker("m2")));
    assert!(c.move_to(0, 1));
    assert_eq!(ids(&c), ["m2", "m1"]);
    assert!(c.remove(&"m1".into()));
    assert_eq!(ids(&c), ["m2"]);
}

#[test]
fn add_with_existing_id_is_rejected() {
    let mut c = MarkerCollection::new();
    c.add(marker("a"));
    let dup = marker("a").with_title(Language::En, "other");
    assert!(!c.add(dup));
    assert_eq!(c.len(), 1);
    assert_eq!(c.get(&"a".into()).unwrap().content.en.title, "");
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let mut c = MarkerCollection::new();
    c.add(marker("a"));
    let before = c.clone();
    assert!(!c.remove(&"zzz".into()));
    assert!(!c.update(&"zzz".into(), marker("zzz")));
    assert!(!c.set_active(Some("zzz".into())));
    assert_eq!(c, before);
}

#[test]
fn update_replaces_in_place_and_keeps_addressed_id() {
    let mut c = MarkerCollection::new();
    for id in ["a", "b", "c"] {
        c.add(marker(id));
    }
    let replacement = marker("different")
        .with_position(MarkerPosition::new(1.0, 2.0, 3.0))
        .with_title(Language::De, "Fenster");
    assert!(c.update(&"b".into(), replacement));
    assert_eq!(ids(&c), ["a", "b", "c"]);
    let b = c.get(&"b".into()).unwrap();
    assert_eq!(b.position, MarkerPosition::new(1.0, 2.0, 3.0));
    assert_eq!(b.content.de.title, "Fenster");
}

#[test]
fn update_is_idempotent() {
    let mut c = MarkerCollection::new();
    c.add(marker("a"));
    c.add(marker("b"));
    let record = marker("a").with_title(Language::En, "Roof");
    assert!(c.update(&"a".into(), record.clone()));
    let once = c.clone();
    assert!(!c.update(&"a".into(), record));
    assert_eq!(c, once);
}

#[test]
fn move_out_of_range_leaves_sequence_unchanged() {
    let mut c = MarkerCollection::new();
    for id in ["a", "b", "c"] {
        c.add(marker(id));
    }
    assert!(!c.move_to(0, 3));
    assert!(!c.move_to(3, 0));
    assert!(!c.move_to(2, usize::MAX));
    assert_eq!(ids(&c), ["a", "b", "c"]);
}

#[test]
fn move_relocates_exactly_one_element() {
    let base: Vec<String> = (0..6).map(|i| format!("m{i}")).collect();
    for from in 0..base.len() {
        for to in 0..base.len() {
            let mut c = MarkerCollection::new();
            for id in &base {
                c.add(marker(id));
            }
            c.move_to(from, to);

            let mut expected = base.clone();
            let moved = expected.remove(from);
            expected.insert(to, moved);
            assert_eq!(ids(&c), expected, "move({from}, {to})");
        }
    }
}

#[test]
fn removing_active_marker_clears_selection() {
    let mut c = MarkerCollection::new();
    c.add(marker("a"));
    c.add(marker("b"));
    assert!(c.set_active(Some("a".into())));
    c.remove(&"b".into());
    assert_eq!(c.active().map(MarkerId::as_str), Some("a"));
    c.remove(&"a".into());
    assert_eq!(c.active(), None);
}

#[test]
fn toggle_active_selects_then_clears() {
    let mut c = MarkerCollection::new();
    c.add(marker("a"));
    c.add(marker("b"));
    assert!(c.toggle_active(&"a".into()));
    assert_eq!(c.active_marker().map(|m| m.id.as_str()), Some("a"));
    assert!(c.toggle_active(&"b".into()));
    assert_eq!(c.active().map(MarkerId::as_str), Some("b"));
    assert!(c.toggle_active(&"b".into()));
    assert_eq!(c.active(), None);
}

#[test]
fn set_drops_duplicates_and_stale_selection() {
    let mut c = MarkerCollection::new();
    c.add(marker("x"));
    c.set_active(Some("x".into()));
    c.set(vec![marker("a"), marker("b"), marker("a")]);
    assert_eq!(ids(&c), ["a", "b"]);
    assert_eq!(c.active(), None);
}

#[test]
fn set_keeps_first_occurrence_of_each_id() {
    let mut c = MarkerCollection::new();
    let markers: Vec<Marker> = (0..2_000)
        .map(|i| {
            marker(&format!("id{}", i % 10))
                .with_title(Language::En, format!("copy {}", i / 10))
        })
        .collect();
    c.set(markers);
    assert_eq!(c.len(), 10);
    assert_eq!(ids(&c)[..3], ["id0", "id1", "id2"]);
    assert!(c.iter().all(|m| m.content.en.title == "copy 0"));
}

// Property: ids stay unique under random add/remove/update/move sequences.
#[test]
fn ids_stay_unique_under_random_operations() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let pool: Vec<String> = (0..8).map(|i| format!("id{i}")).collect();
    let mut c = MarkerCollection::new();

    for step in 0..2_000 {
        let id = pool.choose(&mut rng).unwrap().clone();
        match rng.gen_range(0..5) {
            0 | 1 => {
                c.add(marker(&id));
            }
            2 => {
                c.remove(&MarkerId::from(id.as_str()));
            }
            3 => {
                let other = pool.choose(&mut rng).unwrap();
                c.update(&MarkerId::from(id.as_str()), marker(other));
            }
            _ => {
                let len = c.len().max(1);
                c.move_to(rng.gen_range(0..len), rng.gen_range(0..len + 1));
            }
        }
        let unique: HashSet<&str> = ids(&c).into_iter().collect();
        assert_eq!(unique.len(), c.len(), "duplicate id after step {step}");
        if let Some(active) = c.active() {
            assert!(c.get(active).is_some());
        }
    }
}
