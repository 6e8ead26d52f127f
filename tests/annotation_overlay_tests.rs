use std::collections::HashSet;

use graph_panel::core::annotations::{DEFAULT_MARKER_SIZE, MarkerPosition};
use graph_panel::core::{Annotation, build_annotation_overlay};
use proptest::prelude::*;

#[test]
fn empty_list_has_no_overlay() {
    assert!(build_annotation_overlay(&[]).is_none());
}

#[test]
fn first_seen_color_wins_per_type() {
    let events = vec![
        Annotation::new(1_000.0, "deploy", "#00ff00").with_title("v1"),
        Annotation::new(2_000.0, "alert", "#ff0000"),
        Annotation::new(3_000.0, "deploy", "#0000ff"),
    ];
    let overlay = build_annotation_overlay(&events).expect("overlay");

    assert_eq!(overlay.levels, 3);
    assert_eq!(overlay.data, events);
    let names: Vec<&str> = overlay.types.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["deploy", "alert"]);

    let deploy = &overlay.types["deploy"];
    assert_eq!(deploy.color, "#00ff00");
    assert_eq!(deploy.position, MarkerPosition::Bottom);
    assert_eq!(deploy.marker_size, DEFAULT_MARKER_SIZE);
}

proptest! {
    #[test]
    fn levels_are_distinct_types_plus_one(type_ids in prop::collection::vec(0u8..6, 1..40)) {
        let events: Vec<Annotation> = type_ids
            .iter()
            .enumerate()
            .map(|(index, id)| Annotation::new(index as f64, format!("type-{id}"), format!("color-{index}")))
            .collect();
        let distinct: HashSet<u8> = type_ids.iter().copied().collect();

        let overlay = build_annotation_overlay(&events).expect("overlay");
        prop_assert_eq!(overlay.types.len(), distinct.len());
        prop_assert_eq!(overlay.levels, distinct.len() + 1);

        for (name, kind) in &overlay.types {
            let first = events
                .iter()
                .find(|event| &event.annotation.name == name)
                .expect("registered type has an event");
            prop_assert_eq!(&kind.color, &first.annotation.icon_color);
        }
    }
}
