use graph_panel::core::{MarkingRange, Threshold, build_threshold_markings};

fn band(value: f64, color: &str) -> Threshold {
    Threshold::new(Some(value), color)
}

#[test]
fn ascending_bands_chain_then_extend_upward() {
    let markings = build_threshold_markings(&band(10.0, "warn"), &band(20.0, "crit"));
    assert_eq!(markings.len(), 2);
    assert_eq!(
        markings[0].yaxis,
        MarkingRange {
            from: 10.0,
            to: Some(20.0)
        }
    );
    assert_eq!(markings[0].color, "warn");
    assert_eq!(
        markings[1].yaxis,
        MarkingRange {
            from: 20.0,
            to: Some(f64::INFINITY)
        }
    );
}

#[test]
fn descending_bands_extend_downward() {
    let markings = build_threshold_markings(&band(20.0, "warn"), &band(10.0, "crit"));
    assert_eq!(
        markings[0].yaxis,
        MarkingRange {
            from: 20.0,
            to: Some(10.0)
        }
    );
    assert_eq!(
        markings[1].yaxis,
        MarkingRange {
            from: 10.0,
            to: Some(f64::NEG_INFINITY)
        }
    );
}

#[test]
fn lone_first_band_is_unbounded() {
    let markings = build_threshold_markings(&band(5.0, "warn"), &Threshold::new(None, "crit"));
    assert_eq!(markings.len(), 1);
    assert_eq!(markings[0].yaxis, MarkingRange { from: 5.0, to: None });
}

#[test]
fn zero_second_threshold_leaves_first_band_open() {
    let markings = build_threshold_markings(&band(10.0, "warn"), &band(0.0, "crit"));
    assert_eq!(markings.len(), 2);
    assert_eq!(markings[0].yaxis, MarkingRange { from: 10.0, to: None });
    assert_eq!(
        markings[1].yaxis,
        MarkingRange {
            from: 0.0,
            to: Some(f64::NEG_INFINITY)
        }
    );
}

#[test]
fn lines_collapse_to_their_own_value() {
    let first = band(10.0, "warn").as_line(true);
    let second = band(20.0, "crit").as_line(true);
    let markings = build_threshold_markings(&first, &second);
    assert_eq!(markings[0].yaxis.to, Some(10.0));
    assert_eq!(markings[1].yaxis.to, Some(20.0));
}

#[test]
fn no_markings_without_a_finite_first_threshold() {
    assert!(build_threshold_markings(&Threshold::new(None, "a"), &band(3.0, "b")).is_empty());
    assert!(build_threshold_markings(&band(f64::NAN, "a"), &band(3.0, "b")).is_empty());
}
