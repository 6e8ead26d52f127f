use approx::assert_relative_eq;
use graph_panel::core::log_scale::{LOG_ZERO_OFFSET, log_tick_ladder};
use graph_panel::core::{LogTransform, resolve_log_scale};
use proptest::prelude::*;

#[test]
fn observed_max_drives_the_ladder_when_unconfigured() {
    let scale = resolve_log_scale(10.0, None, None, Some(4_200.0)).expect("log scale");
    assert_eq!(scale.ticks, vec![0.0, 1.0, 10.0, 100.0, 1_000.0, 10_000.0]);
    assert_eq!(scale.min, 0.0);
}

#[test]
fn zero_stays_finite_under_the_offset() {
    let transform = LogTransform::new(2.0);
    assert_relative_eq!(
        transform.apply(0.0),
        LOG_ZERO_OFFSET.ln() / 2f64.ln(),
        epsilon = 1e-12
    );
}

proptest! {
    #[test]
    fn change_of_basis_round_trips_away_from_zero(
        base in 2.0f64..1_024.0,
        value in 4.0f64..30.0
    ) {
        prop_assume!(base != 10.0);
        let transform = LogTransform::new(base);
        let recovered = transform.apply(transform.inverse(value));
        prop_assert!((recovered - value).abs() < 1e-2);
    }

    #[test]
    fn ladder_is_increasing_and_ends_at_first_power_above_max(
        base in 1.5f64..100.0,
        max in 1.0f64..1e12
    ) {
        let ladder = log_tick_ladder(base, max);
        prop_assert!(ladder.windows(2).all(|pair| pair[0] < pair[1]));

        let last = ladder[ladder.len() - 1];
        let before_last = ladder[ladder.len() - 2];
        prop_assert!(last > max);
        prop_assert!(before_last <= max);
    }
}
