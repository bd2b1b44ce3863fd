// Host-side tests for constants and their relationships.

use monitor_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn delay_ranges_are_ordered() {
    for (lo, hi) in [
        LINE_DELAY_MS,
        TEAR_DELAY_MS,
        STATIC_DELAY_MS,
        DEGAUSS_DELAY_MS,
        ROLL_DELAY_MS,
        LINE_DURATION_MS,
        TEAR_DURATION_MS,
        STATIC_DURATION_MS,
        ROLL_UP_MS,
        ROLL_DOWN_MS,
    ] {
        assert!(lo > 0.0 && lo <= hi);
    }
    assert!(ROLL_AMPLITUDE_PX.0 > 0.0 && ROLL_AMPLITUDE_PX.0 <= ROLL_AMPLITUDE_PX.1);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn glitches_are_shorter_than_their_gaps() {
    assert!(LINE_DURATION_MS.1 < LINE_DELAY_MS.0);
    assert!(TEAR_DURATION_MS.1 < TEAR_DELAY_MS.0);
    assert!(STATIC_DURATION_MS.1 < STATIC_DELAY_MS.0);
    assert!(DEGAUSS_DURATION_MS < DEGAUSS_DELAY_MS.0);
    assert!(ROLL_UP_MS.1 + ROLL_DOWN_MS.1 < ROLL_DELAY_MS.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn gates_and_fractions_in_unit_range() {
    assert!(LOW_POWER_GATE > 0.0 && LOW_POWER_GATE < HIGH_POWER_GATE && HIGH_POWER_GATE < 1.0);
    assert!(BEZEL_MARGIN > 0.0 && BEZEL_MARGIN <= 1.0);
    assert!(CLOSE_SHOT_FILL > 0.0 && CLOSE_SHOT_FILL <= 1.0);
    assert!(COVER_Z_FRACTION > 0.0 && COVER_Z_FRACTION < 1.0);
    assert!(PANEL_WIDTH_FRACTION <= 1.0 && PANEL_HEIGHT_FRACTION <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn static_burst_limits() {
    assert!(STATIC_BURST_MIN_MS <= STATIC_BURST_DEFAULT_MS);
    assert!(STATIC_BURST_DEFAULT_MS <= STATIC_BURST_MAX_MS);
    assert_eq!(STATIC_HUES.len(), 6);
    assert!(STATIC_HUES.windows(2).all(|w| w[1] - w[0] == 60.0));
}

#[test]
fn reference_viewpoint_matches_wide_shot() {
    let v = reference_viewpoint_vec3();
    assert_eq!(v.to_array(), REFERENCE_VIEWPOINT);
    assert!(v.z > 0.0);
}
