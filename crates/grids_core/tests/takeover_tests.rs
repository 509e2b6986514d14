//! Takeover behaviour over whole pot gestures.

use grids_core::ParameterValues;
use grids_core::params::ParameterIndex;
use grids_core::takeover::{ParameterHost, TakeoverPot, TakeoverState, scaled_target};

const PARAM: ParameterIndex = ParameterIndex::Density1;
const SCALE: f32 = 255.0;

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// A pot configured for `PARAM`, synced at `start` with the parameter at `value`.
fn synced_pot(value: i32, start: f32) -> (TakeoverPot, ParameterValues) {
    let mut host = ParameterValues::default();
    host.set(PARAM, value);
    let mut pot = TakeoverPot::new(0, PARAM);
    pot.configure(PARAM, None, SCALE, SCALE);
    pot.update(start, 0, 0, &mut host);
    (pot, host)
}

/// Sweep from hundredths `from` to `to` (inclusive) one hundredth per tick,
/// returning the parameter value and state after each tick.
fn sweep(
    pot: &mut TakeoverPot,
    host: &mut ParameterValues,
    from: i32,
    to: i32,
) -> Vec<(f32, i32, TakeoverState)> {
    let dir = if to >= from { 1 } else { -1 };
    let mut trace = Vec::new();
    let mut i = from;
    while i != to {
        i += dir;
        let position = i as f32 / 100.0;
        pot.update(position, 0, 0, host);
        trace.push((position, host.value(PARAM), pot.state()));
    }
    trace
}

// ─── No jump ──────────────────────────────────────────────────────────────────

#[test]
fn configure_then_update_keeps_the_value() {
    for (value, start) in [(100, 0.2f32), (0, 1.0), (255, 0.0), (128, 0.9)] {
        let (pot, host) = synced_pot(value, start);
        assert_ne!(scaled_target(start, SCALE), value);
        assert_eq!(host.value(PARAM), value);
        assert_eq!(pot.state(), TakeoverState::HoldingWaitForMove);
    }
}

#[test]
fn value_never_overshoots_the_pot() {
    let (mut pot, mut host) = synced_pot(100, 0.20);
    let mut previous = 100;
    for (position, value, state) in sweep(&mut pot, &mut host, 20, 80) {
        let target = scaled_target(position, SCALE);
        if state != TakeoverState::DirectControl {
            assert!(value >= previous, "value went backwards at {position}");
            assert!(value > target, "passed the pot at {position}: {value} vs {target}");
        }
        previous = value;
    }
}

// ─── Convergence ─────────────────────────────────────────────────────────────

#[test]
fn upward_sweep_ends_in_direct_control() {
    let (mut pot, mut host) = synced_pot(100, 0.20);
    let trace = sweep(&mut pot, &mut host, 20, 80);
    assert_eq!(pot.state(), TakeoverState::DirectControl);
    assert_eq!(host.value(PARAM), scaled_target(0.8, SCALE));
    assert_eq!(host.value(PARAM), 204);
    let first_direct = trace
        .iter()
        .position(|(_, _, s)| *s == TakeoverState::DirectControl)
        .unwrap_or(trace.len());
    assert!(first_direct > 0, "the first movement only nudges");
}

#[test]
fn downward_sweep_ends_in_direct_control() {
    let (mut pot, mut host) = synced_pot(150, 0.90);
    sweep(&mut pot, &mut host, 90, 20);
    assert_eq!(pot.state(), TakeoverState::DirectControl);
    assert_eq!(host.value(PARAM), scaled_target(0.2, SCALE));
}

#[test]
fn fast_sweep_that_jumps_past_the_value_converges() {
    let (mut pot, mut host) = synced_pot(128, 0.0);
    for position in [0.1f32, 0.3, 0.6, 0.95] {
        pot.update(position, 0, 0, &mut host);
    }
    assert_eq!(pot.state(), TakeoverState::DirectControl);
    assert_eq!(host.value(PARAM), scaled_target(0.95, SCALE));
}

#[test]
fn pot_already_matching_takes_over_on_first_move() {
    let (mut pot, mut host) = synced_pot(51, 0.20);
    pot.update(0.21, 0, 0, &mut host);
    assert_eq!(pot.state(), TakeoverState::DirectControl);
    assert_eq!(host.value(PARAM), scaled_target(0.21, SCALE));
}

#[test]
fn direct_control_tracks_both_directions() {
    let (mut pot, mut host) = synced_pot(51, 0.20);
    for position in [0.3f32, 0.7, 0.1, 1.0, 0.0] {
        pot.update(position, 0, 0, &mut host);
        assert_eq!(host.value(PARAM), scaled_target(position, SCALE));
    }
}

#[test]
fn sweep_that_never_reaches_the_value_keeps_nudging() {
    // Targets run 51..=153, always below the held 200.
    let (mut pot, mut host) = synced_pot(200, 0.20);
    let trace = sweep(&mut pot, &mut host, 20, 60);
    for (tick, &(position, value, state)) in trace.iter().enumerate() {
        assert_eq!(state, TakeoverState::RelativelyAdjusting, "at {position}");
        assert_eq!(value, 201 + tick as i32, "one unit per tick at {position}");
        assert!(value > scaled_target(position, SCALE));
    }
    assert_eq!(host.value(PARAM), 240);
}
