//! Integration tests for the pattern generator.
//!
//! These drive a generator through its public API the way a host does:
//! configure, reset, then feed clock ticks and read back the state bits.

use grids_core::pattern_generator::{OutputMode, PatternGenerator, output_bits};
use grids_core::resources::{LUT_RES_EUCLIDEAN, PULSE_DURATION, read_drum_map};

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn euclidean_generator() -> PatternGenerator {
    let mut generator = PatternGenerator::new();
    generator.set_output_mode(OutputMode::Euclidean);
    generator
}

/// Trigger bit of `channel` after reset and after each of `ticks - 1` ticks.
fn channel_lane(generator: &mut PatternGenerator, channel: usize, ticks: usize) -> Vec<bool> {
    let bit = output_bits::TRIGGERS[channel];
    let mut lane = Vec::with_capacity(ticks);
    generator.reset();
    lane.push(generator.state() & bit != 0);
    for _ in 1..ticks {
        generator.tick_clock(true);
        lane.push(generator.state() & bit != 0);
    }
    lane
}

fn unpack(mask: u32, length: usize) -> Vec<bool> {
    (0..length).map(|s| (mask >> s) & 1 != 0).collect()
}

// ─── Euclidean ────────────────────────────────────────────────────────────────

#[test]
fn sixteen_step_half_fill_matches_lut() {
    let mut generator = euclidean_generator();
    generator.set_length(0, 16);
    generator.set_fill(0, 128);
    let lane = channel_lane(&mut generator, 0, 16);
    assert_eq!(lane, unpack(LUT_RES_EUCLIDEAN[15 * 32 + 16], 16));
}

#[test]
fn every_length_and_density_matches_lut() {
    for length in 1..=32u8 {
        for fill in (0..=255u16).step_by(17) {
            let fill = fill as u8;
            let mut generator = euclidean_generator();
            generator.set_length(1, length);
            generator.set_fill(1, fill);
            let address = (length as usize - 1) * 32 + (fill >> 3) as usize;
            let lane = channel_lane(&mut generator, 1, length as usize);
            assert_eq!(
                lane,
                unpack(LUT_RES_EUCLIDEAN[address], length as usize),
                "length {length} fill {fill}"
            );
        }
    }
}

#[test]
fn euclidean_pattern_repeats_with_its_length() {
    let mut generator = euclidean_generator();
    generator.set_length(2, 5);
    generator.set_fill(2, 100);
    let lane = channel_lane(&mut generator, 2, 20);
    for s in 5..20 {
        assert_eq!(lane[s], lane[s - 5], "step {s}");
    }
}

#[test]
fn length_and_step_stay_in_range() {
    let mut generator = euclidean_generator();
    let lengths = [1u8, 7, 32, 0, 40, 13];
    for (round, &length) in lengths.iter().enumerate() {
        generator.set_length(round % 3, length);
        for _ in 0..45 {
            generator.tick_clock(true);
            for channel in 0..3 {
                let len = generator.euclidean_length(channel);
                assert!(len > 0 && len <= 32, "length {len} on channel {channel}");
                assert!(
                    generator.euclidean_step(channel) < len,
                    "step {} with length {len}",
                    generator.euclidean_step(channel)
                );
            }
        }
    }
}

// ─── Drums ────────────────────────────────────────────────────────────────────

#[test]
fn full_density_fires_on_every_non_zero_map_step() {
    let mut generator = PatternGenerator::new();
    generator.set_map_position(128, 128);
    generator.set_density(0, 255);
    generator.set_randomness(0);
    let lane = channel_lane(&mut generator, 0, 32);
    for (step, &fired) in lane.iter().enumerate() {
        let level = read_drum_map(step as u8, 0, 128, 128);
        assert_eq!(fired, level > 0, "step {step} level {level}");
    }
    assert!(lane.iter().any(|&f| f), "the centre of the map is not silent");
}

#[test]
fn zero_density_is_silent() {
    let mut generator = PatternGenerator::new();
    for channel in 0..3 {
        generator.set_density(channel, 0);
    }
    generator.reset();
    for _ in 0..32 {
        assert_eq!(generator.state() & 0x07, 0);
        generator.tick_clock(true);
    }
}

#[test]
fn accent_follows_loud_hits() {
    let mut generator = PatternGenerator::new();
    generator.set_map_position(0, 0);
    generator.reset();
    for step in 0..32u8 {
        let loud = (0..3).any(|part| read_drum_map(step, part, 0, 0) > 192);
        assert_eq!(
            generator.state() & output_bits::ACCENT != 0,
            loud,
            "accent at step {step}"
        );
        generator.tick_clock(true);
    }
}

// ─── Reset and pulse width ───────────────────────────────────────────────────

#[test]
fn reset_twice_equals_reset_once() {
    for (mode, randomness) in [
        (OutputMode::Drums, 0),
        (OutputMode::Drums, 255),
        (OutputMode::Euclidean, 0),
    ] {
        let mut once = PatternGenerator::new();
        once.set_output_mode(mode);
        once.set_randomness(randomness);
        for _ in 0..37 {
            once.tick_clock(true);
        }
        let mut twice = once.clone();

        once.reset();
        twice.reset();
        twice.reset();

        assert_eq!(twice.step(), 0);
        assert_eq!(twice.step(), once.step());
        assert_eq!(twice.state(), once.state(), "{mode:?}");
        assert_eq!(twice.first_beat(), once.first_beat());
        for channel in 0..3 {
            assert_eq!(twice.euclidean_step(channel), 0);
            assert_eq!(twice.part_perturbation(channel), 0);
        }
        assert_eq!(twice, once, "{mode:?} randomness {randomness}");
    }
}

#[test]
fn reset_with_randomness_matches_a_clean_evaluation() {
    let mut noisy = PatternGenerator::new();
    noisy.set_randomness(255);
    for _ in 0..40 {
        noisy.tick_clock(true);
    }
    noisy.reset();

    let mut clean = PatternGenerator::new();
    clean.reset();
    assert_eq!(noisy.state(), clean.state(), "offsets stay cleared until the pattern wraps");
}

// ─── Euclidean chaos ─────────────────────────────────────────────────────────

/// Ticks with the accent bit set over `ticks` steps of an empty Euclidean
/// pattern, so any accent comes from chaos.
fn chaos_accents(amount: u8, ticks: usize) -> usize {
    let mut generator = euclidean_generator();
    generator.set_global_chaos(true);
    generator.set_chaos_amount(amount);
    for channel in 0..3 {
        generator.set_fill(channel, 0);
    }
    generator.reset();
    (0..ticks)
        .filter(|_| {
            generator.tick_clock(true);
            generator.state() & output_bits::ACCENT != 0
        })
        .count()
}

#[test]
fn chaos_at_accent_threshold_never_accents() {
    assert_eq!(chaos_accents(192, 2000), 0);
}

#[test]
fn full_chaos_forces_occasional_accents() {
    let accents = chaos_accents(255, 2000);
    assert!(accents > 0, "no forced accents in 2000 ticks");
    assert!(accents < 1000, "accents forced on {accents} of 2000 ticks");
}

#[test]
fn reset_state_matches_step_zero_evaluation() {
    let mut generator = euclidean_generator();
    generator.set_fill(0, 255);
    generator.reset();
    let after_reset = generator.state();
    generator.retrigger();
    assert_eq!(generator.state(), after_reset);
    assert_ne!(after_reset & output_bits::TRIG_1, 0);
}

#[test]
fn trigger_clears_after_exactly_pulse_duration() {
    let mut generator = euclidean_generator();
    generator.set_fill(0, 255);
    generator.reset();
    assert_ne!(generator.state() & output_bits::TRIG_1, 0);

    for tick in 1..PULSE_DURATION {
        generator.increment_pulse_counter();
        assert_ne!(
            generator.state() & output_bits::TRIG_1,
            0,
            "cleared early after {tick} ticks"
        );
    }
    generator.increment_pulse_counter();
    assert_eq!(generator.state(), 0, "still high after {PULSE_DURATION} ticks");
}

#[test]
fn legacy_clocking_clears_triggers_between_steps() {
    let mut generator = euclidean_generator();
    generator.set_fill(0, 255);
    generator.set_original_grids_clocking(true);
    generator.reset();
    // Steps land every three ticks, so the counter never reaches eight.
    for _ in 0..12 {
        generator.tick_clock(true);
        assert_ne!(generator.state() & output_bits::TRIG_1, 0);
    }
}

#[test]
fn gate_mode_holds_the_state() {
    let mut generator = euclidean_generator();
    generator.set_fill(0, 255);
    generator.set_gate_mode(true);
    generator.reset();
    for _ in 0..20 {
        generator.increment_pulse_counter();
    }
    assert_ne!(generator.state() & output_bits::TRIG_1, 0);
}
