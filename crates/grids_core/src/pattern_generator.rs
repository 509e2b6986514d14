//! Step sequencer producing trigger and accent bitmasks.
//!
//! A [`PatternGenerator`] is advanced by already edge-detected clock ticks.
//! Each step it evaluates either the interpolated drum map or three Euclidean
//! rhythms, leaving the result in [`PatternGenerator::state`]: bits 0-2 are
//! the channel triggers and bit 3 is the shared accent.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::random::Random;
use crate::resources::{
    ACCENT_THRESHOLD, NUM_PARTS, ORIGINAL_GRIDS_PULSES_PER_STEP, PULSE_DURATION, STEPS_PER_PATTERN,
    euclidean_mask, read_drum_map,
};
use crate::utils::u8_u8_mul_shift8;

/// Bits of [`PatternGenerator::state`].
pub mod output_bits {
    pub const TRIG_1: u8 = 1;
    pub const TRIG_2: u8 = 2;
    pub const TRIG_3: u8 = 4;
    pub const ACCENT: u8 = 8;
    pub const CLOCK: u8 = 16;
    pub const RESET: u8 = 32;

    /// Trigger bit for each channel.
    pub const TRIGGERS: [u8; 3] = [TRIG_1, TRIG_2, TRIG_3];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum OutputMode {
    Euclidean,
    #[default]
    Drums,
}

impl OutputMode {
    /// Parameter encoding: 0 is Euclidean, anything else Drums.
    pub fn from_value(value: i32) -> Self {
        if value == 0 {
            OutputMode::Euclidean
        } else {
            OutputMode::Drums
        }
    }

    pub fn value(self) -> i32 {
        match self {
            OutputMode::Euclidean => 0,
            OutputMode::Drums => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputMode::Euclidean => "Euclidean",
            OutputMode::Drums => "Drums",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            OutputMode::Euclidean => OutputMode::Drums,
            OutputMode::Drums => OutputMode::Euclidean,
        }
    }

    fn slot(self) -> usize {
        self.value() as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum ClockResolution {
    Ppqn4,
    Ppqn8,
    #[default]
    Ppqn24,
}

impl ClockResolution {
    /// Decode the low three bits of a packed options byte. Unknown values
    /// fall back to 24 PPQN.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x7 {
            0 => ClockResolution::Ppqn4,
            1 => ClockResolution::Ppqn8,
            _ => ClockResolution::Ppqn24,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            ClockResolution::Ppqn4 => 0,
            ClockResolution::Ppqn8 => 1,
            ClockResolution::Ppqn24 => 2,
        }
    }

    pub fn ppqn(self) -> u8 {
        match self {
            ClockResolution::Ppqn4 => 4,
            ClockResolution::Ppqn8 => 8,
            ClockResolution::Ppqn24 => 24,
        }
    }
}

const PACK_OUTPUT_CLOCK: u8 = 0x20;
const PACK_DRUMS: u8 = 0x40;
const PACK_TRIGGERS: u8 = 0x80;

/// Global generator options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Options {
    pub clock_resolution: ClockResolution,
    pub output_mode: OutputMode,
    pub output_clock: bool,
    /// Hold triggers until the next step instead of pulsing them.
    pub gate_mode: bool,
    /// Three clock ticks per step, Euclidean channels on even steps only.
    pub original_grids_clocking: bool,
}

impl Options {
    /// Pack into the single settings byte. Legacy clocking is not stored.
    pub fn pack(&self) -> u8 {
        let mut byte = self.clock_resolution.bits();
        if self.output_clock {
            byte |= PACK_OUTPUT_CLOCK;
        }
        if self.output_mode == OutputMode::Drums {
            byte |= PACK_DRUMS;
        }
        if !self.gate_mode {
            byte |= PACK_TRIGGERS;
        }
        byte
    }

    /// Inverse of [`Options::pack`]; `original_grids_clocking` is left untouched.
    pub fn unpack(&mut self, byte: u8) {
        self.gate_mode = byte & PACK_TRIGGERS == 0;
        self.output_mode = if byte & PACK_DRUMS != 0 {
            OutputMode::Drums
        } else {
            OutputMode::Euclidean
        };
        self.output_clock = byte & PACK_OUTPUT_CLOCK != 0;
        self.clock_resolution = ClockResolution::from_bits(byte);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrumsSettings {
    pub x: u8,
    pub y: u8,
    pub randomness: u8,
}

impl Default for DrumsSettings {
    fn default() -> Self {
        Self {
            x: 128,
            y: 128,
            randomness: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EuclideanSettings {
    pub chaos_amount: u8,
}

/// Mode-specific settings; the variant decides which mode they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeSettings {
    Drums(DrumsSettings),
    Euclidean(EuclideanSettings),
}

impl ModeSettings {
    pub fn mode(&self) -> OutputMode {
        match self {
            ModeSettings::Drums(_) => OutputMode::Drums,
            ModeSettings::Euclidean(_) => OutputMode::Euclidean,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternGeneratorSettings {
    pub options: ModeSettings,
    /// Drum density, or Euclidean fill, per channel.
    pub density: [u8; NUM_PARTS],
}

impl PatternGeneratorSettings {
    pub fn drums() -> Self {
        Self {
            options: ModeSettings::Drums(DrumsSettings::default()),
            density: [255; NUM_PARTS],
        }
    }

    pub fn euclidean() -> Self {
        Self {
            options: ModeSettings::Euclidean(EuclideanSettings::default()),
            density: [128; NUM_PARTS],
        }
    }
}

const DEFAULT_EUCLIDEAN_LENGTH: u8 = 16;
const DEFAULT_FILL: u8 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct PatternGenerator {
    options: Options,
    /// Indexed by `OutputMode::slot`.
    settings: [PatternGeneratorSettings; 2],
    chaos_enabled: bool,
    euclidean_length: [u8; NUM_PARTS],
    euclidean_shift: [u8; NUM_PARTS],
    fill: [u8; NUM_PARTS],
    euclidean_step: [u8; NUM_PARTS],
    part_perturbation: [u8; NUM_PARTS],
    state: u8,
    step: u8,
    internal_clock_ticks: u16,
    pulse_duration_counter: u16,
    first_beat: bool,
    beat: bool,
    random: Random,
}

impl Default for PatternGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternGenerator {
    pub fn new() -> Self {
        Self {
            options: Options::default(),
            settings: [
                PatternGeneratorSettings::euclidean(),
                PatternGeneratorSettings::drums(),
            ],
            chaos_enabled: false,
            euclidean_length: [DEFAULT_EUCLIDEAN_LENGTH; NUM_PARTS],
            euclidean_shift: [0; NUM_PARTS],
            fill: [DEFAULT_FILL; NUM_PARTS],
            euclidean_step: [0; NUM_PARTS],
            part_perturbation: [0; NUM_PARTS],
            state: 0,
            step: 0,
            internal_clock_ticks: 0,
            pulse_duration_counter: 0,
            first_beat: true,
            beat: true,
            random: Random::default(),
        }
    }

    /// Restore power-on defaults. The random source keeps its position.
    pub fn init(&mut self) {
        let random = self.random;
        *self = Self::new();
        self.random = random;
    }

    /// Rewind to step 0 and evaluate it so the state is valid immediately.
    pub fn reset(&mut self) {
        self.step = 0;
        self.euclidean_step = [0; NUM_PARTS];
        self.part_perturbation = [0; NUM_PARTS];
        self.state = 0;
        self.pulse_duration_counter = 0;
        self.internal_clock_ticks = 0;
        self.first_beat = true;
        self.beat = true;
        tracing::debug!(mode = self.options.output_mode.name(), "pattern reset");
        self.evaluate();
    }

    /// Re-evaluate the current step.
    pub fn retrigger(&mut self) {
        self.evaluate();
    }

    /// Advance on an edge-detected clock tick. `false` is ignored.
    #[profiling::function]
    pub fn tick_clock(&mut self, external_tick: bool) {
        if !external_tick {
            return;
        }

        let advanced = if self.options.original_grids_clocking {
            self.internal_clock_ticks += 1;
            if self.internal_clock_ticks >= u16::from(ORIGINAL_GRIDS_PULSES_PER_STEP) {
                self.internal_clock_ticks = 0;
                if self.step & 1 == 0 {
                    self.advance_euclidean_steps();
                }
                self.step = (self.step + 1) % STEPS_PER_PATTERN as u8;
                true
            } else {
                false
            }
        } else {
            self.step = (self.step + 1) % STEPS_PER_PATTERN as u8;
            self.advance_euclidean_steps();
            true
        };

        if advanced {
            if self.step == 0 && self.options.output_mode == OutputMode::Drums {
                self.draw_perturbation();
            }
            self.first_beat = self.step == 0;
            self.beat = self.step % (STEPS_PER_PATTERN as u8 / 4) == 0;
            self.evaluate();
        }

        self.increment_pulse_counter();
    }

    /// Count one tick of trigger width; clears the outputs once a pulse has
    /// lasted [`PULSE_DURATION`] ticks unless gate mode is on.
    pub fn increment_pulse_counter(&mut self) {
        self.pulse_duration_counter = self.pulse_duration_counter.saturating_add(1);
        if self.pulse_duration_counter >= PULSE_DURATION && !self.options.gate_mode {
            self.state = 0;
        }
    }

    /// Set a channel's Euclidean length, clamped to 1..=32.
    pub fn set_length(&mut self, channel: usize, length: u8) {
        if channel >= NUM_PARTS {
            return;
        }
        let length = length.clamp(1, STEPS_PER_PATTERN as u8);
        self.euclidean_length[channel] = length;
        self.euclidean_step[channel] %= length;
        self.fill[channel] = fill_for(self.settings[OutputMode::Euclidean.slot()].density[channel], length);
    }

    /// Store a channel's raw fill (0-255) and derive its active step count.
    pub fn set_fill(&mut self, channel: usize, value: u8) {
        if channel >= NUM_PARTS {
            return;
        }
        self.settings[OutputMode::Euclidean.slot()].density[channel] = value;
        self.fill[channel] = fill_for(value, self.euclidean_length[channel]);
    }

    /// Rotate a channel's Euclidean pattern by `shift` steps.
    pub fn set_shift(&mut self, channel: usize, shift: u8) {
        if channel >= NUM_PARTS {
            return;
        }
        self.euclidean_shift[channel] = shift.min(STEPS_PER_PATTERN as u8 - 1);
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        if self.options.output_mode != mode {
            tracing::debug!(from = self.options.output_mode.name(), to = mode.name(), "output mode");
        }
        self.options.output_mode = mode;
    }

    pub fn set_global_chaos(&mut self, enabled: bool) {
        self.chaos_enabled = enabled;
    }

    pub fn set_clock_resolution(&mut self, resolution: ClockResolution) {
        self.options.clock_resolution = resolution;
    }

    pub fn set_gate_mode(&mut self, enabled: bool) {
        self.options.gate_mode = enabled;
    }

    pub fn set_output_clock(&mut self, enabled: bool) {
        self.options.output_clock = enabled;
    }

    pub fn set_original_grids_clocking(&mut self, enabled: bool) {
        self.options.original_grids_clocking = enabled;
        self.internal_clock_ticks = 0;
    }

    /// Replace all options at once, as loaded from a packed byte.
    pub fn set_options(&mut self, options: Options) {
        let legacy = options.original_grids_clocking != self.options.original_grids_clocking;
        self.options = options;
        if legacy {
            self.internal_clock_ticks = 0;
        }
    }

    /// Store settings in the slot of the mode their variant names.
    pub fn set_settings(&mut self, settings: PatternGeneratorSettings) {
        self.settings[settings.options.mode().slot()] = settings;
    }

    pub fn set_map_position(&mut self, x: u8, y: u8) {
        if let ModeSettings::Drums(drums) = &mut self.settings[OutputMode::Drums.slot()].options {
            drums.x = x;
            drums.y = y;
        }
    }

    pub fn set_randomness(&mut self, randomness: u8) {
        if let ModeSettings::Drums(drums) = &mut self.settings[OutputMode::Drums.slot()].options {
            drums.randomness = randomness;
        }
    }

    pub fn set_chaos_amount(&mut self, amount: u8) {
        if let ModeSettings::Euclidean(euclidean) =
            &mut self.settings[OutputMode::Euclidean.slot()].options
        {
            euclidean.chaos_amount = amount;
        }
    }

    /// Set a drum channel's density.
    pub fn set_density(&mut self, channel: usize, density: u8) {
        if channel < NUM_PARTS {
            self.settings[OutputMode::Drums.slot()].density[channel] = density;
        }
    }

    pub fn seed(&mut self, seed: u16) {
        self.random.seed(seed);
    }

    pub fn settings(&self, mode: OutputMode) -> &PatternGeneratorSettings {
        &self.settings[mode.slot()]
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn output_mode(&self) -> OutputMode {
        self.options.output_mode
    }

    pub fn clock_resolution(&self) -> ClockResolution {
        self.options.clock_resolution
    }

    pub fn gate_mode(&self) -> bool {
        self.options.gate_mode
    }

    pub fn output_clock(&self) -> bool {
        self.options.output_clock
    }

    pub fn original_grids_clocking(&self) -> bool {
        self.options.original_grids_clocking
    }

    pub fn chaos_enabled(&self) -> bool {
        self.chaos_enabled
    }

    /// Current trigger and accent bits.
    pub fn state(&self) -> u8 {
        self.state
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn first_beat(&self) -> bool {
        self.first_beat
    }

    pub fn beat(&self) -> bool {
        self.beat
    }

    pub fn euclidean_length(&self, channel: usize) -> u8 {
        self.euclidean_length.get(channel).copied().unwrap_or(0)
    }

    pub fn euclidean_step(&self, channel: usize) -> u8 {
        self.euclidean_step.get(channel).copied().unwrap_or(0)
    }

    pub fn euclidean_shift(&self, channel: usize) -> u8 {
        self.euclidean_shift.get(channel).copied().unwrap_or(0)
    }

    pub fn fill(&self, channel: usize) -> u8 {
        self.fill.get(channel).copied().unwrap_or(0)
    }

    pub fn part_perturbation(&self, channel: usize) -> u8 {
        self.part_perturbation.get(channel).copied().unwrap_or(0)
    }

    pub fn internal_clock_ticks(&self) -> u16 {
        self.internal_clock_ticks
    }

    pub fn pulse_duration_counter(&self) -> u16 {
        self.pulse_duration_counter
    }

    fn advance_euclidean_steps(&mut self) {
        for (step, &length) in self.euclidean_step.iter_mut().zip(&self.euclidean_length) {
            if length > 0 {
                *step = (*step + 1) % length;
            }
        }
    }

    /// Chaos offsets for the drum parts, drawn when the pattern wraps and held
    /// for all 32 steps. Reset leaves them cleared until the first wrap.
    fn draw_perturbation(&mut self) {
        let ModeSettings::Drums(drums) = self.settings[OutputMode::Drums.slot()].options else {
            return;
        };
        for perturbation in &mut self.part_perturbation {
            *perturbation = u8_u8_mul_shift8(self.random.byte(), drums.randomness >> 2);
        }
    }

    fn evaluate(&mut self) {
        self.pulse_duration_counter = 0;
        match self.options.output_mode {
            OutputMode::Drums => self.evaluate_drums(),
            OutputMode::Euclidean => self.evaluate_euclidean(),
        }
    }

    fn evaluate_drums(&mut self) {
        let settings = self.settings[OutputMode::Drums.slot()];
        let ModeSettings::Drums(drums) = settings.options else {
            return;
        };

        let mut state = 0u8;
        let mut accent = false;
        for (part, &trigger) in output_bits::TRIGGERS.iter().enumerate() {
            let level = read_drum_map(self.step, part as u8, drums.x, drums.y)
                .saturating_add(self.part_perturbation[part]);
            let threshold = !settings.density[part];
            if level > threshold {
                state |= trigger;
                if level > ACCENT_THRESHOLD {
                    accent = true;
                }
            }
        }
        if accent {
            state |= output_bits::ACCENT;
        }
        self.state = state;
    }

    fn evaluate_euclidean(&mut self) {
        let settings = self.settings[OutputMode::Euclidean.slot()];
        let chaos_amount = match settings.options {
            ModeSettings::Euclidean(euclidean) => euclidean.chaos_amount,
            ModeSettings::Drums(_) => 0,
        };

        self.state = 0;
        for (part, &trigger) in output_bits::TRIGGERS.iter().enumerate() {
            let length = self.euclidean_length[part];
            if length == 0 {
                continue;
            }
            let pattern = euclidean_mask(length, settings.density[part] >> 3);
            let position = (self.euclidean_step[part] + self.euclidean_shift[part]) % length;
            if (pattern >> position) & 1 != 0 {
                self.state |= trigger;
            }

            if self.chaos_enabled
                && chaos_amount > 0
                && self.random.word() % 256 < u16::from(chaos_amount)
            {
                if self.random.word() % 8 == 0 {
                    self.state ^= trigger;
                }
                if chaos_amount > ACCENT_THRESHOLD && self.random.word() % 16 == 0 {
                    self.state |= output_bits::ACCENT;
                }
            }
        }
    }
}

/// Active steps for a 0-255 fill over `length` steps, rounded, never zero
/// for a non-zero fill.
fn fill_for(value: u8, length: u8) -> u8 {
    if length == 0 {
        return 0;
    }
    if value == 255 {
        return length;
    }
    let mut fill = ((u16::from(value) * u16::from(length) + 127) / 255) as u8;
    if fill > length {
        fill = length;
    }
    if value > 0 && fill == 0 {
        fill = 1;
    }
    fill
}

/// Record `state` for each of the next `steps` clock ticks of a copy of
/// `generator`, starting with the current step.
pub fn render_pattern(generator: &PatternGenerator, steps: usize) -> Vec<u8> {
    let mut generator = generator.clone();
    let mut states = Vec::with_capacity(steps);
    for i in 0..steps {
        if i > 0 {
            generator.tick_clock(true);
        }
        states.push(generator.state());
    }
    states
}
