//! JSON configuration for building a processor outside a host.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::params::{NUM_BUSES, ParameterIndex, ParameterValues};
use crate::pattern_generator::{ClockResolution, OutputMode, PatternGenerator};
use crate::processor::GridsProcessor;
use crate::random::DEFAULT_SEED;
use crate::resources::{NUM_PARTS, STEPS_PER_PATTERN};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct GridsConfig {
    pub sample_rate: f32,
    pub mode: OutputMode,
    pub gate_mode: bool,
    /// Three clock ticks per step, Euclidean channels on even steps.
    pub original_grids_clocking: bool,
    pub clock_resolution: ClockResolution,
    pub seed: u16,
    pub chaos: ChaosConfig,
    pub drums: DrumsConfig,
    pub euclidean: [EuclideanChannelConfig; NUM_PARTS],
    pub routing: RoutingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ChaosConfig {
    pub enabled: bool,
    pub amount: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DrumsConfig {
    pub x: u8,
    pub y: u8,
    pub density: [u8; NUM_PARTS],
}

impl Default for DrumsConfig {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            density: [128; NUM_PARTS],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct EuclideanChannelConfig {
    pub length: u8,
    pub fill: u8,
    pub shift: u8,
}

impl Default for EuclideanChannelConfig {
    fn default() -> Self {
        Self {
            length: 16,
            fill: 128,
            shift: 0,
        }
    }
}

/// 1-based bus numbers, 0 for unrouted.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutingConfig {
    pub clock_input: u8,
    pub reset_input: u8,
    pub outputs: [u8; 4],
    /// Replace bus contents instead of adding to them.
    pub replace: [bool; 4],
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            clock_input: 1,
            reset_input: 2,
            outputs: [13, 14, 15, 16],
            replace: [false; 4],
        }
    }
}

impl Default for GridsConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000.0,
            mode: OutputMode::Drums,
            gate_mode: false,
            original_grids_clocking: false,
            clock_resolution: ClockResolution::Ppqn24,
            seed: DEFAULT_SEED,
            chaos: ChaosConfig::default(),
            drums: DrumsConfig::default(),
            euclidean: Default::default(),
            routing: RoutingConfig::default(),
        }
    }
}

impl GridsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: GridsConfig = serde_json::from_str(json).context("invalid config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to serialize config")
    }

    /// Reject values the parameter table would silently clamp.
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            bail!("sampleRate must be positive, got {}", self.sample_rate);
        }
        for (i, channel) in self.euclidean.iter().enumerate() {
            if channel.length == 0 || usize::from(channel.length) > STEPS_PER_PATTERN {
                bail!(
                    "euclidean[{i}].length must be 1..={STEPS_PER_PATTERN}, got {}",
                    channel.length
                );
            }
            if usize::from(channel.shift) >= STEPS_PER_PATTERN {
                bail!("euclidean[{i}].shift must be below {STEPS_PER_PATTERN}, got {}", channel.shift);
            }
        }
        let buses = [self.routing.clock_input, self.routing.reset_input]
            .into_iter()
            .chain(self.routing.outputs);
        for bus in buses {
            if i32::from(bus) > NUM_BUSES {
                bail!("bus {bus} out of range, there are {NUM_BUSES} buses");
            }
        }
        Ok(())
    }

    pub fn to_parameter_values(&self) -> ParameterValues {
        let mut values = ParameterValues::default();
        values.set(ParameterIndex::Mode, self.mode.value());
        values.set(ParameterIndex::ChaosEnable, i32::from(self.chaos.enabled));
        values.set(ParameterIndex::ChaosAmount, i32::from(self.chaos.amount));
        values.set(ParameterIndex::DrumMapX, i32::from(self.drums.x));
        values.set(ParameterIndex::DrumMapY, i32::from(self.drums.y));
        for channel in 0..NUM_PARTS {
            let euclid = &self.euclidean[channel];
            values.set(ParameterIndex::DENSITY[channel], i32::from(self.drums.density[channel]));
            values.set(ParameterIndex::LENGTH[channel], i32::from(euclid.length));
            values.set(ParameterIndex::FILL[channel], i32::from(euclid.fill));
            values.set(ParameterIndex::SHIFT[channel], i32::from(euclid.shift));
        }
        values.set(ParameterIndex::ClockInput, i32::from(self.routing.clock_input));
        values.set(ParameterIndex::ResetInput, i32::from(self.routing.reset_input));
        for (i, &(bus, mode)) in ParameterIndex::OUTPUTS.iter().enumerate() {
            values.set(bus, i32::from(self.routing.outputs[i]));
            values.set(mode, i32::from(self.routing.replace[i]));
        }
        values
    }

    /// Generator with the options that live outside the parameter table.
    pub fn build_generator(&self) -> PatternGenerator {
        let mut generator = PatternGenerator::new();
        generator.seed(self.seed);
        generator.set_gate_mode(self.gate_mode);
        generator.set_original_grids_clocking(self.original_grids_clocking);
        generator.set_clock_resolution(self.clock_resolution);
        generator
    }

    pub fn build_processor(&self) -> GridsProcessor {
        GridsProcessor::with_generator(
            self.sample_rate,
            self.to_parameter_values(),
            self.build_generator(),
        )
    }

    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(GridsConfig)).unwrap_or_default()
    }
}
