//! Front-panel handling: mode strategies and the three takeover pots.

use crate::params::ParameterIndex;
use crate::pattern_generator::OutputMode;
use crate::resources::NUM_PARTS;
use crate::takeover::{ParameterHost, TakeoverPot};

/// Button bits in [`UiFrame::buttons`].
pub mod buttons {
    pub const POT_BUTTON_L: u16 = 1 << 4;
    pub const POT_BUTTON_C: u16 = 1 << 5;
    pub const POT_BUTTON_R: u16 = 1 << 6;
    pub const ENCODER_BUTTON_L: u16 = 1 << 7;
    pub const ENCODER_BUTTON_R: u16 = 1 << 8;
}

/// Controls as sampled on one UI tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct UiFrame {
    /// Pot positions, 0.0-1.0.
    pub pots: [f32; 3],
    /// Encoder detents turned since the last tick.
    pub encoders: [i32; 2],
    pub buttons: u16,
    pub last_buttons: u16,
}

impl UiFrame {
    pub fn pressed(&self, mask: u16) -> bool {
        self.buttons & mask != 0 && self.last_buttons & mask == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotConfig {
    pub primary: ParameterIndex,
    pub alternate: Option<ParameterIndex>,
    pub primary_scale: f32,
    pub alternate_scale: f32,
}

/// Which parameters the pots and encoders drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStrategy {
    Drums,
    Euclidean { controls_length: bool },
}

fn scale_of(param: ParameterIndex) -> f32 {
    param.def().max as f32
}

impl ModeStrategy {
    pub fn from_parameters(host: &impl ParameterHost) -> Self {
        match OutputMode::from_value(host.value(ParameterIndex::Mode)) {
            OutputMode::Drums => ModeStrategy::Drums,
            OutputMode::Euclidean => ModeStrategy::Euclidean {
                controls_length: host.value(ParameterIndex::EuclideanControlsLength) != 0,
            },
        }
    }

    pub fn mode(&self) -> OutputMode {
        match self {
            ModeStrategy::Drums => OutputMode::Drums,
            ModeStrategy::Euclidean { .. } => OutputMode::Euclidean,
        }
    }

    pub fn name(&self) -> &'static str {
        self.mode().name()
    }

    pub fn pot_config(&self, pot: usize) -> PotConfig {
        let channel = pot.min(NUM_PARTS - 1);
        match self {
            ModeStrategy::Drums => {
                let primary = ParameterIndex::DENSITY[channel];
                // Pot R doubles as Chaos Amount while its button is held.
                let alternate = (channel == 2).then_some(ParameterIndex::ChaosAmount);
                PotConfig {
                    primary,
                    alternate,
                    primary_scale: scale_of(primary),
                    alternate_scale: scale_of(ParameterIndex::ChaosAmount),
                }
            }
            ModeStrategy::Euclidean { controls_length } => {
                let primary = if *controls_length {
                    ParameterIndex::LENGTH[channel]
                } else {
                    ParameterIndex::FILL[channel]
                };
                PotConfig {
                    primary,
                    alternate: None,
                    primary_scale: scale_of(primary),
                    alternate_scale: 1.0,
                }
            }
        }
    }

    /// Apply `delta` detents of encoder `encoder` (0 = left, 1 = right).
    pub fn handle_encoder(&self, encoder: usize, delta: i32, host: &mut impl ParameterHost) {
        if delta == 0 {
            return;
        }
        let target = match (self, encoder) {
            (ModeStrategy::Drums, 0) => ParameterIndex::DrumMapX,
            (ModeStrategy::Drums, 1) => ParameterIndex::DrumMapY,
            (ModeStrategy::Euclidean { .. }, 1) => ParameterIndex::ChaosAmount,
            _ => return,
        };
        let Some((min, max)) = host.range(target) else {
            return;
        };
        let current = host.value(target);
        let value = (current + delta).clamp(min, max);
        if value != current {
            host.set_from_ui(target, value);
        }
    }

    /// Pot positions matching the current parameter values.
    pub fn pot_positions(&self, host: &impl ParameterHost) -> [f32; 3] {
        std::array::from_fn(|pot| {
            let config = self.pot_config(pot);
            host.value(config.primary) as f32 / config.primary_scale
        })
    }
}

/// The three pots plus the strategy that currently assigns them.
#[derive(Debug, Clone)]
pub struct ControlSurface {
    pots: [TakeoverPot; 3],
    strategy: ModeStrategy,
}

impl ControlSurface {
    pub fn new(host: &impl ParameterHost) -> Self {
        let strategy = ModeStrategy::from_parameters(host);
        let pots = std::array::from_fn(|i| TakeoverPot::new(i, strategy.pot_config(i).primary));
        let mut surface = Self { pots, strategy };
        surface.configure_pots();
        surface
    }

    pub fn strategy(&self) -> ModeStrategy {
        self.strategy
    }

    pub fn pot(&self, index: usize) -> Option<&TakeoverPot> {
        self.pots.get(index)
    }

    /// Positions to report to the host when the UI opens; pots hold there.
    pub fn setup(&mut self, host: &impl ParameterHost) -> [f32; 3] {
        let positions = self.strategy.pot_positions(host);
        for (pot, &position) in self.pots.iter_mut().zip(&positions) {
            pot.sync_physical_value(position, host);
        }
        positions
    }

    /// Re-read the strategy from the parameters, re-arming the pots if it
    /// changed.
    pub fn sync_strategy(&mut self, host: &impl ParameterHost) {
        let strategy = ModeStrategy::from_parameters(host);
        if strategy == self.strategy {
            return;
        }
        let mode_switch = strategy.mode() != self.strategy.mode();
        tracing::debug!(from = ?self.strategy, to = ?strategy, "control strategy");
        self.strategy = strategy;
        self.configure_pots();
        for pot in &mut self.pots {
            if mode_switch {
                pot.reset_for_mode_switch();
            } else {
                pot.reset_for_new_primary();
            }
        }
    }

    pub fn process(&mut self, frame: &UiFrame, host: &mut impl ParameterHost) {
        if frame.pressed(buttons::ENCODER_BUTTON_R) {
            let mode = self.strategy.mode().toggled();
            host.set_from_ui(ParameterIndex::Mode, mode.value());
            self.sync_strategy(&*host);
            return;
        }

        for (encoder, &delta) in frame.encoders.iter().enumerate() {
            self.strategy.handle_encoder(encoder, delta, host);
        }

        for (pot, &position) in self.pots.iter_mut().zip(&frame.pots) {
            pot.update(position, frame.buttons, frame.last_buttons, host);
        }

        if let ModeStrategy::Euclidean { controls_length } = self.strategy {
            if frame.pressed(buttons::POT_BUTTON_R) {
                let controls_length = !controls_length;
                host.set_from_ui(ParameterIndex::EuclideanControlsLength, i32::from(controls_length));
                self.sync_strategy(&*host);
            }
        }
    }

    fn configure_pots(&mut self) {
        for (i, pot) in self.pots.iter_mut().enumerate() {
            let config = self.strategy.pot_config(i);
            pot.configure(
                config.primary,
                config.alternate,
                config.primary_scale,
                config.alternate_scale,
            );
        }
    }
}
