//! Block processor tying the generator, the parameters and the panel
//! together for a host that hands over bus buffers.
//!
//! Buses are stored bus-major: sample `s` of bus `b` lives at
//! `b * frames + s`. Routing parameters are 1-based, 0 leaves a port
//! unconnected.

use crate::params::{NUM_BUSES, ParameterIndex, ParameterValues, apply_to_generator};
use crate::pattern_generator::{PatternGenerator, output_bits};
use crate::ui::{ControlSurface, UiFrame};
use crate::utils::EdgeDetector;

/// Width of an output trigger.
pub const TRIGGER_SECONDS: f32 = 0.005;
pub const TRIGGER_HIGH: f32 = 1.0;
pub const TRIGGER_LOW: f32 = 0.0;

/// State bit driving each output, in routing order.
const OUTPUT_BITS: [u8; 4] = [
    output_bits::TRIG_1,
    output_bits::TRIG_2,
    output_bits::TRIG_3,
    output_bits::ACCENT,
];

#[derive(Debug, Clone)]
pub struct GridsProcessor {
    generator: PatternGenerator,
    params: ParameterValues,
    surface: ControlSurface,
    sample_rate: f32,
    trigger_remaining: [u32; 4],
    clock: EdgeDetector,
    reset: EdgeDetector,
}

impl GridsProcessor {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_parameters(sample_rate, ParameterValues::default())
    }

    pub fn with_parameters(sample_rate: f32, params: ParameterValues) -> Self {
        Self::with_generator(sample_rate, params, PatternGenerator::new())
    }

    /// Start from an already configured generator; parameters are applied
    /// on top and the pattern is rewound.
    pub fn with_generator(
        sample_rate: f32,
        params: ParameterValues,
        mut generator: PatternGenerator,
    ) -> Self {
        apply_to_generator(&params, &mut generator);
        generator.reset();
        let surface = ControlSurface::new(&params);
        tracing::debug!(sample_rate, mode = generator.output_mode().name(), "processor ready");
        Self {
            generator,
            params,
            surface,
            sample_rate,
            trigger_remaining: [0; 4],
            clock: EdgeDetector::default(),
            reset: EdgeDetector::default(),
        }
    }

    pub fn generator(&self) -> &PatternGenerator {
        &self.generator
    }

    pub fn generator_mut(&mut self) -> &mut PatternGenerator {
        &mut self.generator
    }

    pub fn parameters(&self) -> &ParameterValues {
        &self.params
    }

    pub fn surface(&self) -> &ControlSurface {
        &self.surface
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn trigger_samples(&self) -> u32 {
        (TRIGGER_SECONDS * self.sample_rate) as u32
    }

    /// Samples left on each output's current trigger.
    pub fn trigger_remaining(&self) -> [u32; 4] {
        self.trigger_remaining
    }

    /// Host notification that `index` changed.
    pub fn parameter_changed(&mut self, index: ParameterIndex) {
        apply_to_generator(&self.params, &mut self.generator);
        if matches!(
            index,
            ParameterIndex::Mode | ParameterIndex::EuclideanControlsLength
        ) {
            self.surface.sync_strategy(&self.params);
        }
    }

    /// Store a clamped value and notify; returns the stored value.
    pub fn set_parameter(&mut self, index: ParameterIndex, value: i32) -> i32 {
        let stored = self.params.set(index, value);
        self.parameter_changed(index);
        stored
    }

    pub fn setup_ui(&mut self) -> [f32; 3] {
        self.surface.setup(&self.params)
    }

    pub fn process_ui(&mut self, frame: &UiFrame) {
        self.surface.process(frame, &mut self.params);
        apply_to_generator(&self.params, &mut self.generator);
    }

    fn route(&self, param: ParameterIndex, bus_count: usize) -> Option<usize> {
        let bus = self.params.get(param);
        if bus > 0 && bus <= NUM_BUSES && (bus as usize) <= bus_count {
            Some(bus as usize - 1)
        } else {
            None
        }
    }

    /// Run one block: detect clock and reset edges sample by sample, start
    /// triggers for set state bits, then write the outputs.
    ///
    /// A trigger starts whenever its state bit is set and its counter is idle,
    /// not only when the bit is newly set. A bit held across blocks (gate
    /// mode, or a long gap between clocks) therefore re-arms in the first
    /// block after its counter runs out, giving a train of 5 ms pulses.
    #[profiling::function]
    pub fn process_block(&mut self, buses: &mut [f32], frames: usize) {
        if frames == 0 {
            return;
        }
        let bus_count = buses.len() / frames;
        let clock_bus = self.route(ParameterIndex::ClockInput, bus_count);
        let reset_bus = self.route(ParameterIndex::ResetInput, bus_count);

        for s in 0..frames {
            match clock_bus {
                Some(bus) => {
                    if self.clock.process(buses[bus * frames + s]) {
                        self.generator.tick_clock(true);
                    }
                }
                None => self.clock.clear(),
            }
            match reset_bus {
                Some(bus) => {
                    if self.reset.process(buses[bus * frames + s]) {
                        tracing::trace!(sample = s, "reset edge");
                        self.generator.reset();
                        self.trigger_remaining = [0; 4];
                    }
                }
                None => self.reset.clear(),
            }
        }

        let state = self.generator.state();
        let trigger_samples = self.trigger_samples();
        for (remaining, &bit) in self.trigger_remaining.iter_mut().zip(&OUTPUT_BITS) {
            if state & bit != 0 && *remaining == 0 {
                *remaining = trigger_samples;
            }
        }

        for (output, &(bus_param, mode_param)) in ParameterIndex::OUTPUTS.iter().enumerate() {
            let Some(bus) = self.route(bus_param, bus_count) else {
                self.trigger_remaining[output] =
                    self.trigger_remaining[output].saturating_sub(frames as u32);
                continue;
            };
            let replace = self.params.get(mode_param) != 0;
            let remaining = &mut self.trigger_remaining[output];
            for sample in &mut buses[bus * frames..(bus + 1) * frames] {
                let value = if *remaining > 0 {
                    *remaining -= 1;
                    TRIGGER_HIGH
                } else {
                    TRIGGER_LOW
                };
                if replace {
                    *sample = value;
                } else {
                    *sample += value;
                }
            }
        }
    }
}
