//! Grids rhythm generator core library
//!
//! A deterministic 32-step sequencer producing three trigger lanes and an
//! accent, either from an interpolated 5x5 drum map or from three Euclidean
//! rhythms, plus the soft-takeover pot handling used to edit it from a
//! three-pot front panel. Everything here is plain in-memory state; hosts
//! feed it edge-detected clocks, bus buffers and UI frames.

#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod params;
pub mod pattern_generator;
pub mod processor;
pub mod random;
pub mod resources;
pub mod takeover;
pub mod ui;
pub mod utils;

// Re-export commonly used items
pub use config::GridsConfig;
pub use params::{ParameterIndex, ParameterValues};
pub use pattern_generator::{
    ClockResolution, DrumsSettings, EuclideanSettings, ModeSettings, Options, OutputMode,
    PatternGenerator, PatternGeneratorSettings, output_bits, render_pattern,
};
pub use processor::GridsProcessor;
pub use takeover::{ParameterHost, TakeoverPot, TakeoverState};
pub use ui::{ControlSurface, ModeStrategy, UiFrame};
