//! Static tables and sizing constants.

pub mod drum_map;
pub mod euclidean;

pub use drum_map::{DRUM_MAP, read_drum_map};
pub use euclidean::{LUT_RES_EUCLIDEAN, euclidean_mask};

/// Independent trigger channels.
pub const NUM_PARTS: usize = 3;

/// Steps in one pattern cycle.
pub const STEPS_PER_PATTERN: usize = 32;

/// Clock ticks a trigger stays high when gate mode is off.
pub const PULSE_DURATION: u16 = 8;

/// Sub-ticks per step with legacy clocking (24 PPQN into eighth notes).
pub const ORIGINAL_GRIDS_PULSES_PER_STEP: u8 = 3;

/// Drum levels above this mark the channel as accented.
pub const ACCENT_THRESHOLD: u8 = 192;

pub const EUCLIDEAN_DENSITY_BUCKETS: usize = 32;
pub const EUCLIDEAN_LUT_SIZE: usize = STEPS_PER_PATTERN * EUCLIDEAN_DENSITY_BUCKETS;
