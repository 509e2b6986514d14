//! Fixed-point helpers and signal edge detection shared by the engine.

/// Linear blend of two bytes; `balance` 0 favours `a`, 255 favours `b`.
#[inline]
pub fn u8_mix(a: u8, b: u8, balance: u8) -> u8 {
    ((u16::from(a) * u16::from(255 - balance) + u16::from(b) * u16::from(balance)) >> 8) as u8
}

/// `a * b / 256` without overflow.
#[inline]
pub fn u8_u8_mul_shift8(a: u8, b: u8) -> u8 {
    ((u16::from(a) * u16::from(b)) >> 8) as u8
}

/// Threshold used for clock and reset inputs.
pub const EDGE_THRESHOLD: f32 = 0.5;

/// Rising-edge detector for a control-voltage input.
///
/// Unlike a Schmitt trigger there is no hysteresis: an edge is reported when
/// the signal goes above the threshold while the previous sample was at or
/// below it.
#[derive(Debug, Clone, Copy)]
pub struct EdgeDetector {
    previous: f32,
    threshold: f32,
}

impl EdgeDetector {
    pub fn new(threshold: f32) -> Self {
        Self {
            previous: 0.0,
            threshold,
        }
    }

    /// Feed one sample, returning true on a rising edge.
    #[inline]
    pub fn process(&mut self, input: f32) -> bool {
        let edge = input > self.threshold && self.previous <= self.threshold;
        self.previous = input;
        edge
    }

    /// Treat the input as disconnected.
    pub fn clear(&mut self) {
        self.previous = 0.0;
    }

    pub fn previous(&self) -> f32 {
        self.previous
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new(EDGE_THRESHOLD)
    }
}
