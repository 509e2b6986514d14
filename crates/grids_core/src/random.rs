//! 16-bit Galois LFSR used for chaos.
//!
//! Each generator owns its own source so patterns stay reproducible for a
//! given seed.

pub const DEFAULT_SEED: u16 = 0xACE1;
const TAPS: u16 = 0xB400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Random {
    state: u16,
}

impl Random {
    pub fn new(seed: u16) -> Self {
        let mut random = Self { state: DEFAULT_SEED };
        random.seed(seed);
        random
    }

    /// Zero would lock the register, so it selects the default seed.
    pub fn seed(&mut self, seed: u16) {
        self.state = if seed == 0 { DEFAULT_SEED } else { seed };
    }

    #[inline]
    pub fn update(&mut self) {
        let lsb = self.state & 1;
        self.state = (self.state >> 1) ^ (0u16.wrapping_sub(lsb) & TAPS);
    }

    pub fn state(&self) -> u16 {
        self.state
    }

    /// Advance and return the high byte.
    #[inline]
    pub fn byte(&mut self) -> u8 {
        self.update();
        (self.state >> 8) as u8
    }

    /// Advance and return the full state.
    #[inline]
    pub fn word(&mut self) -> u16 {
        self.update();
        self.state
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_steps_from_default_seed() {
        let mut rng = Random::default();
        // 0xACE1 is odd: shift then xor taps.
        assert_eq!(rng.word(), (0xACE1 >> 1) ^ 0xB400);
        // 0xE270 is even: plain shift.
        assert_eq!(rng.word(), 0xE270 >> 1);
    }

    #[test]
    fn byte_is_high_half_of_next_word() {
        let mut a = Random::new(0x1234);
        let mut b = a;
        let word = a.word();
        assert_eq!(b.byte(), (word >> 8) as u8);
    }

    #[test]
    fn zero_seed_falls_back_to_default() {
        assert_eq!(Random::new(0).state(), DEFAULT_SEED);
        let mut rng = Random::new(0x1234);
        rng.seed(0);
        assert_eq!(rng, Random::default());
    }

    #[test]
    fn maximal_period() {
        let mut rng = Random::default();
        let mut period = 0u32;
        loop {
            rng.update();
            period += 1;
            if rng.state() == DEFAULT_SEED {
                break;
            }
            assert!(period < 70_000, "LFSR never returned to its seed");
        }
        assert_eq!(period, 65_535);
    }
}
