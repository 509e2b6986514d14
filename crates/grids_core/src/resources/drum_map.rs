//! Drum map node tables.
//!
//! Each node holds 96 levels: 32 steps for each of the three instruments
//! (bass drum, snare drum, hi-hat), stored instrument-major. The 25 nodes are
//! laid out on a 5x5 grid that the X/Y map coordinates interpolate across.

use crate::utils::u8_mix;

use super::{NUM_PARTS, STEPS_PER_PATTERN};

/// Bytes in a single node table.
pub const NODE_SIZE: usize = NUM_PARTS * STEPS_PER_PATTERN;

/// Side of the square node grid.
pub const MAP_SIZE: usize = 5;

#[rustfmt::skip]
const NODE_0: [u8; NODE_SIZE] = [
    255,   0,   0,   0,   0,   0, 145,   0,   0,   0,   0,   0, 218,   0,   0,   0,
     72,   0,  36,   0, 182,   0,   0,   0, 109,   0,   0,   0,  72,   0,   0,   0,
     36,   0, 109,   0,   0,   0,   8,   0, 255,   0,   0,   0,   0,   0,  72,   0,
      0,   0, 182,   0,   0,   0,  36,   0, 218,   0,   0,   0, 145,   0,   0,   0,
    170,   0, 113,   0, 255,   0,  56,   0, 170,   0, 141,   0, 198,   0,  56,   0,
    170,   0, 113,   0, 226,   0,  28,   0, 170,   0, 113,   0, 198,   0,  85,   0,
];

#[rustfmt::skip]
const NODE_1: [u8; NODE_SIZE] = [
    229,   0,  25,   0, 102,   0,  25,   0, 204,   0,  25,   0,  76,   0,   8,   0,
    255,   0,   8,   0,  51,   0,  25,   0, 178,   0,  25,   0, 153,   0, 127,   0,
     28,   0, 198,   0,  56,   0,  56,   0, 226,   0,  28,   0, 141,   0,  28,   0,
     28,   0, 170,   0,  28,   0,  28,   0, 255,   0, 113,   0,  85,   0,  85,   0,
    159,   0, 159,   0, 255,   0,  63,   0, 159,   0, 159,   0, 191,   0,  31,   0,
    159,   0, 127,   0, 255,   0,  31,   0, 159,   0, 127,   0, 223,   0,  95,   0,
];

#[rustfmt::skip]
const NODE_2: [u8; NODE_SIZE] = [
    255,   0,   0,   0, 127,   0,   0,   0,   0,   0, 102,   0,   0,   0, 229,   0,
      0,   0, 178,   0, 204,   0,   0,   0,  76,   0,  51,   0, 153,   0,  25,   0,
      0,   0, 127,   0,   0,   0,   0,   0, 255,   0, 191,   0,  31,   0,  63,   0,
      0,   0,  95,   0,   0,   0,   0,   0, 223,   0,   0,   0,  31,   0, 159,   0,
    255,   0,  85,   0, 148,   0,  85,   0, 127,   0,  85,   0, 106,   0,  63,   0,
    212,   0, 170,   0, 191,   0, 170,   0,  85,   0,  42,   0, 233,   0,  21,   0,
];

#[rustfmt::skip]
const NODE_3: [u8; NODE_SIZE] = [
    255,   0, 212,   0,  63,   0,   0,   0, 106,   0, 148,   0,  85,   0, 127,   0,
    191,   0,  21,   0, 233,   0,   0,   0,  21,   0, 170,   0,   0,   0,  42,   0,
      0,   0,   0,   0, 141,   0, 113,   0, 255,   0, 198,   0,   0,   0,  56,   0,
      0,   0,  85,   0,  56,   0,  28,   0, 226,   0,  28,   0, 170,   0,  56,   0,
    255,   0, 231,   0, 255,   0, 208,   0, 139,   0,  92,   0, 115,   0,  92,   0,
    185,   0,  69,   0,  46,   0,  46,   0, 162,   0,  23,   0, 208,   0,  46,   0,
];

#[rustfmt::skip]
const NODE_4: [u8; NODE_SIZE] = [
    255,   0,  31,   0,  63,   0,  63,   0, 127,   0,  95,   0, 191,   0,  63,   0,
    223,   0,  31,   0, 159,   0,  63,   0,  31,   0,  63,   0,  95,   0,  31,   0,
      8,   0,   0,   0,  95,   0,  63,   0, 255,   0,   0,   0, 127,   0,   0,   0,
      8,   0,   0,   0, 159,   0,  63,   0, 255,   0, 223,   0, 191,   0,  31,   0,
     76,   0,  25,   0, 255,   0, 127,   0, 153,   0,  51,   0, 204,   0, 102,   0,
     76,   0,  51,   0, 229,   0, 127,   0, 153,   0,  51,   0, 178,   0, 102,   0,
];

#[rustfmt::skip]
const NODE_5: [u8; NODE_SIZE] = [
    255,   0,  51,   0,  25,   0,  76,   0,   0,   0,   0,   0, 102,   0,   0,   0,
    204,   0, 229,   0,   0,   0, 178,   0,   0,   0, 153,   0, 127,   0,   8,   0,
    178,   0, 127,   0, 153,   0, 204,   0, 255,   0,   0,   0,  25,   0,  76,   0,
    102,   0,  51,   0,   0,   0,   0,   0, 229,   0,  25,   0,  25,   0, 204,   0,
    178,   0, 102,   0, 255,   0,  76,   0, 127,   0,  76,   0, 229,   0,  76,   0,
    153,   0, 102,   0, 255,   0,  25,   0, 127,   0,  51,   0, 204,   0,  51,   0,
];

#[rustfmt::skip]
const NODE_6: [u8; NODE_SIZE] = [
    255,   0,   0,   0, 223,   0,   0,   0,  31,   0,   8,   0, 127,   0,   0,   0,
     95,   0,   0,   0, 159,   0,   0,   0,  95,   0,  63,   0, 191,   0,   0,   0,
     51,   0, 204,   0,   0,   0, 102,   0, 255,   0, 127,   0,   8,   0, 178,   0,
     25,   0, 229,   0,   0,   0,  76,   0, 204,   0, 153,   0,  51,   0,  25,   0,
    255,   0, 226,   0, 255,   0, 255,   0, 198,   0,  28,   0, 141,   0,  56,   0,
    170,   0,  56,   0,  85,   0,  28,   0, 170,   0,  28,   0, 113,   0,  56,   0,
];

#[rustfmt::skip]
const NODE_7: [u8; NODE_SIZE] = [
    223,   0,   0,   0,  63,   0,   0,   0,  95,   0,   0,   0, 223,   0,  31,   0,
    255,   0,   0,   0, 159,   0,   0,   0, 127,   0,  31,   0, 191,   0,  31,   0,
      0,   0,   0,   0, 109,   0,   0,   0, 218,   0,   0,   0, 182,   0,  72,   0,
      8,   0,  36,   0, 145,   0,  36,   0, 255,   0,   8,   0, 182,   0,  72,   0,
    255,   0,  72,   0, 218,   0,  36,   0, 218,   0,   0,   0, 145,   0,   0,   0,
    255,   0,  36,   0, 182,   0,  36,   0, 182,   0,   0,   0, 109,   0,   0,   0,
];

#[rustfmt::skip]
const NODE_8: [u8; NODE_SIZE] = [
    255,   0,   0,   0, 218,   0,   0,   0,  36,   0,   0,   0, 218,   0,   0,   0,
    182,   0, 109,   0, 255,   0,   0,   0,   0,   0,   0,   0, 145,   0,  72,   0,
    159,   0,   0,   0,  31,   0, 127,   0, 255,   0,  31,   0,   0,   0,  95,   0,
      8,   0,   0,   0, 191,   0,  31,   0, 255,   0,  31,   0, 223,   0,  63,   0,
    255,   0,  31,   0,  63,   0,  31,   0,  95,   0,  31,   0,  63,   0, 127,   0,
    159,   0,  31,   0,  63,   0,  31,   0, 223,   0, 223,   0, 191,   0, 191,   0,
];

#[rustfmt::skip]
const NODE_9: [u8; NODE_SIZE] = [
    226,   0,  28,   0,  28,   0, 141,   0,   8,   0,   8,   0, 255,   0,   8,   0,
    113,   0,  28,   0, 198,   0,  85,   0,  56,   0, 198,   0, 170,   0,  28,   0,
      8,   0,  95,   0,   8,   0,   8,   0, 255,   0,  63,   0,  31,   0, 223,   0,
      8,   0,  31,   0, 191,   0,   8,   0, 255,   0, 127,   0, 127,   0, 159,   0,
    115,   0,  46,   0, 255,   0, 185,   0, 139,   0,  23,   0, 208,   0, 115,   0,
    231,   0,  69,   0, 255,   0, 162,   0, 139,   0, 115,   0, 231,   0,  92,   0,
];

#[rustfmt::skip]
const NODE_10: [u8; NODE_SIZE] = [
    145,   0,   0,   0,   0,   0, 109,   0,   0,   0,   0,   0, 255,   0, 109,   0,
     72,   0, 218,   0,   0,   0,   0,   0,  36,   0,   0,   0, 182,   0,   0,   0,
      0,   0, 127,   0, 159,   0, 127,   0, 159,   0, 191,   0, 223,   0,  63,   0,
    255,   0,  95,   0,  31,   0,  95,   0,  31,   0,   8,   0,  63,   0,   8,   0,
    255,   0,   0,   0, 145,   0,   0,   0, 182,   0, 109,   0, 109,   0, 109,   0,
    218,   0,   0,   0,  72,   0,   0,   0, 182,   0,  72,   0, 182,   0,  36,   0,
];

#[rustfmt::skip]
const NODE_11: [u8; NODE_SIZE] = [
    255,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
    255,   0,   0,   0, 218,   0,  72,  36,   0,   0, 182,   0,   0,   0, 145, 109,
      0,   0, 127,   0,   0,   0,  42,   0, 212,   0,   0, 212,   0,   0, 212,   0,
      0,   0,   0,   0,  42,   0,   0,   0, 255,   0,   0,   0, 170, 170, 127,  85,
    145,   0, 109, 109, 218, 109,  72,   0, 145,   0,  72,   0, 218,   0, 109,   0,
    182,   0, 109,   0, 255,   0,  72,   0, 182, 109,  36, 109, 255, 109, 109,   0,
];

#[rustfmt::skip]
const NODE_12: [u8; NODE_SIZE] = [
    255,   0,   0,   0, 255,   0, 191,   0,   0,   0,   0,   0,  95,   0,  63,   0,
     31,   0,   0,   0, 223,   0, 223,   0,   0,   0,   8,   0, 159,   0, 127,   0,
      0,   0,  85,   0,  56,   0,  28,   0, 255,   0,  28,   0,   0,   0, 226,   0,
      0,   0, 170,   0,  56,   0, 113,   0, 198,   0,   0,   0, 113,   0, 141,   0,
    255,   0,  42,   0, 233,   0,  63,   0, 212,   0,  85,   0, 191,   0, 106,   0,
    191,   0,  21,   0, 170,   0,   8,   0, 170,   0, 127,   0, 148,   0, 148,   0,
];

#[rustfmt::skip]
const NODE_13: [u8; NODE_SIZE] = [
    255,   0,   0,   0,   0,   0,  63,   0, 191,   0,  95,   0,  31,   0, 223,   0,
    255,   0,  63,   0,  95,   0,  63,   0, 159,   0,   0,   0,   0,   0, 127,   0,
     72,   0,   0,   0,   0,   0,   0,   0, 255,   0,   0,   0,   0,   0,   0,   0,
     72,   0,  72,   0,  36,   0,   8,   0, 218,   0, 182,   0, 145,   0, 109,   0,
    255,   0, 162,   0, 231,   0, 162,   0, 231,   0, 115,   0, 208,   0, 139,   0,
    185,   0,  92,   0, 185,   0,  46,   0, 162,   0,  69,   0, 162,   0,  23,   0,
];

#[rustfmt::skip]
const NODE_14: [u8; NODE_SIZE] = [
    255,   0,   0,   0,  51,   0,   0,   0,   0,   0,   0,   0, 102,   0,   0,   0,
    204,   0,   0,   0, 153,   0,   0,   0,   0,   0,   0,   0,  51,   0,   0,   0,
      0,   0,   0,   0,   8,   0,  36,   0, 255,   0,   0,   0, 182,   0,   8,   0,
      0,   0,   0,   0,  72,   0, 109,   0, 145,   0,   0,   0, 255,   0, 218,   0,
    212,   0,   8,   0, 170,   0,   0,   0, 127,   0,   0,   0,  85,   0,   8,   0,
    255,   0,   8,   0, 170,   0,   0,   0, 127,   0,   0,   0,  42,   0,   8,   0,
];

#[rustfmt::skip]
const NODE_15: [u8; NODE_SIZE] = [
    255,   0,   0,   0,   0,   0,   0,   0,  36,   0,   0,   0, 182,   0,   0,   0,
    218,   0,   0,   0,   0,   0,   0,   0,  72,   0,   0,   0, 145,   0, 109,   0,
     36,   0,  36,   0,   0,   0,   0,   0, 255,   0,   0,   0, 182,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0, 109, 218,   0,   0,   0, 145,   0,  72,  72,
    255,   0,  28,   0, 226,   0,  56,   0, 198,   0,   0,   0,   0,   0,  28,  28,
    170,   0,   0,   0, 141,   0,   0,   0, 113,   0,   0,   0,  85,  85,  85,  85,
];

#[rustfmt::skip]
const NODE_16: [u8; NODE_SIZE] = [
    255,   0,   0,   0,   0,   0,  95,   0,   0,   0, 127,   0,   0,   0,   0,   0,
    223,   0,  95,   0,  63,   0,  31,   0, 191,   0,   0,   0, 159,   0,   0,   0,
      0,   0,  31,   0, 255,   0,   0,   0,   0,   0,  95,   0, 223,   0,   0,   0,
      0,   0,  63,   0, 191,   0,   0,   0,   0,   0,   0,   0, 159,   0, 127,   0,
    141,   0,  28,   0,  28,   0,  28,   0, 113,   0,   8,   0,   8,   0,   8,   0,
    255,   0,   0,   0, 226,   0,   0,   0, 198,   0,  56,   0, 170,   0,  85,   0,
];

#[rustfmt::skip]
const NODE_17: [u8; NODE_SIZE] = [
    255,   0,   0,   0,   8,   0,   0,   0, 182,   0,   0,   0,  72,   0,   0,   0,
    218,   0,   0,   0,  36,   0,   0,   0, 145,   0,   0,   0, 109,   0,   0,   0,
      0,   0,  51,  25,  76,  25,  25,   0, 153,   0,   0,   0, 127, 102, 178,   0,
    204,   0,   0,   0,   0,   0, 255,   0,   0,   0, 102,   0, 229,   0,  76,   0,
    113,   0,   0,   0, 141,   0,  85,   0,   0,   0,   0,   0, 170,   0,   0,   0,
     56,  28, 255,   0,   0,   0,   0,   0, 198,   0,   0,   0, 226,   0,   0,   0,
];

#[rustfmt::skip]
const NODE_18: [u8; NODE_SIZE] = [
    255,   0,   8,   0,  28,   0,  28,   0, 198,   0,  56,   0,  56,   0,  85,   0,
    255,   0,  85,   0, 113,   0, 113,   0, 226,   0, 141,   0, 170,   0, 141,   0,
      0,   0,   0,   0,   0,   0,   0,   0, 255,   0,   0,   0, 127,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0,  63,   0,   0,   0, 191,   0,   0,   0,
    255,   0,   0,   0, 255,   0, 127,   0,   0,   0,  85,   0,   0,   0, 212,   0,
      0,   0, 212,   0,  42,   0, 170,   0,   0,   0, 127,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const NODE_19: [u8; NODE_SIZE] = [
    255,   0,   0,   0,   0,   0, 218,   0, 182,   0,   0,   0,   0,   0, 145,   0,
    145,   0,  36,   0,   0,   0, 109,   0, 109,   0,   0,   0,  72,   0,  36,   0,
      0,   0,   0,   0, 109,   0,   8,   0,  72,   0,   0,   0, 255,   0, 182,   0,
      0,   0,   0,   0, 145,   0,   8,   0,  36,   0,   8,   0, 218,   0, 182,   0,
    255,   0,   0,   0,   0,   0, 226,   0,  85,   0,   0,   0, 141,   0,   0,   0,
      0,   0,   0,   0, 170,   0,  56,   0, 198,   0,   0,   0, 113,   0,  28,   0,
];

#[rustfmt::skip]
const NODE_20: [u8; NODE_SIZE] = [
    255,   0,   0,   0, 113,   0,   0,   0, 198,   0,  56,   0,  85,   0,  28,   0,
    255,   0,   0,   0, 226,   0,   0,   0, 170,   0,   0,   0, 141,   0,   0,   0,
      0,   0,   0,   0,   0,   0,   0,   0, 255,   0, 145,   0, 109,   0, 218,   0,
     36,   0, 182,   0,  72,   0,  72,   0, 255,   0,   0,   0,   0,   0, 109,   0,
     36,   0,  36,   0, 145,   0,   0,   0,  72,   0,  72,   0, 182,   0,   0,   0,
     72,   0,  72,   0, 218,   0,   0,   0, 109,   0, 109,   0, 255,   0,   0,   0,
];

#[rustfmt::skip]
const NODE_21: [u8; NODE_SIZE] = [
    255,   0,   0,   0, 218,   0,   0,   0, 145,   0,   0,   0,  36,   0,   0,   0,
    218,   0,   0,   0,  36,   0,   0,   0, 182,   0,  72,   0,   0,   0, 109,   0,
      0,   0,   0,   0,   8,   0,   0,   0, 255,   0,  85,   0, 212,   0,  42,   0,
      0,   0,   0,   0,   8,   0,   0,   0,  85,   0, 170,   0, 127,   0,  42,   0,
    109,   0, 109,   0, 255,   0,   0,   0,  72,   0,  72,   0, 218,   0,   0,   0,
    145,   0, 182,   0, 255,   0,   0,   0,  36,   0,  36,   0, 218,   0,   8,   0,
];

#[rustfmt::skip]
const NODE_22: [u8; NODE_SIZE] = [
    255,   0,   0,   0,  42,   0,   0,   0, 212,   0,   0,   0,   8,   0, 212,   0,
    170,   0,   0,   0,  85,   0,   0,   0, 212,   0,   8,   0, 127,   0,   8,   0,
    255,   0,  85,   0,   0,   0,   0,   0, 226,   0,  85,   0,   0,   0, 198,   0,
      0,   0, 141,   0,  56,   0,   0,   0, 170,   0,  28,   0,   0,   0, 113,   0,
    113,   0,  56,   0, 255,   0,   0,   0,  85,   0,  56,   0, 226,   0,   0,   0,
      0,   0, 170,   0,   0,   0, 141,   0,  28,   0,  28,   0, 198,   0,  28,   0,
];

#[rustfmt::skip]
const NODE_23: [u8; NODE_SIZE] = [
    255,   0,   0,   0, 229,   0,   0,   0, 204,   0, 204,   0,   0,   0,  76,   0,
    178,   0, 153,   0,  51,   0, 178,   0, 178,   0, 127,   0, 102,  51,  51,  25,
      0,   0,   0,   0,   0,   0,   0,  31,   0,   0,   0,   0, 255,   0,   0,  31,
      0,   0,   8,   0,   0,   0, 191, 159, 127,  95,  95,   0, 223,   0,  63,   0,
    255,   0, 255,   0, 204, 204, 204, 204,   0,   0,  51,  51,  51,  51,   0,   0,
    204,   0, 204,   0, 153, 153, 153, 153, 153,   0,   0,   0, 102, 102, 102, 102,
];

#[rustfmt::skip]
const NODE_24: [u8; NODE_SIZE] = [
    170,   0,   0,   0,   0, 255,   0,   0, 198,   0,   0,   0,   0,  28,   0,   0,
    141,   0,   0,   0,   0, 226,   0,   0,  56,   0,   0, 113,   0,  85,   0,   0,
    255,   0,   0,   0,   0, 113,   0,   0,  85,   0,   0,   0,   0, 226,   0,   0,
    141,   0,   0,   8,   0, 170,  56,  56, 198,   0,   0,  56,   0, 141,  28,   0,
    255,   0,   0,   0,   0, 191,   0,   0, 159,   0,   0,   0,   0, 223,   0,   0,
     95,   0,   0,   0,   0,  63,   0,   0, 127,   0,   0,   0,   0,  31,   0,   0,
];

/// Node tables arranged as `DRUM_MAP[y][x]`.
pub static DRUM_MAP: [[&[u8; NODE_SIZE]; MAP_SIZE]; MAP_SIZE] = [
    [&NODE_10, &NODE_8, &NODE_0, &NODE_9, &NODE_11],
    [&NODE_15, &NODE_7, &NODE_13, &NODE_12, &NODE_6],
    [&NODE_18, &NODE_14, &NODE_4, &NODE_5, &NODE_3],
    [&NODE_23, &NODE_16, &NODE_21, &NODE_1, &NODE_2],
    [&NODE_24, &NODE_19, &NODE_17, &NODE_20, &NODE_22],
];

/// Level of `instrument` at `step` for the map position `(x, y)`.
///
/// The high two bits of each coordinate select the surrounding 2x2 cell and the
/// low six bits, scaled by four, weight the bilinear blend between its corners.
/// Out-of-range steps and instruments are clamped.
pub fn read_drum_map(step: u8, instrument: u8, x: u8, y: u8) -> u8 {
    let i = usize::from(x >> 6).min(MAP_SIZE - 2);
    let j = usize::from(y >> 6).min(MAP_SIZE - 2);
    let instrument = usize::from(instrument).min(NUM_PARTS - 1);
    let step = usize::from(step).min(STEPS_PER_PATTERN - 1);
    let offset = instrument * STEPS_PER_PATTERN + step;

    let a = DRUM_MAP[j][i][offset];
    let b = DRUM_MAP[j][i + 1][offset];
    let c = DRUM_MAP[j + 1][i][offset];
    let d = DRUM_MAP[j + 1][i + 1][offset];

    let x_weight = (x & 0x3f) << 2;
    let y_weight = (y & 0x3f) << 2;
    u8_mix(u8_mix(a, b, x_weight), u8_mix(c, d, x_weight), y_weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_reads_the_top_left_node() {
        // Zero weights still pass through u8_mix, which scales by 255/256.
        assert_eq!(NODE_10[0], 145);
        assert_eq!(read_drum_map(0, 0, 0, 0), 143);
    }

    #[test]
    fn node_zero_bass_drum_opens_the_bar() {
        assert_eq!(NODE_0[0], 255);
        assert_eq!(NODE_0[6], 145);
        assert_eq!(NODE_0[12], 218);
    }

    #[test]
    fn far_corner_blends_the_last_cell() {
        for step in 0..STEPS_PER_PATTERN {
            let offset = 2 * STEPS_PER_PATTERN + step;
            let expected = u8_mix(
                u8_mix(NODE_1[offset], NODE_2[offset], 252),
                u8_mix(NODE_20[offset], NODE_22[offset], 252),
                252,
            );
            assert_eq!(read_drum_map(step as u8, 2, 255, 255), expected, "step {step}");
        }
    }

    #[test]
    fn out_of_range_instrument_and_step_are_clamped() {
        assert_eq!(read_drum_map(200, 9, 40, 90), read_drum_map(31, 2, 40, 90));
    }

    #[test]
    fn interpolation_lies_between_corner_levels() {
        for step in 0..STEPS_PER_PATTERN as u8 {
            for instrument in 0..NUM_PARTS as u8 {
                let offset = instrument as usize * STEPS_PER_PATTERN + step as usize;
                let corners = [
                    NODE_4[offset],
                    NODE_5[offset],
                    NODE_21[offset],
                    NODE_1[offset],
                ];
                let lo = *corners.iter().min().unwrap_or(&0);
                let hi = *corners.iter().max().unwrap_or(&255);
                let level = read_drum_map(step, instrument, 160, 160);
                assert!(
                    level <= hi && level + 3 >= lo,
                    "step {step} instrument {instrument}: {level} outside [{lo}, {hi}]"
                );
            }
        }
    }
}
