// src/wvt/constants.rs

//! Wire-format constants for wavelet encodings.

/// Channel-kind tag for single-channel grayscale encodings (ascii "gray").
pub const TAG_GRAY: u32 = 0x6772_6179;

/// Channel-kind tag for three-channel RGB encodings (ascii "rgb ").
pub const TAG_RGB: u32 = 0x7267_6220;

/// Channel-kind tag for four-channel ARGB encodings (ascii "argb").
pub const TAG_ARGB: u32 = 0x6172_6762;

/// Size of the fixed header: width, height, channel kind, channel count.
pub const HEADER_LEN: u64 = 4 * 4;

/// Suggested file extension for wavelet encodings, without the dot.
pub const WVT_EXT: &str = "wvt";
