// src/wvt/pack.rs

//! Quantization of a [`Pyramid`] into the prefix-ordered byte layout.

use super::layout::{self, blocks};
use super::transform::Pyramid;

/// Rounds half away from zero and saturates to an unsigned color value.
#[inline]
pub fn quantize_average(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Rounds half away from zero and saturates to a signed byte.
#[inline]
pub fn quantize_detail(value: f32) -> i8 {
    value.round().clamp(i8::MIN as f32, i8::MAX as f32) as i8
}

/// Packs a decomposed channel into `size * size` bytes.
///
/// Byte 0 is the unsigned average; every later byte is a two's-complement
/// detail coefficient placed at its [`layout::Block`] offset.
pub fn pack(pyramid: &Pyramid) -> Vec<u8> {
    let size = pyramid.size();
    let mut packed = vec![0u8; layout::prefix_len(size)];
    packed[0] = quantize_average(pyramid.average());

    for block in blocks(size) {
        let dst = &mut packed[block.range()];
        for (slot, value) in dst.iter_mut().zip(pyramid.band(block.scale, block.band)) {
            *slot = quantize_detail(value) as u8;
        }
    }
    packed
}
