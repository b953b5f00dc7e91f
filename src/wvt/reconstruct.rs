// src/wvt/reconstruct.rs

//! Inverse transform from packed coefficients back to pixels.
//!
//! Follows the 2x2 butterfly outlined in Glassner, "Principles of Digital
//! Image Synthesis" (1995), p. 296, applied scale by scale directly on the
//! packed bytes.

use super::codec::{Codec, map_channels};
use super::layout::{Block, SubBand, prefix_len, scales};
use crate::image::Raster;
use crate::utils::error::{Result, WvtError};

impl Codec {
    /// Reconstructs an image at `resolution`.
    ///
    /// `resolution` must be a power of two no larger than
    /// [`Codec::resolution`]. Only the first `resolution * resolution`
    /// bytes of each channel are read.
    pub fn reconstruct(&self, resolution: u32) -> Result<Raster> {
        if !resolution.is_power_of_two() || resolution > self.resolution() {
            log::warn!(
                "Cannot reconstruct at {}: codec holds up to {}",
                resolution,
                self.resolution()
            );
            return Err(WvtError::InvalidResolution {
                requested: resolution,
                max: self.resolution(),
            });
        }
        log::debug!(
            "Reconstructing {:?} codec at {}x{} (native {}x{})",
            self.kind(),
            resolution,
            resolution,
            self.width(),
            self.height()
        );

        let size = resolution as usize;
        let planes = map_channels(self.channels(), |packed| reconstruct_channel(packed, size));
        Raster::from_planes(resolution, resolution, self.kind(), &planes)
    }
}

/// Rebuilds one `resolution x resolution` channel from its packed prefix.
fn reconstruct_channel(packed: &[u8], resolution: usize) -> Vec<u8> {
    debug_assert!(packed.len() >= prefix_len(resolution));

    // The average image of the current scale lives in the top-left corner,
    // always at the target resolution's row stride.
    let mut image = vec![0i32; prefix_len(resolution)];
    image[0] = packed[0] as i32;

    let mut averages = Vec::with_capacity(prefix_len(resolution / 2));
    for scale in scales(resolution) {
        averages.clear();
        for row in 0..scale {
            let start = row * resolution;
            averages.extend_from_slice(&image[start..start + scale]);
        }

        let horizontal = signed_block(packed, Block { scale, band: SubBand::Horizontal });
        let vertical = signed_block(packed, Block { scale, band: SubBand::Vertical });
        let diagonal = signed_block(packed, Block { scale, band: SubBand::Diagonal });

        for j in 0..scale {
            for i in 0..scale {
                let n = j * scale + i;
                let a = averages[n];
                let h = horizontal[n] as i32;
                let v = vertical[n] as i32;
                let d = diagonal[n] as i32;

                let top = 2 * j * resolution + 2 * i;
                let bottom = top + resolution;
                image[top] = a + h + v + d;
                image[top + 1] = a - h + v - d;
                image[bottom] = a + h - v - d;
                image[bottom + 1] = a - h - v + d;
            }
        }
    }

    image.into_iter().map(|s| s.clamp(0, 255) as u8).collect()
}

fn signed_block(packed: &[u8], block: Block) -> &[i8] {
    bytemuck::cast_slice(&packed[block.range()])
}
