// src/wvt/transform.rs

//! Forward Haar-style averaging/differencing transform.

use super::layout::SubBand;

/// Splits a sample pair into its average and the first sample's offset from it.
#[inline]
fn split_pair(p1: f32, p2: f32) -> (f32, f32) {
    let average = (p1 + p2) / 2.0;
    (average, p1 - average)
}

/// A fully decomposed channel, still in floating point.
///
/// After the transform the `size x size` buffer holds the 1x1 average at
/// the origin and, for every scale `s`, the three detail bands of that
/// level in the quadrants of the `2s x 2s` top-left region.
#[derive(Debug, Clone)]
pub struct Pyramid {
    size: usize,
    data: Vec<f32>,
}

impl Pyramid {
    /// Decomposes a row-major `size x size` channel down to a single average.
    ///
    /// `size` must be a power of two and `samples.len()` must equal
    /// `size * size`; the encoder validates both before calling this.
    pub fn forward(samples: &[u8], size: usize) -> Self {
        debug_assert!(size.is_power_of_two());
        debug_assert_eq!(samples.len(), size * size);

        let mut data: Vec<f32> = samples.iter().map(|&s| s as f32).collect();
        let mut work = data.clone();

        let mut current = size;
        while current > 1 {
            let half = current / 2;

            // Rows: averages into the left half, details into the right.
            for row in 0..current {
                let base = row * size; // stride of the full image, not the level
                for i in 0..half {
                    let (average, detail) = split_pair(data[base + 2 * i], data[base + 2 * i + 1]);
                    work[base + i] = average;
                    work[base + half + i] = detail;
                }
            }
            copy_region(&work, &mut data, size, current);

            // Columns: averages into the top half, details into the bottom.
            for col in 0..current {
                for i in 0..half {
                    let (average, detail) =
                        split_pair(data[2 * i * size + col], data[(2 * i + 1) * size + col]);
                    work[i * size + col] = average;
                    work[(i + half) * size + col] = detail;
                }
            }
            copy_region(&work, &mut data, size, current);

            current = half;
        }

        Pyramid { size, data }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The whole-image average.
    pub fn average(&self) -> f32 {
        self.data[0]
    }

    /// Row-major coefficients of one detail band at `scale`.
    pub fn band(&self, scale: usize, band: SubBand) -> impl Iterator<Item = f32> + '_ {
        let (col, row) = band.origin(scale);
        (0..scale).flat_map(move |j| {
            let start = (row + j) * self.size + col;
            self.data[start..start + scale].iter().copied()
        })
    }
}

/// Copies the top-left `extent x extent` region between `stride`-wide buffers.
fn copy_region(src: &[f32], dst: &mut [f32], stride: usize, extent: usize) {
    for row in 0..extent {
        let base = row * stride;
        dst[base..base + extent].copy_from_slice(&src[base..base + extent]);
    }
}
