// src/wvt/layout.rs

//! Geometry of the coefficient pyramid.
//!
//! A channel of native resolution `N` is packed into `N * N` bytes:
//!
//! ```text
//! [avg] [H s=1] [V s=1] [D s=1] [H s=2 ...4] [V s=2] [D s=2] [H s=4 ...16] ...
//!   0      1       2       3      4..8         8..12   12..16   16..32
//! ```
//!
//! Everything needed for resolution `r` precedes everything that only
//! resolutions above `r` need, so the first `r * r` bytes of a channel
//! reconstruct an `r x r` image on their own. The helpers here are the one
//! place that offset arithmetic lives; the packer and the reconstructor
//! both walk [`blocks`] rather than computing indices themselves.

use std::iter;

/// One of the three detail sub-bands produced at each pyramid level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubBand {
    /// Differences between horizontally adjacent averages (top-right quadrant).
    Horizontal,
    /// Differences between vertically adjacent averages (bottom-left quadrant).
    Vertical,
    /// Diagonal differences (bottom-right quadrant).
    Diagonal,
}

impl SubBand {
    /// Packing order within a scale.
    pub const ALL: [SubBand; 3] = [SubBand::Horizontal, SubBand::Vertical, SubBand::Diagonal];

    fn ordinal(self) -> usize {
        match self {
            SubBand::Horizontal => 0,
            SubBand::Vertical => 1,
            SubBand::Diagonal => 2,
        }
    }

    /// Column and row of the band's top-left corner in the `2s x 2s`
    /// transform grid at `scale`.
    pub fn origin(self, scale: usize) -> (usize, usize) {
        match self {
            SubBand::Horizontal => (scale, 0),
            SubBand::Vertical => (0, scale),
            SubBand::Diagonal => (scale, scale),
        }
    }
}

/// A contiguous run of `scale * scale` packed coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub scale: usize,
    pub band: SubBand,
}

impl Block {
    /// Byte offset of the block within a packed channel.
    ///
    /// Everything for resolutions up to `scale` occupies the first
    /// `scale * scale` bytes, and the three bands follow in order.
    pub fn offset(&self) -> usize {
        self.scale * self.scale * (1 + self.band.ordinal())
    }

    pub fn len(&self) -> usize {
        self.scale * self.scale
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.offset();
        start..start + self.len()
    }
}

/// Number of packed bytes per channel needed to reconstruct `resolution`.
pub fn prefix_len(resolution: usize) -> usize {
    resolution * resolution
}

/// The average-image sizes `1, 2, 4, ...` strictly below `resolution`.
pub fn scales(resolution: usize) -> impl Iterator<Item = usize> {
    iter::successors(Some(1usize), |s| s.checked_mul(2)).take_while(move |&s| s < resolution)
}

/// Every detail block needed for `resolution`, in packing order.
pub fn blocks(resolution: usize) -> impl Iterator<Item = Block> {
    scales(resolution)
        .flat_map(|scale| SubBand::ALL.into_iter().map(move |band| Block { scale, band }))
}

/// Largest power of two not exceeding `n`, or zero for zero.
pub fn floor_power_of_two(n: u32) -> u32 {
    if n == 0 { 0 } else { 1 << (31 - n.leading_zeros()) }
}
