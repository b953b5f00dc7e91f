// src/wvt/codec.rs

use super::channel::ChannelKind;
use super::layout::{floor_power_of_two, prefix_len};
use super::pack::pack;
use super::transform::Pyramid;
use crate::image::Raster;
use crate::utils::error::{Result, WvtError};

/// A hierarchical wavelet encoding of a square raster image.
///
/// Each channel holds packed coefficients in prefix order (see
/// [`super::layout`]): byte 0 is the unsigned whole-image average and the
/// remaining bytes are signed detail coefficients. A codec loaded with
/// [`Codec::from_bytes_partial`](Codec::from_bytes_partial) holds only the
/// leading `resolution * resolution` bytes of each channel.
///
/// Codecs are immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    kind: ChannelKind,
    width: u32,
    height: u32,
    resolution: u32,
    coefficients: Vec<Vec<u8>>,
}

impl Codec {
    /// Creates a wavelet encoding of `raster`.
    ///
    /// The raster must be square with a power-of-two side. Each channel is
    /// transformed independently; with the `rayon` feature the channels are
    /// processed in parallel.
    pub fn encode(raster: &Raster) -> Result<Self> {
        let (width, height) = raster.dimensions();
        if !width.is_power_of_two() || !height.is_power_of_two() {
            log::warn!("Rejecting {}x{} image: dimensions are not powers of two", width, height);
            return Err(WvtError::InvalidImage(format!(
                "dimensions {}x{} are not powers of two",
                width, height
            )));
        }
        if width != height {
            log::warn!("Rejecting {}x{} image: not square", width, height);
            return Err(WvtError::InvalidImage(format!(
                "dimensions {}x{} are not square",
                width, height
            )));
        }

        let kind = raster.kind();
        log::debug!("Encoding {}x{} {:?} image", width, height, kind);

        let size = width as usize;
        let planes = raster.planes();
        let coefficients = map_channels(&planes, |plane| pack(&Pyramid::forward(plane, size)));

        Ok(Codec {
            kind,
            width,
            height,
            resolution: width,
            coefficients,
        })
    }

    /// Assembles a codec from a wire tag and packed channels.
    ///
    /// Channels must either be complete (`width * height` bytes each) or a
    /// prefix of `r * r` bytes for some power of two `r` no larger than
    /// either dimension.
    pub fn from_parts(tag: u32, width: u32, height: u32, coefficients: Vec<Vec<u8>>) -> Result<Self> {
        let kind = ChannelKind::try_from(tag).inspect_err(|_| {
            log::warn!("Unrecognized channel kind tag {:#010x}", tag);
        })?;
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            log::warn!("Rejecting codec parts: dimensions {}x{} out of range", width, height);
            return Err(WvtError::MalformedHeader(format!(
                "dimensions {}x{} must be positive and fit in an int32",
                width, height
            )));
        }
        if coefficients.len() != kind.channel_count() {
            log::warn!(
                "Rejecting codec parts: {:?} needs {} channels, got {}",
                kind,
                kind.channel_count(),
                coefficients.len()
            );
            return Err(WvtError::MalformedHeader(format!(
                "{:?} needs {} channels, got {}",
                kind,
                kind.channel_count(),
                coefficients.len()
            )));
        }

        let len = coefficients[0].len();
        if coefficients.iter().any(|c| c.len() != len) {
            log::warn!("Rejecting codec parts: channels differ in length");
            return Err(WvtError::MalformedHeader("channels differ in length".to_string()));
        }

        let native = floor_power_of_two(width.min(height));
        let resolution = if len as u64 == width as u64 * height as u64 {
            native
        } else {
            let side = floor_power_of_two(len.isqrt().min(u32::MAX as usize) as u32);
            if side == 0 || prefix_len(side as usize) != len || side > native {
                log::warn!(
                    "Rejecting codec parts: {} coefficients per channel do not fit {}x{}",
                    len,
                    width,
                    height
                );
                return Err(WvtError::MalformedHeader(format!(
                    "{} coefficients per channel is neither {}x{} nor a power-of-two prefix",
                    len, width, height
                )));
            }
            side
        };

        Ok(Codec::from_validated(kind, width, height, resolution, coefficients))
    }

    /// Builds a codec whose invariants the caller has already checked.
    pub(crate) fn from_validated(
        kind: ChannelKind,
        width: u32,
        height: u32,
        resolution: u32,
        coefficients: Vec<Vec<u8>>,
    ) -> Self {
        debug_assert_eq!(coefficients.len(), kind.channel_count());
        Codec {
            kind,
            width,
            height,
            resolution,
            coefficients,
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The largest resolution the held coefficients can reconstruct.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn channel_count(&self) -> usize {
        self.coefficients.len()
    }

    /// Packed coefficient bytes of one channel.
    pub fn channel(&self, channel: usize) -> &[u8] {
        &self.coefficients[channel]
    }

    pub(crate) fn channels(&self) -> &[Vec<u8>] {
        &self.coefficients
    }

    /// The whole-image average color of one channel.
    pub fn average(&self, channel: usize) -> u8 {
        self.coefficients[channel][0]
    }

    /// The signed detail coefficients of one channel, in packing order.
    pub fn details(&self, channel: usize) -> &[i8] {
        bytemuck::cast_slice(&self.coefficients[channel][1..])
    }

    /// True if every channel holds all `width * height` coefficients.
    pub fn is_complete(&self) -> bool {
        let full = self.width as u64 * self.height as u64;
        self.coefficients.iter().all(|c| c.len() as u64 == full)
    }
}

/// Runs `f` over every channel, in parallel when the `rayon` feature is on.
pub(crate) fn map_channels<T, F>(channels: &[Vec<u8>], f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&[u8]) -> T + Sync + Send,
{
    #[cfg(feature = "rayon")]
    let mapped = {
        use rayon::prelude::*;
        channels.par_iter().map(|c| f(c)).collect()
    };
    #[cfg(not(feature = "rayon"))]
    let mapped = channels.iter().map(|c| f(c)).collect();
    mapped
}
