// src/image/raster.rs

//! In-memory raster images exchanged with the codec.
//!
//! A [`Raster`] is a row-major buffer of interleaved byte samples whose
//! layout is one of the three [`ChannelKind`]s. It converts to and from the
//! `image` crate's 8-bit buffer types so callers can feed decoded files in
//! and hand reconstructions back out.

use crate::utils::error::{Result, WvtError};
use crate::wvt::channel::ChannelKind;
use ::image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

/// A raster image with 1, 3, or 4 interleaved byte channels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    kind: ChannelKind,
    data: Vec<u8>,
}

impl Raster {
    /// Creates a raster with every sample set to zero.
    ///
    /// # Panics
    ///
    /// Panics if the sample count does not fit in memory.
    pub fn new(width: u32, height: u32, kind: ChannelKind) -> Self {
        let len = sample_count(width, height, kind.channel_count()).unwrap_or(usize::MAX);
        Raster {
            width,
            height,
            kind,
            data: vec![0; len],
        }
    }

    /// Wraps interleaved samples, inferring the kind from `channels`.
    pub fn from_raw(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self> {
        let kind = ChannelKind::from_channel_count(channels).ok_or_else(|| {
            log::warn!("Rejecting raster with {} channels", channels);
            WvtError::InvalidImage(format!(
                "{} channels is not grayscale, RGB, or ARGB",
                channels
            ))
        })?;
        let expected = sample_count(width, height, channels)?;
        if data.len() != expected {
            log::warn!(
                "Rejecting {}x{}x{} raster: {} samples, expected {}",
                width,
                height,
                channels,
                data.len(),
                expected
            );
            return Err(WvtError::InvalidImage(format!(
                "{}x{}x{} raster needs {} samples, got {}",
                width,
                height,
                channels,
                expected,
                data.len()
            )));
        }
        Ok(Raster {
            width,
            height,
            kind,
            data,
        })
    }

    /// Interleaves one plane per channel into a raster.
    pub fn from_planes(width: u32, height: u32, kind: ChannelKind, planes: &[Vec<u8>]) -> Result<Self> {
        let pixel_count = sample_count(width, height, 1)?;
        if planes.len() != kind.channel_count() || planes.iter().any(|p| p.len() != pixel_count) {
            log::warn!("Rejecting {} planes for a {}x{} {:?} raster", planes.len(), width, height, kind);
            return Err(WvtError::InvalidImage(format!(
                "expected {} planes of {} samples for a {}x{} {:?} raster",
                kind.channel_count(),
                pixel_count,
                width,
                height,
                kind
            )));
        }
        let mut data = Vec::with_capacity(pixel_count * planes.len());
        for i in 0..pixel_count {
            data.extend(planes.iter().map(|plane| plane[i]));
        }
        Ok(Raster {
            width,
            height,
            kind,
            data,
        })
    }

    /// Creates a raster by calling `f(x, y, channel)` for every sample.
    ///
    /// # Panics
    ///
    /// Panics if the sample count does not fit in memory.
    pub fn from_fn<F>(width: u32, height: u32, kind: ChannelKind, mut f: F) -> Self
    where
        F: FnMut(u32, u32, usize) -> u8,
    {
        let channels = kind.channel_count();
        let len = sample_count(width, height, channels).unwrap_or(usize::MAX);
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.extend((0..channels).map(|c| f(x, y, c)));
            }
        }
        Raster {
            width,
            height,
            kind,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn channel_count(&self) -> usize {
        self.kind.channel_count()
    }

    /// The samples of the pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        assert!(x < self.width && y < self.height);
        let channels = self.channel_count();
        let start = (y as usize * self.width as usize + x as usize) * channels;
        &self.data[start..start + channels]
    }

    pub fn sample(&self, x: u32, y: u32, channel: usize) -> u8 {
        self.pixel(x, y)[channel]
    }

    /// Returns raw interleaved samples.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Copies one channel out as a row-major plane.
    pub fn plane(&self, channel: usize) -> Vec<u8> {
        assert!(channel < self.channel_count());
        self.data
            .chunks_exact(self.channel_count())
            .map(|pixel| pixel[channel])
            .collect()
    }

    pub fn planes(&self) -> Vec<Vec<u8>> {
        (0..self.channel_count()).map(|c| self.plane(c)).collect()
    }
}

impl TryFrom<&DynamicImage> for Raster {
    type Error = WvtError;

    /// Accepts 8-bit luma, RGB, and RGBA images; RGBA maps to
    /// [`ChannelKind::Argb`] with samples kept in R, G, B, A order.
    fn try_from(image: &DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(buf) => Raster::from_raw(width, height, 1, buf.as_raw().clone()),
            DynamicImage::ImageRgb8(buf) => Raster::from_raw(width, height, 3, buf.as_raw().clone()),
            DynamicImage::ImageRgba8(buf) => Raster::from_raw(width, height, 4, buf.as_raw().clone()),
            other => {
                log::warn!("Rejecting {:?} image: unsupported pixel type", other.color());
                Err(WvtError::InvalidImage(format!(
                    "{:?} is not an 8-bit grayscale, RGB, or RGBA image",
                    other.color()
                )))
            }
        }
    }
}

impl TryFrom<DynamicImage> for Raster {
    type Error = WvtError;

    fn try_from(image: DynamicImage) -> Result<Self> {
        Raster::try_from(&image)
    }
}

impl From<GrayImage> for Raster {
    fn from(image: GrayImage) -> Self {
        let (width, height) = image.dimensions();
        Raster {
            width,
            height,
            kind: ChannelKind::Grayscale,
            data: image.into_raw(),
        }
    }
}

impl From<RgbImage> for Raster {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Raster {
            width,
            height,
            kind: ChannelKind::Rgb,
            data: image.into_raw(),
        }
    }
}

impl From<RgbaImage> for Raster {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Raster {
            width,
            height,
            kind: ChannelKind::Argb,
            data: image.into_raw(),
        }
    }
}

impl TryFrom<Raster> for DynamicImage {
    type Error = WvtError;

    fn try_from(raster: Raster) -> Result<Self> {
        let Raster {
            width,
            height,
            kind,
            data,
        } = raster;
        let len = data.len();
        let image = match kind {
            ChannelKind::Grayscale => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
            ChannelKind::Rgb => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
            ChannelKind::Argb => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
        };
        image.ok_or_else(|| {
            log::warn!("Cannot convert {}x{} {:?} raster holding {} samples", width, height, kind, len);
            WvtError::InvalidImage(format!(
                "{}x{} {:?} raster holds {} samples",
                width, height, kind, len
            ))
        })
    }
}

/// Number of samples in a `width` x `height` raster with `channels` samples per pixel.
fn sample_count(width: u32, height: u32, channels: usize) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or_else(|| {
            log::warn!("Rejecting {}x{}x{} raster: sample count overflows", width, height, channels);
            WvtError::InvalidImage(format!("{}x{}x{} raster is too large", width, height, channels))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{ImageBuffer, Luma, Rgb};

    #[test]
    fn test_from_raw_rejects_two_channels() {
        let err = Raster::from_raw(2, 2, 2, vec![0; 8]).unwrap_err();
        assert!(matches!(err, WvtError::InvalidImage(_)));
    }

    #[test]
    fn test_from_raw_rejects_short_data() {
        let err = Raster::from_raw(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, WvtError::InvalidImage(_)));
    }

    #[test]
    fn test_from_raw_rejects_overflowing_dimensions() {
        let err = Raster::from_raw(u32::MAX, u32::MAX, 4, vec![]).unwrap_err();
        assert!(matches!(err, WvtError::InvalidImage(_)));
    }

    #[test]
    fn test_from_planes_rejects_overflowing_dimensions() {
        let planes = vec![Vec::new(); 4];
        let err = Raster::from_planes(u32::MAX, u32::MAX, ChannelKind::Argb, &planes).unwrap_err();
        assert!(matches!(err, WvtError::InvalidImage(_)));
    }

    #[test]
    fn test_planes_roundtrip() {
        let raster = Raster::from_fn(2, 2, ChannelKind::Rgb, |x, y, c| (x * 10 + y * 20) as u8 + c as u8);
        let planes = raster.planes();
        assert_eq!(planes[0], vec![0, 10, 20, 30]);
        assert_eq!(planes[2], vec![2, 12, 22, 32]);
        let rebuilt = Raster::from_planes(2, 2, ChannelKind::Rgb, &planes).unwrap();
        assert_eq!(rebuilt, raster);
    }

    #[test]
    fn test_from_planes_checks_plane_count() {
        let planes = vec![vec![0u8; 4]; 3];
        assert!(Raster::from_planes(2, 2, ChannelKind::Argb, &planes).is_err());
    }

    #[test]
    fn test_dynamic_image_conversion() {
        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(4, 4, |x, y| Rgb([x as u8, y as u8, 7]));
        let raster = Raster::try_from(DynamicImage::ImageRgb8(img.clone())).unwrap();
        assert_eq!(raster.kind(), ChannelKind::Rgb);
        assert_eq!(raster.pixel(3, 1), &[3, 1, 7]);

        let back = DynamicImage::try_from(raster).unwrap();
        assert_eq!(back.to_rgb8(), img);
    }

    #[test]
    fn test_mismatched_raster_does_not_become_an_image() {
        let raster = Raster {
            width: 4,
            height: 4,
            kind: ChannelKind::Rgb,
            data: vec![0; 5],
        };
        assert!(matches!(DynamicImage::try_from(raster), Err(WvtError::InvalidImage(_))));
    }

    #[test]
    fn test_sixteen_bit_images_are_rejected() {
        let img = DynamicImage::new_luma16(4, 4);
        assert!(matches!(Raster::try_from(&img), Err(WvtError::InvalidImage(_))));
    }

    #[test]
    fn test_gray_image_conversion() {
        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_pixel(2, 2, Luma([42]));
        let raster = Raster::from(img);
        assert_eq!(raster.kind(), ChannelKind::Grayscale);
        assert_eq!(raster.sample(1, 1, 0), 42);
    }
}
