// src/wvt/channel.rs

use super::constants::{TAG_ARGB, TAG_GRAY, TAG_RGB};
use crate::utils::error::WvtError;

/// The semantic pixel format of an encoding.
///
/// Each kind maps to exactly one reserved 32-bit wire tag and fixes the
/// number of coefficient channels:
///
/// | Kind        | Channels | Wire tag     | Sample order  |
/// |-------------|----------|--------------|---------------|
/// | `Grayscale` | 1        | `0x67726179` | Y             |
/// | `Rgb`       | 3        | `0x72676220` | R, G, B       |
/// | `Argb`      | 4        | `0x61726762` | R, G, B, A    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Grayscale,
    Rgb,
    Argb,
}

impl ChannelKind {
    pub fn channel_count(self) -> usize {
        match self {
            ChannelKind::Grayscale => 1,
            ChannelKind::Rgb => 3,
            ChannelKind::Argb => 4,
        }
    }

    /// The kind implied by a raster's channel count, if any.
    pub fn from_channel_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ChannelKind::Grayscale),
            3 => Some(ChannelKind::Rgb),
            4 => Some(ChannelKind::Argb),
            _ => None,
        }
    }

    pub fn tag(self) -> u32 {
        match self {
            ChannelKind::Grayscale => TAG_GRAY,
            ChannelKind::Rgb => TAG_RGB,
            ChannelKind::Argb => TAG_ARGB,
        }
    }
}

impl TryFrom<u32> for ChannelKind {
    type Error = WvtError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            TAG_GRAY => Ok(ChannelKind::Grayscale),
            TAG_RGB => Ok(ChannelKind::Rgb),
            TAG_ARGB => Ok(ChannelKind::Argb),
            other => Err(WvtError::InvalidChannelKind(other)),
        }
    }
}

impl From<ChannelKind> for u32 {
    fn from(kind: ChannelKind) -> Self {
        kind.tag()
    }
}
