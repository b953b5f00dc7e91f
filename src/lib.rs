//! A Rust library for hierarchical wavelet image encoding.
//!
//! Images are encoded into a multiresolution representation that can be
//! stored in a compact binary layout (`.wvt`) and reconstructed at any
//! power-of-two resolution up to the original, reading only the leading
//! bytes the target resolution needs.
//!
//! # Quick Start
//!
//! ```
//! use wvt_codec::{Codec, Raster};
//!
//! let pixels: Vec<u8> = (0..64u8).map(|i| i * 4).collect();
//! let raster = Raster::from_raw(8, 8, 1, pixels)?;
//!
//! let codec = Codec::encode(&raster)?;
//! let bytes = codec.to_bytes()?;
//!
//! // Load just enough for a 2x2 preview.
//! let preview = Codec::from_bytes_partial(&bytes, 2)?;
//! let thumb = preview.reconstruct(2)?;
//! assert_eq!(thumb.dimensions(), (2, 2));
//! # Ok::<(), wvt_codec::WvtError>(())
//! ```
//!
//! # Features
//!
//! - **Prefix loading**: partial loads seek over the unused tail of each channel
//! - **Grayscale, RGB, and ARGB**: 1, 3, or 4 byte channels
//! - **Optional parallelism**: enable the `rayon` feature to process channels in parallel
//!
//! The codec logs through the `log` facade and never installs a logger.

// Core modules
pub mod image;
pub mod utils;
pub mod wvt;

// Public API
pub use crate::image::Raster;
pub use wvt::{ChannelKind, Codec};

// Error types
pub use utils::error::{Result, WvtError};
