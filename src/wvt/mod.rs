// src/wvt/mod.rs

//! Hierarchical wavelet image codec.
//!
//! A square, power-of-two raster is decomposed by a Haar-style
//! averaging/differencing transform, quantized to bytes, and packed so that
//! any `r * r` prefix of each channel reconstructs the image at `r x r`.

pub mod channel;
pub mod codec;
pub mod constants;
pub mod io;
pub mod layout;
pub mod pack;
pub mod reconstruct;
pub mod transform;


// Re-export commonly used types
pub use channel::ChannelKind;
pub use codec::Codec;
pub use constants::*;
pub use layout::SubBand;
