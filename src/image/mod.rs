//! Raster image types consumed and produced by the codec.

pub mod raster;

pub use raster::Raster;
