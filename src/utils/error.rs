// src/utils/error.rs

use thiserror::Error;

/// The primary error type for all operations in the wavelet codec library.
#[derive(Error, Debug)]
pub enum WvtError {
    /// An I/O error occurred while reading or writing a stream or file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel-kind tag is not one of the three reserved wire values.
    #[error("Invalid channel kind: {0:#010x}")]
    InvalidChannelKind(u32),

    /// The source image cannot be wavelet-encoded.
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// The requested resolution is not a power of two, or is larger than
    /// the coefficients held (or stored) can reconstruct.
    #[error("Invalid resolution {requested}: must be a power of two no greater than {max}")]
    InvalidResolution { requested: u32, max: u32 },

    /// The serialized buffer is shorter than its header declares.
    #[error("Truncated buffer: expected at least {expected} bytes, got {actual}")]
    TruncatedBuffer { expected: u64, actual: u64 },

    /// The header carries values no encoder could have produced.
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// A partially loaded codec cannot be written back out: the on-disk
    /// layout always holds full-resolution channels.
    #[error("Codec holds coefficients for {resolution}x{resolution} only, not {width}x{height}")]
    IncompleteCodec {
        resolution: u32,
        width: u32,
        height: u32,
    },
}

/// A specialized `Result` type for wavelet codec operations.
pub type Result<T> = std::result::Result<T, WvtError>;
