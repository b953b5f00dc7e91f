//! File naming helpers for wavelet-encoded images.
//!
//! The codec itself never looks at file names; these helpers only keep the
//! `.wvt` convention in one place for callers that store encodings on disk.

use crate::wvt::constants::WVT_EXT;
use std::path::{Path, PathBuf};

/// Returns `base` with the `.wvt` extension appended.
///
/// Any existing extension is kept, so `frame.rpf` becomes `frame.rpf.wvt`.
///
/// # Examples
///
/// ```
/// use wvt_codec::utils::file_path::wavelet_path;
///
/// let path = wavelet_path("tiles/0/frame.rpf");
/// assert_eq!(path.to_str().unwrap(), "tiles/0/frame.rpf.wvt");
/// ```
pub fn wavelet_path<P: AsRef<Path>>(base: P) -> PathBuf {
    let mut name = base.as_ref().as_os_str().to_owned();
    name.push(".");
    name.push(WVT_EXT);
    PathBuf::from(name)
}

/// Returns true if `path` carries the `.wvt` extension (case-insensitive).
pub fn is_wavelet_path<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(WVT_EXT))
}
