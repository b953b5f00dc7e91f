// Rejected inputs are reported through the `log` facade before the error
// is returned. Everything runs in one test because the logger is global.

use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use wvt_codec::wvt::{TAG_ARGB, TAG_GRAY};
use wvt_codec::{Codec, Raster, WvtError};

struct CaptureLogger {
    warnings: Mutex<Vec<String>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Warn
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut warnings) = self.warnings.lock() {
                warnings.push(record.args().to_string());
            }
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    warnings: Mutex::new(Vec::new()),
};

fn warnings_during<T>(f: impl FnOnce() -> T) -> (T, usize) {
    LOGGER.warnings.lock().unwrap().clear();
    let result = f();
    (result, LOGGER.warnings.lock().unwrap().len())
}

fn header(width: i32, height: i32, tag: u32, channels: i32) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(&width.to_be_bytes());
    buf.extend_from_slice(&height.to_be_bytes());
    buf.extend_from_slice(&tag.to_be_bytes());
    buf.extend_from_slice(&channels.to_be_bytes());
    buf
}

#[test]
fn test_rejections_log_warnings() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Warn);

    // Header with a non-positive dimension
    let mut buf = header(0, 4, TAG_GRAY, 1);
    buf.extend_from_slice(&[0; 16]);
    let (result, warned) = warnings_during(|| Codec::from_bytes(&buf));
    assert!(matches!(result, Err(WvtError::MalformedHeader(_))));
    assert_eq!(warned, 1);

    // Header whose channel count disagrees with its kind
    let mut buf = header(1, 1, TAG_ARGB, 3);
    buf.extend_from_slice(&[0; 4]);
    let (result, warned) = warnings_during(|| Codec::from_bytes(&buf));
    assert!(matches!(result, Err(WvtError::MalformedHeader(_))));
    assert_eq!(warned, 1);

    // Every from_parts rejection
    let cases: [(u32, u32, u32, Vec<Vec<u8>>); 5] = [
        (TAG_GRAY, 0, 4, vec![vec![0; 4]]),
        (TAG_GRAY, 1 << 31, 4, vec![vec![0; 4]]),
        (TAG_ARGB, 2, 2, vec![vec![0; 4]]),
        (TAG_ARGB, 2, 2, vec![vec![0; 4], vec![0; 4], vec![0; 4], vec![0; 1]]),
        (TAG_GRAY, 8, 8, vec![vec![0; 5]]),
    ];
    for (tag, width, height, coefficients) in cases {
        let (result, warned) = warnings_during(|| Codec::from_parts(tag, width, height, coefficients));
        assert!(matches!(result, Err(WvtError::MalformedHeader(_))), "{}x{}", width, height);
        assert_eq!(warned, 1, "{}x{}", width, height);
    }

    // Writing a partially loaded codec
    let mut buf = header(4, 4, TAG_GRAY, 1);
    buf.extend_from_slice(&[0; 16]);
    let partial = Codec::from_bytes_partial(&buf, 2).unwrap();
    let (result, warned) = warnings_during(|| partial.to_bytes());
    assert!(matches!(result, Err(WvtError::IncompleteCodec { .. })));
    assert_eq!(warned, 1);

    // Oversized raster dimensions
    let (result, warned) = warnings_during(|| Raster::from_raw(u32::MAX, u32::MAX, 4, vec![]));
    assert!(matches!(result, Err(WvtError::InvalidImage(_))));
    assert_eq!(warned, 1);

    // Accepted input stays quiet
    let (result, warned) = warnings_during(|| Codec::from_parts(TAG_GRAY, 8, 8, vec![vec![0; 4]]));
    assert!(result.is_ok());
    assert_eq!(warned, 0);
}
