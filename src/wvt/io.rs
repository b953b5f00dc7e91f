// src/wvt/io.rs

//! Binary (de)serialization of [`Codec`] values.
//!
//! Layout, big-endian, no padding:
//!
//! ```text
//! int32  width
//! int32  height
//! int32  channel kind tag
//! int32  channel count
//! byte[width * height] x channel count
//! ```
//!
//! Channels are always stored at full size. A partial load reads the first
//! `r * r` bytes of each channel and seeks over the rest using the full
//! `width * height` stride, so files written once serve every resolution.

use super::channel::ChannelKind;
use super::codec::Codec;
use super::constants::HEADER_LEN;
use super::layout::{floor_power_of_two, prefix_len};
use crate::utils::error::{Result, WvtError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy)]
struct Header {
    width: u32,
    height: u32,
    kind: ChannelKind,
    channel_len: u64,
}

impl Header {
    fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let width = reader.read_i32::<BigEndian>()?;
        let height = reader.read_i32::<BigEndian>()?;
        let tag = reader.read_u32::<BigEndian>()?;
        let channel_count = reader.read_i32::<BigEndian>()?;

        let kind = ChannelKind::try_from(tag).inspect_err(|_| {
            log::warn!("Unrecognized channel kind tag {:#010x}", tag);
        })?;
        if width <= 0 || height <= 0 {
            log::warn!("Rejecting header: dimensions {}x{} must be positive", width, height);
            return Err(WvtError::MalformedHeader(format!(
                "dimensions {}x{} must be positive",
                width, height
            )));
        }
        if channel_count as i64 != kind.channel_count() as i64 {
            log::warn!(
                "Rejecting header: {:?} needs {} channels, header declares {}",
                kind,
                kind.channel_count(),
                channel_count
            );
            return Err(WvtError::MalformedHeader(format!(
                "{:?} needs {} channels, header declares {}",
                kind,
                kind.channel_count(),
                channel_count
            )));
        }

        Ok(Header {
            width: width as u32,
            height: height as u32,
            kind,
            channel_len: width as u64 * height as u64,
        })
    }

    fn channel_count(&self) -> u64 {
        self.kind.channel_count() as u64
    }

    /// Largest power-of-two resolution the stored channels describe.
    fn native_resolution(&self) -> u32 {
        floor_power_of_two(self.width.min(self.height))
    }

    /// Stream offset of channel `k` relative to the start of the header.
    fn channel_offset(&self, k: u64) -> u64 {
        HEADER_LEN.saturating_add(k.saturating_mul(self.channel_len))
    }
}

/// Bytes remaining in `reader` from its current position.
fn remaining<R: Seek>(reader: &mut R) -> Result<(u64, u64)> {
    let start = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(start))?;
    Ok((start, end.saturating_sub(start)))
}

fn ensure_available(expected: u64, actual: u64) -> Result<()> {
    if actual < expected {
        log::warn!("Wavelet buffer truncated: need {} bytes, have {}", expected, actual);
        return Err(WvtError::TruncatedBuffer { expected, actual });
    }
    Ok(())
}

fn read_channel<R: Read>(reader: &mut R, len: u64) -> Result<Vec<u8>> {
    let len = usize::try_from(len).map_err(|_| {
        log::warn!("Rejecting channel of {} bytes: too large for this platform", len);
        WvtError::MalformedHeader(format!("channel of {} bytes is too large", len))
    })?;
    let mut channel = vec![0u8; len];
    reader.read_exact(&mut channel)?;
    Ok(channel)
}

impl Codec {
    /// Writes the full encoding to `writer`.
    ///
    /// Fails with [`WvtError::IncompleteCodec`] for partially loaded codecs,
    /// whose channels no longer fill the layout the header describes.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        if !self.is_complete() {
            log::warn!(
                "Refusing to write codec loaded at {} of {}x{}",
                self.resolution(),
                self.width(),
                self.height()
            );
            return Err(WvtError::IncompleteCodec {
                resolution: self.resolution(),
                width: self.width(),
                height: self.height(),
            });
        }
        // int32 on the wire; positive dimensions share the u32 bit pattern.
        writer.write_u32::<BigEndian>(self.width())?;
        writer.write_u32::<BigEndian>(self.height())?;
        writer.write_u32::<BigEndian>(self.kind().tag())?;
        writer.write_u32::<BigEndian>(self.channel_count() as u32)?;
        for channel in self.channels() {
            writer.write_all(channel)?;
        }
        Ok(())
    }

    /// Serializes the full encoding into a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let payload: usize = self.channels().iter().map(Vec::len).sum();
        let mut buffer = Vec::with_capacity(HEADER_LEN as usize + payload);
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Reads a complete encoding starting at the reader's current position.
    pub fn read_from<R: Read + Seek>(reader: &mut R) -> Result<Self> {
        let (_, available) = remaining(reader)?;
        ensure_available(HEADER_LEN, available)?;
        let header = Header::read(reader)?;

        let expected = header.channel_offset(header.channel_count());
        ensure_available(expected, available)?;
        log::debug!(
            "Loading {}x{} {:?} encoding",
            header.width,
            header.height,
            header.kind
        );

        let coefficients = (0..header.channel_count())
            .map(|_| read_channel(reader, header.channel_len))
            .collect::<Result<Vec<_>>>()?;

        Ok(Codec::from_validated(
            header.kind,
            header.width,
            header.height,
            header.native_resolution(),
            coefficients,
        ))
    }

    /// Reads only what is needed to reconstruct up to `resolution`.
    ///
    /// `resolution` must be a power of two no larger than either stored
    /// dimension. The unread tail of each channel is skipped, not read.
    pub fn read_partial_from<R: Read + Seek>(reader: &mut R, resolution: u32) -> Result<Self> {
        let (start, available) = remaining(reader)?;
        ensure_available(HEADER_LEN, available)?;
        let header = Header::read(reader)?;

        if !resolution.is_power_of_two() || resolution > header.width || resolution > header.height {
            log::warn!(
                "Partial load at {} exceeds {}x{} encoding",
                resolution,
                header.width,
                header.height
            );
            return Err(WvtError::InvalidResolution {
                requested: resolution,
                max: header.native_resolution(),
            });
        }

        let prefix = prefix_len(resolution as usize) as u64;
        let last = header.channel_count() - 1;
        ensure_available(header.channel_offset(last).saturating_add(prefix), available)?;
        log::debug!(
            "Partially loading {}x{} {:?} encoding at {}",
            header.width,
            header.height,
            header.kind,
            resolution
        );

        let coefficients = (0..header.channel_count())
            .map(|k| {
                reader.seek(SeekFrom::Start(start + header.channel_offset(k)))?;
                read_channel(reader, prefix)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Codec::from_validated(
            header.kind,
            header.width,
            header.height,
            resolution,
            coefficients,
        ))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Codec::read_from(&mut Cursor::new(bytes))
    }

    pub fn from_bytes_partial(bytes: &[u8], resolution: u32) -> Result<Self> {
        Codec::read_partial_from(&mut Cursor::new(bytes), resolution)
    }

    /// Writes the encoding to `path`, replacing any existing file.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Codec::read_from(&mut BufReader::new(File::open(path)?))
    }

    pub fn load_file_partial<P: AsRef<Path>>(path: P, resolution: u32) -> Result<Self> {
        Codec::read_partial_from(&mut BufReader::new(File::open(path)?), resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wvt::constants::{TAG_ARGB, TAG_GRAY};

    fn header(width: i32, height: i32, tag: u32, channels: i32) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_i32::<BigEndian>(width).unwrap();
        buf.write_i32::<BigEndian>(height).unwrap();
        buf.write_u32::<BigEndian>(tag).unwrap();
        buf.write_i32::<BigEndian>(channels).unwrap();
        buf
    }

    #[test]
    fn test_header_layout() {
        let codec = Codec::from_parts(TAG_GRAY, 2, 2, vec![vec![25, 251, 246, 0]]).unwrap();
        let bytes = codec.to_bytes().unwrap();
        assert_eq!(
            bytes,
            vec![0, 0, 0, 2, 0, 0, 0, 2, b'g', b'r', b'a', b'y', 0, 0, 0, 1, 25, 251, 246, 0]
        );
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        let mut buf = header(2, 2, 0x7877_7a79, 1);
        buf.extend_from_slice(&[0; 4]);
        let err = Codec::from_bytes(&buf).unwrap_err();
        assert!(matches!(err, WvtError::InvalidChannelKind(0x7877_7a79)));
    }

    #[test]
    fn test_short_header() {
        let err = Codec::from_bytes(&[0, 0, 0, 4]).unwrap_err();
        assert!(matches!(err, WvtError::TruncatedBuffer { expected: 16, actual: 4 }));
    }

    #[test]
    fn test_short_payload() {
        let mut buf = header(4, 4, TAG_GRAY, 1);
        buf.extend_from_slice(&[0; 15]);
        let err = Codec::from_bytes(&buf).unwrap_err();
        assert!(matches!(err, WvtError::TruncatedBuffer { expected: 32, actual: 31 }));
    }

    #[test]
    fn test_negative_dimensions() {
        let buf = header(-4, 4, TAG_GRAY, 1);
        assert!(matches!(Codec::from_bytes(&buf), Err(WvtError::MalformedHeader(_))));
    }

    #[test]
    fn test_channel_count_must_match_kind() {
        let mut buf = header(1, 1, TAG_ARGB, 3);
        buf.extend_from_slice(&[0; 3]);
        assert!(matches!(Codec::from_bytes(&buf), Err(WvtError::MalformedHeader(_))));
    }

    #[test]
    fn test_huge_header_fails_before_allocating() {
        let buf = header(i32::MAX, i32::MAX, TAG_ARGB, 4);
        assert!(matches!(Codec::from_bytes(&buf), Err(WvtError::TruncatedBuffer { .. })));
    }

    #[test]
    fn test_partial_seeks_with_full_stride() {
        let mut buf = header(2, 2, TAG_ARGB, 4);
        for k in 0..4u8 {
            buf.extend_from_slice(&[10 * k + 1, 10 * k + 2, 10 * k + 3, 10 * k + 4]);
        }
        let codec = Codec::from_bytes_partial(&buf, 1).unwrap();
        assert_eq!(codec.resolution(), 1);
        assert_eq!((codec.width(), codec.height()), (2, 2));
        for k in 0..4 {
            assert_eq!(codec.channel(k), &[10 * k as u8 + 1]);
        }
    }

    #[test]
    fn test_partial_needs_only_last_prefix() {
        let mut buf = header(4, 4, TAG_GRAY, 1);
        buf.extend_from_slice(&[7; 4]);
        let codec = Codec::from_bytes_partial(&buf, 2).unwrap();
        assert_eq!(codec.channel(0), &[7; 4]);
        assert!(matches!(
            Codec::from_bytes_partial(&buf, 4),
            Err(WvtError::TruncatedBuffer { expected: 32, actual: 20 })
        ));
    }

    #[test]
    fn test_partial_resolution_bounds() {
        let mut buf = header(4, 4, TAG_GRAY, 1);
        buf.extend_from_slice(&[0; 16]);
        assert!(matches!(
            Codec::from_bytes_partial(&buf, 8),
            Err(WvtError::InvalidResolution { requested: 8, max: 4 })
        ));
        assert!(matches!(
            Codec::from_bytes_partial(&buf, 3),
            Err(WvtError::InvalidResolution { requested: 3, .. })
        ));
        assert!(matches!(
            Codec::from_bytes_partial(&buf, 0),
            Err(WvtError::InvalidResolution { requested: 0, .. })
        ));
    }

    #[test]
    fn test_partial_codec_cannot_be_written() {
        let mut buf = header(4, 4, TAG_GRAY, 1);
        buf.extend_from_slice(&[0; 16]);
        let codec = Codec::from_bytes_partial(&buf, 2).unwrap();
        assert!(matches!(
            codec.to_bytes(),
            Err(WvtError::IncompleteCodec { resolution: 2, width: 4, height: 4 })
        ));
    }
}
