//! Sample sources: stdin or a recording, as cu8 IQ or f32 magnitudes

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::str::FromStr;

use super::demod::MagnitudeTable;
use crate::error::{ConfigError, SourceError};

/// On-the-wire encoding of the sample stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Interleaved unsigned 8-bit I/Q pairs (rtl_sdr output)
    Cu8,
    /// Little-endian f32 magnitudes
    F32,
}

impl SampleFormat {
    /// Bytes consumed per magnitude sample
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::Cu8 => 2,
            Self::F32 => 4,
        }
    }
}

impl FromStr for SampleFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cu8" => Ok(Self::Cu8),
            "f32" => Ok(Self::F32),
            _ => Err(ConfigError::UnknownSampleFormat(s.to_string())),
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cu8 => write!(f, "cu8"),
            Self::F32 => write!(f, "f32"),
        }
    }
}

/// Where samples come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleSource {
    Stdin,
    File(PathBuf),
}

impl SampleSource {
    /// `-` selects stdin, anything else is a file path
    pub fn parse(s: &str) -> Self {
        if s == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(s))
        }
    }

    pub fn open(&self) -> Result<Box<dyn Read + Send>, SourceError> {
        match self {
            Self::Stdin => Ok(Box::new(io::stdin())),
            Self::File(path) => {
                let file = File::open(path).map_err(|source| SourceError::Open {
                    path: path.clone(),
                    source,
                })?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }
}

impl fmt::Display for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "stdin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Bytes requested per read: 256K samples of cu8
const READ_CHUNK_BYTES: usize = 256 * 1024 * 2;

/// Turns a byte stream into magnitude chunks.
///
/// Reads need not align to sample boundaries; a partial sample is held
/// back until the rest of its bytes arrive.
pub struct MagnitudeReader<R> {
    inner: R,
    format: SampleFormat,
    table: Option<MagnitudeTable>,
    buffer: Vec<u8>,
    pending: Vec<u8>,
}

impl<R: Read> MagnitudeReader<R> {
    pub fn new(inner: R, format: SampleFormat) -> Self {
        let table = match format {
            SampleFormat::Cu8 => Some(MagnitudeTable::new()),
            SampleFormat::F32 => None,
        };

        Self {
            inner,
            format,
            table,
            buffer: vec![0u8; READ_CHUNK_BYTES],
            pending: Vec::new(),
        }
    }

    /// Next chunk of magnitudes, or `None` at end of input.
    ///
    /// Trailing bytes that never complete a sample are discarded.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<f32>>, SourceError> {
        loop {
            let n = match self.inner.read(&mut self.buffer) {
                Ok(0) => return Ok(None),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            self.pending.extend_from_slice(&self.buffer[..n]);
            let whole = self.pending.len() - self.pending.len() % self.format.bytes_per_sample();
            if whole == 0 {
                continue;
            }

            let mut out = Vec::with_capacity(whole / self.format.bytes_per_sample());
            match &self.table {
                Some(table) => table.compute_magnitudes(&self.pending[..whole], &mut out),
                None => out.extend(
                    self.pending[..whole]
                        .chunks_exact(4)
                        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
                ),
            }
            self.pending.drain(..whole);

            return Ok(Some(out));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read
    struct Trickle {
        data: Cursor<Vec<u8>>,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.step);
            self.data.read(&mut buf[..n])
        }
    }

    fn drain<R: Read>(reader: &mut MagnitudeReader<R>) -> Vec<f32> {
        let mut all = Vec::new();
        while let Some(chunk) = reader.next_chunk().unwrap() {
            all.extend(chunk);
        }
        all
    }

    #[test]
    fn test_sample_format_from_str() {
        assert_eq!("cu8".parse::<SampleFormat>().unwrap(), SampleFormat::Cu8);
        assert_eq!("F32".parse::<SampleFormat>().unwrap(), SampleFormat::F32);
        assert!(matches!(
            "s16".parse::<SampleFormat>(),
            Err(ConfigError::UnknownSampleFormat(_))
        ));
    }

    #[test]
    fn test_sample_source_parse() {
        assert_eq!(SampleSource::parse("-"), SampleSource::Stdin);
        assert_eq!(
            SampleSource::parse("capture.bin"),
            SampleSource::File(PathBuf::from("capture.bin"))
        );
    }

    #[test]
    fn test_missing_file_is_open_error() {
        let source = SampleSource::File(PathBuf::from("/nonexistent/modes-decoder/samples.bin"));
        assert!(matches!(source.open(), Err(SourceError::Open { .. })));
    }

    #[test]
    fn test_f32_split_across_reads() {
        let values = [0.25f32, 1.0, 0.0, 0.75];
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();

        let mut reader = MagnitudeReader::new(
            Trickle { data: Cursor::new(bytes), step: 3 },
            SampleFormat::F32,
        );
        assert_eq!(drain(&mut reader), values);
    }

    #[test]
    fn test_cu8_odd_trailing_byte_dropped() {
        let mut reader = MagnitudeReader::new(
            Trickle { data: Cursor::new(vec![255, 128, 128, 255, 7]), step: 1 },
            SampleFormat::Cu8,
        );
        let mags = drain(&mut reader);
        assert_eq!(mags.len(), 2);
        assert!((mags[0] - 1.0).abs() < 0.01);
        assert!((mags[1] - 1.0).abs() < 0.01);
    }
}
