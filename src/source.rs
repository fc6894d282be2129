use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;

/// Random-access byte source backing a parsing session.
///
/// Implementations return exactly `len` bytes or fail; the decoders never
/// see a short buffer coming from here.
pub trait BlockSource {
    fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>>;
}

/// `BlockSource` over any seekable reader: a disk image file, or a
/// `Cursor` over an in-memory image.
pub struct ImageReader<R> {
    inner: R,
    len: u64,
}

impl ImageReader<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self { inner: BufReader::new(file), len })
    }
}

impl<R: Read + Seek> ImageReader<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self { inner, len })
    }

    /// Size of the underlying image in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<R: Read + Seek> BlockSource for ImageReader<R> {
    fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.inner.seek(SeekFrom::Start(offset))?;
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NtfsError;
    use std::io::{Cursor, ErrorKind};

    fn reader() -> ImageReader<Cursor<Vec<u8>>> {
        ImageReader::new(Cursor::new((0u8..=255).collect())).unwrap()
    }

    #[test]
    fn reads_exact_range() {
        let mut src = reader();
        assert_eq!(src.len(), 256);
        assert_eq!(src.read_at(10, 4).unwrap(), vec![10, 11, 12, 13]);
        assert_eq!(src.read_at(0, 2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn short_read_is_read_error() {
        let mut src = reader();
        match src.read_at(250, 16) {
            Err(NtfsError::ReadError(e)) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
