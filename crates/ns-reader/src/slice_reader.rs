use std::{fs::File, io};

use crate::{
    disk_loc::DiskLoc,
    error::{NsReadError, NsReadResult},
};

/// Positioned reads that never move a shared cursor.
pub trait ReadAt {
    /// Reads up to `buf.len()` bytes starting at `offset`; `Ok(0)` means EOF.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize>;

    fn size(&self) -> io::Result<u64>;
}

impl ReadAt for File {
    #[cfg(unix)]
    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::unix::fs::FileExt::read_at(self, buf, offset)
    }

    #[cfg(windows)]
    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        std::os::windows::fs::FileExt::seek_read(self, buf, offset)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl ReadAt for [u8] {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        let start = usize::try_from(offset)
            .unwrap_or(usize::MAX)
            .min(self.len());
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}

impl ReadAt for Vec<u8> {
    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        self.as_slice().read_at(buf, offset)
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.len() as u64)
    }
}

impl<T: ReadAt + ?Sized> ReadAt for &T {
    #[inline]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        (**self).read_at(buf, offset)
    }

    fn size(&self) -> io::Result<u64> {
        (**self).size()
    }
}

/// Exact-length positioned reads over a [`ReadAt`] source.
pub struct SliceReader<R> {
    inner: R,
}

impl<R: ReadAt> SliceReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn len(&self) -> NsReadResult<u64> {
        self.inner
            .size()
            .map_err(|e| NsReadError::io("stat", e))
    }

    /// Fills `buf` from `offset`, or fails with `ShortRead` carrying how far
    /// the source actually went.
    pub fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> NsReadResult<()> {
        let mut filled = 0usize;
        while filled < buf.len() {
            match self.inner.read_at(&mut buf[filled..], offset + filled as u64) {
                Ok(0) => {
                    return Err(NsReadError::ShortRead {
                        offset,
                        expected: buf.len(),
                        actual: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(NsReadError::io(format!("read at {offset}"), e)),
            }
        }
        Ok(())
    }

    pub fn read_array_at<const N: usize>(&self, offset: u64) -> NsReadResult<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_exact_at(offset, &mut buf)?;
        Ok(buf)
    }

    pub fn read_vec_at(&self, offset: u64, len: usize) -> NsReadResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.read_exact_at(offset, &mut buf)?;
        Ok(buf)
    }
}

/// Sequential little-endian field decoding over an in-memory block.
///
/// Offsets in errors are relative to the start of the block.
pub(crate) struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    fn take<const N: usize>(&mut self) -> NsReadResult<[u8; N]> {
        let out: [u8; N] = self
            .buf
            .get(self.pos..self.pos + N)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| NsReadError::ShortRead {
                offset: self.pos as u64,
                expected: N,
                actual: self.buf.len().saturating_sub(self.pos),
            })?;
        self.pos += N;
        Ok(out)
    }

    #[inline]
    pub(crate) fn i32(&mut self) -> NsReadResult<i32> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    #[inline]
    pub(crate) fn i64(&mut self) -> NsReadResult<i64> {
        Ok(i64::from_le_bytes(self.take()?))
    }

    #[inline]
    pub(crate) fn disk_loc(&mut self) -> NsReadResult<DiskLoc> {
        Ok(DiskLoc::from_le_bytes(self.take()?))
    }
}
