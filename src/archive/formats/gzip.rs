//! gzip streaming decoder wrapper.
//!
//! # Invariants
//! - Decompression is sequential; the only seek is a full [`GzipStream::rewind`].
//! - `MultiGzDecoder` treats concatenated members as a single stream.
//!
//! # Design Notes
//! - gzip carries no reliable uncompressed length (ISIZE is mod 2^32 and
//!   only covers the last member), so callers discover it by draining the
//!   stream once and then rewinding to decode for real.
//! - `CountedRead` tracks compressed bytes consumed, which is what logs report.

use std::io::{self, Read, Seek, SeekFrom};

use flate2::read::MultiGzDecoder;

/// Read wrapper that counts compressed bytes consumed.
///
/// # Guarantees
/// - `bytes()` is monotonic and saturating.
pub struct CountedRead<R> {
    inner: R,
    bytes: u64,
}

impl<R> CountedRead<R> {
    #[inline]
    pub fn new(inner: R) -> Self {
        Self { inner, bytes: 0 }
    }

    #[inline]
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for CountedRead<R> {
    #[inline]
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(dst)?;
        self.bytes = self.bytes.saturating_add(n as u64);
        Ok(n)
    }
}

/// Streaming gzip decoder that supports concatenated members.
///
/// # Guarantees
/// - `read()` yields decompressed bytes or an error on corruption.
/// - `rewind()` restarts decoding from the first compressed byte.
pub struct GzipStream<R: Read> {
    dec: MultiGzDecoder<CountedRead<R>>,
}

impl<R: Read> GzipStream<R> {
    #[inline]
    pub fn new(reader: R) -> Self {
        Self {
            dec: MultiGzDecoder::new(CountedRead::new(reader)),
        }
    }

    #[inline]
    pub fn total_compressed(&self) -> u64 {
        self.dec.get_ref().bytes()
    }

    /// Drain the stream in `chunk`-sized reads into `scratch` and return the
    /// total decompressed length.
    ///
    /// Stops early once the total exceeds `limit`; the returned length is
    /// then some value above `limit`, not the true length.
    /// `scratch` is resized to `chunk` once and reused for every read.
    pub fn discover_len(
        &mut self,
        scratch: &mut Vec<u8>,
        chunk: usize,
        limit: u64,
    ) -> io::Result<u64> {
        scratch.resize(chunk.max(1), 0);
        let mut total = 0u64;
        loop {
            let n = match self.dec.read(scratch) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if n == 0 {
                return Ok(total);
            }
            total = total.saturating_add(n as u64);
            if total > limit {
                return Ok(total);
            }
        }
    }

    #[inline]
    pub fn into_inner(self) -> R {
        self.dec.into_inner().into_inner()
    }
}

impl<R: Read + Seek> GzipStream<R> {
    /// Seek the compressed source back to its start and reset the decoder.
    pub fn rewind(self) -> io::Result<Self> {
        let mut inner = self.into_inner();
        inner.seek(SeekFrom::Start(0))?;
        Ok(Self::new(inner))
    }
}

impl<R: Read> Read for GzipStream<R> {
    #[inline]
    fn read(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        self.dec.read(dst)
    }
}
