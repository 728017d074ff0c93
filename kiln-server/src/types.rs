//! Runtime types substituted into generated structures.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;

/// Body of a streaming blob member.
///
/// Only members of operation input and output structures stream; nested
/// blobs stay plain byte buffers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteStream {
    inner: Bytes,
}

impl ByteStream {
    pub fn new(inner: Bytes) -> Self {
        Self { inner }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Collect the whole stream.
    pub fn collect(self) -> Bytes {
        self.inner
    }
}

impl From<Bytes> for ByteStream {
    fn from(inner: Bytes) -> Self {
        Self::new(inner)
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(inner: Vec<u8>) -> Self {
        Self::new(Bytes::from(inner))
    }
}

impl From<&'static str> for ByteStream {
    fn from(inner: &'static str) -> Self {
        Self::new(Bytes::from_static(inner.as_bytes()))
    }
}

/// Wrapper for non-streaming blobs, used when the generated crate is built
/// with `wrapper-types = true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob {
    inner: Vec<u8>,
}

impl Blob {
    pub fn new(inner: impl Into<Vec<u8>>) -> Self {
        Self {
            inner: inner.into(),
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.inner
    }
}

impl AsRef<[u8]> for Blob {
    fn as_ref(&self) -> &[u8] {
        &self.inner
    }
}

/// Wrapper for timestamps: whole seconds and subsecond nanos since the
/// Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime {
    seconds: i64,
    subsecond_nanos: u32,
}

impl DateTime {
    pub fn from_secs(seconds: i64) -> Self {
        Self {
            seconds,
            subsecond_nanos: 0,
        }
    }

    /// `None` when `subsecond_nanos` is a full second or more.
    pub fn from_secs_and_nanos(seconds: i64, subsecond_nanos: u32) -> Option<Self> {
        (subsecond_nanos < 1_000_000_000).then_some(Self {
            seconds,
            subsecond_nanos,
        })
    }

    pub fn secs(&self) -> i64 {
        self.seconds
    }

    pub fn subsec_nanos(&self) -> u32 {
        self.subsecond_nanos
    }
}

impl From<SystemTime> for DateTime {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since) => Self {
                seconds: since.as_secs() as i64,
                subsecond_nanos: since.subsec_nanos(),
            },
            Err(before) => {
                let before = before.duration();
                if before.subsec_nanos() == 0 {
                    Self::from_secs(-(before.as_secs() as i64))
                } else {
                    let rounded = before + Duration::from_secs(1);
                    Self {
                        seconds: -(rounded.as_secs() as i64),
                        subsecond_nanos: 1_000_000_000 - before.subsec_nanos(),
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect() {
        let stream = ByteStream::from("sunny");
        assert_eq!(stream.len(), 5);
        assert_eq!(stream.collect(), Bytes::from_static(b"sunny"));
        assert!(ByteStream::default().is_empty());
    }

    #[test]
    fn test_blob_bytes() {
        let blob = Blob::new(b"png".to_vec());
        assert_eq!(blob.as_ref(), b"png");
        assert_eq!(blob.into_inner(), b"png".to_vec());
    }

    #[test]
    fn test_date_time_from_system_time() {
        let after = UNIX_EPOCH + Duration::new(90, 500);
        assert_eq!(DateTime::from(after), DateTime::from_secs_and_nanos(90, 500).unwrap());

        let before = UNIX_EPOCH - Duration::from_millis(1500);
        let dt = DateTime::from(before);
        assert_eq!((dt.secs(), dt.subsec_nanos()), (-2, 500_000_000));
        assert!(DateTime::from_secs_and_nanos(0, 1_000_000_000).is_none());
    }
}
