use core::fmt;

/// Location of a record: data file sequence number plus byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiskLoc {
    pub file_counter: i32,
    pub offset: i32,
}

impl DiskLoc {
    pub const NULL: DiskLoc = DiskLoc {
        file_counter: -1,
        offset: 0,
    };

    #[inline]
    pub const fn new(file_counter: i32, offset: i32) -> Self {
        Self {
            file_counter,
            offset,
        }
    }

    /// A negative file counter means "no location".
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.file_counter < 0
    }

    #[inline]
    pub fn from_le_bytes(b: [u8; 8]) -> Self {
        Self {
            file_counter: i32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            offset: i32::from_le_bytes([b[4], b[5], b[6], b[7]]),
        }
    }
}

impl fmt::Display for DiskLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "{{}}");
        }
        write!(f, "{{{} offset:{}}}", self.file_counter, self.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDetails {
    /// Root bucket of the index B-tree.
    pub head: DiskLoc,
    /// Record holding the index definition document.
    pub info: DiskLoc,
}

impl fmt::Display for IndexDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<index head:{} info:{}>", self.head, self.info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_le_bytes_splits_counter_and_offset() {
        let mut raw = [0u8; 8];
        raw[..4].copy_from_slice(&3i32.to_le_bytes());
        raw[4..].copy_from_slice(&0x2000i32.to_le_bytes());
        assert_eq!(DiskLoc::from_le_bytes(raw), DiskLoc::new(3, 0x2000));
        assert!(DiskLoc::from_le_bytes([0xff; 8]).is_null());
    }

    #[test]
    fn display() {
        assert_eq!(DiskLoc::NULL.to_string(), "{}");
        assert_eq!(DiskLoc::new(-7, 99).to_string(), "{}");
        assert_eq!(DiskLoc::new(0, 8192).to_string(), "{0 offset:8192}");
        let idx = IndexDetails {
            head: DiskLoc::new(1, 16),
            info: DiskLoc::NULL,
        };
        assert_eq!(idx.to_string(), "<index head:{1 offset:16} info:{}>");
    }
}
