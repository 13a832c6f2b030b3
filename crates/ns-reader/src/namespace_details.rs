use crate::{
    disk_loc::{DiskLoc, IndexDetails},
    error::{NsReadError, NsReadResult},
    layout::{BUCKET_SIZES, DELETED_BUCKETS, DETAILS_LEN, MAX_INDEXES},
    slice_reader::FieldReader,
};

/// Per-collection metadata stored in the namespace file.
///
/// Decoded field by field from the 496-byte block that follows the name in
/// each occupied hash slot:
///
/// ```text
/// ofs   0  firstExtent       DiskLoc
/// ofs   8  lastExtent        DiskLoc
/// ofs  16  deletedList[19]   DiskLoc
/// ofs 168  dataSize          i64   (padding included, record headers not)
/// ofs 176  numberRecords     i64
/// ofs 184  lastExtentSize    i32
/// ofs 188  numberIndexes     i32
/// ofs 192  indexDetails[10]  {head, info}
/// ofs 352  ..496             unused by this reader
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDetails {
    pub first_extent: DiskLoc,
    pub last_extent: DiskLoc,
    /// Free-list heads, one per size class in [`BUCKET_SIZES`].
    pub deleted_list: [DiskLoc; DELETED_BUCKETS],
    pub data_size: i64,
    pub number_records: i64,
    pub last_extent_size: i32,
    /// Number of leading `index_details` entries in use; `0..=10`.
    pub number_indexes: i32,
    pub index_details: [IndexDetails; MAX_INDEXES],
}

impl NamespaceDetails {
    /// Decodes a details block. Offsets in errors are relative to `block`.
    pub fn decode(block: &[u8]) -> NsReadResult<Self> {
        if block.len() < DETAILS_LEN {
            return Err(NsReadError::ShortRead {
                offset: 0,
                expected: DETAILS_LEN,
                actual: block.len(),
            });
        }
        let mut r = FieldReader::new(&block[..DETAILS_LEN]);

        let first_extent = r.disk_loc()?;
        let last_extent = r.disk_loc()?;

        let mut deleted_list = [DiskLoc::NULL; DELETED_BUCKETS];
        for slot in deleted_list.iter_mut() {
            *slot = r.disk_loc()?;
        }

        let data_size = r.i64()?;
        let number_records = r.i64()?;
        let last_extent_size = r.i32()?;

        let number_indexes_at = r.position();
        let number_indexes = r.i32()?;
        if !(0..=MAX_INDEXES as i32).contains(&number_indexes) {
            return Err(NsReadError::ConfigInconsistent {
                offset: number_indexes_at as u64,
                field: "number_indexes",
                value: number_indexes as i64,
                max: MAX_INDEXES as i64,
            });
        }

        let mut index_details = [IndexDetails {
            head: DiskLoc::NULL,
            info: DiskLoc::NULL,
        }; MAX_INDEXES];
        for idx in index_details.iter_mut() {
            idx.head = r.disk_loc()?;
            idx.info = r.disk_loc()?;
        }

        Ok(Self {
            first_extent,
            last_extent,
            deleted_list,
            data_size,
            number_records,
            last_extent_size,
            number_indexes,
            index_details,
        })
    }

    /// The index slots actually in use. Entries past `number_indexes` are
    /// never returned.
    #[inline]
    pub fn active_indexes(&self) -> &[IndexDetails] {
        usize::try_from(self.number_indexes)
            .ok()
            .and_then(|n| self.index_details.get(..n))
            .unwrap_or(&[])
    }

    /// Free-list heads paired with their bucket size.
    pub fn deleted_buckets(&self) -> impl Iterator<Item = (u32, DiskLoc)> + '_ {
        BUCKET_SIZES.iter().copied().zip(self.deleted_list.iter().copied())
    }
}
