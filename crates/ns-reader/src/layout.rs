//! Byte layout of the MMAPv1 namespace (`<db>.ns`) and data (`<db>.N`) files.
//!
//! All multi-byte integers are little-endian.
//!
//! Namespace file: a flat table of [`HASH_SLOT_SIZE`]-byte slots
//!
//! ```text
//! [0,4)     i32    hash (0 = empty slot)
//! [4,132)   [u8]   namespace name, null terminated, zero padded
//! [132,628) [u8]   namespace details block
//! ```
//!
//! Data file records referenced by a `DiskLoc` start with a
//! [`record::HEADER_SIZE`]-byte header followed by the payload. Extents
//! (`myLoc`, `xnext`, `xprev`, length, first/last record) chain those
//! records together and B-tree buckets hold index keys; neither is walked by
//! this crate.

/// Namespace files are preallocated in whole mebibytes.
pub const FILE_SIZE_MULTIPLE: u64 = 1024 * 1024;

pub const HASH_SLOT_SIZE: usize = 628;
pub const HASH_LEN: usize = 4;
pub const NAME_OFFSET: usize = HASH_LEN;
pub const NAME_LEN: usize = 128;
pub const DETAILS_OFFSET: usize = NAME_OFFSET + NAME_LEN;
pub const DETAILS_LEN: usize = 496;

/// `{fileCounter: i32, offset: i32}`
pub const DISK_LOC_LEN: usize = 8;
/// `{head: DiskLoc, info: DiskLoc}`
pub const INDEX_DETAILS_LEN: usize = 2 * DISK_LOC_LEN;

pub const DELETED_BUCKETS: usize = 19;
pub const MAX_INDEXES: usize = 10;

/// Size class of each free-list head in `deletedList`.
pub const BUCKET_SIZES: [u32; DELETED_BUCKETS] = [
    32, 64, 128, 256, 0x200, 0x400, 0x800, 0x1000, 0x2000, 0x4000, 0x8000, 0x10000, 0x20000,
    0x40000, 0x80000, 0x100000, 0x200000, 0x400000, 0x800000,
];

/// Field offsets inside the 496-byte namespace details block.
pub mod details {
    use super::{DELETED_BUCKETS, DISK_LOC_LEN, INDEX_DETAILS_LEN, MAX_INDEXES};

    pub const FIRST_EXTENT: usize = 0;
    pub const LAST_EXTENT: usize = FIRST_EXTENT + DISK_LOC_LEN;
    pub const DELETED_LIST: usize = LAST_EXTENT + DISK_LOC_LEN;
    pub const DATA_SIZE: usize = DELETED_LIST + DELETED_BUCKETS * DISK_LOC_LEN; // 168
    pub const NUMBER_RECORDS: usize = DATA_SIZE + 8;
    pub const LAST_EXTENT_SIZE: usize = NUMBER_RECORDS + 8;
    pub const NUMBER_INDEXES: usize = LAST_EXTENT_SIZE + 4;
    pub const INDEX_DETAILS: usize = NUMBER_INDEXES + 4; // 192
    /// End of the typed fields; the rest of the block is slack.
    pub const TYPED_END: usize = INDEX_DETAILS + MAX_INDEXES * INDEX_DETAILS_LEN; // 352
}

/// Record header preceding every payload in a data file.
pub mod record {
    /// `lengthWithHeaders`: total record length, header included.
    pub const LENGTH: usize = 0;
    pub const EXTENT_OFS: usize = 4;
    pub const NEXT_OFS: usize = 8;
    pub const PREV_OFS: usize = 12;
    pub const HEADER_SIZE: usize = 16;
}

const _: () = assert!(DETAILS_OFFSET + DETAILS_LEN == HASH_SLOT_SIZE);
const _: () = assert!(details::TYPED_END <= DETAILS_LEN);
const _: () = assert!(record::PREV_OFS + 4 == record::HEADER_SIZE);
