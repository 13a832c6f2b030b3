//! Offline reader for MMAPv1 namespace (`.ns`) and data files
//!
//! Decodes the namespace hash table, the per-collection metadata stored in
//! each slot, and the index definition documents those slots point at,
//! without a running server. Nothing here writes.

pub mod disk_loc;
pub mod document;
pub mod error;
pub mod hash_table;
pub mod layout;
pub mod namespace_details;
pub mod namespace_file;
pub mod resolver;
pub mod slice_reader;

pub use disk_loc::{DiskLoc, IndexDetails};
pub use document::{BsonDecoder, DocumentDecoder, IndexInfo};
pub use error::{NsReadError, NsReadResult};
pub use hash_table::{HashSlot, HashTable, Scan, ScanPolicy};
pub use namespace_details::NamespaceDetails;
pub use namespace_file::NamespaceFile;
pub use resolver::{DataFiles, DiskLocResolver, OsDataFiles, data_file_path};
pub use slice_reader::{ReadAt, SliceReader};

pub use bson;
