use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use crate::{
    disk_loc::DiskLoc,
    document::{BsonDecoder, DocumentDecoder},
    error::{NsReadError, NsReadResult},
    layout::record,
    slice_reader::{ReadAt, SliceReader},
};

/// Opens data files by path.
pub trait DataFiles {
    type File: ReadAt;

    fn open(&self, path: &Path) -> io::Result<Self::File>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsDataFiles;

impl DataFiles for OsDataFiles {
    type File = File;

    #[inline]
    fn open(&self, path: &Path) -> io::Result<File> {
        File::open(path)
    }
}

/// `<dir>/<base>.<file_counter>`
pub fn data_file_path(dir: &Path, base: &str, file_counter: i32) -> PathBuf {
    dir.join(format!("{base}.{file_counter}"))
}

/// Follows a [`DiskLoc`] into its data file and decodes the record there.
///
/// Each call opens the data file afresh and drops it before returning.
#[derive(Debug, Default, Clone)]
pub struct DiskLocResolver<F = OsDataFiles, D = BsonDecoder> {
    files: F,
    decoder: D,
}

impl DiskLocResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: DataFiles, D: DocumentDecoder> DiskLocResolver<F, D> {
    pub fn with_parts(files: F, decoder: D) -> Self {
        Self { files, decoder }
    }

    pub fn resolve(&self, loc: DiskLoc, dir: &Path, base: &str) -> NsReadResult<D::Document> {
        let payload = self.read_payload(loc, dir, base)?;
        self.decoder
            .decode(&payload)
            .map_err(|e| NsReadError::Decode {
                offset: loc.offset as u64 + record::HEADER_SIZE as u64,
                message: e.to_string(),
            })
    }

    /// Returns the record payload (header stripped) after checking its
    /// length and null terminator.
    pub fn read_payload(&self, loc: DiskLoc, dir: &Path, base: &str) -> NsReadResult<Vec<u8>> {
        if loc.is_null() {
            return Err(NsReadError::NullLocation { loc });
        }
        let Ok(at) = u64::try_from(loc.offset) else {
            return Err(NsReadError::MalformedRecord {
                offset: 0,
                reason: format!(
                    "record offset {} in {loc} is negative and names no file position",
                    loc.offset
                ),
            });
        };

        let path = data_file_path(dir, base, loc.file_counter);
        let file = self
            .files
            .open(&path)
            .map_err(|e| NsReadError::io(format!("open {}", path.display()), e))?;
        let reader = SliceReader::new(file);

        let record_len =
            i32::from_le_bytes(reader.read_array_at::<4>(at + record::LENGTH as u64)?);
        let payload_len = usize::try_from(record_len)
            .ok()
            .and_then(|n| n.checked_sub(record::HEADER_SIZE))
            .ok_or_else(|| NsReadError::MalformedRecord {
                offset: at,
                reason: format!(
                    "record length {record_len} is smaller than the {}-byte header",
                    record::HEADER_SIZE
                ),
            })?;

        let payload_at = at + record::HEADER_SIZE as u64;
        let available = reader.len()?.saturating_sub(payload_at);
        if payload_len as u64 > available {
            return Err(NsReadError::ShortRead {
                offset: payload_at,
                expected: payload_len,
                actual: available as usize,
            });
        }
        let payload = reader.read_vec_at(payload_at, payload_len)?;

        if payload.last() != Some(&0) {
            return Err(NsReadError::MalformedRecord {
                offset: payload_at,
                reason: format!("payload of {payload_len} bytes is not null terminated"),
            });
        }
        Ok(payload)
    }
}
