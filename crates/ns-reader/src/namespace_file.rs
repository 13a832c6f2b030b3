use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::{
    disk_loc::IndexDetails,
    document::DocumentDecoder,
    error::{NsReadError, NsReadResult},
    hash_table::{HashSlot, HashTable, Scan, ScanPolicy},
    resolver::{DataFiles, DiskLocResolver},
};

/// An opened `<db>.ns` file together with the directory holding its data
/// files.
pub struct NamespaceFile {
    path: PathBuf,
    dir: PathBuf,
    table: HashTable<File>,
}

impl NamespaceFile {
    pub fn open(path: impl AsRef<Path>) -> NsReadResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file =
            File::open(&path).map_err(|e| NsReadError::io(format!("open {}", path.display()), e))?;
        let table = HashTable::new(file)?;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self { path, dir, table })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn scan(&self, policy: ScanPolicy) -> NsReadResult<Scan> {
        self.table.scan(policy)
    }

    /// Resolves the definition document of every active index of `slot`,
    /// one result per index so a single bad record does not hide the rest.
    pub fn index_definitions<F, D>(
        &self,
        resolver: &DiskLocResolver<F, D>,
        slot: &HashSlot,
    ) -> Vec<(IndexDetails, NsReadResult<D::Document>)>
    where
        F: DataFiles,
        D: DocumentDecoder,
    {
        let Some(details) = &slot.details else {
            return Vec::new();
        };
        details
            .active_indexes()
            .iter()
            .map(|idx| {
                (
                    *idx,
                    resolver.resolve(idx.info, &self.dir, slot.database()),
                )
            })
            .collect()
    }
}
