use crate::{
    error::{NsReadError, NsReadResult},
    layout::{DETAILS_OFFSET, FILE_SIZE_MULTIPLE, HASH_SLOT_SIZE, NAME_LEN, NAME_OFFSET},
    namespace_details::NamespaceDetails,
    slice_reader::{ReadAt, SliceReader},
};

/// One fixed-size entry of the namespace hash table.
///
/// `hash == 0` marks an empty slot; its name is empty and it has no details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashSlot {
    /// Absolute byte offset of the slot in the namespace file.
    pub offset: u64,
    pub hash: i32,
    pub name: String,
    pub details: Option<NamespaceDetails>,
}

impl HashSlot {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hash == 0
    }

    /// Database part of the namespace; also the base name of its data files.
    pub fn database(&self) -> &str {
        self.name.split('.').next().unwrap_or_default()
    }

    pub fn collection(&self) -> &str {
        self.name.split_once('.').map(|(_, c)| c).unwrap_or_default()
    }

    /// `db.coll.$idx` style namespaces belong to indexes and free lists.
    pub fn is_index_namespace(&self) -> bool {
        self.name.contains(".$")
    }
}

/// What a collecting scan does with a slot whose own bytes are corrupt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanPolicy {
    /// Stop at the first error.
    #[default]
    Abort,
    /// Record slot-local corruption in [`Scan::skipped`] and carry on.
    /// I/O errors and short reads still abort.
    SkipCorrupt,
}

#[derive(Debug, Default)]
pub struct Scan {
    pub slots: Vec<HashSlot>,
    pub skipped: Vec<NsReadError>,
}

impl Scan {
    pub fn occupied(&self) -> impl Iterator<Item = &HashSlot> {
        self.slots.iter().filter(|s| !s.is_empty())
    }
}

/// Decodes one raw slot read from `offset`.
pub fn decode_slot(offset: u64, raw: &[u8; HASH_SLOT_SIZE]) -> NsReadResult<HashSlot> {
    let hash = i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
    if hash == 0 {
        return Ok(HashSlot {
            offset,
            hash,
            name: String::new(),
            details: None,
        });
    }

    let name_field = &raw[NAME_OFFSET..NAME_OFFSET + NAME_LEN];
    let Some(end) = name_field.iter().position(|&b| b == 0) else {
        return Err(NsReadError::MalformedRecord {
            offset: offset + NAME_OFFSET as u64,
            reason: format!("namespace name is not null terminated within {NAME_LEN} bytes"),
        });
    };
    let name = match std::str::from_utf8(&name_field[..end]) {
        Ok(name) => name.to_owned(),
        Err(e) => {
            return Err(NsReadError::MalformedRecord {
                offset: offset + NAME_OFFSET as u64 + e.valid_up_to() as u64,
                reason: format!(
                    "namespace name is not valid UTF-8: {:02x?}",
                    &name_field[..end]
                ),
            });
        }
    };

    let details = NamespaceDetails::decode(&raw[DETAILS_OFFSET..])
        .map_err(|e| e.rebase(offset + DETAILS_OFFSET as u64))?;

    Ok(HashSlot {
        offset,
        hash,
        name,
        details: Some(details),
    })
}

/// Namespace file viewed as a flat sequence of hash slots.
pub struct HashTable<R> {
    reader: SliceReader<R>,
    len: u64,
}

impl<R: ReadAt> HashTable<R> {
    /// Checks the file size before anything else is read.
    pub fn new(source: R) -> NsReadResult<Self> {
        let reader = SliceReader::new(source);
        let len = reader.len()?;
        if len == 0 || len % FILE_SIZE_MULTIPLE != 0 {
            return Err(NsReadError::InvalidFileSize { size: len });
        }
        Ok(Self { reader, len })
    }

    /// Whole slots only; trailing bytes are ignored.
    #[inline]
    pub fn slot_count(&self) -> u64 {
        self.len / HASH_SLOT_SIZE as u64
    }

    pub fn read_slot(&self, offset: u64) -> NsReadResult<HashSlot> {
        let raw = self.reader.read_array_at::<HASH_SLOT_SIZE>(offset)?;
        decode_slot(offset, &raw)
    }

    pub fn slots(&self) -> SlotIter<'_, R> {
        SlotIter {
            table: self,
            index: 0,
            done: false,
        }
    }

    pub fn scan(&self, policy: ScanPolicy) -> NsReadResult<Scan> {
        let mut scan = Scan {
            slots: Vec::with_capacity(self.slot_count() as usize),
            skipped: Vec::new(),
        };
        for slot in self.slots() {
            match slot {
                Ok(slot) => scan.slots.push(slot),
                Err(e) if policy == ScanPolicy::SkipCorrupt && e.is_slot_corruption() => {
                    scan.skipped.push(e)
                }
                Err(e) => return Err(e),
            }
        }
        Ok(scan)
    }
}

/// Yields every slot in file order. Stops after an I/O error or short read,
/// since nothing past it can be trusted.
pub struct SlotIter<'a, R> {
    table: &'a HashTable<R>,
    index: u64,
    done: bool,
}

impl<R: ReadAt> Iterator for SlotIter<'_, R> {
    type Item = NsReadResult<HashSlot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.index >= self.table.slot_count() {
            return None;
        }
        let offset = self.index * HASH_SLOT_SIZE as u64;
        self.index += 1;

        let res = self.table.read_slot(offset);
        if matches!(&res, Err(e) if !e.is_slot_corruption()) {
            self.done = true;
        }
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rem = self.table.slot_count().saturating_sub(self.index) as usize;
        if self.done {
            (0, Some(0))
        } else {
            (0, Some(rem))
        }
    }
}
