use std::{fs, path::Path};

use ns_reader::{
    bson::{doc, Document},
    layout::{
        record, DETAILS_LEN, DETAILS_OFFSET, FILE_SIZE_MULTIPLE, HASH_SLOT_SIZE, NAME_OFFSET,
    },
    DiskLoc, DiskLocResolver, IndexInfo, NamespaceFile, NsReadError, ScanPolicy,
};
use tempfile::tempdir;

fn put_loc(out: &mut Vec<u8>, loc: DiskLoc) {
    out.extend_from_slice(&loc.file_counter.to_le_bytes());
    out.extend_from_slice(&loc.offset.to_le_bytes());
}

/// Details block with the given index `info` locations; heads are arbitrary.
fn details_block(number_indexes: i32, infos: &[DiskLoc], records: i64) -> Vec<u8> {
    let mut out = Vec::with_capacity(DETAILS_LEN);
    put_loc(&mut out, DiskLoc::new(0, 0x1000));
    put_loc(&mut out, DiskLoc::new(0, 0x1000));
    for _ in 0..19 {
        put_loc(&mut out, DiskLoc::NULL);
    }
    out.extend_from_slice(&(records * 100).to_le_bytes());
    out.extend_from_slice(&records.to_le_bytes());
    out.extend_from_slice(&0x3000i32.to_le_bytes());
    out.extend_from_slice(&number_indexes.to_le_bytes());
    for i in 0..10 {
        put_loc(&mut out, DiskLoc::new(0, 0x8000 + i * 0x100));
        put_loc(&mut out, infos.get(i as usize).copied().unwrap_or(DiskLoc::NULL));
    }
    // stale bytes past the typed fields must not matter
    out.resize(DETAILS_LEN, 0xDD);
    out
}

fn write_slot(ns: &mut [u8], index: usize, hash: i32, name: &str, details: &[u8]) {
    let at = index * HASH_SLOT_SIZE;
    ns[at..at + 4].copy_from_slice(&hash.to_le_bytes());
    ns[at + NAME_OFFSET..at + NAME_OFFSET + name.len()].copy_from_slice(name.as_bytes());
    ns[at + DETAILS_OFFSET..at + DETAILS_OFFSET + details.len()].copy_from_slice(details);
}

fn write_record(data: &mut Vec<u8>, offset: usize, doc: &Document) {
    let payload = ns_reader::bson::to_vec(doc).unwrap();
    let len = (payload.len() + record::HEADER_SIZE) as i32;
    if data.len() < offset + len as usize {
        data.resize(offset + len as usize, 0);
    }
    data[offset..offset + 4].copy_from_slice(&len.to_le_bytes());
    data[offset + record::HEADER_SIZE..offset + len as usize].copy_from_slice(&payload);
}

fn id_index() -> Document {
    doc! { "v": 1, "key": { "_id": 1 }, "ns": "test.users", "name": "_id_" }
}

fn email_index() -> Document {
    doc! { "v": 1, "key": { "email": 1 }, "unique": true, "ns": "test.users", "name": "email_1" }
}

/// `test.ns` + `test.0` laid out like a small database with one indexed
/// collection.
fn build_db(dir: &Path) {
    let mut ns = vec![0u8; FILE_SIZE_MULTIPLE as usize];
    let infos = [DiskLoc::new(0, 0x2000), DiskLoc::new(0, 0x2100)];
    write_slot(&mut ns, 17, 0x51_7e, "test.users", &details_block(2, &infos, 5));
    write_slot(&mut ns, 400, 0x11, "test.system.indexes", &details_block(0, &[], 2));
    write_slot(&mut ns, 900, 0x22, "test.users.$_id_", &details_block(0, &[], 5));
    // stale garbage behind an empty hash
    ns[5 * HASH_SLOT_SIZE + 4..6 * HASH_SLOT_SIZE].fill(0x7F);
    fs::write(dir.join("test.ns"), ns).unwrap();

    let mut data = Vec::new();
    write_record(&mut data, 0x2000, &id_index());
    write_record(&mut data, 0x2100, &email_index());
    fs::write(dir.join("test.0"), data).unwrap();
}

#[test]
fn lists_namespaces_in_file_order() {
    let dir = tempdir().unwrap();
    build_db(dir.path());

    let nsf = NamespaceFile::open(dir.path().join("test.ns")).unwrap();
    assert_eq!(nsf.path(), dir.path().join("test.ns"));
    assert_eq!(nsf.dir(), dir.path());
    let scan = nsf.scan(ScanPolicy::Abort).unwrap();
    assert_eq!(scan.slots.len(), 1669);
    assert!(scan.skipped.is_empty());

    let occupied: Vec<_> = scan
        .occupied()
        .map(|s| (s.offset, s.name.as_str()))
        .collect();
    assert_eq!(
        occupied,
        [
            (17 * 628, "test.users"),
            (400 * 628, "test.system.indexes"),
            (900 * 628, "test.users.$_id_"),
        ]
    );
    assert!(scan.slots[5].is_empty());
    assert!(scan.slots[5].details.is_none());

    let users = scan.occupied().next().unwrap();
    let details = users.details.as_ref().unwrap();
    assert_eq!(details.number_records, 5);
    assert_eq!(details.data_size, 500);
    assert_eq!(details.active_indexes().len(), 2);
}

#[test]
fn resolves_active_index_definitions() {
    let dir = tempdir().unwrap();
    build_db(dir.path());

    let nsf = NamespaceFile::open(dir.path().join("test.ns")).unwrap();
    let scan = nsf.scan(ScanPolicy::Abort).unwrap();
    let users = scan.occupied().next().unwrap();

    let resolver = DiskLocResolver::new();
    let defs = nsf.index_definitions(&resolver, users);
    assert_eq!(defs.len(), 2);

    let infos: Vec<IndexInfo> = defs
        .iter()
        .map(|(_, doc)| IndexInfo::from_document(doc.as_ref().unwrap()).unwrap())
        .collect();
    assert_eq!(infos[0].name, "_id_");
    assert_eq!(infos[1].name, "email_1");
    assert_eq!(infos[1].unique, Some(true));
    assert_eq!(infos[1].key, doc! { "email": 1 });
    assert_eq!(defs[1].0.info, DiskLoc::new(0, 0x2100));

    let system_indexes = scan.occupied().nth(1).unwrap();
    assert!(nsf.index_definitions(&resolver, system_indexes).is_empty());
}

#[test]
fn missing_data_file_surfaces_per_index() {
    let dir = tempdir().unwrap();
    build_db(dir.path());
    fs::remove_file(dir.path().join("test.0")).unwrap();

    let nsf = NamespaceFile::open(dir.path().join("test.ns")).unwrap();
    let scan = nsf.scan(ScanPolicy::Abort).unwrap();
    let users = scan.occupied().next().unwrap();

    let defs = nsf.index_definitions(&DiskLocResolver::new(), users);
    assert_eq!(defs.len(), 2);
    assert!(defs
        .iter()
        .all(|(_, res)| matches!(res, Err(NsReadError::Io { .. }))));
}

#[test]
fn rejects_namespace_file_with_bad_size() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.ns");
    fs::write(&path, vec![0u8; 1_048_576 + 628]).unwrap();

    let err = NamespaceFile::open(&path).err().unwrap();
    assert!(matches!(
        err,
        NsReadError::InvalidFileSize { size: 1_049_204 }
    ));
}

#[test]
fn corrupt_index_count_aborts_or_skips() {
    let dir = tempdir().unwrap();
    build_db(dir.path());
    let path = dir.path().join("test.ns");
    let mut ns = fs::read(&path).unwrap();
    write_slot(&mut ns, 50, 0x33, "test.broken", &details_block(11, &[], 0));
    fs::write(&path, ns).unwrap();

    let nsf = NamespaceFile::open(&path).unwrap();
    let err = nsf.scan(ScanPolicy::Abort).unwrap_err();
    assert!(matches!(
        err,
        NsReadError::ConfigInconsistent { value: 11, .. }
    ));

    let scan = nsf.scan(ScanPolicy::SkipCorrupt).unwrap();
    assert_eq!(scan.skipped.len(), 1);
    assert_eq!(scan.occupied().count(), 3);
}
