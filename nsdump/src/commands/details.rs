use anyhow::{Context, Result};
use ns_reader::{
    data_file_path, DiskLocResolver, HashSlot, IndexInfo, NamespaceDetails, NamespaceFile,
    ScanPolicy,
};
use std::path::Path;
use tracing::{debug, info, warn};

use super::report_skipped;

pub fn dump_details(
    path: &Path,
    indexes: bool,
    namespace: Option<&str>,
    policy: ScanPolicy,
) -> Result<()> {
    info!(
        "details input={} indexes={indexes} policy={policy:?}",
        path.display()
    );

    let nsf = NamespaceFile::open(path)
        .with_context(|| format!("open namespace file {}", path.display()))?;
    let scan = nsf
        .scan(policy)
        .with_context(|| format!("scan {}", nsf.path().display()))?;
    report_skipped(&scan);

    let resolver = DiskLocResolver::new();
    let mut shown = 0u64;
    for slot in scan.occupied() {
        if namespace.is_some_and(|ns| ns != slot.name) {
            continue;
        }
        let Some(details) = &slot.details else {
            continue;
        };
        shown += 1;
        print_details(slot, details);
        if indexes {
            dump_indexes(&nsf, &resolver, slot, policy)?;
        }
    }

    match namespace {
        Some(ns) if shown == 0 => warn!("namespace {ns} not found in {}", path.display()),
        _ => info!("namespaces={shown}"),
    }
    Ok(())
}

fn print_details(slot: &HashSlot, d: &NamespaceDetails) {
    println!("ns={} offset={} hash={}", slot.name, slot.offset, slot.hash);
    println!(
        "\tfirst_extent={} last_extent={}",
        d.first_extent, d.last_extent
    );
    println!(
        "\tdata_size={} records={} last_extent_size={}",
        d.data_size, d.number_records, d.last_extent_size
    );
    for (size, head) in d.deleted_buckets().filter(|(_, loc)| !loc.is_null()) {
        println!("\tdeleted bucket={size} head={head}");
    }
    println!("\tindexes={}", d.number_indexes);
}

fn dump_indexes(
    nsf: &NamespaceFile,
    resolver: &DiskLocResolver,
    slot: &HashSlot,
    policy: ScanPolicy,
) -> Result<()> {
    for (idx, res) in nsf.index_definitions(resolver, slot) {
        let file = data_file_path(nsf.dir(), slot.database(), idx.info.file_counter);
        let doc = match res {
            Ok(doc) => doc,
            Err(e) if policy == ScanPolicy::SkipCorrupt => {
                warn!("{idx} of {} in {}: {e}", slot.name, file.display());
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("resolve {idx} of {} in {}", slot.name, file.display())
                });
            }
        };

        match IndexInfo::from_document(&doc) {
            Ok(info) => println!(
                "\t\tname={} key={} ns={} unique={} head={}",
                info.name,
                info.key,
                info.ns,
                info.unique.unwrap_or(false),
                idx.head
            ),
            Err(e) => {
                debug!("{idx} is not a plain index definition: {e}");
                println!("\t\tdoc={doc} head={}", idx.head);
            }
        }
    }
    Ok(())
}
