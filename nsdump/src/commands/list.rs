use anyhow::{Context, Result};
use ns_reader::{NamespaceFile, ScanPolicy};
use std::path::Path;
use tracing::info;

use super::report_skipped;

pub fn list_namespaces(path: &Path, all: bool, policy: ScanPolicy) -> Result<()> {
    info!("list input={} policy={policy:?}", path.display());

    let nsf = NamespaceFile::open(path)
        .with_context(|| format!("open namespace file {}", path.display()))?;
    let scan = nsf
        .scan(policy)
        .with_context(|| format!("scan {}", nsf.path().display()))?;
    report_skipped(&scan);

    let mut occupied = 0u64;
    for slot in &scan.slots {
        if !slot.is_empty() {
            occupied += 1;
        } else if !all {
            continue;
        }
        println!("offset={} hash={} ns={}", slot.offset, slot.hash, slot.name);
    }

    info!(
        "slots={} occupied={} skipped={}",
        scan.slots.len(),
        occupied,
        scan.skipped.len()
    );
    Ok(())
}
