use anyhow::{Context, Result};
use ns_reader::{data_file_path, DiskLoc, DiskLocResolver};
use std::path::Path;
use tracing::info;

pub fn resolve_loc(dir: &Path, base: &str, file_counter: i32, offset: i32) -> Result<()> {
    let loc = DiskLoc::new(file_counter, offset);
    let file = data_file_path(dir, base, file_counter);
    info!("resolve loc={loc} file={}", file.display());

    let doc = DiskLocResolver::new()
        .resolve(loc, dir, base)
        .with_context(|| format!("resolve {loc} in {}", file.display()))?;
    println!("{doc}");
    Ok(())
}
