pub mod details;
pub mod list;
pub mod resolve;

use ns_reader::Scan;
use tracing::warn;

/// Slots dropped under `--on-corrupt skip`.
pub(crate) fn report_skipped(scan: &Scan) {
    for e in &scan.skipped {
        warn!("skipped slot: {e}");
    }
}
