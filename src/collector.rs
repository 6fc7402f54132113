//! Local metric collection
//!
//! Produces a [`HostSample`] from the machine this process runs on, using
//! sysinfo. Collecting CPU utilization requires sampling over a short
//! window, so [`collect`] blocks the calling thread for about a second;
//! async callers should wrap it in `spawn_blocking`.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use sysinfo::{Disks, System};
use tracing::{instrument, trace};

use crate::HostSample;

/// CPU usage is computed as a delta between two refreshes this far apart.
const CPU_SAMPLE_WINDOW: Duration = Duration::from_secs(1);

/// Collect one measurement snapshot from the local machine.
///
/// Blocks for roughly [`CPU_SAMPLE_WINDOW`]. Fails only if the hostname
/// cannot be determined; individual metric values are always present in
/// the returned sample.
#[instrument]
pub fn collect() -> anyhow::Result<HostSample> {
    let mut sys = System::new_all();
    sys.refresh_all();
    std::thread::sleep(CPU_SAMPLE_WINDOW.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
    sys.refresh_all();

    let hostname = System::host_name().context("unable to determine hostname")?;

    let ram = memory_percent(sys.used_memory(), sys.total_memory());
    let disk = system_disk_percent();
    let processes = sys.processes().len() as u32;

    let sample = HostSample {
        hostname,
        cpu: sys.global_cpu_usage() as f64,
        ram,
        disk,
        processes,
    };

    trace!("collected sample: {sample:?}");

    Ok(sample)
}

fn memory_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}

/// Fill percentage of the system volume (root filesystem on POSIX, the
/// system drive on Windows). A zero-capacity volume reads as 0% used.
fn system_disk_percent() -> f64 {
    let target = if cfg!(windows) { "C:\\" } else { "/" };

    let disks = Disks::new_with_refreshed_list();
    let disk = disks
        .list()
        .iter()
        .find(|disk| disk.mount_point() == Path::new(target))
        .or_else(|| disks.list().first());

    let Some(disk) = disk else {
        return 0.0;
    };

    let total = disk.total_space();
    if total == 0 {
        return 0.0;
    }

    let used = total.saturating_sub(disk.available_space());
    used as f64 / total as f64 * 100.0
}
