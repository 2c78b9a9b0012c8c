//! Hardware inventory through `sysinfo`.

use sysinfo::{Disks, System};

use crate::error::{DetectError, Result};
use crate::records::{CpuInfo, DriveInfo, MemoryInfo, OsInfo};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Convert bytes to gigabytes, rounded to two decimals.
pub fn bytes_to_gb(bytes: u64) -> f64 {
    (bytes as f64 / BYTES_PER_GB * 100.0).round() / 100.0
}

/// First processor's brand, core counts and clock.
pub fn cpu_info() -> Result<CpuInfo> {
    let mut sys = System::new();
    sys.refresh_cpu();

    let cpus = sys.cpus();
    let first = cpus.first().ok_or_else(|| DetectError::ProbeFailed {
        probe: "cpu_info".to_string(),
        reason: "no processors reported".to_string(),
    })?;

    Ok(CpuInfo {
        name: first.brand().trim().to_string(),
        cores: sys.physical_core_count(),
        logical_processors: cpus.len(),
        architecture: std::env::consts::ARCH.to_string(),
        max_clock_mhz: cpus.iter().map(|c| c.frequency()).max().unwrap_or(0),
    })
}

pub fn memory_info() -> Result<MemoryInfo> {
    let mut sys = System::new();
    sys.refresh_memory();

    match sys.total_memory() {
        0 => Err(DetectError::ProbeFailed {
            probe: "memory_info".to_string(),
            reason: "total memory reported as zero".to_string(),
        }),
        total => Ok(MemoryInfo {
            total_gb: bytes_to_gb(total),
        }),
    }
}

/// Fixed (non-removable) volumes.
pub fn disk_inventory() -> Result<Vec<DriveInfo>> {
    let disks = Disks::new_with_refreshed_list();

    Ok(disks
        .list()
        .iter()
        .filter(|disk| !disk.is_removable())
        .map(|disk| DriveInfo {
            drive: disk.mount_point().to_string_lossy().into_owned(),
            volume_name: disk.name().to_string_lossy().into_owned(),
            size_gb: bytes_to_gb(disk.total_space()),
            free_gb: bytes_to_gb(disk.available_space()),
        })
        .collect())
}

pub fn os_info() -> Result<OsInfo> {
    let name = System::name().ok_or_else(|| DetectError::ProbeUnavailable {
        probe: "os_info".to_string(),
        reason: "operating system name not reported".to_string(),
    })?;

    Ok(OsInfo {
        name,
        version: System::os_version().unwrap_or_default(),
        build: System::kernel_version().unwrap_or_default(),
        architecture: std::env::consts::ARCH.to_string(),
    })
}
