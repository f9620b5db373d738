/// Bytes per MiB times 100, turning `bytes * percent` into MiB.
const MIB_PERCENT_DIVISOR: f64 = 1024.0 * 1024.0 * 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TotalMemory {
    Known(u64),
    Unknown,
}

impl TotalMemory {
    pub fn from_reported(bytes: Option<u64>) -> Self {
        match bytes {
            Some(b) if b > 0 => TotalMemory::Known(b),
            _ => TotalMemory::Unknown,
        }
    }

    /// Byte count used in the estimate. An unknown size becomes a single byte,
    /// so every estimate collapses to zero instead of failing the snapshot.
    pub fn effective_bytes(self) -> u64 {
        match self {
            TotalMemory::Known(b) => b,
            TotalMemory::Unknown => 1,
        }
    }
}

/// `floor(total_bytes * mem_percent / (1024 * 1024 * 100))`
pub fn estimate_mib(total: TotalMemory, mem_percent: f64) -> u64 {
    let mib = total.effective_bytes() as f64 * mem_percent / MIB_PERCENT_DIVISOR;
    mib.floor() as u64
}
