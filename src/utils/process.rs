//! # Process Statistics
use serde::{Deserialize, Serialize};

/// Memory usage of the current process in bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Resident set size
    pub rss: Option<u64>,
    /// Virtual memory size
    #[serde(rename = "virtual")]
    pub virtual_size: Option<u64>,
}

impl MemoryStats {
    /// Read the memory statistics of the running process
    ///
    /// Best-effort: Linux reads `/proc/self/status`, macOS asks `ps`, and
    /// other platforms report both values as `None`.
    pub fn current() -> Self {
        #[cfg(target_os = "linux")]
        {
            Self::current_linux()
        }
        #[cfg(target_os = "macos")]
        {
            Self::current_macos()
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            Self::default()
        }
    }

    #[cfg(target_os = "linux")]
    fn current_linux() -> Self {
        match std::fs::read_to_string("/proc/self/status") {
            Ok(status) => Self::parse(&status),
            Err(e) => {
                log::trace!("Memory statistics unavailable: {}", e);
                Self::default()
            }
        }
    }

    #[cfg(target_os = "macos")]
    fn current_macos() -> Self {
        let output = std::process::Command::new("ps")
            .args(["-o", "rss=,vsz=", "-p", &std::process::id().to_string()])
            .output();
        match output {
            Ok(out) => {
                let text = String::from_utf8_lossy(&out.stdout);
                let mut parts = text.split_whitespace();
                Self {
                    rss: parts.next().and_then(parse_kb),
                    virtual_size: parts.next().and_then(parse_kb),
                }
            }
            Err(e) => {
                log::trace!("Memory statistics unavailable: {}", e);
                Self::default()
            }
        }
    }

    /// Parse the contents of a `/proc/<pid>/status` file
    pub fn parse(status: &str) -> Self {
        let mut stats = Self::default();
        for line in status.lines() {
            if let Some(value) = line.strip_prefix("VmRSS:") {
                stats.rss = parse_kb(value);
            } else if let Some(value) = line.strip_prefix("VmSize:") {
                stats.virtual_size = parse_kb(value);
            }
        }
        stats
    }
}

fn parse_kb(value: &str) -> Option<u64> {
    let kb: u64 = value.trim().trim_end_matches("kB").trim().parse().ok()?;
    Some(kb * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status() {
        let status = "Name:\tstorefront\nVmPeak:\t  20000 kB\n\
                      VmSize:\t   16384 kB\nVmRSS:\t    4096 kB\nThreads:\t4\n";
        let stats = MemoryStats::parse(status);
        assert_eq!(stats.rss, Some(4096 * 1024));
        assert_eq!(stats.virtual_size, Some(16384 * 1024));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn current_process() {
        let stats = MemoryStats::current();
        assert!(stats.rss.unwrap_or_default() > 0);
        assert!(stats.virtual_size >= stats.rss);
    }

    #[test]
    fn parse_missing() {
        let stats = MemoryStats::parse("Name:\tstorefront\n");
        assert_eq!(stats, MemoryStats::default());
    }
}
