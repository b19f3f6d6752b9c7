//! Build metadata embedded by build.rs

use serde::Serialize;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

const RAW_BUILD_NUMBER: Option<&str> = option_env!("FITVEDA_BUILD_NUMBER");
const RAW_BUILD_TIMESTAMP: Option<&str> = option_env!("FITVEDA_BUILD_TIMESTAMP");

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    /// ISO 8601, UTC
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self::from_raw(RAW_BUILD_NUMBER, RAW_BUILD_TIMESTAMP)
    }

    fn from_raw(number: Option<&str>, timestamp: Option<&'static str>) -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: number.and_then(|n| n.trim().parse().ok()).unwrap_or(0),
            build_timestamp: timestamp.unwrap_or("unknown"),
        }
    }
}

pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("===============================================");
    eprintln!("  FitVeda fitness tracker");
    eprintln!("  Version: {} | Build: {}", info.version, info.build_number);
    eprintln!("  Compiled: {}", info.build_timestamp);
    eprintln!("===============================================");
}
