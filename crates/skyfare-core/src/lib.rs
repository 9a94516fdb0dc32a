pub mod client;
pub mod config;
pub mod duration;
pub mod flow;
pub mod offers;
pub mod partition;
pub mod sorter;

use std::path::PathBuf;

/// Shown wherever an offer field is absent on the wire.
pub const PLACEHOLDER: &str = "N/A";

/// Config directory for this app (endpoint settings live here).
pub fn get_config_root() -> PathBuf {
    directories::ProjectDirs::from("org", "skyfare", "SkyFare")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
