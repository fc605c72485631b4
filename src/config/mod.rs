// file: src/config/mod.rs
// version: 1.2.0
// guid: 4a6c8e0f-2b3d-4e5f-a1c3-5d7f9b1d3e5a

//! Run configuration for the provisioning sequence
//!
//! All ambient state the sequencer depends on (filesystem root, home
//! directory, CPU architecture, web-content source tree) is captured here as
//! injected values so stages can run against a scratch root in tests.

use std::path::PathBuf;
#[cfg(test)]
use std::path::Path;

use crate::{Result, SetupError};

/// Supported CPU architectures for the archive-server binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Armhf,
    Arm64,
}

impl Architecture {
    /// Get the architecture as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::Armhf => "armhf",
            Architecture::Arm64 => "arm64",
        }
    }

    /// Architecture tag used in kiwix-tools release filenames
    pub fn kiwix_arch(&self) -> &'static str {
        match self {
            Architecture::Armhf => "armhf",
            Architecture::Arm64 => "aarch64",
        }
    }
}

impl std::str::FromStr for Architecture {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "armhf" | "arm" | "armv6l" | "armv7l" => Ok(Architecture::Armhf),
            "arm64" | "aarch64" => Ok(Architecture::Arm64),
            _ => Err(SetupError::config(format!("Unknown architecture: {}", s))),
        }
    }
}

/// Wi-Fi hotspot parameters supplied on the command line
#[derive(Debug, Clone)]
pub struct HotspotParams {
    /// Regulatory country code, substituted verbatim into generated config
    pub country: String,
    /// Access point SSID
    pub ssid: String,
}

impl HotspotParams {
    pub fn new(country: impl Into<String>, ssid: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            ssid: ssid.into(),
        }
    }
}

/// Ambient machine state, injected rather than read from the environment
#[derive(Debug, Clone)]
pub struct SetupContext {
    /// Root of the filesystem being provisioned ("/" on a real run)
    pub fs_root: PathBuf,
    /// Invoking user's home directory; the archive server installs beneath it
    pub home_dir: PathBuf,
    /// Local directory holding the web front end to copy into the web root
    pub web_source: PathBuf,
    /// CPU architecture, selects the archive-server release artifact
    pub arch: Architecture,
}

impl SetupContext {
    /// Build the context for a real run against the live filesystem
    pub fn detect(web_source: Option<String>) -> Result<Self> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| SetupError::config("could not determine home directory"))?;
        let arch = crate::utils::SystemUtils::get_system_arch();

        Ok(Self {
            fs_root: PathBuf::from("/"),
            home_dir,
            web_source: PathBuf::from(web_source.unwrap_or_else(|| "www".to_string())),
            arch,
        })
    }

    /// Resolve a path relative to the filesystem root being provisioned
    pub fn path(&self, rel: &str) -> PathBuf {
        self.fs_root.join(rel)
    }

    /// Installation directory for the archive server
    pub fn kiwix_dir(&self) -> PathBuf {
        self.home_dir.join("kiwix")
    }

    /// The archive server's content index (empty until modules are added)
    pub fn kiwix_library(&self) -> PathBuf {
        self.kiwix_dir().join("library.xml")
    }

    #[cfg(test)]
    pub fn for_test(root: &Path) -> Self {
        Self {
            fs_root: root.to_path_buf(),
            home_dir: root.join("home/pi"),
            web_source: root.join("www-src"),
            arch: Architecture::Armhf,
        }
    }
}
