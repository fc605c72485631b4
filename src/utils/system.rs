// file: src/utils/system.rs
// version: 1.2.0
// guid: 1b3d5f7a-9c0e-4fc6-b8da-2e4a6b8e0f2b

//! System utility functions

use crate::config::Architecture;

/// External tools the provisioning sequence shells out to
const REQUIRED_COMMANDS: [&str; 9] = [
    "apt",
    "apt-get",
    "systemctl",
    "service",
    "rfkill",
    "iw",
    "tar",
    "chown",
    "chmod",
];

/// System utility functions
pub struct SystemUtils;

impl SystemUtils {
    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        which::which(command).is_ok()
    }

    /// Get system architecture
    pub fn get_system_arch() -> Architecture {
        std::env::consts::ARCH.parse().unwrap_or(Architecture::Armhf)
    }

    /// Check if running as root
    pub fn is_root() -> bool {
        #[cfg(unix)]
        {
            unsafe { libc::getuid() == 0 }
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Check system prerequisites for a provisioning run, returning the
    /// missing tools
    pub fn check_prerequisites() -> Vec<String> {
        REQUIRED_COMMANDS
            .iter()
            .filter(|cmd| !Self::command_exists(cmd))
            .map(|cmd| cmd.to_string())
            .collect()
    }
}
