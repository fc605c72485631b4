// file: src/provision/mod.rs
// version: 1.2.0
// guid: 2c4e6a8b-0d1f-4ad7-c9eb-3f5b7c9f1a3c

//! The provisioning sequencer
//!
//! A single linear chain of stages, each a linear chain of steps. The first
//! failing step is terminal for the whole run: there is no retry, no
//! checkpoint, and no rollback. A failed run leaves the machine partially
//! configured and requires a fresh OS image to attempt again.

pub mod access_point;
pub mod archive;
pub mod cleanup;
pub mod harden;
pub mod system;
pub mod web_server;

use std::path::Path;

use tracing::info;

use crate::config::{HotspotParams, SetupContext};
use crate::network::{NetworkDownloader, ReleaseLocator};
use crate::runner::CommandRunner;
use crate::{Result, SetupError};

/// Drives the ordered provisioning stages against one machine
pub struct Provisioner {
    ctx: SetupContext,
    runner: CommandRunner,
    downloader: NetworkDownloader,
    locator: ReleaseLocator,
}

impl Provisioner {
    pub fn new(ctx: SetupContext, runner: CommandRunner) -> Self {
        Self {
            ctx,
            runner,
            downloader: NetworkDownloader::new(),
            locator: ReleaseLocator::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_components(
        ctx: SetupContext,
        runner: CommandRunner,
        downloader: NetworkDownloader,
        locator: ReleaseLocator,
    ) -> Self {
        Self {
            ctx,
            runner,
            downloader,
            locator,
        }
    }

    /// Run the full sequence: system update, access point, web server,
    /// content-archive server, package cleanup
    pub async fn provision(&self, params: &HotspotParams) -> Result<()> {
        info!("Starting ARCHIE Pi setup...");

        system::update(&self.ctx, &self.runner).await?;
        access_point::install(&self.ctx, &self.runner, params).await?;
        web_server::install(&self.ctx, &self.runner).await?;
        archive::install(&self.ctx, &self.runner, &self.downloader, &self.locator).await?;
        cleanup::run(&self.ctx, &self.runner).await?;

        info!("ARCHIE Pi installed successfully. It can be reached over wi-fi at http://10.10.10.10.");
        info!("Don't forget to change the default password for the login user!");
        Ok(())
    }

    /// Apply the SD-card durability hardening, an operator-invoked follow-up
    /// to a successful provisioning run
    pub async fn harden(&self) -> Result<()> {
        harden::apply(&self.ctx, &self.runner).await?;
        info!("Hardening complete. Reboot for the read-only mounts to take effect.");
        Ok(())
    }
}

/// Promote a no-match result from a config edit to the fatal error every
/// call site treats it as
pub(crate) fn ensure_patched(found: bool, pattern: &str, file: &Path) -> Result<()> {
    if found {
        Ok(())
    } else {
        Err(SetupError::pattern_not_found(pattern, file))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::Path;

    use crate::config::SetupContext;

    pub const FSTAB: &str = "proc            /proc           proc    defaults          0       0\n\
        /dev/mmcblk0p1  /boot           vfat    defaults          0       2\n\
        /dev/mmcblk0p2  /               ext4    defaults,noatime  0       1\n";

    pub const NGINX_DEFAULT: &str = "server {\n\
        \tlisten 80 default_server;\n\
        \troot /var/www/html;\n\
        \n\
        \t# Add index.php to the list if you are using PHP\n\
        \tindex index.html index.htm index.nginx-debian.html;\n\
        \n\
        \t#location ~ \\.php$ {\n\
        \t#\tinclude snippets/fastcgi-php.conf;\n\
        \t#\n\
        \t#\t# With php-fpm (or other unix sockets):\n\
        \t#\tfastcgi_pass unix:/run/php/php7.4-fpm.sock;\n\
        \t#\t# With php-cgi (or other tcp sockets):\n\
        \t#\t#fastcgi_pass 127.0.0.1:9000;\n\
        \t#}\n\
        }\n";

    /// Lay out the config files a freshly imaged Raspberry Pi OS would have
    /// under a scratch root
    pub fn seed_root(root: &Path) -> SetupContext {
        let ctx = SetupContext::for_test(root);

        fs::create_dir_all(root.join("etc/hostapd")).unwrap();
        fs::create_dir_all(root.join("etc/default")).unwrap();
        fs::create_dir_all(root.join("etc/wpa_supplicant")).unwrap();
        fs::create_dir_all(root.join("etc/nginx/sites-enabled")).unwrap();
        fs::create_dir_all(root.join("var/www")).unwrap();
        fs::create_dir_all(root.join("var/spool/cron/crontabs")).unwrap();
        fs::create_dir_all(&ctx.home_dir).unwrap();
        fs::create_dir_all(&ctx.web_source).unwrap();

        fs::write(root.join("etc/dhcpcd.conf"), "hostname\nclientid\n").unwrap();
        fs::write(root.join("etc/default/hostapd"), "# Defaults for hostapd\n#DAEMON_CONF=\"\"\n").unwrap();
        fs::write(root.join("etc/dnsmasq.conf"), "# dnsmasq stock config\n").unwrap();
        fs::write(
            root.join("etc/wpa_supplicant/wpa_supplicant.conf"),
            "ctrl_interface=DIR=/var/run/wpa_supplicant GROUP=netdev\nupdate_config=1\n",
        )
        .unwrap();
        fs::write(root.join("etc/nginx/sites-enabled/default"), NGINX_DEFAULT).unwrap();
        fs::write(root.join("etc/rc.local"), "#!/bin/sh -e\n").unwrap();
        fs::write(root.join("etc/fstab"), FSTAB).unwrap();
        fs::write(ctx.web_source.join("index.php"), "<?php phpinfo();\n").unwrap();

        ctx
    }
}
