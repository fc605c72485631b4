// file: src/provision/harden.rs
// version: 1.2.0
// guid: 7b9d1f3a-5c6e-4f2c-be5a-8e0a2b4e6f81

//! Stage 5: SD-card durability hardening
//!
//! Reduces write frequency and power-loss exposure on the SD card: swap
//! off, periodic indexing off, time sync off (the deployed hotspot has no
//! internet to sync against), boot and root mounted read-only, and the
//! remaining volatile writers redirected to tmpfs. Designed for a single
//! run on a freshly provisioned machine; re-running duplicates the
//! appended mount entries.

use tracing::info;

use crate::config::SetupContext;
use crate::provision::ensure_patched;
use crate::runner::CommandRunner;
use crate::textedit;
use crate::Result;

/// tmpfs mounts for the directories that still take writes, appended to the
/// mount table in this order
const FSTAB_TMPFS_LINES: [&str; 6] = [
    "tmpfs   /tmp            tmpfs   nosuid,nodev  0  0",
    "tmpfs   /var/log        tmpfs   noatime,nosuid,mode=0755,size=50M  0  0",
    "tmpfs   /var/tmp        tmpfs   nosuid,nodev  0  0",
    "tmpfs   /var/lib/dhcp   tmpfs   nosuid,nodev  0  0",
    "tmpfs   /var/lib/misc   tmpfs   nosuid,nodev  0  0",
    "tmpfs   /var/lib/php/sessions  tmpfs  nosuid,nodev,mode=0777  0  0",
];

/// Apply the full hardening pass
pub async fn apply(ctx: &SetupContext, runner: &CommandRunner) -> Result<()> {
    info!("Hardening the install against SD card wear...");

    disable_swap(runner).await?;
    disable_periodic_indexing(runner).await?;
    disable_time_sync(runner).await?;
    readonly_mounts(ctx, runner).await?;
    relocate_volatile_files(runner).await?;

    Ok(())
}

async fn disable_swap(runner: &CommandRunner) -> Result<()> {
    info!("Disabling swap...");
    runner
        .run_checked("dphys-swapfile swapoff", "Error: swapoff failed")
        .await?;
    runner
        .run_checked("dphys-swapfile uninstall", "Error: swap uninstall failed")
        .await?;
    runner
        .run_checked(
            "update-rc.d dphys-swapfile remove",
            "Error: swapfile service removal failed",
        )
        .await?;
    runner
        .run_checked(
            "apt -y purge dphys-swapfile",
            "Error: could not purge dphys-swapfile",
        )
        .await?;
    Ok(())
}

async fn disable_periodic_indexing(runner: &CommandRunner) -> Result<()> {
    info!("Disabling periodic man page indexing...");
    runner
        .run_checked(
            "chmod -x /etc/cron.daily/man-db",
            "Error: unable to disable daily man page indexing",
        )
        .await?;
    runner
        .run_checked(
            "chmod -x /etc/cron.weekly/man-db",
            "Error: unable to disable weekly man page indexing",
        )
        .await?;
    Ok(())
}

async fn disable_time_sync(runner: &CommandRunner) -> Result<()> {
    info!("Disabling time sync...");
    runner
        .run_checked(
            "systemctl disable systemd-timesyncd.service",
            "Error: unable to disable time sync",
        )
        .await?;
    Ok(())
}

/// Flip boot and root to read-only in the mount table and add the tmpfs
/// mounts for everything that still writes
async fn readonly_mounts(ctx: &SetupContext, runner: &CommandRunner) -> Result<()> {
    info!("Mounting boot and root partitions read-only...");
    let fstab = ctx.path("etc/fstab");

    let found = textedit::replace_first(
        &fstab,
        "/boot           vfat    defaults",
        "/boot           vfat    ro",
    )?;
    ensure_patched(found, "/boot           vfat    defaults", &fstab)?;

    let found = textedit::replace_first(&fstab, "defaults,noatime", "defaults,noatime,ro")?;
    ensure_patched(found, "defaults,noatime", &fstab)?;

    for line in FSTAB_TMPFS_LINES {
        textedit::append(&fstab, line)?;
    }

    // nginx refuses to start without its log directory; recreate it inside
    // the fresh tmpfs on every boot
    let crontab = ctx.path("var/spool/cron/crontabs/root");
    textedit::append(&crontab, "@reboot mkdir /var/log/nginx")?;
    runner
        .run_checked(
            "chmod 600 /var/spool/cron/crontabs/root",
            "Error: unable to tighten the root crontab",
        )
        .await?;

    Ok(())
}

/// Move the resolver config, fake hardware clock, and DHCP lease state onto
/// tmpfs-backed paths, with dhcpcd stopped while its files move
async fn relocate_volatile_files(runner: &CommandRunner) -> Result<()> {
    info!("Relocating volatile files to tmpfs...");

    runner
        .run_checked("systemctl stop dhcpcd", "Error: unable to stop dhcpcd")
        .await?;

    runner
        .run_checked(
            "mv /etc/resolv.conf /var/run/resolv.conf",
            "Error: unable to relocate resolv.conf",
        )
        .await?;
    runner
        .run_checked(
            "ln -s /var/run/resolv.conf /etc/resolv.conf",
            "Error: unable to link resolv.conf",
        )
        .await?;

    runner
        .run_checked(
            "mv /etc/fake-hwclock.data /var/run/fake-hwclock.data",
            "Error: unable to relocate the fake hardware clock",
        )
        .await?;
    runner
        .run_checked(
            "ln -s /var/run/fake-hwclock.data /etc/fake-hwclock.data",
            "Error: unable to link the fake hardware clock",
        )
        .await?;

    runner
        .run_checked(
            "mv /var/lib/dhcpcd5 /var/run/dhcpcd5",
            "Error: unable to relocate the dhcp lease directory",
        )
        .await?;
    runner
        .run_checked(
            "ln -s /var/run/dhcpcd5 /var/lib/dhcpcd5",
            "Error: unable to link the dhcp lease directory",
        )
        .await?;

    runner
        .run_checked("systemctl start dhcpcd", "Error: unable to start dhcpcd")
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provision::fixtures::{seed_root, FSTAB};
    use std::fs as stdfs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_apply_appends_exactly_six_mount_lines_in_order() {
        let root = TempDir::new().unwrap();
        let ctx = seed_root(root.path());
        let runner = CommandRunner::mock();

        let before = FSTAB.lines().count();
        apply(&ctx, &runner).await.unwrap();

        let fstab = stdfs::read_to_string(ctx.path("etc/fstab")).unwrap();
        let lines: Vec<&str> = fstab.lines().collect();
        assert_eq!(lines.len(), before + 6);
        assert_eq!(&lines[before..], &FSTAB_TMPFS_LINES);
    }

    #[tokio::test]
    async fn test_apply_flips_boot_and_root_read_only() {
        let root = TempDir::new().unwrap();
        let ctx = seed_root(root.path());
        let runner = CommandRunner::mock();

        apply(&ctx, &runner).await.unwrap();

        let fstab = stdfs::read_to_string(ctx.path("etc/fstab")).unwrap();
        assert!(fstab.contains("/boot           vfat    ro"));
        assert!(fstab.contains("defaults,noatime,ro"));
        assert!(!fstab.contains("vfat    defaults"));
    }

    #[tokio::test]
    async fn test_apply_schedules_nginx_log_dir_recreation() {
        let root = TempDir::new().unwrap();
        let ctx = seed_root(root.path());
        let runner = CommandRunner::mock();

        apply(&ctx, &runner).await.unwrap();

        let crontab = stdfs::read_to_string(ctx.path("var/spool/cron/crontabs/root")).unwrap();
        assert_eq!(crontab, "@reboot mkdir /var/log/nginx\n");
        assert!(runner
            .executed()
            .contains(&"chmod 600 /var/spool/cron/crontabs/root".to_string()));
    }

    #[tokio::test]
    async fn test_apply_relocates_lease_files_with_dhcpcd_stopped() {
        let root = TempDir::new().unwrap();
        let ctx = seed_root(root.path());
        let runner = CommandRunner::mock();

        apply(&ctx, &runner).await.unwrap();

        let executed = runner.executed();
        let stop = executed.iter().position(|c| c == "systemctl stop dhcpcd").unwrap();
        let mv = executed
            .iter()
            .position(|c| c == "mv /var/lib/dhcpcd5 /var/run/dhcpcd5")
            .unwrap();
        let start = executed.iter().position(|c| c == "systemctl start dhcpcd").unwrap();
        assert!(stop < mv && mv < start);
    }

    #[tokio::test]
    async fn test_apply_halts_when_swapoff_fails() {
        let root = TempDir::new().unwrap();
        let ctx = seed_root(root.path());
        let runner = CommandRunner::mock_failing_on("swapoff");

        let err = apply(&ctx, &runner).await.unwrap_err();

        assert!(err.to_string().contains("swapoff failed"));
        // The mount table was never touched.
        let fstab = stdfs::read_to_string(ctx.path("etc/fstab")).unwrap();
        assert_eq!(fstab, FSTAB);
    }
}
