// file: src/provision/archive.rs
// version: 1.1.0
// guid: 6a8c0e2f-4b5d-4e1b-ad4f-7d9f1a3d5e70

//! Stage 4: kiwix content-archive server
//!
//! Installs the latest kiwix-tools release for this CPU into the invoking
//! user's home directory and wires `kiwix-serve` into the local boot
//! script. Content archives are registered later through the library file,
//! which starts out empty.

use tracing::info;

use crate::config::SetupContext;
use crate::network::{NetworkDownloader, ReleaseLocator};
use crate::runner::CommandRunner;
use crate::textedit;
use crate::Result;

const KIWIX_RELEASE_INDEX: &str = "https://download.kiwix.org/release/kiwix-tools/";

/// kiwix-serve port; nginx proxies content pages to it on the same host
const KIWIX_PORT: u16 = 8090;

/// Install the archive server and register it for launch at boot
pub async fn install(
    ctx: &SetupContext,
    runner: &CommandRunner,
    downloader: &NetworkDownloader,
    locator: &ReleaseLocator,
) -> Result<()> {
    info!("Setting up the kiwix content-archive server...");

    let prefix = format!("kiwix-tools_linux-{}", ctx.arch.kiwix_arch());
    let artifact = locator.latest(KIWIX_RELEASE_INDEX, &prefix).await?;
    info!("Latest kiwix-tools release: {}", artifact);

    let kiwix_dir = ctx.kiwix_dir();
    tokio::fs::create_dir_all(&kiwix_dir).await?;

    let tarball = kiwix_dir.join(&artifact);
    let url = format!("{}{}", KIWIX_RELEASE_INDEX, artifact);
    downloader.download_with_progress(&url, &tarball).await?;

    // The tarball carries a single versioned top-level directory; unpack
    // its contents flat into the install dir
    let unpack = format!(
        "tar -xzf {} -C {} --strip-components=1",
        tarball.display(),
        kiwix_dir.display()
    );
    runner
        .run_checked(&unpack, "Error: unable to unpack the kiwix tools archive")
        .await?;
    tokio::fs::remove_file(&tarball).await?;

    configure_boot_launch(ctx).await?;
    Ok(())
}

/// Create the empty content index and add the boot-time launch line
pub async fn configure_boot_launch(ctx: &SetupContext) -> Result<()> {
    tokio::fs::write(ctx.kiwix_library(), b"").await?;

    let launch = format!(
        "{}/kiwix-serve --daemon --blockexternal --port={} --library {}",
        ctx.kiwix_dir().display(),
        KIWIX_PORT,
        ctx.kiwix_library().display()
    );
    textedit::append(&ctx.path("etc/rc.local"), &launch)?;
    Ok(())
}
