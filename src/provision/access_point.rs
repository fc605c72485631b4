// file: src/provision/access_point.rs
// version: 1.2.0
// guid: 4e6a8c0d-2f3b-4cf9-eb2d-5b7d9e1b3c5e

//! Stage 2: open Wi-Fi access point (hostapd + dnsmasq)

use tokio::fs;
use tracing::{info, warn};

use crate::config::{HotspotParams, SetupContext};
use crate::provision::ensure_patched;
use crate::runner::CommandRunner;
use crate::textedit;
use crate::Result;

/// Static address block for the wireless interface; dhcpcd must not run
/// wpa_supplicant on it once hostapd owns the radio
const DHCPCD_BLOCK: &str = "interface wlan0\nstatic ip_address=10.10.10.10\nnohook wpa_supplicant";

/// Address pool and lease time handed to clients joining the hotspot
const DNSMASQ_BLOCK: &str = "interface=wlan0\ndhcp-range=10.10.10.11,10.10.10.61,12h";

fn hostapd_block(params: &HotspotParams) -> String {
    format!(
        "interface=wlan0\n\
         driver=nl80211\n\
         hw_mode=g\n\
         channel=4\n\
         ieee80211n=1\n\
         wmm_enabled=0\n\
         auth_algs=1\n\
         ssid={}\n\
         ieee80211d=1\n\
         country_code={}",
        params.ssid, params.country
    )
}

/// Install and configure the open access point
pub async fn install(
    ctx: &SetupContext,
    runner: &CommandRunner,
    params: &HotspotParams,
) -> Result<()> {
    info!("Setting up wifi hotspot...");

    runner
        .run_checked(
            "apt-get -y install hostapd dnsmasq",
            "Error: unable to install hostapd and dnsmasq",
        )
        .await?;
    runner
        .run_checked("systemctl stop hostapd", "Error: unable to stop hostapd")
        .await?;
    runner
        .run_checked("systemctl stop dnsmasq", "Error: unable to stop dnsmasq")
        .await?;

    textedit::append(&ctx.path("etc/dhcpcd.conf"), DHCPCD_BLOCK)?;
    runner
        .run_checked("systemctl restart dhcpcd", "Error: dhcpcd restart failed")
        .await?;

    textedit::append(&ctx.path("etc/hostapd/hostapd.conf"), &hostapd_block(params))?;
    let pointer = ctx.path("etc/default/hostapd");
    let found = textedit::replace_first(
        &pointer,
        "#DAEMON_CONF=\"\"",
        "DAEMON_CONF=\"/etc/hostapd/hostapd.conf\"",
    )?;
    ensure_patched(found, "#DAEMON_CONF=\"\"", &pointer)?;

    // dnsmasq ships a fully annotated config; set it aside and write the
    // minimal hotspot config in its place
    let dnsmasq_conf = ctx.path("etc/dnsmasq.conf");
    if let Err(err) = fs::rename(&dnsmasq_conf, ctx.path("etc/dnsmasq.conf.orig")).await {
        warn!("could not back up dnsmasq.conf: {}", err);
    }
    textedit::append(&dnsmasq_conf, DNSMASQ_BLOCK)?;

    // Record the country code for wpa_supplicant as well, in case the
    // operator later joins an upstream network
    textedit::append(
        &ctx.path("etc/wpa_supplicant/wpa_supplicant.conf"),
        &format!("country={}", params.country),
    )?;
    runner
        .run_checked(
            &format!("iw reg set {}", params.country),
            "Error: unable to set the wireless regulatory domain",
        )
        .await?;

    // The radio may only be unblocked once the regulatory domain is set
    runner
        .run_checked("rfkill block bluetooth", "Error: bluetooth disable failed")
        .await?;
    runner
        .run_checked("rfkill unblock wifi", "Error: wifi enable failed")
        .await?;

    runner
        .run_checked("systemctl unmask hostapd", "Error: unable to unmask hostapd")
        .await?;
    runner
        .run_checked("systemctl enable hostapd", "Error: unable to enable hostapd")
        .await?;
    runner
        .run_checked("systemctl start hostapd", "Error: unable to start hostapd")
        .await?;
    runner
        .run_checked("service dnsmasq start", "Error: dnsmasq failed to start")
        .await?;

    Ok(())
}
