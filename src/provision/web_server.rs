// file: src/provision/web_server.rs
// version: 1.2.0
// guid: 5f7b9d1e-3a4c-4d0a-fc3e-6c8e0f2c4d6f

//! Stage 3: nginx + PHP-FPM web server and the ARCHIE Pi front end

use tracing::info;

use crate::config::SetupContext;
use crate::provision::ensure_patched;
use crate::runner::CommandRunner;
use crate::textedit;
use crate::{Result, SetupError};

/// Install the web server, enable PHP in the default site, install the
/// front end under the web root
pub async fn install(ctx: &SetupContext, runner: &CommandRunner) -> Result<()> {
    info!("Setting up web server...");

    runner
        .run_checked("apt install nginx -y", "Error: unable to install nginx")
        .await?;
    runner
        .run_checked(
            "apt install php php-fpm php-cli php-sqlite3 -y",
            "Error: unable to install the PHP runtime",
        )
        .await?;

    enable_php(ctx)?;
    install_front_end(ctx, runner).await?;

    runner
        .run_checked("service nginx restart", "Error: unable to restart nginx")
        .await?;

    Ok(())
}

/// Patch the stock Debian nginx site config: move the document root, add a
/// PHP index, and open up the commented-out FastCGI location block
///
/// The edits target the config template shipped by the pinned OS release;
/// substring matching here is intentionally literal.
fn enable_php(ctx: &SetupContext) -> Result<()> {
    let site = ctx.path("etc/nginx/sites-enabled/default");

    let found = textedit::replace_first(&site, "root /var/www/html;", "root /var/www;")?;
    ensure_patched(found, "root /var/www/html;", &site)?;

    let found = textedit::replace_first(
        &site,
        "index index.html index.htm index.nginx-debian.html;",
        "index index.php index.html index.htm index.nginx-debian.html;",
    )?;
    ensure_patched(found, "index index.html", &site)?;

    let found = textedit::uncomment_first(&site, "location ~ \\.php$")?;
    ensure_patched(found, "location ~ \\.php$", &site)?;

    let found = textedit::uncomment_first(&site, "include snippets/fastcgi-php.conf")?;
    ensure_patched(found, "include snippets/fastcgi-php.conf", &site)?;

    // The socket directive sits on the line after the "With php-fpm" banner
    let found = textedit::uncomment_after(&site, "With php-fpm")?;
    ensure_patched(found, "With php-fpm", &site)?;

    // Close the location block; its closing brace stays commented out above
    let found = textedit::replace_first(
        &site,
        "fastcgi_pass unix:/run/php/php7.4-fpm.sock;",
        "fastcgi_pass unix:/run/php/php7.4-fpm.sock; }",
    )?;
    ensure_patched(found, "fastcgi_pass unix", &site)?;

    Ok(())
}

/// Copy the front-end tree into the web root and hand it to the nginx
/// service account
async fn install_front_end(ctx: &SetupContext, runner: &CommandRunner) -> Result<()> {
    info!("Installing ARCHIE Pi web front end...");

    let www_root = ctx.path("var/www");
    let mut options = fs_extra::dir::CopyOptions::new();
    options.overwrite = true;
    options.content_only = true;
    fs_extra::dir::copy(&ctx.web_source, &www_root, &options).map_err(|e| {
        SetupError::system(format!(
            "Error copying {} to {}: {}",
            ctx.web_source.display(),
            www_root.display(),
            e
        ))
    })?;

    // Installable content modules land here
    tokio::fs::create_dir(www_root.join("modules")).await?;

    runner
        .run_checked(
            "chown -R www-data.www-data /var/www",
            "Error: unable to change ownership of /var/www",
        )
        .await?;

    Ok(())
}
