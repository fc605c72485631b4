// file: src/textedit.rs
// version: 1.3.0
// guid: 6c8e0a2b-4d5f-4a71-c3e5-7f9b1d3f5a7c

//! Line-oriented surgery on distribution config files
//!
//! These operations deliberately match by literal substring instead of
//! parsing the file format: the targets are well-known templates shipped by
//! Raspberry Pi OS, pinned to the imaged release. That makes the edits
//! simple and predictable, and brittle against upstream format drift. Each
//! call is all-or-nothing: if no line matches, the file is left
//! byte-for-byte untouched and the operation reports `Ok(false)`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::{Result, SetupError};

/// Append `text` plus a trailing newline to `file`, creating it if absent
pub fn append(file: &Path, text: &str) -> Result<()> {
    let mut f = OpenOptions::new().create(true).append(true).open(file)?;
    writeln!(f, "{}", text)?;
    Ok(())
}

/// Replace the first occurrence of `old` on the first line containing it
///
/// Only that one substring occurrence changes; the rest of the matching line
/// and every other line, including later lines that also contain `old`, pass
/// through byte-identical. Returns whether a match was found.
pub fn replace_first(file: &Path, old: &str, new: &str) -> Result<bool> {
    rewrite_lines(file, |line, found| {
        if !found && line.contains(old) {
            Some(line.replacen(old, new, 1))
        } else {
            None
        }
    })
}

/// Strip every `#` from the first line containing `marker`
pub fn uncomment_first(file: &Path, marker: &str) -> Result<bool> {
    rewrite_lines(file, |line, found| {
        if !found && line.contains(marker) {
            Some(line.replace('#', ""))
        } else {
            None
        }
    })
}

/// Strip every `#` from the line immediately after the first line containing
/// `marker`
///
/// The marker line itself is never modified. Reports no-match when the
/// marker is absent or sits on the last line.
pub fn uncomment_after(file: &Path, marker: &str) -> Result<bool> {
    let contents = fs::read_to_string(file)?;
    let mut out = String::with_capacity(contents.len());
    let mut marker_seen = false;
    let mut patched = false;

    for line in contents.split_inclusive('\n') {
        if marker_seen && !patched {
            out.push_str(&line.replace('#', ""));
            patched = true;
        } else {
            if !marker_seen && line.contains(marker) {
                marker_seen = true;
            }
            out.push_str(line);
        }
    }

    if !patched {
        return Ok(false);
    }
    write_atomic(file, &out)?;
    Ok(true)
}

/// Scan `file` line by line, letting `patch` rewrite the first line it
/// accepts; `found` tells the closure whether a line was already patched
fn rewrite_lines<F>(file: &Path, mut patch: F) -> Result<bool>
where
    F: FnMut(&str, bool) -> Option<String>,
{
    let contents = fs::read_to_string(file)?;
    let mut out = String::with_capacity(contents.len());
    let mut found = false;

    for line in contents.split_inclusive('\n') {
        match patch(line, found) {
            Some(replacement) => {
                out.push_str(&replacement);
                found = true;
            }
            None => out.push_str(line),
        }
    }

    if !found {
        return Ok(false);
    }
    write_atomic(file, &out)?;
    Ok(true)
}

/// Rewrite `file` in place with no partially-written state observable:
/// contents go to a temp file in the same directory, which is then renamed
/// over the original. The original's permissions are preserved.
fn write_atomic(file: &Path, contents: &str) -> Result<()> {
    let dir = file
        .parent()
        .ok_or_else(|| SetupError::system(format!("no parent directory for {}", file.display())))?;

    let permissions = fs::metadata(file)?.permissions();
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.persist(file).map_err(|e| SetupError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_append_is_strictly_additive() {
        let dir = TempDir::new().unwrap();
        let file = fixture(&dir, "dhcpcd.conf", "hostname\nclientid\n");

        append(&file, "interface wlan0\nstatic ip_address=10.10.10.10").unwrap();

        let contents = fs::read_to_string(&file).unwrap();
        assert_eq!(
            contents,
            "hostname\nclientid\ninterface wlan0\nstatic ip_address=10.10.10.10\n"
        );
    }

    #[test]
    fn test_append_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("dnsmasq.conf");

        append(&file, "interface=wlan0").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "interface=wlan0\n");
    }

    #[test]
    fn test_replace_first_touches_only_first_matching_line() {
        let dir = TempDir::new().unwrap();
        let file = fixture(&dir, "f", "alpha defaults beta\ngamma\ndelta defaults\n");

        let found = replace_first(&file, "defaults", "defaults,ro").unwrap();

        assert!(found);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "alpha defaults,ro beta\ngamma\ndelta defaults\n"
        );
    }

    #[test]
    fn test_replace_first_replaces_substring_not_whole_line() {
        let dir = TempDir::new().unwrap();
        let file = fixture(&dir, "hostapd", "# config\n#DAEMON_CONF=\"\"\n");

        replace_first(
            &file,
            "#DAEMON_CONF=\"\"",
            "DAEMON_CONF=\"/etc/hostapd/hostapd.conf\"",
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "# config\nDAEMON_CONF=\"/etc/hostapd/hostapd.conf\"\n"
        );
    }

    #[test]
    fn test_replace_first_no_match_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let original = "one\ntwo\nthree";
        let file = fixture(&dir, "f", original);

        let found = replace_first(&file, "absent", "anything").unwrap();

        assert!(!found);
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn test_replace_first_preserves_missing_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let file = fixture(&dir, "f", "keep\nold value");

        replace_first(&file, "old", "new").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "keep\nnew value");
    }

    #[test]
    fn test_uncomment_first_strips_every_hash_on_that_line() {
        let dir = TempDir::new().unwrap();
        let file = fixture(
            &dir,
            "default",
            "#\tlocation ~ \\.php$ {\n#\t# a comment\nplain\n",
        );

        let found = uncomment_first(&file, "location ~ \\.php$").unwrap();

        assert!(found);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "\tlocation ~ \\.php$ {\n#\t# a comment\nplain\n"
        );
    }

    #[test]
    fn test_uncomment_first_only_first_match() {
        let dir = TempDir::new().unwrap();
        let file = fixture(&dir, "f", "#opt=1\n#opt=2\n");

        uncomment_first(&file, "opt").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "opt=1\n#opt=2\n");
    }

    #[test]
    fn test_uncomment_after_leaves_marker_line_alone() {
        let dir = TempDir::new().unwrap();
        let file = fixture(
            &dir,
            "default",
            "#\t# With php-fpm (or other unix sockets):\n#\tfastcgi_pass unix:/run/php/php7.4-fpm.sock;\n#}\n",
        );

        let found = uncomment_after(&file, "With php-fpm").unwrap();

        assert!(found);
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "#\t# With php-fpm (or other unix sockets):\n\tfastcgi_pass unix:/run/php/php7.4-fpm.sock;\n#}\n"
        );
    }

    #[test]
    fn test_uncomment_after_marker_absent() {
        let dir = TempDir::new().unwrap();
        let original = "a\nb\n";
        let file = fixture(&dir, "f", original);

        assert!(!uncomment_after(&file, "zzz").unwrap());
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn test_uncomment_after_marker_on_last_line() {
        let dir = TempDir::new().unwrap();
        let original = "a\nmarker here\n";
        let file = fixture(&dir, "f", original);

        assert!(!uncomment_after(&file, "marker").unwrap());
        assert_eq!(fs::read_to_string(&file).unwrap(), original);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("absent");

        assert!(replace_first(&file, "a", "b").is_err());
        assert!(uncomment_first(&file, "a").is_err());
        assert!(uncomment_after(&file, "a").is_err());
    }
}
