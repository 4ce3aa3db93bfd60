//! Collision-free filenames inside the uploads directory.
//!
//! A requested name is normalized (whitespace removed, directory components
//! dropped) and then probed against the directory: `photo.png`, then
//! `photo_1.png`, `photo_2.png`, ... until an unused name is found.
//!
//! Probing alone is check-then-act: two requests asking for the same name can
//! both see it as free. [`write_unique`] closes that window on local disks by
//! opening with `create_new` and re-probing past any name that was claimed in
//! between, so an existing file is never overwritten.

use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tokio::{
    fs::{self, OpenOptions},
    io::AsyncWriteExt,
};
use tracing::debug;

/// Strip every whitespace character and keep only the final path component.
///
/// Returns `None` when nothing usable is left (empty, `.` or `..`).
pub fn normalize_filename(requested: &str) -> Option<String> {
    let stripped: String = requested.chars().filter(|c| !c.is_whitespace()).collect();
    let last = stripped.rsplit(['/', '\\']).next().unwrap_or_default();

    match last {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Split `name` into stem and extension, the extension keeping its dot.
///
/// A leading dot does not start an extension (`.env` has none).
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name.split_at(pos),
        _ => (name, ""),
    }
}

/// The `index`-th candidate for `name`; index 0 is the name itself.
pub fn candidate_name(name: &str, index: u32) -> String {
    if index == 0 {
        return name.to_string();
    }
    let (stem, ext) = split_extension(name);
    format!("{}_{}{}", stem, index, ext)
}

/// Whether anything, including a dangling symlink, occupies `path`.
async fn occupied(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path).await {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Resolve an already-normalized `name` to one not present in `dir`,
/// probing `name`, `stem_1.ext`, `stem_2.ext`, ... in order.
pub async fn resolve_filename(dir: &Path, name: &str) -> io::Result<String> {
    let mut index = 0;
    loop {
        let candidate = candidate_name(name, index);
        if !occupied(&dir.join(&candidate)).await? {
            return Ok(candidate);
        }
        index += 1;
    }
}

/// Write `data` under a collision-free variant of `name` in `dir`.
///
/// Returns the final filename and its full path. A name claimed between the
/// probe and the exclusive open is now occupied, so probing again moves past it.
pub async fn write_unique(dir: &Path, name: &str, data: &[u8]) -> io::Result<(String, PathBuf)> {
    loop {
        let candidate = resolve_filename(dir, name).await?;
        let path = dir.join(&candidate);

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!("{} was claimed concurrently, probing again", candidate);
                continue;
            }
            Err(err) => return Err(err),
        };

        let written = async {
            file.write_all(data).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;

        if let Err(err) = written {
            let _ = fs::remove_file(&path).await;
            return Err(err);
        }

        return Ok((candidate, path));
    }
}
