//! Texture lookup for material layers.
//!
//! Material names in a TER file only carry a base name. The matching image is
//! searched for next to the terrain and then in every ancestor directory.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::settings::DEFAULT_TEXTURE_EXTENSIONS;

/// Strips any directory part and the last extension from a material name.
///
/// ```
/// use bevy_ter_terrain::material_base_name;
///
/// assert_eq!(material_base_name("textures/grass.png"), "grass");
/// assert_eq!(material_base_name("Lush.Grass"), "Lush");
/// assert_eq!(material_base_name("rock"), "rock");
/// ```
pub fn material_base_name(name: &str) -> &str {
    let file = name.rsplit(['/', '\\']).next().unwrap_or(name);
    file.rsplit_once('.').map_or(file, |(stem, _)| stem)
}

/// Finds `base_name.<ext>` using the default extension list.
///
/// See [`resolve_texture_with`].
pub fn resolve_texture(start: impl AsRef<Path>, base_name: &str) -> Option<PathBuf> {
    resolve_texture_with(start, base_name, &DEFAULT_TEXTURE_EXTENSIONS)
}

/// Finds `base_name.<ext>` in `start` or the closest ancestor holding one.
///
/// Directories are visited from `start` upwards. Inside each directory the
/// extensions are tried in the given order, so a closer `jpg` wins over a
/// farther `png`. The walk ends after probing a mount point or the root.
/// Nothing is cached; each call probes the filesystem again.
pub fn resolve_texture_with<S: AsRef<str>>(
    start: impl AsRef<Path>,
    base_name: &str,
    extensions: &[S],
) -> Option<PathBuf> {
    // An empty path is the current directory; `absolute` rejects it.
    let start = match start.as_ref() {
        path if path.as_os_str().is_empty() => Path::new("."),
        path => path,
    };
    let mut dir = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());

    loop {
        for ext in extensions {
            let candidate = dir.join(format!("{base_name}.{}", ext.as_ref()));
            trace!(path = %candidate.display(), "probing texture");
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        if is_mount_point(&dir) {
            return None;
        }
        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => return None,
        }
    }
}

#[cfg(unix)]
fn is_mount_point(dir: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    let Some(parent) = dir.parent() else {
        return true;
    };
    match (std::fs::metadata(dir), std::fs::metadata(parent)) {
        (Ok(here), Ok(up)) => here.dev() != up.dev() || here.ino() == up.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_mount_point(dir: &Path) -> bool {
    dir.parent().is_none()
}
