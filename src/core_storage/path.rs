use crate::core_storage::error::PathError;
use std::path::{Component, Path, PathBuf};

/// Collapses `.` and `..` lexically. Symlinks are not followed.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// Resolves a client-supplied path token against the session's virtual root
/// and current working directory.
///
/// Tokens starting with `/` are root-relative, everything else is relative to
/// `cwd`. The result is rejected unless it stays beneath `root`.
pub fn resolve(root: &Path, cwd: &str, token: &str) -> Result<PathBuf, PathError> {
    let virtual_path = if token.starts_with('/') {
        token.to_string()
    } else {
        format!("{}/{}", cwd.trim_end_matches('/'), token)
    };

    let root = normalize(root);
    let absolute = normalize(&root.join(virtual_path.trim_start_matches('/')));
    if absolute.starts_with(&root) {
        Ok(absolute)
    } else {
        Err(PathError::Containment(token.to_string()))
    }
}

/// Maps an absolute path beneath `root` back to its slash-rooted virtual form.
/// Directories end with `/`, except that the root itself is just `"/"`.
pub fn to_virtual_dir(root: &Path, absolute: &Path) -> String {
    let root = normalize(root);
    let relative = absolute.strip_prefix(&root).unwrap_or(Path::new(""));
    let segments: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Computes the target of a CWD: the absolute directory and the new virtual
/// working directory. `..` at the root is a no-op.
pub fn change_directory_target(
    root: &Path,
    cwd: &str,
    token: &str,
) -> Result<(PathBuf, String), PathError> {
    if token == ".." && cwd == "/" {
        return Ok((normalize(root), "/".to_string()));
    }
    let absolute = resolve(root, cwd, token)?;
    let virtual_dir = to_virtual_dir(root, &absolute);
    Ok((absolute, virtual_dir))
}

/// Last path segment, used when reporting a file to host hooks.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
