// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::{Path, PathBuf};

use path_clean::clean;

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Walks up from `path` looking for `filename`.
pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    path.ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.exists())
}

/// CLI file (relative to cwd), else the nearest file above cwd, else the default location.
pub fn resolve_config_path(
    find_in_parent: FindInParent,
    cwd: &Path,
    default_config_dir: &Path,
    default_filename: &str,
    cli_file: Option<&Path>,
) -> PathBuf {
    if let Some(cli_file) = cli_file {
        if cli_file.is_absolute() {
            return cli_file.to_path_buf();
        }
        return clean(cwd.join(cli_file));
    }

    if let Some(found) = find_in_parent(cwd, default_filename) {
        return found;
    }

    clean(default_config_dir.join(default_filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found(_: &Path, _: &str) -> Option<PathBuf> {
        None
    }

    fn found(_: &Path, _: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/foo/keyper.config.yaml"))
    }

    #[test]
    fn resolution_order() {
        let cwd = Path::new("/foo/bar");
        let default_dir = Path::new("/my/config");
        let name = "keyper.config.yaml";

        assert_eq!(
            resolve_config_path(not_found, cwd, default_dir, name, None),
            PathBuf::from("/my/config/keyper.config.yaml")
        );
        assert_eq!(
            resolve_config_path(found, cwd, default_dir, name, None),
            PathBuf::from("/foo/keyper.config.yaml")
        );
        assert_eq!(
            resolve_config_path(found, cwd, default_dir, name, Some(Path::new("/abs/conf.yaml"))),
            PathBuf::from("/abs/conf.yaml")
        );
        assert_eq!(
            resolve_config_path(found, cwd, default_dir, name, Some(Path::new("../conf.yaml"))),
            PathBuf::from("/foo/conf.yaml")
        );
    }
}
