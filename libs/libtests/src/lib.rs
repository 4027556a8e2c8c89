// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//! This crate provides common functions for unit tests
use std::{
    env, fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// get the source project root path, the first ancestor of the current
/// directory holding a Cargo.lock or a workspace Cargo.toml
pub fn get_project_root() -> io::Result<PathBuf> {
    let path = env::current_dir()?;
    let mut current_path = Some(path.as_path());

    while let Some(p) = current_path {
        if p.join("Cargo.lock").is_file() || is_workspace_manifest(&p.join("Cargo.toml")) {
            return Ok(p.into());
        }
        current_path = p.parent();
    }

    Err(io::Error::new(ErrorKind::NotFound, "NotFound"))
}

fn is_workspace_manifest(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|s| s.lines().any(|l| l.trim() == "[workspace]"))
        .unwrap_or(false)
}

/// path of a fixture relative to the project root
pub fn fixture_path(relative: &str) -> io::Result<PathBuf> {
    let path = get_project_root()?.join(relative);
    if !path.exists() {
        return Err(io::Error::new(
            ErrorKind::NotFound,
            format!("fixture {} not found", path.display()),
        ));
    }
    Ok(path)
}

/// A throw-away root directory standing in for "/" in tests.
pub struct ScratchRoot {
    dir: TempDir,
}

impl ScratchRoot {
    /// create an empty root
    pub fn new() -> io::Result<Self> {
        Ok(ScratchRoot {
            dir: tempfile::Builder::new().prefix("appmaster-root").tempdir()?,
        })
    }

    /// the root path
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// join a path below the root, a leading '/' is ignored
    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative.trim_start_matches('/'))
    }

    /// write a file below the root, creating its parents
    pub fn write(&self, relative: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        Ok(path)
    }

    /// create a directory below the root
    pub fn mkdir(&self, relative: &str) -> io::Result<PathBuf> {
        let path = self.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_project_root() {
        let root = get_project_root().unwrap();
        assert!(root.join("Cargo.toml").is_file());
    }

    #[test]
    fn test_fixture_path() {
        assert!(fixture_path("Cargo.toml").is_ok());
        assert!(fixture_path("no/such/fixture").is_err());
    }

    #[test]
    fn test_scratch_root() {
        let root = ScratchRoot::new().unwrap();
        let path = root.write("/etc/systemd/system/a.service", "x").unwrap();
        assert_eq!(path, root.path().join("etc/systemd/system/a.service"));
        assert_eq!(fs::read_to_string(path).unwrap(), "x");
        assert!(root.mkdir("var/snap").unwrap().is_dir());
    }
}
