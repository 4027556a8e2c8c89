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

//! the utils of the file operation
use crate::error::*;
use rand::Rng;
use std::fs::{self, DirBuilder, OpenOptions, Permissions};
use std::io::{ErrorKind, Write};
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

/// Whether something exists at the path, symlinks are followed
pub fn file_exists(path: &Path) -> bool {
    fs::metadata(path).is_ok()
}

/// create the parent directories of path with mode
pub fn mkdir_parents(path: &Path, mode: u32) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Ok(()),
    };

    DirBuilder::new()
        .recursive(true)
        .mode(mode)
        .create(parent)
        .context(IoSnafu)
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(format!(".{:08x}~", rand::thread_rng().gen::<u32>()));
    PathBuf::from(name)
}

/// Write content to path atomically.
///
/// The content is written to a temporary file next to the target, synced
/// and renamed over the target, so readers see either the old or the new
/// file but never a partial one. The final file gets exactly `mode`,
/// regardless of the umask.
pub fn atomic_write_file(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    let tmp = temporary_path(path);

    let ret = write_and_rename(&tmp, path, content, mode);
    if ret.is_err() {
        if let Err(e) = fs::remove_file(&tmp) {
            if e.kind() != ErrorKind::NotFound {
                log::debug!("Failed to clean up {:?}: {}", tmp, e);
            }
        }
    }
    ret
}

fn write_and_rename(tmp: &Path, path: &Path, content: &[u8], mode: u32) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(mode)
        .open(tmp)
        .context(IoSnafu)?;

    file.write_all(content).context(IoSnafu)?;
    file.set_permissions(Permissions::from_mode(mode))
        .context(IoSnafu)?;
    file.sync_all().context(IoSnafu)?;
    drop(file);

    fs::rename(tmp, path).context(IoSnafu)
}

/// Remove the file, a file that is already gone is not an error
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Io { source: e }),
    }
}
