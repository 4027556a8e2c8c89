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

//! Host directory layout of generated units.
use crate::app::{ApplicationDescriptor, PackageInfo};
use std::path::{Path, PathBuf};

/// Where unit files live under a root and which launcher the units run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dirs {
    root: PathBuf,
    launcher: String,
}

impl Default for Dirs {
    fn default() -> Self {
        Dirs::new("/", constants::LAUNCHER_PATH)
    }
}

impl Dirs {
    /// New layout below `root`.
    pub fn new(root: impl Into<PathBuf>, launcher: &str) -> Self {
        Dirs {
            root: root.into(),
            launcher: launcher.to_string(),
        }
    }

    /// host root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the layout targets the running system.
    pub fn is_host_root(&self) -> bool {
        self.root == Path::new("/")
    }

    /// Directory holding system unit files.
    pub fn units_dir(&self) -> PathBuf {
        self.root.join(constants::SYSTEM_UNIT_DIR)
    }

    /// Path of a unit file by unit name.
    pub fn unit_path(&self, unit: &str) -> PathBuf {
        self.units_dir().join(unit)
    }

    /// Service unit file of an application.
    pub fn service_file(&self, pkg: &PackageInfo, app: &ApplicationDescriptor) -> PathBuf {
        self.unit_path(&pkg.service_name(app))
    }

    /// Socket unit file of an application.
    pub fn socket_file(
        &self,
        pkg: &PackageInfo,
        app: &ApplicationDescriptor,
        socket: &str,
    ) -> PathBuf {
        self.unit_path(&pkg.socket_name(app, socket))
    }

    /// Timer unit file of an application.
    pub fn timer_file(&self, pkg: &PackageInfo, app: &ApplicationDescriptor) -> PathBuf {
        self.unit_path(&pkg.timer_name(app))
    }

    /// Command line running an application, or one of its hooks such as
    /// `stop` or `reload`.
    pub fn launcher_command(
        &self,
        pkg: &PackageInfo,
        app: &ApplicationDescriptor,
        hook: Option<&str>,
    ) -> String {
        match hook {
            None => format!("{} run {}", self.launcher, pkg.app_ref(app)),
            Some(hook) => format!(
                "{} run --command={} {}",
                self.launcher,
                hook,
                pkg.app_ref(app)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let pkg = PackageInfo {
            name: "hello".to_string(),
            revision: "1".to_string(),
            ..Default::default()
        };
        let app = ApplicationDescriptor {
            name: "svc".to_string(),
            daemon: "simple".to_string(),
            ..Default::default()
        };

        let dirs = Dirs::new("/tmp/root", "/usr/bin/snap");
        assert!(!dirs.is_host_root());
        assert_eq!(
            dirs.service_file(&pkg, &app),
            PathBuf::from("/tmp/root/etc/systemd/system/snap.hello.svc.service")
        );
        assert_eq!(
            dirs.socket_file(&pkg, &app, "web"),
            PathBuf::from("/tmp/root/etc/systemd/system/snap.hello.svc.web.socket")
        );
        assert_eq!(
            dirs.timer_file(&pkg, &app),
            PathBuf::from("/tmp/root/etc/systemd/system/snap.hello.svc.timer")
        );
        assert_eq!(
            dirs.launcher_command(&pkg, &app, None),
            "/usr/bin/snap run hello.svc"
        );
        assert_eq!(
            dirs.launcher_command(&pkg, &app, Some("stop")),
            "/usr/bin/snap run --command=stop hello.svc"
        );
        assert!(Dirs::default().is_host_root());
    }
}
