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

use super::ServiceWrappers;
use appcore::{Error, Interacter, PackageInfo, Result};
use basic::fs_util::{file_exists, remove_file_if_exists};
use std::path::Path;

fn remove_unit_file(path: &Path) -> Result<()> {
    remove_file_if_exists(path).map_err(|source| Error::Remove {
        path: path.to_path_buf(),
        source,
    })
}

impl ServiceWrappers {
    /// Disable and delete the units of every installed service of `pkg`.
    ///
    /// Socket and timer cleanup failures are reported and skipped; failing
    /// to disable a service aborts. Removing an already removed package
    /// does nothing.
    pub fn remove_services(&self, pkg: &PackageInfo, inter: &dyn Interacter) -> Result<()> {
        let mut removed = false;
        for app in pkg.services() {
            let service_file = self.dirs.service_file(pkg, app);
            if !file_exists(&service_file) {
                continue;
            }
            removed = true;

            let mut activation: Vec<(String, _)> = app
                .sockets
                .keys()
                .map(|s| (pkg.socket_name(app, s), self.dirs.socket_file(pkg, app, s)))
                .collect();
            if app.timer.is_some() {
                activation.push((pkg.timer_name(app), self.dirs.timer_file(pkg, app)));
            }
            for (unit, path) in activation {
                if let Err(e) = self.sysd.disable(&unit) {
                    inter.notify(&format!("while trying to disable {}: {}", unit, e));
                }
                if let Err(e) = remove_unit_file(&path) {
                    log::warn!("{}", e);
                }
            }

            let service = pkg.service_name(app);
            self.sysd.disable(&service)?;
            if let Err(e) = remove_unit_file(&service_file) {
                log::warn!("{}", e);
            }
            log::debug!("Removed {}", service);
        }

        if removed {
            self.sysd.daemon_reload()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::wrappers::fake::*;
    use appcore::Error;
    use libtests::ScratchRoot;
    use std::rc::Rc;

    #[test]
    fn test_remove_services() {
        let root = ScratchRoot::new().unwrap();
        let sysd = Rc::new(FakeSystemd::new());
        let wrappers = wrappers(&root, &sysd);
        let pkg = package(vec![
            with_timer(with_socket(simple("a"), "http"), "mon,10:00"),
            simple("b"),
        ]);
        let inter = FakeInteracter::default();
        wrappers.add_services(&pkg, &[], &inter).unwrap();
        sysd.clear();

        wrappers.remove_services(&pkg, &inter).unwrap();
        assert_eq!(
            sysd.calls(),
            vec![
                "disable snap.hello.a.http.socket",
                "disable snap.hello.a.timer",
                "disable snap.hello.a.service",
                "disable snap.hello.b.service",
                "daemon-reload",
            ]
        );
        let units = root.join("etc/systemd/system");
        assert_eq!(std::fs::read_dir(&units).unwrap().count(), 0);

        // second time around there is nothing left
        sysd.clear();
        wrappers.remove_services(&pkg, &inter).unwrap();
        assert!(sysd.calls().is_empty());
        assert!(inter.messages().is_empty());
    }

    #[test]
    fn test_remove_tolerates_activation_failures() {
        let root = ScratchRoot::new().unwrap();
        let sysd = Rc::new(FakeSystemd::new());
        let wrappers = wrappers(&root, &sysd);
        let pkg = package(vec![with_socket(simple("a"), "http")]);
        let inter = FakeInteracter::default();
        wrappers.add_services(&pkg, &[], &inter).unwrap();
        sysd.fail_on("disable", "snap.hello.a.http.socket");
        // already gone
        std::fs::remove_file(root.join("etc/systemd/system/snap.hello.a.http.socket")).unwrap();

        wrappers.remove_services(&pkg, &inter).unwrap();
        assert_eq!(inter.messages().len(), 1);
        assert!(!root
            .join("etc/systemd/system/snap.hello.a.service")
            .exists());
    }

    #[test]
    fn test_remove_service_disable_failure_is_fatal() {
        let root = ScratchRoot::new().unwrap();
        let sysd = Rc::new(FakeSystemd::new());
        let wrappers = wrappers(&root, &sysd);
        let pkg = package(vec![simple("a"), simple("b")]);
        wrappers
            .add_services(&pkg, &[], &FakeInteracter::default())
            .unwrap();
        sysd.clear();
        sysd.fail_on("disable", "snap.hello.a.service");

        let err = wrappers
            .remove_services(&pkg, &FakeInteracter::default())
            .unwrap_err();
        assert!(matches!(err, Error::Manager { .. }));
        assert_eq!(sysd.calls(), vec!["disable snap.hello.a.service"]);
        assert!(root
            .join("etc/systemd/system/snap.hello.a.service")
            .exists());
    }
}
