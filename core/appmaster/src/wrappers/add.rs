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

use super::{RollbackLedger, ServiceWrappers};
use appcore::validate::validate_app;
use appcore::{ApplicationDescriptor, Interacter, PackageInfo, Result};

impl ServiceWrappers {
    /// Write and enable the units of every service of `pkg`.
    ///
    /// Apps named in `disabled` get their unit written but stay disabled.
    /// On failure everything done by this call is undone and the first
    /// error is returned.
    pub fn add_services(
        &self,
        pkg: &PackageInfo,
        disabled: &[String],
        inter: &dyn Interacter,
    ) -> Result<()> {
        for name in disabled {
            match pkg.app(name) {
                None => log::info!(
                    "Disabled service {} of {} no longer exists",
                    name,
                    pkg.instance_name()
                ),
                Some(app) if !app.is_service() => log::info!(
                    "Disabled service {} of {} is no longer a service",
                    name,
                    pkg.instance_name()
                ),
                Some(_) => {}
            }
        }

        for app in pkg.services() {
            validate_app(app)?;
        }

        let mut ledger = RollbackLedger::new();
        for app in pkg.services() {
            if let Err(e) = self.add_service(pkg, app, disabled, &mut ledger) {
                log::error!(
                    "Failed to add service {}: {}, rolling back",
                    pkg.service_name(app),
                    e
                );
                ledger.rollback(&*self.sysd, inter);
                return Err(e);
            }
        }

        if !ledger.written().is_empty() {
            self.sysd.daemon_reload()?;
        }
        Ok(())
    }

    fn add_service(
        &self,
        pkg: &PackageInfo,
        app: &ApplicationDescriptor,
        disabled: &[String],
        ledger: &mut RollbackLedger,
    ) -> Result<()> {
        let content = service::generate_service_file(pkg, app, &self.dirs)?;
        self.write_unit(&self.dirs.service_file(pkg, app), &content, ledger)?;

        for (path, content) in socket::generate_socket_files(pkg, app, &self.dirs)? {
            self.write_unit(&path, &content, ledger)?;
        }

        if app.timer.is_some() {
            let content = self.generate_timer_file(pkg, app)?;
            self.write_unit(&self.dirs.timer_file(pkg, app), &content, ledger)?;
        }

        if app.is_activated() {
            for unit in self.activation_units(pkg, app) {
                self.sysd.enable(&unit)?;
                ledger.record_enabled(unit);
            }
            return Ok(());
        }

        if disabled.iter().any(|d| d == &app.name) {
            log::debug!("Leaving {} disabled", pkg.service_name(app));
            return Ok(());
        }

        let unit = pkg.service_name(app);
        self.sysd.enable(&unit)?;
        ledger.record_enabled(unit);
        Ok(())
    }
}
