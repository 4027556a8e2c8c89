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
use appcore::{ApplicationDescriptor, Interacter, PackageInfo, Result};

/// An app the current start call touched, with the activation units it
/// enabled.
type Started<'a> = (&'a ApplicationDescriptor, Vec<String>);

impl ServiceWrappers {
    /// Start the services among `apps`, in the given order.
    ///
    /// Socket and timer units are enabled and started right away. Plain
    /// services are started afterwards one by one, and only when they are
    /// enabled. On failure every app touched so far is stopped again and
    /// its activation units disabled.
    pub fn start_services(
        &self,
        pkg: &PackageInfo,
        apps: &[&ApplicationDescriptor],
        inter: &dyn Interacter,
    ) -> Result<()> {
        let mut started: Vec<Started> = Vec::new();
        let ret = self.start_in_order(pkg, apps, &mut started);
        if let Err(e) = &ret {
            log::error!("Failed to start services of {}: {}", pkg.instance_name(), e);
            for (app, enabled) in started.iter().rev() {
                if let Err(e) = self.stop_service(pkg, app, inter) {
                    inter.notify(&format!(
                        "while trying to stop {} due to previous failure: {}",
                        pkg.service_name(app),
                        e
                    ));
                }
                for unit in enabled {
                    if let Err(e) = self.sysd.disable(unit) {
                        inter.notify(&format!(
                            "while trying to disable {} due to previous failure: {}",
                            unit, e
                        ));
                    }
                }
            }
        }
        ret
    }

    fn start_in_order<'a>(
        &self,
        pkg: &PackageInfo,
        apps: &[&'a ApplicationDescriptor],
        started: &mut Vec<Started<'a>>,
    ) -> Result<()> {
        let mut plain = Vec::new();
        for app in apps.iter().copied().filter(|a| a.is_service()) {
            started.push((app, Vec::new()));

            if app.is_activated() {
                for unit in self.activation_units(pkg, app) {
                    self.sysd.enable(&unit)?;
                    if let Some((_, enabled)) = started.last_mut() {
                        enabled.push(unit.clone());
                    }
                    self.sysd.start(&unit, self.start_timeout(app))?;
                }
                continue;
            }

            let unit = pkg.service_name(app);
            if self.sysd.is_enabled(&unit)? {
                plain.push((app, unit));
            }
        }

        // one at a time, batched jobs lose the order
        for (app, unit) in plain {
            log::debug!("Starting {}", unit);
            self.sysd.start(&unit, self.start_timeout(app))?;
        }
        Ok(())
    }
}
