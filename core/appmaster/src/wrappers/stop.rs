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
use appcore::{
    ApplicationDescriptor, Error, Interacter, KillWho, PackageInfo, RefreshMode, Result,
};
use basic::fs_util::file_exists;
use std::fmt;
use std::str::FromStr;

/// Why services are being stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// plain stop
    #[default]
    Other,
    /// the package is being refreshed
    Refresh,
    /// the package is being removed
    Remove,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::Other => "other",
            StopReason::Refresh => "refresh",
            StopReason::Remove => "remove",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for StopReason {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "other" => Ok(StopReason::Other),
            "refresh" => Ok(StopReason::Refresh),
            "remove" => Ok(StopReason::Remove),
            _ => Err(Error::Other {
                msg: format!("invalid stop reason {:?}", s),
            }),
        }
    }
}

impl ServiceWrappers {
    /// Stop the services among `apps` in order, stopping at the first
    /// failure.
    ///
    /// Apps without a unit file are skipped, and so are enduring apps on
    /// refresh. On removal the process group of apps not stopped as a
    /// whole is terminated after the stop regardless of its outcome.
    pub fn stop_services(
        &self,
        pkg: &PackageInfo,
        apps: &[&ApplicationDescriptor],
        reason: StopReason,
        inter: &dyn Interacter,
    ) -> Result<()> {
        for app in apps.iter().copied() {
            if !app.is_service() || !file_exists(&self.dirs.service_file(pkg, app)) {
                continue;
            }
            if reason == StopReason::Refresh && app.refresh_mode == RefreshMode::Endure {
                log::debug!("{} endures the refresh", pkg.service_name(app));
                continue;
            }

            let ret = self.stop_service(pkg, app, inter);
            if reason == StopReason::Remove && !app.stop_mode.kill_all() {
                self.terminate(&pkg.service_name(app), KillWho::All);
            }
            ret?;
        }
        Ok(())
    }
}
