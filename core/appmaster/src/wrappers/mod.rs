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

//! Lifecycle of the service units of a package.
//!
//! [`ServiceWrappers`] renders units, writes them below the configured root
//! and drives the service manager through add, start, stop and remove.
//! Every operation is sequential; a failed add or start walks back what the
//! call already did before returning the original error.
mod add;
mod ledger;
mod remove;
mod start;
mod state;
mod stop;

#[cfg(test)]
pub(crate) mod fake;

pub use ledger::RollbackLedger;
pub use stop::StopReason;

use crate::config::ManagerConfig;
use appcore::grace::{GraceCanceller, GraceTimer};
use appcore::{
    ApplicationDescriptor, Dirs, Error, Interacter, KillWho, PackageInfo, Result, ServiceManager,
};
use basic::fs_util::{atomic_write_file, mkdir_parents};
use nix::sys::signal::Signal;
use rand::RngCore;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

/// Drives the units of packages through the service manager.
pub struct ServiceWrappers {
    sysd: Rc<dyn ServiceManager>,
    dirs: Dirs,
    default_stop_timeout: Duration,
    start_timeout: Duration,
    kill_wait: Duration,
    grace: GraceTimer,
    rng: RefCell<Box<dyn RngCore>>,
}

impl ServiceWrappers {
    /// New wrappers with the built in timeouts.
    pub fn new(sysd: Rc<dyn ServiceManager>, dirs: Dirs) -> Self {
        ServiceWrappers {
            sysd,
            dirs,
            default_stop_timeout: Duration::from_secs(constants::DEFAULT_STOP_TIMEOUT_SEC),
            start_timeout: Duration::from_secs(constants::DEFAULT_START_TIMEOUT_SEC),
            kill_wait: Duration::from_secs(constants::KILL_WAIT_SEC),
            grace: GraceTimer::new(),
            rng: RefCell::new(Box::new(rand::thread_rng())),
        }
    }

    /// New wrappers configured by the manager config.
    pub fn from_config(sysd: Rc<dyn ServiceManager>, config: &ManagerConfig) -> Self {
        let dirs = Dirs::new(&config.RootDir, &config.LauncherPath);
        ServiceWrappers::new(sysd, dirs)
            .with_stop_timeout(config.default_stop_timeout())
            .with_start_timeout(config.default_start_timeout())
            .with_kill_wait(config.kill_wait())
    }

    /// Stop timeout of apps without their own.
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.default_stop_timeout = timeout;
        self
    }

    /// Start timeout of apps without their own.
    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = timeout;
        self
    }

    /// Grace interval between TERM and KILL.
    pub fn with_kill_wait(mut self, wait: Duration) -> Self {
        self.kill_wait = wait;
        self
    }

    /// Random source of spread timer windows.
    pub fn with_rng(self, rng: Box<dyn RngCore>) -> Self {
        *self.rng.borrow_mut() = rng;
        self
    }

    /// unit layout
    pub fn dirs(&self) -> &Dirs {
        &self.dirs
    }

    /// Handle cutting a pending grace interval short.
    pub fn grace_canceller(&self) -> GraceCanceller {
        self.grace.canceller()
    }

    /// Render the timer unit of an app with the configured random source.
    pub fn generate_timer_file(
        &self,
        pkg: &PackageInfo,
        app: &ApplicationDescriptor,
    ) -> Result<Vec<u8>> {
        let mut rng = self.rng.borrow_mut();
        timer::generate_timer_file(pkg, app, &mut **rng)
    }

    fn stop_timeout(&self, app: &ApplicationDescriptor) -> Duration {
        if app.stop_timeout.is_zero() {
            self.default_stop_timeout
        } else {
            app.stop_timeout
        }
    }

    fn start_timeout(&self, app: &ApplicationDescriptor) -> Duration {
        if app.start_timeout.is_zero() {
            self.start_timeout
        } else {
            app.start_timeout
        }
    }

    /// socket and timer units of an app
    fn activation_units(&self, pkg: &PackageInfo, app: &ApplicationDescriptor) -> Vec<String> {
        let mut units: Vec<String> = app
            .sockets
            .keys()
            .map(|s| pkg.socket_name(app, s))
            .collect();
        if app.timer.is_some() {
            units.push(pkg.timer_name(app));
        }
        units
    }

    fn write_unit(&self, path: &Path, content: &[u8], ledger: &mut RollbackLedger) -> Result<()> {
        let write = || -> basic::Result<()> {
            mkdir_parents(path, constants::UNIT_DIR_MODE)?;
            atomic_write_file(path, content, constants::UNIT_FILE_MODE)
        };
        write().map_err(|source| Error::Write {
            path: PathBuf::from(path),
            source,
        })?;
        log::debug!("Wrote unit file {:?}", path);
        ledger.record_written(path.to_path_buf());
        Ok(())
    }

    /// TERM, grace interval, KILL. Failures change nothing at this point
    /// and are only logged.
    fn terminate(&self, unit: &str, term_who: KillWho) {
        if let Err(e) = self.sysd.kill(unit, Signal::SIGTERM, term_who) {
            log::debug!("Failed to send SIGTERM to {}: {}", unit, e);
        }
        if !self.grace.wait(self.kill_wait) {
            log::debug!("Grace interval of {} cancelled", unit);
        }
        if let Err(e) = self.sysd.kill(unit, Signal::SIGKILL, KillWho::All) {
            log::debug!("Failed to send SIGKILL to {}: {}", unit, e);
        }
    }

    /// Stop the activation units of an app, then the service itself,
    /// escalating to signals when the service does not stop in time.
    fn stop_service(
        &self,
        pkg: &PackageInfo,
        app: &ApplicationDescriptor,
        inter: &dyn Interacter,
    ) -> Result<()> {
        let service = pkg.service_name(app);
        let timeout = self.stop_timeout(app);

        let mut stop_errors = Vec::new();
        for unit in self.activation_units(pkg, app) {
            if let Err(e) = self.sysd.stop(&unit, timeout) {
                stop_errors.push(e);
            }
        }

        if let Err(e) = self.sysd.stop(&service, timeout) {
            if !e.is_timeout() {
                return Err(e);
            }
            inter.notify(&format!("{} refused to stop, killing.", service));
            self.terminate(&service, KillWho::Default);
        }

        match stop_errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
