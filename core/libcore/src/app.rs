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

//! Package and application descriptors.
//!
//! A [`PackageInfo`] owns its applications; every name derived for a unit
//! (`snap.<instance>.<app>.service` and friends) is computed from the pair.
use crate::error::*;
use basic::unit_name::unit_name_from_path;
use nix::sys::signal::Signal;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// One installed instance of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageInfo {
    /// package name
    pub name: String,
    /// instance key, empty for the main instance
    pub instance_key: String,
    /// installed revision
    pub revision: String,
    /// applications in declaration order
    pub apps: Vec<ApplicationDescriptor>,
}

impl PackageInfo {
    /// `<name>` or `<name>_<key>` for a parallel instance.
    pub fn instance_name(&self) -> String {
        if self.instance_key.is_empty() {
            self.name.clone()
        } else {
            format!("{}_{}", self.name, self.instance_key)
        }
    }

    /// Look an application up by name.
    pub fn app(&self, name: &str) -> Option<&ApplicationDescriptor> {
        self.apps.iter().find(|a| a.name == name)
    }

    /// Applications that are services, in declaration order.
    pub fn services(&self) -> impl Iterator<Item = &ApplicationDescriptor> {
        self.apps.iter().filter(|a| a.is_service())
    }

    /// Prefix shared by every unit of an application.
    pub fn security_tag(&self, app: &ApplicationDescriptor) -> String {
        format!(
            "{}.{}.{}",
            constants::UNIT_NAME_PREFIX,
            self.instance_name(),
            app.name
        )
    }

    /// Name of the service unit of an application.
    pub fn service_name(&self, app: &ApplicationDescriptor) -> String {
        format!("{}.service", self.security_tag(app))
    }

    /// Name of a socket unit of an application.
    pub fn socket_name(&self, app: &ApplicationDescriptor, socket: &str) -> String {
        format!("{}.{}.socket", self.security_tag(app), socket)
    }

    /// Name of the timer unit of an application.
    pub fn timer_name(&self, app: &ApplicationDescriptor) -> String {
        format!("{}.timer", self.security_tag(app))
    }

    /// Where the package is mounted, relative to the host root.
    pub fn mount_dir(&self) -> String {
        format!(
            "/{}/{}/{}",
            constants::PACKAGE_MOUNT_DIR,
            self.instance_name(),
            self.revision
        )
    }

    /// Name of the mount unit of the package.
    pub fn mount_unit(&self) -> String {
        unit_name_from_path(&self.mount_dir(), ".mount")
    }

    /// Per revision writable data directory.
    pub fn data_dir(&self) -> String {
        format!(
            "/{}/{}/{}",
            constants::PACKAGE_DATA_DIR,
            self.instance_name(),
            self.revision
        )
    }

    /// Data directory shared across revisions.
    pub fn common_data_dir(&self) -> String {
        format!(
            "/{}/{}/common",
            constants::PACKAGE_DATA_DIR,
            self.instance_name()
        )
    }

    /// Runtime directory of the package for the given user.
    pub fn user_runtime_dir(&self, uid: u32) -> String {
        format!(
            "/{}/{}/snap.{}",
            constants::USER_RUNTIME_DIR,
            uid,
            self.instance_name()
        )
    }

    /// `<instance>.<app>`, or only the instance when the app is named after
    /// the package.
    pub fn app_ref(&self, app: &ApplicationDescriptor) -> String {
        if app.name == self.name {
            self.instance_name()
        } else {
            format!("{}.{}", self.instance_name(), app.name)
        }
    }

    /// Map application names to service unit names, skipping names that
    /// are unknown or not services.
    pub fn service_names<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .filter_map(|n| self.app(n.as_ref()))
            .filter(|a| a.is_service())
            .map(|a| self.service_name(a))
            .collect()
    }
}

/// When the service manager restarts a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestartCondition {
    /// never
    Never,
    /// clean exit
    OnSuccess,
    /// unclean exit
    #[default]
    OnFailure,
    /// signal, timeout or watchdog
    OnAbnormal,
    /// uncaught signal
    OnAbort,
    /// watchdog timeout
    OnWatchdog,
    /// always
    Always,
}

impl fmt::Display for RestartCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RestartCondition::Never => "no",
            RestartCondition::OnSuccess => "on-success",
            RestartCondition::OnFailure => "on-failure",
            RestartCondition::OnAbnormal => "on-abnormal",
            RestartCondition::OnAbort => "on-abort",
            RestartCondition::OnWatchdog => "on-watchdog",
            RestartCondition::Always => "always",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for RestartCondition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let cond = match s {
            "no" | "never" => RestartCondition::Never,
            "on-success" => RestartCondition::OnSuccess,
            "on-failure" => RestartCondition::OnFailure,
            "on-abnormal" => RestartCondition::OnAbnormal,
            "on-abort" => RestartCondition::OnAbort,
            "on-watchdog" => RestartCondition::OnWatchdog,
            "always" => RestartCondition::Always,
            _ => {
                return Err(Error::Other {
                    msg: format!("invalid restart condition {:?}", s),
                })
            }
        };
        Ok(cond)
    }
}

/// How a service is stopped: which signal and whether the whole process
/// group receives it. The default stops the group with the manager's own
/// signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopMode {
    signal: Option<Signal>,
    all: bool,
}

impl Default for StopMode {
    fn default() -> Self {
        StopMode {
            signal: None,
            all: true,
        }
    }
}

impl StopMode {
    /// Build a stop mode from a signal and its scope.
    pub fn new(signal: Signal, all: bool) -> Self {
        StopMode {
            signal: Some(signal),
            all,
        }
    }

    /// Whether stop signals reach the whole process group.
    pub fn kill_all(&self) -> bool {
        self.all
    }

    /// Explicit stop signal, if any.
    pub fn kill_signal(&self) -> Option<Signal> {
        self.signal
    }
}

impl fmt::Display for StopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sig = match self.signal {
            None => return Ok(()),
            Some(sig) => sig.as_str().trim_start_matches("SIG").to_lowercase(),
        };
        if self.all {
            write!(f, "sig{}-all", sig)
        } else {
            write!(f, "sig{}", sig)
        }
    }
}

impl FromStr for StopMode {
    type Err = Error;

    /// Accepts `sigterm`, `sigterm-all`, `sighup`, `sighup-all`, `sigusr1`,
    /// `sigusr1-all`, `sigusr2`, `sigusr2-all` or the empty string.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(StopMode::default());
        }

        let (name, all) = match s.strip_suffix("-all") {
            Some(name) => (name, true),
            None => (s, false),
        };
        let signal = match name {
            "sigterm" => Signal::SIGTERM,
            "sighup" => Signal::SIGHUP,
            "sigusr1" => Signal::SIGUSR1,
            "sigusr2" => Signal::SIGUSR2,
            _ => {
                return Err(Error::Other {
                    msg: format!("invalid stop mode {:?}", s),
                })
            }
        };
        Ok(StopMode::new(signal, all))
    }
}

/// What happens to a running service while its package is refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshMode {
    /// stop it and start the new revision
    #[default]
    Restart,
    /// keep it running across the refresh
    Endure,
}

impl FromStr for RefreshMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" | "restart" => Ok(RefreshMode::Restart),
            "endure" => Ok(RefreshMode::Endure),
            _ => Err(Error::Other {
                msg: format!("invalid refresh mode {:?}", s),
            }),
        }
    }
}

/// A listening socket that activates its application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocketDescriptor {
    /// socket name, unique within the application
    pub name: String,
    /// address template, may contain `$SNAP_DATA`, `$SNAP_COMMON` or
    /// `$XDG_RUNTIME_DIR`
    pub listen_stream: String,
    /// file mode of a unix socket
    pub socket_mode: Option<u32>,
}

/// A timer that activates its application; the schedule text is parsed
/// only when the timer unit is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerDescriptor {
    /// raw schedule
    pub timer: String,
}

/// One runnable entity of a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationDescriptor {
    /// app name
    pub name: String,
    /// daemon kind, empty when the app is not a service
    pub daemon: String,
    /// main command, relative to the package
    pub command: String,
    /// optional stop command
    pub stop_command: Option<String>,
    /// optional reload command
    pub reload_command: Option<String>,
    /// optional post-stop command
    pub post_stop_command: Option<String>,
    /// restart policy, on-failure when unset
    pub restart_cond: Option<RestartCondition>,
    /// delay before a restart, zero when unset
    pub restart_delay: Duration,
    /// zero means the default stop timeout
    pub stop_timeout: Duration,
    /// zero means the manager default
    pub start_timeout: Duration,
    /// zero means no watchdog
    pub watchdog_timeout: Duration,
    /// bus name of a dbus daemon
    pub bus_name: String,
    /// stop signal and scope
    pub stop_mode: StopMode,
    /// behaviour across refreshes
    pub refresh_mode: RefreshMode,
    /// apps this one starts before
    pub before: Vec<String>,
    /// apps this one starts after
    pub after: Vec<String>,
    /// activation sockets by name
    pub sockets: BTreeMap<String, SocketDescriptor>,
    /// activation timer
    pub timer: Option<TimerDescriptor>,
}

impl ApplicationDescriptor {
    /// Services are the apps with a daemon kind.
    pub fn is_service(&self) -> bool {
        !self.daemon.is_empty()
    }

    /// Whether the service is activated by sockets or a timer rather than
    /// at boot.
    pub fn is_activated(&self) -> bool {
        !self.sockets.is_empty() || self.timer.is_some()
    }

    /// Restart policy with the default applied.
    pub fn restart(&self) -> RestartCondition {
        self.restart_cond.unwrap_or_default()
    }
}
