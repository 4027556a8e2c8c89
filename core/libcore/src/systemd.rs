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

//! Interface to the external service manager.
use crate::error::Result;
use nix::sys::signal::Signal;
use std::fmt;
use std::time::Duration;

/// Which processes of a unit a signal reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillWho {
    /// the manager's default, the main process
    Default,
    /// every process of the unit
    All,
}

impl fmt::Display for KillWho {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KillWho::Default => write!(f, "main"),
            KillWho::All => write!(f, "all"),
        }
    }
}

/// Synchronous calls into the service manager. Each call returns once the
/// manager settled the request or the call ran out of time; `stop` reports
/// the latter as [`crate::Error::Timeout`].
pub trait ServiceManager {
    /// start a unit
    fn start(&self, unit: &str, timeout: Duration) -> Result<()>;

    /// stop a unit and wait for it to go down
    fn stop(&self, unit: &str, timeout: Duration) -> Result<()>;

    /// send a signal to the processes of a unit
    fn kill(&self, unit: &str, signal: Signal, who: KillWho) -> Result<()>;

    /// enable a unit for its install target
    fn enable(&self, unit: &str) -> Result<()>;

    /// disable a unit
    fn disable(&self, unit: &str) -> Result<()>;

    /// whether a unit is enabled
    fn is_enabled(&self, unit: &str) -> Result<bool>;

    /// re-read unit files from disk
    fn daemon_reload(&self) -> Result<()>;
}
