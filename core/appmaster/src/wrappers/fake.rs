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

//! Recording service manager and observer for the orchestrator tests.
use super::ServiceWrappers;
use appcore::{
    ApplicationDescriptor, Dirs, Error, Interacter, KillWho, PackageInfo, Result, ServiceManager,
    SocketDescriptor, TimerDescriptor,
};
use libtests::ScratchRoot;
use nix::sys::signal::Signal;
use rand::rngs::mock::StepRng;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    Error,
    Timeout,
}

/// Service manager keeping an enabled set and a call log such as
/// "enable a.service" or "kill a.service SIGTERM all".
#[derive(Debug, Default)]
pub(crate) struct FakeSystemd {
    calls: RefCell<Vec<String>>,
    enabled: RefCell<HashSet<String>>,
    failures: RefCell<HashMap<(String, String), Failure>>,
}

impl FakeSystemd {
    pub(crate) fn new() -> Self {
        FakeSystemd::default()
    }

    /// make `op` on `unit` fail; "daemon-reload" takes an empty unit
    pub(crate) fn fail_on(&self, op: &str, unit: &str) {
        self.failures
            .borrow_mut()
            .insert((op.to_string(), unit.to_string()), Failure::Error);
    }

    /// make `op` on `unit` time out
    pub(crate) fn timeout_on(&self, op: &str, unit: &str) {
        self.failures
            .borrow_mut()
            .insert((op.to_string(), unit.to_string()), Failure::Timeout);
    }

    pub(crate) fn set_enabled(&self, unit: &str) {
        self.enabled.borrow_mut().insert(unit.to_string());
    }

    pub(crate) fn enabled(&self, unit: &str) -> bool {
        self.enabled.borrow().contains(unit)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// calls starting with `op `
    pub(crate) fn calls_of(&self, op: &str) -> Vec<String> {
        let prefix = format!("{} ", op);
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(&prefix))
            .cloned()
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, op: &str, unit: &str, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        match self
            .failures
            .borrow()
            .get(&(op.to_string(), unit.to_string()))
        {
            Some(Failure::Error) => Err(Error::Manager {
                unit: unit.to_string(),
                op: op.to_string(),
                msg: "injected failure".to_string(),
            }),
            Some(Failure::Timeout) => Err(Error::Timeout {
                unit: unit.to_string(),
                op: op.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl ServiceManager for FakeSystemd {
    fn start(&self, unit: &str, _timeout: Duration) -> Result<()> {
        self.record("start", unit, format!("start {}", unit))
    }

    fn stop(&self, unit: &str, _timeout: Duration) -> Result<()> {
        self.record("stop", unit, format!("stop {}", unit))
    }

    fn kill(&self, unit: &str, signal: Signal, who: KillWho) -> Result<()> {
        self.record("kill", unit, format!("kill {} {} {}", unit, signal.as_str(), who))
    }

    fn enable(&self, unit: &str) -> Result<()> {
        self.record("enable", unit, format!("enable {}", unit))?;
        self.enabled.borrow_mut().insert(unit.to_string());
        Ok(())
    }

    fn disable(&self, unit: &str) -> Result<()> {
        self.record("disable", unit, format!("disable {}", unit))?;
        self.enabled.borrow_mut().remove(unit);
        Ok(())
    }

    fn is_enabled(&self, unit: &str) -> Result<bool> {
        self.record("is-enabled", unit, format!("is-enabled {}", unit))?;
        Ok(self.enabled(unit))
    }

    fn daemon_reload(&self) -> Result<()> {
        self.record("daemon-reload", "", "daemon-reload".to_string())
    }
}

/// Observer collecting every message.
#[derive(Debug, Default)]
pub(crate) struct FakeInteracter {
    messages: RefCell<Vec<String>>,
}

impl FakeInteracter {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Interacter for FakeInteracter {
    fn notify(&self, msg: &str) {
        self.messages.borrow_mut().push(msg.to_string());
    }
}

/// Test package "hello" revision 1.
pub(crate) fn package(apps: Vec<ApplicationDescriptor>) -> PackageInfo {
    PackageInfo {
        name: "hello".to_string(),
        instance_key: String::new(),
        revision: "1".to_string(),
        apps,
    }
}

pub(crate) fn simple(name: &str) -> ApplicationDescriptor {
    ApplicationDescriptor {
        name: name.to_string(),
        daemon: "simple".to_string(),
        command: format!("bin/{}", name),
        ..Default::default()
    }
}

pub(crate) fn with_socket(mut app: ApplicationDescriptor, socket: &str) -> ApplicationDescriptor {
    app.sockets.insert(
        socket.to_string(),
        SocketDescriptor {
            name: socket.to_string(),
            listen_stream: format!("$SNAP_DATA/{}.sock", socket),
            socket_mode: None,
        },
    );
    app
}

pub(crate) fn with_timer(mut app: ApplicationDescriptor, timer: &str) -> ApplicationDescriptor {
    app.timer = Some(TimerDescriptor {
        timer: timer.to_string(),
    });
    app
}

/// Wrappers over a scratch root with no grace interval and a fixed random
/// source.
pub(crate) fn wrappers(root: &ScratchRoot, sysd: &Rc<FakeSystemd>) -> ServiceWrappers {
    let sysd: Rc<dyn ServiceManager> = sysd.clone();
    ServiceWrappers::new(sysd, Dirs::new(root.path(), "/usr/bin/snap"))
        .with_kill_wait(Duration::ZERO)
        .with_rng(Box::new(StepRng::new(0, 0)))
}
