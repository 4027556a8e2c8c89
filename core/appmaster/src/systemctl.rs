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

//! [`ServiceManager`] backed by the `systemctl` client.
use appcore::{Dirs, Error, KillWho, Result, ServiceManager};
use nix::sys::signal::Signal;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use wait_timeout::ChildExt;

/// Interval between two polls of the state of a stopping unit.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Output of one finished systemctl call.
#[derive(Debug)]
struct Output {
    code: i32,
    stdout: String,
    stderr: String,
}

/// Read a child pipe to its end on its own thread, so a chatty child never
/// blocks on a full pipe while it is waited for.
fn drain<R: Read + Send + 'static>(
    pipe: Option<R>,
    pid: u32,
    what: &'static str,
) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut p) = pipe {
            if let Err(e) = p.read_to_string(&mut buf) {
                log::warn!("Failed to read {} of child process {}: {}", what, pid, e);
            }
        }
        buf
    })
}

fn collect(reader: thread::JoinHandle<String>) -> String {
    reader.join().unwrap_or_default()
}

/// Runs `systemctl` for every call, each with a deadline.
#[derive(Debug, Clone)]
pub struct Systemctl {
    path: PathBuf,
    dirs: Dirs,
    timeout: Duration,
}

impl Systemctl {
    /// `path` is the systemctl binary, `dirs` the layout whose root unit
    /// files are enabled in, `timeout` the deadline of calls without their
    /// own.
    pub fn new(path: impl Into<PathBuf>, dirs: &Dirs, timeout: Duration) -> Self {
        Systemctl {
            path: path.into(),
            dirs: dirs.clone(),
            timeout,
        }
    }

    fn root_args(&self) -> Vec<String> {
        if self.dirs.is_host_root() {
            Vec::new()
        } else {
            vec![
                "--root".to_string(),
                self.dirs.root().to_string_lossy().to_string(),
            ]
        }
    }

    fn spawn(&self, args: &[String]) -> Result<Child> {
        log::debug!("Running {:?} {}", self.path, args.join(" "));
        Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Manager {
                unit: args.last().cloned().unwrap_or_default(),
                op: args.first().cloned().unwrap_or_default(),
                msg: format!("failed to spawn {:?}: {}", self.path, e),
            })
    }

    /// Run one call, `op` and `unit` name it in errors.
    fn run(&self, op: &str, unit: &str, args: Vec<String>, deadline: Duration) -> Result<Output> {
        let mut child = self.spawn(&args)?;
        let pid = child.id();
        let stdout = drain(child.stdout.take(), pid, "stdout");
        let stderr = drain(child.stderr.take(), pid, "stderr");

        let status = match child.wait_timeout(deadline) {
            Ok(status) => status,
            Err(e) => {
                if let Err(e) = child.kill() {
                    log::warn!("Failed to kill child process {}: {}", pid, e);
                }
                let _ = child.wait();
                return Err(Error::Manager {
                    unit: unit.to_string(),
                    op: op.to_string(),
                    msg: format!("failed to wait for child process {}: {}", pid, e),
                });
            }
        };

        match status {
            Some(status) => {
                let out = Output {
                    code: status.code().unwrap_or(-1),
                    stdout: collect(stdout),
                    stderr: collect(stderr),
                };
                log::debug!("Process {} exited with {:?}", pid, out);
                Ok(out)
            }
            None => {
                if let Err(e) = child.kill() {
                    log::warn!("Failed to kill child process {}: {}", pid, e);
                }
                let _ = child.wait();
                Err(Error::Timeout {
                    unit: unit.to_string(),
                    op: op.to_string(),
                })
            }
        }
    }

    /// Run a call that must exit 0.
    fn run_ok(&self, op: &str, unit: &str, args: Vec<String>, deadline: Duration) -> Result<Output> {
        let out = self.run(op, unit, args, deadline)?;
        if out.code != 0 {
            return Err(Error::Manager {
                unit: unit.to_string(),
                op: op.to_string(),
                msg: format!("exit status {}: {}", out.code, out.stderr.trim()),
            });
        }
        Ok(out)
    }

    fn unit_args(&self, with_root: bool, op: &str, extra: &[&str], unit: &str) -> Vec<String> {
        let mut args = if with_root {
            self.root_args()
        } else {
            Vec::new()
        };
        args.push(op.to_string());
        args.extend(extra.iter().map(|s| s.to_string()));
        args.push(unit.to_string());
        args
    }

    fn active_state(&self, unit: &str, deadline: Duration) -> Result<String> {
        let args = self.unit_args(false, "show", &["--property=ActiveState"], unit);
        let out = self.run_ok("show", unit, args, deadline)?;
        Ok(out
            .stdout
            .trim()
            .trim_start_matches("ActiveState=")
            .to_string())
    }
}

impl ServiceManager for Systemctl {
    fn start(&self, unit: &str, timeout: Duration) -> Result<()> {
        let args = self.unit_args(false, "start", &[], unit);
        self.run_ok("start", unit, args, timeout).map(|_| ())
    }

    fn stop(&self, unit: &str, timeout: Duration) -> Result<()> {
        let begin = Instant::now();
        let args = self.unit_args(false, "stop", &["--no-block"], unit);
        self.run_ok("stop", unit, args, timeout)?;

        loop {
            let left = timeout.saturating_sub(begin.elapsed());
            if left.is_zero() {
                break;
            }
            match self.active_state(unit, left) {
                Ok(state) if state == "inactive" || state == "failed" => return Ok(()),
                Ok(state) => log::debug!("{} is {}, waiting", unit, state),
                Err(e) if e.is_timeout() => break,
                Err(e) => return Err(e),
            }
            thread::sleep(STOP_POLL_INTERVAL.min(timeout.saturating_sub(begin.elapsed())));
        }

        Err(Error::Timeout {
            unit: unit.to_string(),
            op: "stop".to_string(),
        })
    }

    fn kill(&self, unit: &str, signal: Signal, who: KillWho) -> Result<()> {
        let sig = format!("--signal={}", signal.as_str());
        let who = format!("--kill-who={}", who);
        let args = self.unit_args(false, "kill", &[&sig, &who], unit);
        self.run_ok("kill", unit, args, self.timeout).map(|_| ())
    }

    fn enable(&self, unit: &str) -> Result<()> {
        let args = self.unit_args(true, "enable", &[], unit);
        self.run_ok("enable", unit, args, self.timeout).map(|_| ())
    }

    fn disable(&self, unit: &str) -> Result<()> {
        let args = self.unit_args(true, "disable", &[], unit);
        self.run_ok("disable", unit, args, self.timeout).map(|_| ())
    }

    fn is_enabled(&self, unit: &str) -> Result<bool> {
        let args = self.unit_args(true, "is-enabled", &[], unit);
        let out = self.run("is-enabled", unit, args, self.timeout)?;
        if out.code == 0 {
            return Ok(true);
        }
        // disabled, static, masked, ... all print their state
        if !out.stdout.trim().is_empty() {
            return Ok(false);
        }
        Err(Error::Manager {
            unit: unit.to_string(),
            op: "is-enabled".to_string(),
            msg: format!("exit status {}: {}", out.code, out.stderr.trim()),
        })
    }

    fn daemon_reload(&self) -> Result<()> {
        if !self.dirs.is_host_root() {
            // unit files of another root are not loaded by the running manager
            return Ok(());
        }
        let args = vec!["daemon-reload".to_string()];
        self.run_ok("daemon-reload", "", args, self.timeout)
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    const FAKE_SYSTEMCTL: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls"
case "$*" in
    *is-enabled*disabled.service) echo disabled; exit 1 ;;
    *is-enabled*enabled.service) echo enabled; exit 0 ;;
    *is-enabled*) echo "No such file" >&2; exit 1 ;;
    *show*slow.service) echo ActiveState=deactivating ;;
    *show*) echo ActiveState=inactive ;;
    *start*hang.service) sleep 5 ;;
    *start*broken.service) echo "Job failed" >&2; exit 1 ;;
    *start*chatty.service) head -c 200000 /dev/zero | tr '\0' x; head -c 200000 /dev/zero | tr '\0' y >&2 ;;
esac
exit 0
"#;

    #[test]
    fn test_systemctl_calls() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("systemctl");
        fs::write(&script, FAKE_SYSTEMCTL).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let calls = || fs::read_to_string(dir.path().join("calls")).unwrap_or_default();

        let sysd = Systemctl::new(&script, &Dirs::default(), Duration::from_secs(5));
        sysd.enable("a.service").unwrap();
        sysd.disable("a.service").unwrap();
        sysd.start("a.service", Duration::from_secs(5)).unwrap();
        sysd.kill("a.service", Signal::SIGTERM, KillWho::All).unwrap();
        sysd.daemon_reload().unwrap();
        assert_eq!(
            calls(),
            "enable a.service\n\
             disable a.service\n\
             start a.service\n\
             kill --signal=SIGTERM --kill-who=all a.service\n\
             daemon-reload\n"
        );

        assert!(sysd.is_enabled("enabled.service").unwrap());
        assert!(!sysd.is_enabled("disabled.service").unwrap());
        assert!(sysd.is_enabled("missing.service").is_err());

        sysd.stop("a.service", Duration::from_secs(5)).unwrap();
        assert!(calls().ends_with(
            "stop --no-block a.service\nshow --property=ActiveState a.service\n"
        ));

        let err = sysd
            .stop("slow.service", Duration::from_millis(300))
            .unwrap_err();
        assert!(err.is_timeout());

        let err = sysd
            .start("hang.service", Duration::from_millis(200))
            .unwrap_err();
        assert!(err.is_timeout());

        let err = sysd
            .start("broken.service", Duration::from_secs(5))
            .unwrap_err();
        assert!(matches!(err, Error::Manager { .. }));
        assert!(err.to_string().contains("Job failed"));

        // output beyond the pipe buffer is drained while waiting
        let out = sysd
            .run_ok(
                "start",
                "chatty.service",
                vec!["start".to_string(), "chatty.service".to_string()],
                Duration::from_secs(5),
            )
            .unwrap();
        assert_eq!(out.stdout.len(), 200000);
        assert_eq!(out.stderr.len(), 200000);

        // other roots only touch unit files
        let other = Dirs::new("/tmp/other", constants::LAUNCHER_PATH);
        let sysd = Systemctl::new(&script, &other, Duration::from_secs(5));
        sysd.enable("b.service").unwrap();
        sysd.daemon_reload().unwrap();
        assert!(calls().ends_with("--root /tmp/other enable b.service\n"));
    }
}
