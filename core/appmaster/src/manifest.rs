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

//! Package manifests.
//!
//! A manifest describes one installed package instance and its apps in
//! TOML; apps keep the order they are declared in:
//!
//! ```toml
//! name = "hello"
//! revision = "12"
//!
//! [[apps]]
//! name = "web"
//! daemon = "simple"
//! command = "bin/web"
//! stop-timeout = 10
//! after = ["db"]
//!
//! [[apps.sockets]]
//! name = "http"
//! listen-stream = "$SNAP_DATA/http.sock"
//! socket-mode = 0o660
//! ```
use appcore::validate::validate_package;
use appcore::{
    ApplicationDescriptor, Error, IoSnafu, ManifestSnafu, PackageInfo, RefreshMode,
    RestartCondition, Result, SocketDescriptor, StopMode, TimerDescriptor,
};
use serde::Deserialize;
use snafu::ResultExt;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawPackage {
    name: String,
    #[serde(default)]
    instance_key: String,
    revision: String,
    #[serde(default)]
    apps: Vec<RawApp>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct RawApp {
    name: String,
    daemon: String,
    command: String,
    stop_command: Option<String>,
    reload_command: Option<String>,
    post_stop_command: Option<String>,
    restart_condition: Option<String>,
    restart_delay: u64,
    stop_timeout: u64,
    start_timeout: u64,
    watchdog_timeout: u64,
    bus_name: String,
    stop_mode: String,
    refresh_mode: String,
    before: Vec<String>,
    after: Vec<String>,
    sockets: Vec<RawSocket>,
    timer: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawSocket {
    name: String,
    listen_stream: String,
    socket_mode: Option<u32>,
}

fn field<T, E: std::fmt::Display>(app: &str, r: std::result::Result<T, E>) -> Result<T> {
    r.map_err(|e| Error::validation(app, e.to_string()))
}

impl RawApp {
    fn into_descriptor(self) -> Result<ApplicationDescriptor> {
        let name = self.name;
        let restart_cond = match self.restart_condition {
            Some(c) => Some(field(&name, c.parse::<RestartCondition>())?),
            None => None,
        };
        let stop_mode = field(&name, self.stop_mode.parse::<StopMode>())?;
        let refresh_mode = field(&name, self.refresh_mode.parse::<RefreshMode>())?;

        let mut sockets = BTreeMap::new();
        for s in self.sockets {
            if sockets.contains_key(&s.name) {
                return Err(Error::validation(
                    &name,
                    format!("duplicate socket {:?}", s.name),
                ));
            }
            sockets.insert(
                s.name.clone(),
                SocketDescriptor {
                    name: s.name,
                    listen_stream: s.listen_stream,
                    socket_mode: s.socket_mode,
                },
            );
        }

        Ok(ApplicationDescriptor {
            daemon: self.daemon,
            command: self.command,
            stop_command: self.stop_command,
            reload_command: self.reload_command,
            post_stop_command: self.post_stop_command,
            restart_cond,
            restart_delay: Duration::from_secs(self.restart_delay),
            stop_timeout: Duration::from_secs(self.stop_timeout),
            start_timeout: Duration::from_secs(self.start_timeout),
            watchdog_timeout: Duration::from_secs(self.watchdog_timeout),
            bus_name: self.bus_name,
            stop_mode,
            refresh_mode,
            before: self.before,
            after: self.after,
            sockets,
            timer: self.timer.map(|timer| TimerDescriptor { timer }),
            name,
        })
    }
}

/// Parse and validate a manifest.
pub fn parse_manifest(text: &str) -> Result<PackageInfo> {
    let raw: RawPackage = toml::from_str(text).context(ManifestSnafu)?;
    let apps = raw
        .apps
        .into_iter()
        .map(RawApp::into_descriptor)
        .collect::<Result<Vec<_>>>()?;

    let pkg = PackageInfo {
        name: raw.name,
        instance_key: raw.instance_key,
        revision: raw.revision,
        apps,
    };
    validate_package(&pkg)?;
    Ok(pkg)
}

/// Read, parse and validate a manifest file.
pub fn load_manifest(path: &Path) -> Result<PackageInfo> {
    let text = fs::read_to_string(path).context(IoSnafu)?;
    parse_manifest(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use libtests::fixture_path;
    use nix::sys::signal::Signal;

    #[test]
    fn test_parse_manifest() {
        let pkg = parse_manifest(
            r#"
name = "hello"
instance-key = "dev"
revision = "3"

[[apps]]
name = "db"
daemon = "notify"
command = "bin/db"
stop-mode = "sigterm"
refresh-mode = "endure"
stop-timeout = 15

[[apps]]
name = "web"
daemon = "simple"
command = "bin/web"
after = ["db"]
restart-condition = "always"

[[apps.sockets]]
name = "http"
listen-stream = "$SNAP_DATA/http.sock"
socket-mode = 0o660

[[apps]]
name = "cli"
command = "bin/cli"
"#,
        )
        .unwrap();

        assert_eq!(pkg.instance_name(), "hello_dev");
        let names: Vec<&str> = pkg.apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["db", "web", "cli"]);

        let db = pkg.app("db").unwrap();
        assert_eq!(db.stop_mode, StopMode::new(Signal::SIGTERM, false));
        assert_eq!(db.refresh_mode, RefreshMode::Endure);
        assert_eq!(db.stop_timeout, Duration::from_secs(15));

        let web = pkg.app("web").unwrap();
        assert_eq!(web.restart(), RestartCondition::Always);
        assert_eq!(web.sockets["http"].socket_mode, Some(0o660));
        assert!(!pkg.app("cli").unwrap().is_service());
    }

    #[test]
    fn test_bad_manifests() {
        assert!(matches!(
            parse_manifest("name = 1"),
            Err(Error::Manifest { .. })
        ));
        assert!(matches!(
            parse_manifest("name = \"a\"\nrevision = \"1\"\nbogus = 2\n"),
            Err(Error::Manifest { .. })
        ));
        let bad_mode = r#"
name = "a"
revision = "1"
[[apps]]
name = "svc"
daemon = "simple"
command = "bin/svc"
stop-mode = "sigkill"
"#;
        assert!(matches!(
            parse_manifest(bad_mode),
            Err(Error::Validation { .. })
        ));
        let bad_order = r#"
name = "a"
revision = "1"
[[apps]]
name = "svc"
daemon = "simple"
command = "bin/svc"
before = ["missing"]
"#;
        assert!(matches!(
            parse_manifest(bad_order),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_demo_manifest() {
        let path = fixture_path("demos/hello.toml").unwrap();
        let pkg = load_manifest(&path).unwrap();
        assert_eq!(pkg.name, "hello");
        assert!(pkg.services().count() >= 3);
    }
}
