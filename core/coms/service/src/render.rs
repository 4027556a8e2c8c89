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

//! Render the service unit of an application.
use appcore::validate::validate_app;
use appcore::{ApplicationDescriptor, Dirs, PackageInfo, RestartCondition, Result};
use std::fmt::Write;
use std::time::Duration;

/// Seconds as the service manager accepts them, `30` or `1.5`.
pub fn format_secs(d: Duration) -> String {
    if d.subsec_nanos() == 0 {
        d.as_secs().to_string()
    } else {
        d.as_secs_f64().to_string()
    }
}

fn push_opt(out: &mut String, key: &str, value: Option<String>) {
    if let Some(v) = value {
        let _ = writeln!(out, "{}={}", key, v);
    }
}

fn nonzero(d: Duration) -> Option<String> {
    if d.is_zero() {
        None
    } else {
        Some(format_secs(d))
    }
}

/// Validate the application and render its service unit.
pub fn generate_service_file(
    pkg: &PackageInfo,
    app: &ApplicationDescriptor,
    dirs: &Dirs,
) -> Result<Vec<u8>> {
    validate_app(app)?;
    Ok(gen_service_file(pkg, app, dirs).into_bytes())
}

fn gen_service_file(pkg: &PackageInfo, app: &ApplicationDescriptor, dirs: &Dirs) -> String {
    let instance = pkg.instance_name();
    let mount_unit = pkg.mount_unit();
    let before = pkg.service_names(&app.before);
    let after = pkg.service_names(&app.after);

    let mut restart = app.restart();
    let mut remain = None;
    if app.daemon == "oneshot" {
        // oneshot only supports Restart=no
        restart = RestartCondition::Never;
        if app.stop_command.is_some() {
            remain = Some("yes".to_string());
        }
    }

    let kill_mode = if app.stop_mode.kill_all() {
        None
    } else {
        Some("process".to_string())
    };
    let kill_signal = app.stop_mode.kill_signal().map(|s| s.as_str().to_string());

    let mut out = String::new();
    let _ = writeln!(out, "[Unit]");
    let _ = writeln!(out, "{}", constants::UNIT_AUTOGEN_COMMENT);
    let _ = writeln!(
        out,
        "Description=Service for snap application {}.{}",
        instance, app.name
    );
    let _ = writeln!(out, "Requires={}", mount_unit);
    let _ = writeln!(out, "Wants={}", constants::PREREQUISITE_TARGET);
    let mut after_line = format!("{} {}", mount_unit, constants::PREREQUISITE_TARGET);
    for unit in &after {
        after_line.push(' ');
        after_line.push_str(unit);
    }
    let _ = writeln!(out, "After={}", after_line);
    if !before.is_empty() {
        let _ = writeln!(out, "Before={}", before.join(" "));
    }
    let _ = writeln!(out, "{}", constants::UNIT_MARKER);

    let _ = writeln!(out);
    let _ = writeln!(out, "[Service]");
    let _ = writeln!(out, "ExecStart={}", dirs.launcher_command(pkg, app, None));
    let _ = writeln!(out, "SyslogIdentifier={}.{}", instance, app.name);
    let _ = writeln!(out, "Restart={}", restart);
    push_opt(&mut out, "RestartSec", nonzero(app.restart_delay));
    let _ = writeln!(out, "WorkingDirectory={}", pkg.data_dir());
    push_opt(
        &mut out,
        "ExecStop",
        app.stop_command
            .as_ref()
            .map(|_| dirs.launcher_command(pkg, app, Some("stop"))),
    );
    push_opt(
        &mut out,
        "ExecReload",
        app.reload_command
            .as_ref()
            .map(|_| dirs.launcher_command(pkg, app, Some("reload"))),
    );
    push_opt(
        &mut out,
        "ExecStopPost",
        app.post_stop_command
            .as_ref()
            .map(|_| dirs.launcher_command(pkg, app, Some("post-stop"))),
    );
    push_opt(&mut out, "TimeoutStopSec", nonzero(app.stop_timeout));
    push_opt(&mut out, "TimeoutStartSec", nonzero(app.start_timeout));
    let _ = writeln!(out, "Type={}", app.daemon);
    push_opt(&mut out, "RemainAfterExit", remain);
    push_opt(
        &mut out,
        "BusName",
        Some(app.bus_name.clone()).filter(|b| !b.is_empty()),
    );
    push_opt(&mut out, "WatchdogSec", nonzero(app.watchdog_timeout));
    push_opt(&mut out, "KillMode", kill_mode);
    push_opt(&mut out, "KillSignal", kill_signal);

    if !app.is_activated() {
        let _ = writeln!(out);
        let _ = writeln!(out, "[Install]");
        let _ = writeln!(out, "WantedBy={}", constants::SERVICES_TARGET);
    }

    out
}
