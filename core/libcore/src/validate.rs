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

//! Structural validation of descriptors. Nothing is rendered or written
//! for an application that fails here.
use crate::app::{ApplicationDescriptor, PackageInfo, RefreshMode, StopMode};
use crate::error::*;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::net::{Ipv4Addr, Ipv6Addr};

// constant pattern
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9](?:-?[A-Za-z0-9])*$").unwrap());

/// Daemon kinds the service manager understands.
pub const DAEMON_KINDS: [&str; 5] = ["simple", "forking", "oneshot", "dbus", "notify"];

const PATH_PLACEHOLDERS: [&str; 3] = ["$SNAP_DATA/", "$SNAP_COMMON/", "$XDG_RUNTIME_DIR/"];

const MAX_SOCKET_MODE: u32 = 0o777;

fn validate_port(port: &str) -> std::result::Result<(), String> {
    match port.parse::<u16>() {
        Ok(p) if p > 0 => Ok(()),
        _ => Err(format!("invalid port {:?}", port)),
    }
}

fn validate_host(host: &str) -> std::result::Result<(), String> {
    if host == "localhost" || host.parse::<Ipv4Addr>().is_ok() {
        return Ok(());
    }
    if let Some(inner) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        if inner.parse::<Ipv6Addr>().is_ok() {
            return Ok(());
        }
    }
    Err(format!("invalid address {:?}", host))
}

/// Check a listen address: a port, `address:port`, an absolute path or a
/// path below one of the package directories.
pub fn validate_listen_stream(addr: &str) -> std::result::Result<(), String> {
    if addr.is_empty() {
        return Err("listen-stream is empty".to_string());
    }

    if addr.starts_with('/') {
        return Ok(());
    }

    if addr.starts_with('$') {
        if PATH_PLACEHOLDERS.iter().any(|p| addr.starts_with(p)) {
            return Ok(());
        }
        return Err(format!(
            "listen-stream {:?} must start with one of {}",
            addr,
            PATH_PLACEHOLDERS.join(", ")
        ));
    }

    match addr.rsplit_once(':') {
        Some((host, port)) => {
            validate_host(host)?;
            validate_port(port)
        }
        None => validate_port(addr),
    }
}

fn check_daemon_only(app: &ApplicationDescriptor) -> Result<()> {
    let mut fields = Vec::new();
    if !app.sockets.is_empty() {
        fields.push("sockets");
    }
    if app.timer.is_some() {
        fields.push("timer");
    }
    if app.stop_mode != StopMode::default() {
        fields.push("stop-mode");
    }
    if app.refresh_mode != RefreshMode::default() {
        fields.push("refresh-mode");
    }
    if !app.before.is_empty() {
        fields.push("before");
    }
    if !app.after.is_empty() {
        fields.push("after");
    }
    if !app.watchdog_timeout.is_zero() {
        fields.push("watchdog-timeout");
    }
    if !app.bus_name.is_empty() {
        fields.push("bus-name");
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(Error::validation(
            &app.name,
            format!("{} only allowed for daemons", fields.join(", ")),
        ))
    }
}

/// Validate one application.
pub fn validate_app(app: &ApplicationDescriptor) -> Result<()> {
    if !NAME_RE.is_match(&app.name) {
        return Err(Error::validation(&app.name, "invalid application name"));
    }

    if app.command.is_empty() {
        return Err(Error::validation(&app.name, "command is missing"));
    }

    if !app.is_service() {
        return check_daemon_only(app);
    }

    if !DAEMON_KINDS.contains(&app.daemon.as_str()) {
        return Err(Error::validation(
            &app.name,
            format!("unknown daemon kind {:?}", app.daemon),
        ));
    }

    for (name, socket) in &app.sockets {
        if name != &socket.name {
            return Err(Error::validation(
                &app.name,
                format!("socket {:?} is registered as {:?}", socket.name, name),
            ));
        }
        if !NAME_RE.is_match(name) {
            return Err(Error::validation(
                &app.name,
                format!("invalid socket name {:?}", name),
            ));
        }
        validate_listen_stream(&socket.listen_stream).map_err(|msg| {
            Error::validation(&app.name, format!("socket {:?}: {}", name, msg))
        })?;
        if let Some(mode) = socket.socket_mode {
            if mode > MAX_SOCKET_MODE {
                return Err(Error::validation(
                    &app.name,
                    format!("socket {:?}: invalid socket mode {:o}", name, mode),
                ));
            }
        }
    }

    if let Some(timer) = &app.timer {
        if timer.timer.is_empty() {
            return Err(Error::validation(&app.name, "timer is empty"));
        }
    }

    Ok(())
}

fn has_cycle<'a>(
    node: &'a str,
    edges: &HashMap<&'a str, Vec<&'a str>>,
    visiting: &mut HashSet<&'a str>,
    done: &mut HashSet<&'a str>,
) -> bool {
    if done.contains(node) {
        return false;
    }
    if !visiting.insert(node) {
        return true;
    }
    for next in edges.get(node).into_iter().flatten() {
        if has_cycle(*next, edges, visiting, done) {
            return true;
        }
    }
    visiting.remove(node);
    done.insert(node);
    false
}

/// Validate every application of a package and the ordering between them.
pub fn validate_package(pkg: &PackageInfo) -> Result<()> {
    let mut seen = HashSet::new();
    for app in &pkg.apps {
        if !seen.insert(app.name.as_str()) {
            return Err(Error::validation(&app.name, "duplicate application name"));
        }
        validate_app(app)?;
    }

    // edge a -> b: a must start before b
    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    for app in pkg.services() {
        for (key, names) in [("before", &app.before), ("after", &app.after)] {
            for other in names {
                match pkg.app(other) {
                    Some(o) if o.is_service() => {}
                    _ => {
                        return Err(Error::validation(
                            &app.name,
                            format!("{} names {:?}, which is not a daemon", key, other),
                        ))
                    }
                }
            }
        }
        for other in &app.before {
            edges.entry(app.name.as_str()).or_default().push(other);
        }
        for other in &app.after {
            edges.entry(other.as_str()).or_default().push(&app.name);
        }
    }

    let mut visiting = HashSet::new();
    let mut done = HashSet::new();
    for app in pkg.services() {
        if has_cycle(&app.name, &edges, &mut visiting, &mut done) {
            return Err(Error::validation(
                &app.name,
                "before/after ordering has a cycle",
            ));
        }
    }

    Ok(())
}
