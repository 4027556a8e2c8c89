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

//! Common used constants by appmaster and its unit components.

/// Directory holding the generated system unit files, relative to the root
pub const SYSTEM_UNIT_DIR: &str = "etc/systemd/system";
/// Directory where package revisions are mounted, relative to the root
pub const PACKAGE_MOUNT_DIR: &str = "snap";
/// Directory holding per-instance writable data, relative to the root
pub const PACKAGE_DATA_DIR: &str = "var/snap";
/// Base of the per-user runtime directories, relative to the root
pub const USER_RUNTIME_DIR: &str = "run/user";

/// Prefix of every generated unit name
pub const UNIT_NAME_PREFIX: &str = "snap";
/// Marker line written into every generated unit
pub const UNIT_MARKER: &str = "X-Snappy=yes";
/// Comment placed at the top of the generated [Unit] section
pub const UNIT_AUTOGEN_COMMENT: &str = "# Auto-generated, DO NOT EDIT";

/// Target that pulls in services started during boot
pub const SERVICES_TARGET: &str = "multi-user.target";
/// Target every generated service wants before starting
pub const PREREQUISITE_TARGET: &str = "network.target";
/// Target that pulls in socket units
pub const SOCKETS_TARGET: &str = "sockets.target";
/// Target that pulls in timer units
pub const TIMERS_TARGET: &str = "timers.target";

/// Default launcher used in the Exec* lines
pub const LAUNCHER_PATH: &str = "/usr/bin/snap";
/// Default client of the external service manager
pub const SYSTEMCTL_PATH: &str = "/usr/bin/systemctl";

/// Configuration file of appmaster
pub const CONFIG_PATH: &str = "/etc/appmaster/appmaster.conf";
/// Default log file path when LogTarget is configured to "file"
pub const LOG_FILE_PATH: &str = "/var/log/appmaster/appmaster.log";

/// Stop timeout in seconds used when an application does not set one
pub const DEFAULT_STOP_TIMEOUT_SEC: u64 = 30;
/// Start timeout in seconds handed to the service manager
pub const DEFAULT_START_TIMEOUT_SEC: u64 = 90;
/// Seconds to wait between TERM and KILL
pub const KILL_WAIT_SEC: u64 = 5;

/// Mode of the generated unit files
pub const UNIT_FILE_MODE: u32 = 0o644;
/// Mode of the directories created for unit files
pub const UNIT_DIR_MODE: u32 = 0o755;
