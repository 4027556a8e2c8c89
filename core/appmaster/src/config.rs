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

//! appmaster configuration.
#![allow(non_snake_case)]

use confique::{Config, FileFormat, Partial};
use std::time::Duration;

/// Settings of the manager, read from the environment, then the config
/// file, then the defaults.
#[derive(Config, Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    #[config(default = "/")]
    pub RootDir: String,
    #[config(default = 30)]
    pub DefaultStopTimeoutSec: u64,
    #[config(default = 90)]
    pub DefaultStartTimeoutSec: u64,
    #[config(default = 5)]
    pub KillWaitSec: u64,
    #[config(default = "/usr/bin/systemctl")]
    pub SystemctlPath: String,
    #[config(default = "/usr/bin/snap")]
    pub LauncherPath: String,

    #[config(default = "info")]
    pub LogLevel: String,
    #[config(default = "console")]
    pub LogTarget: String,
    #[config(default = "/var/log/appmaster/appmaster.log")]
    pub LogFile: String,
}

impl ManagerConfig {
    /// Load the configuration, any failure falls back to the defaults.
    pub fn new(file: Option<&str>) -> ManagerConfig {
        type ConfigPartial = <ManagerConfig as Config>::Partial;
        let mut partial: ConfigPartial = match Partial::from_env() {
            Err(_) => return ManagerConfig::default(),
            Ok(v) => v,
        };
        partial = match confique::File::with_format(
            file.unwrap_or(constants::CONFIG_PATH),
            FileFormat::Toml,
        )
        .load()
        {
            Err(e) => {
                log::debug!("Failed to load config file, use defaults: {}", e);
                return ManagerConfig::default();
            }
            Ok(v) => partial.with_fallback(v),
        };
        partial = partial.with_fallback(ConfigPartial::default_values());
        match ManagerConfig::from_partial(partial) {
            Ok(v) => v,
            Err(_) => ManagerConfig::default(),
        }
    }

    /// stop timeout of apps without one
    pub fn default_stop_timeout(&self) -> Duration {
        Duration::from_secs(self.DefaultStopTimeoutSec)
    }

    /// start timeout handed to the service manager
    pub fn default_start_timeout(&self) -> Duration {
        Duration::from_secs(self.DefaultStartTimeoutSec)
    }

    /// grace interval between TERM and KILL
    pub fn kill_wait(&self) -> Duration {
        Duration::from_secs(self.KillWaitSec)
    }

    /// log targets, comma separated in the file
    pub fn log_targets(&self) -> Vec<&str> {
        self.LogTarget
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            RootDir: "/".to_string(),
            DefaultStopTimeoutSec: constants::DEFAULT_STOP_TIMEOUT_SEC,
            DefaultStartTimeoutSec: constants::DEFAULT_START_TIMEOUT_SEC,
            KillWaitSec: constants::KILL_WAIT_SEC,
            SystemctlPath: constants::SYSTEMCTL_PATH.to_string(),
            LauncherPath: constants::LAUNCHER_PATH.to_string(),
            LogLevel: "info".to_string(),
            LogTarget: "console".to_string(),
            LogFile: constants::LOG_FILE_PATH.to_string(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use libtests::fixture_path;

    #[test]
    fn load() {
        let file = fixture_path("config/appmaster.conf").unwrap();
        let config = ManagerConfig::new(file.to_str());
        assert_eq!(config.DefaultStopTimeoutSec, 20);
        assert_eq!(config.KillWaitSec, 3);
        assert_eq!(config.LogTarget, "console,syslog");
        assert_eq!(config.log_targets(), vec!["console", "syslog"]);
        // not in the file
        assert_eq!(config.DefaultStartTimeoutSec, 90);
        assert_eq!(config.SystemctlPath, "/usr/bin/systemctl");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("nope.conf");
        let config = ManagerConfig::new(file.to_str());
        assert_eq!(config, ManagerConfig::default());
        assert_eq!(config.kill_wait(), Duration::from_secs(5));
        assert_eq!(config.default_stop_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn broken_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.conf");
        std::fs::write(&file, "KillWaitSec = \"many\"\n").unwrap();
        let config = ManagerConfig::new(file.to_str());
        assert_eq!(config, ManagerConfig::default());
    }
}
