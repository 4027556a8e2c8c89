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

//! Error define of appcore, shared by the unit renderers and the manager.
//! The manager hands back exactly one of these per operation.
use snafu::prelude::*;
#[allow(unused_imports)]
pub use snafu::ResultExt;
use std::path::PathBuf;

/// appcore Error
#[allow(missing_docs)]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("invalid application {:?}: {}", app, msg))]
    Validation { app: String, msg: String },

    #[snafu(display("invalid timer for application {:?}: {}", app, source))]
    ScheduleParse {
        app: String,
        source: timeutil::Error,
    },

    #[snafu(display("cannot write unit file {:?}: {}", path, source))]
    Write {
        path: PathBuf,
        source: basic::Error,
    },

    #[snafu(display("cannot remove unit file {:?}: {}", path, source))]
    Remove {
        path: PathBuf,
        source: basic::Error,
    },

    #[snafu(display("{} of {:?} failed: {}", op, unit, msg))]
    Manager {
        unit: String,
        op: String,
        msg: String,
    },

    #[snafu(display("{} of {:?} timed out", op, unit))]
    Timeout { unit: String, op: String },

    #[snafu(display("IoError(appcore): {}", source))]
    Io { source: std::io::Error },

    #[snafu(display("UtilError(appcore): {}", source))]
    Util { source: basic::Error },

    #[snafu(display("Confique error: {}", source))]
    Confique { source: confique::Error },

    #[snafu(display("invalid manifest: {}", source))]
    Manifest { source: toml::de::Error },

    #[snafu(display("OtherError(appcore): '{}'.", msg))]
    Other { msg: String },
}

impl Error {
    /// Whether a manager call ran past its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Build a Validation error.
    pub fn validation(app: &str, msg: impl Into<String>) -> Error {
        Error::Validation {
            app: app.to_string(),
            msg: msg.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Error {
        Error::Io { source }
    }
}

impl From<basic::Error> for Error {
    fn from(source: basic::Error) -> Error {
        Error::Util { source }
    }
}

/// Result alias of appcore
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_timeout() {
        let e = Error::Timeout {
            unit: "snap.foo.svc.service".to_string(),
            op: "stop".to_string(),
        };
        assert!(e.is_timeout());
        assert_eq!(e.to_string(), "stop of \"snap.foo.svc.service\" timed out");

        let e = Error::Manager {
            unit: "snap.foo.svc.service".to_string(),
            op: "stop".to_string(),
            msg: "exit status 1".to_string(),
        };
        assert!(!e.is_timeout());
    }
}
