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

//! Compensating actions of a failed operation.
use appcore::{Interacter, ServiceManager};
use basic::fs_util::remove_file_if_exists;
use std::path::PathBuf;

/// Unit files written and units enabled by one operation, in the order
/// they happened. Lives for one call only.
#[derive(Debug, Default)]
pub struct RollbackLedger {
    written: Vec<PathBuf>,
    enabled: Vec<String>,
}

impl RollbackLedger {
    /// empty ledger
    pub fn new() -> Self {
        RollbackLedger::default()
    }

    /// remember a written unit file
    pub fn record_written(&mut self, path: PathBuf) {
        self.written.push(path);
    }

    /// remember an enabled unit
    pub fn record_enabled(&mut self, unit: String) {
        self.enabled.push(unit);
    }

    /// written unit files
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// enabled units
    pub fn enabled(&self) -> &[String] {
        &self.enabled
    }

    /// Undo everything recorded: disable the enabled units, remove the
    /// written files and reload the manager when a file was written.
    /// Failures are reported to `inter` and otherwise ignored.
    pub fn rollback(self, sysd: &dyn ServiceManager, inter: &dyn Interacter) {
        for unit in self.enabled.iter().rev() {
            if let Err(e) = sysd.disable(unit) {
                inter.notify(&format!(
                    "while trying to disable {} due to previous failure: {}",
                    unit, e
                ));
            }
        }

        for path in self.written.iter().rev() {
            if let Err(e) = remove_file_if_exists(path) {
                inter.notify(&format!(
                    "while trying to remove {:?} due to previous failure: {}",
                    path, e
                ));
            }
        }

        if !self.written.is_empty() {
            if let Err(e) = sysd.daemon_reload() {
                inter.notify(&format!(
                    "while trying to perform daemon-reload due to previous failure: {}",
                    e
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrappers::fake::{FakeInteracter, FakeSystemd};

    #[test]
    fn test_rollback() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.service");
        let b = dir.path().join("b.service");
        std::fs::write(&a, "a").unwrap();
        std::fs::write(&b, "b").unwrap();

        let sysd = FakeSystemd::new();
        sysd.fail_on("disable", "a.service");
        let inter = FakeInteracter::default();

        let mut ledger = RollbackLedger::new();
        ledger.record_written(a.clone());
        ledger.record_written(b.clone());
        ledger.record_enabled("a.service".to_string());
        ledger.record_enabled("b.service".to_string());
        assert_eq!(ledger.written().len(), 2);
        assert_eq!(ledger.enabled().len(), 2);
        ledger.rollback(&sysd, &inter);

        assert!(!a.exists());
        assert!(!b.exists());
        assert_eq!(
            sysd.calls(),
            vec!["disable b.service", "disable a.service", "daemon-reload"]
        );
        let notes = inter.messages();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].contains("disable a.service"));
    }

    #[test]
    fn test_rollback_without_files_skips_reload() {
        let sysd = FakeSystemd::new();
        let mut ledger = RollbackLedger::new();
        ledger.record_enabled("a.socket".to_string());
        ledger.rollback(&sysd, &FakeInteracter::default());
        assert_eq!(sysd.calls(), vec!["disable a.socket"]);
    }
}
