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

use super::ServiceWrappers;
use appcore::{PackageInfo, Result};
use std::collections::HashMap;

impl ServiceWrappers {
    /// Whether each service of `pkg` is enabled, by app name. The first
    /// failing query aborts.
    pub fn services_enable_state(&self, pkg: &PackageInfo) -> Result<HashMap<String, bool>> {
        let mut states = HashMap::new();
        for app in pkg.services() {
            let enabled = self.sysd.is_enabled(&pkg.service_name(app))?;
            states.insert(app.name.clone(), enabled);
        }
        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use crate::wrappers::fake::*;
    use appcore::{ApplicationDescriptor, Error};
    use libtests::ScratchRoot;
    use std::rc::Rc;

    #[test]
    fn test_enable_state() {
        let root = ScratchRoot::new().unwrap();
        let sysd = Rc::new(FakeSystemd::new());
        sysd.set_enabled("snap.hello.a.service");
        let pkg = package(vec![
            simple("a"),
            simple("b"),
            ApplicationDescriptor {
                name: "tool".to_string(),
                command: "bin/tool".to_string(),
                ..Default::default()
            },
        ]);

        let states = wrappers(&root, &sysd).services_enable_state(&pkg).unwrap();
        assert_eq!(states.len(), 2);
        assert!(states["a"]);
        assert!(!states["b"]);
    }

    #[test]
    fn test_enable_state_failure() {
        let root = ScratchRoot::new().unwrap();
        let sysd = Rc::new(FakeSystemd::new());
        sysd.fail_on("is-enabled", "snap.hello.a.service");
        let pkg = package(vec![simple("a"), simple("b")]);

        let err = wrappers(&root, &sysd)
            .services_enable_state(&pkg)
            .unwrap_err();
        assert!(matches!(err, Error::Manager { .. }));
        assert_eq!(sysd.calls(), vec!["is-enabled snap.hello.a.service"]);
    }
}
