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

//! appmaster installs the services of a package as systemd units and
//! drives them through their lifecycle.
//!
//! The unit renderers live in the `service`, `socket` and `timer` crates;
//! this crate holds the [`wrappers::ServiceWrappers`] orchestrator, the
//! `systemctl` backed [`systemctl::Systemctl`] manager, the configuration
//! and the package manifest loader.
pub mod config;
pub mod manifest;
pub mod systemctl;
pub mod wrappers;
