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

//! Shared model of appmaster: application descriptors, their validation,
//! the unit file layout and the seams to the external service manager.
pub mod app;
pub mod dirs;
pub mod error;
pub mod grace;
pub mod interact;
pub mod systemd;
pub mod validate;

pub use app::{
    ApplicationDescriptor, PackageInfo, RefreshMode, RestartCondition, SocketDescriptor,
    StopMode, TimerDescriptor,
};
pub use dirs::Dirs;
pub use error::*;
pub use interact::{Interacter, LogInteracter};
pub use systemd::{KillWho, ServiceManager};
