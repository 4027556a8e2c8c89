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

//! Service unit rendering.
//!
//! Every service application of a package gets one service unit. The unit
//! runs the application through the launcher and orders itself after the
//! mount unit of the package:
//!
//! ```text
//! [Unit]
//! # Auto-generated, DO NOT EDIT
//! Description=Service for snap application hello.svc
//! Requires=snap-hello-1.mount
//! Wants=network.target
//! After=snap-hello-1.mount network.target
//! X-Snappy=yes
//!
//! [Service]
//! ExecStart=/usr/bin/snap run hello.svc
//! SyslogIdentifier=hello.svc
//! Restart=on-failure
//! WorkingDirectory=/var/snap/hello/1
//! Type=simple
//!
//! [Install]
//! WantedBy=multi-user.target
//! ```
//!
//! Applications activated by a socket or a timer carry no `[Install]`
//! section, their activating units are enabled instead.
pub mod render;

pub use render::{format_secs, generate_service_file};
