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

//! Socket unit rendering.
//!
//! A socket declared by an application becomes a socket unit that starts
//! the service of the application on the first connection:
//!
//! ```text
//! [Unit]
//! # Auto-generated, DO NOT EDIT
//! Description=Socket web for snap application hello.svc
//! Requires=snap-hello-1.mount
//! After=snap-hello-1.mount
//! X-Snappy=yes
//!
//! [Socket]
//! Service=snap.hello.svc.service
//! FileDescriptorName=web
//! ListenStream=/var/snap/hello/1/web.sock
//! SocketMode=0660
//!
//! [Install]
//! WantedBy=sockets.target
//! ```
//!
//! `ListenStream` may refer to the package directories through
//! `$SNAP_DATA`, `$SNAP_COMMON` and `$XDG_RUNTIME_DIR`, see [`listen`].
pub mod listen;
pub mod render;

pub use listen::render_listen_stream;
pub use render::{generate_socket_file, generate_socket_files};
