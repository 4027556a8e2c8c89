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

//! Listen address placeholders.
use appcore::{PackageInfo, SocketDescriptor};

/// Services run as root.
const SERVICE_USER_UID: u32 = 0;

/// Replace the directory placeholders of a listen address.
pub fn render_listen_stream(pkg: &PackageInfo, socket: &SocketDescriptor) -> String {
    socket
        .listen_stream
        .replace("$SNAP_DATA", &pkg.data_dir())
        .replace(
            "$XDG_RUNTIME_DIR",
            &pkg.user_runtime_dir(SERVICE_USER_UID),
        )
        .replace("$SNAP_COMMON", &pkg.common_data_dir())
}
