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

//! Render the socket units of an application.
use crate::listen::render_listen_stream;
use appcore::validate::validate_app;
use appcore::{ApplicationDescriptor, Dirs, Error, PackageInfo, Result, SocketDescriptor};
use std::fmt::Write;
use std::path::PathBuf;

/// Validate the application and render the unit of one of its sockets.
pub fn generate_socket_file(
    pkg: &PackageInfo,
    app: &ApplicationDescriptor,
    socket_name: &str,
) -> Result<Vec<u8>> {
    validate_app(app)?;
    let socket = app.sockets.get(socket_name).ok_or_else(|| {
        Error::validation(&app.name, format!("no socket named {:?}", socket_name))
    })?;
    Ok(gen_socket_file(pkg, app, socket).into_bytes())
}

/// Validate the application and render all its socket units, paired with
/// their target paths, ordered by socket name.
pub fn generate_socket_files(
    pkg: &PackageInfo,
    app: &ApplicationDescriptor,
    dirs: &Dirs,
) -> Result<Vec<(PathBuf, Vec<u8>)>> {
    validate_app(app)?;
    Ok(app
        .sockets
        .iter()
        .map(|(name, socket)| {
            (
                dirs.socket_file(pkg, app, name),
                gen_socket_file(pkg, app, socket).into_bytes(),
            )
        })
        .collect())
}

fn gen_socket_file(
    pkg: &PackageInfo,
    app: &ApplicationDescriptor,
    socket: &SocketDescriptor,
) -> String {
    let mount_unit = pkg.mount_unit();

    let mut out = String::new();
    let _ = writeln!(out, "[Unit]");
    let _ = writeln!(out, "{}", constants::UNIT_AUTOGEN_COMMENT);
    let _ = writeln!(
        out,
        "Description=Socket {} for snap application {}.{}",
        socket.name,
        pkg.instance_name(),
        app.name
    );
    let _ = writeln!(out, "Requires={}", mount_unit);
    let _ = writeln!(out, "After={}", mount_unit);
    let _ = writeln!(out, "{}", constants::UNIT_MARKER);
    let _ = writeln!(out);
    let _ = writeln!(out, "[Socket]");
    let _ = writeln!(out, "Service={}", pkg.service_name(app));
    let _ = writeln!(out, "FileDescriptorName={}", socket.name);
    let _ = writeln!(out, "ListenStream={}", render_listen_stream(pkg, socket));
    if let Some(mode) = socket.socket_mode.filter(|m| *m != 0) {
        let _ = writeln!(out, "SocketMode={:04o}", mode);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[Install]");
    let _ = writeln!(out, "WantedBy={}", constants::SOCKETS_TARGET);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> ApplicationDescriptor {
        let mut app = ApplicationDescriptor {
            name: "svc".to_string(),
            daemon: "simple".to_string(),
            command: "bin/serve".to_string(),
            ..Default::default()
        };
        for (name, listen, mode) in [
            ("web", "$SNAP_DATA/web.sock", Some(0o660)),
            ("admin", "127.0.0.1:9000", None),
        ] {
            app.sockets.insert(
                name.to_string(),
                SocketDescriptor {
                    name: name.to_string(),
                    listen_stream: listen.to_string(),
                    socket_mode: mode,
                },
            );
        }
        app
    }

    fn pkg() -> PackageInfo {
        PackageInfo {
            name: "hello".to_string(),
            instance_key: String::new(),
            revision: "1".to_string(),
            apps: vec![app()],
        }
    }

    #[test]
    fn test_socket_file() {
        let out = generate_socket_file(&pkg(), &app(), "web").unwrap();
        let expected = "[Unit]
# Auto-generated, DO NOT EDIT
Description=Socket web for snap application hello.svc
Requires=snap-hello-1.mount
After=snap-hello-1.mount
X-Snappy=yes

[Socket]
Service=snap.hello.svc.service
FileDescriptorName=web
ListenStream=/var/snap/hello/1/web.sock
SocketMode=0660

[Install]
WantedBy=sockets.target
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_socket_files_ordered() {
        let dirs = Dirs::new("/root", "/usr/bin/snap");
        let files = generate_socket_files(&pkg(), &app(), &dirs).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(
            files[0].0,
            PathBuf::from("/root/etc/systemd/system/snap.hello.svc.admin.socket")
        );
        let admin = String::from_utf8(files[0].1.clone()).unwrap();
        assert!(admin.contains("\nListenStream=127.0.0.1:9000\n"));
        assert!(!admin.contains("SocketMode"));
        assert_eq!(
            files[1].0,
            PathBuf::from("/root/etc/systemd/system/snap.hello.svc.web.socket")
        );
    }

    #[test]
    fn test_unknown_socket() {
        assert!(matches!(
            generate_socket_file(&pkg(), &app(), "nope"),
            Err(Error::Validation { .. })
        ));
    }
}
