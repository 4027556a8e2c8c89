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

//! Interfaces related to the unit name.
//!

fn hexchar(x: u8) -> char {
    const TABLE: &[u8; 16] = b"0123456789abcdef";
    TABLE[(x & 15) as usize] as char
}

fn escape_char(c: u8, out: &mut String) {
    out.push('\\');
    out.push('x');
    out.push(hexchar(c >> 4));
    out.push(hexchar(c));
}

/// Escape a string the way unit names do: '/' becomes '-', everything
/// outside `[A-Za-z0-9:_.]` (and a leading '.') becomes `\xNN`.
pub fn unit_name_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 2);

    for (i, c) in s.bytes().enumerate() {
        match c {
            b'/' => out.push('-'),
            b'.' if i == 0 => escape_char(c, &mut out),
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b':' | b'_' | b'.' => out.push(c as char),
            _ => escape_char(c, &mut out),
        }
    }

    out
}

/// Escape a path for use in a unit name, e.g. "/snap/foo/1" => "snap-foo-1".
///
/// Redundant slashes are dropped, the root directory escapes to "-".
pub fn unit_name_path_escape(path: &str) -> String {
    let simplified: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if simplified.is_empty() {
        return "-".to_string();
    }

    unit_name_escape(&simplified.join("/"))
}

/// Build a unit name from a path and a unit suffix such as ".mount"
pub fn unit_name_from_path(path: &str, suffix: &str) -> String {
    format!("{}{}", unit_name_path_escape(path), suffix)
}
