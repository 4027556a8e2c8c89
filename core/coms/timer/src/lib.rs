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

//!  Timer unit rendering.
//!
//!  An application with a timer is activated by a timer unit whose
//!  `OnCalendar` entries are translated from the schedule of the timer:
//!
//! ```text
//!  [Unit]
//!  # Auto-generated, DO NOT EDIT
//!  Description=Timer svc for snap application hello.svc
//!  Requires=snap-hello-1.mount
//!  After=snap-hello-1.mount
//!  X-Snappy=yes
//!
//!  [Timer]
//!  Unit=snap.hello.svc.service
//!  OnCalendar=mon,tue *-*-* 10:00:00
//!
//!  [Install]
//!  WantedBy=timers.target
//! ```
//!
//!  Translation of a schedule, see [`calendar`]:
//!
//!  mon-tue,10:00
//!
//!  `mon,tue *-*-* 10:00:00`
//!
//!  fri5,23:59
//!
//!  `fri *-*~7/1 23:59:00`, the last Friday of the month
//!
//!  mon1-mon2,08:00
//!
//!  `mon *-*-1..14/1 08:00:00`
//!
//!  mon1-tue2,08:00
//!
//!  `*-*-1..14/1 08:00:00`, every day of the range since the calendar
//!  syntax cannot express it; the runner filters the weekdays
//!
//!  10:00~11:00
//!
//!  a random time between 10:00 and 10:55
pub mod calendar;
pub mod render;

pub use calendar::generate_on_calendar_schedules;
pub use render::generate_timer_file;
