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

//! Recurring schedule model and the parser of its textual form.
//!
//! A schedule is written as one or more event sets separated by `,,`, each
//! event set being weekday spans followed by clock spans:
//!
//! ```text
//! mon-fri,10:00~12:00,,sat5,23:00
//! ```
pub mod clock;
pub mod error;
pub mod parser;
pub mod schedule;

pub use clock::Clock;
pub use error::{Error, Result};
pub use parser::parse_schedule;
pub use schedule::{ClockSpan, Schedule, Week, WeekPos, WeekSpan};
