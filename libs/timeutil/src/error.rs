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

//! Definitions for all possible errors of schedule parsing.
use snafu::Snafu;

/// Errors used in crate.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[allow(missing_docs)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("cannot parse {:?}: empty event set", schedule))]
    EmptySchedule { schedule: String },

    #[snafu(display("cannot parse {:?}: empty event", set))]
    EmptyEvent { set: String },

    #[snafu(display("cannot parse {:?}: {:?} is not a valid weekday or time", set, event))]
    InvalidEvent { set: String, event: String },

    #[snafu(display("cannot parse {:?}: week positions are out of order", span))]
    InvalidWeekday { span: String },

    #[snafu(display("cannot parse {:?}: not a valid time", clock))]
    InvalidClock { clock: String },

    #[snafu(display("cannot parse {:?}: invalid split", event))]
    InvalidSplit { event: String },

    #[snafu(display(
        "cannot parse {:?}: cannot mix weekday with and without week position",
        span
    ))]
    MixedWeekPosition { span: String },

    #[snafu(display("cannot parse {:?}: weekday {:?} must precede times", set, event))]
    ClockBeforeWeekday { set: String, event: String },
}

/// Result used in crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
