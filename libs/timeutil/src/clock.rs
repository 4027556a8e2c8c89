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

//! Time of day.
use std::fmt;
use std::time::Duration;

const SECS_PER_MINUTE: u32 = 60;
const SECS_PER_HOUR: u32 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u32 = 24 * SECS_PER_HOUR;

/// A time of day with second precision. `24:00` is a valid value meaning
/// the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Clock {
    secs: u32,
}

impl Clock {
    /// 00:00
    pub const MIDNIGHT: Clock = Clock { secs: 0 };
    /// 24:00
    pub const END_OF_DAY: Clock = Clock { secs: SECS_PER_DAY };

    /// Build a clock from hour and minute; `24` is only accepted with minute 0.
    pub fn new(hour: u32, minute: u32) -> Option<Clock> {
        Clock::with_seconds(hour, minute, 0)
    }

    /// Build a clock from hour, minute and second.
    pub fn with_seconds(hour: u32, minute: u32, second: u32) -> Option<Clock> {
        if minute >= 60 || second >= 60 || hour > 24 {
            return None;
        }
        if hour == 24 && (minute != 0 || second != 0) {
            return None;
        }
        Some(Clock {
            secs: hour * SECS_PER_HOUR + minute * SECS_PER_MINUTE + second,
        })
    }

    /// hour, 0 to 24
    pub fn hour(&self) -> u32 {
        self.secs / SECS_PER_HOUR
    }

    /// minute
    pub fn minute(&self) -> u32 {
        (self.secs % SECS_PER_HOUR) / SECS_PER_MINUTE
    }

    /// second
    pub fn second(&self) -> u32 {
        self.secs % SECS_PER_MINUTE
    }

    /// Advance the clock, wrapping past the end of the day. A result that
    /// lands exactly on the end of the day stays `24:00`.
    pub fn add(self, d: Duration) -> Clock {
        let d = (d.as_secs() % SECS_PER_DAY as u64) as u32;
        let mut secs = self.secs + d;
        if secs > SECS_PER_DAY {
            secs -= SECS_PER_DAY;
        }
        Clock { secs }
    }

    /// Absolute distance between two clocks on the same day.
    pub fn distance(self, other: Clock) -> Duration {
        let d = (self.secs as i64 - other.secs as i64).unsigned_abs();
        Duration::from_secs(d)
    }

    /// Map `24:00` to `00:00`, the only representation the calendar
    /// syntax of the service manager accepts.
    pub fn fold_end_of_day(self) -> Clock {
        if self.hour() == 24 {
            Clock {
                secs: self.secs - SECS_PER_DAY,
            }
        } else {
            self
        }
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}
