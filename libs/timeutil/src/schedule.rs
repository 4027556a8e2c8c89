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

//! Parsed representation of a recurring schedule.
use crate::clock::Clock;
use chrono::Weekday;
use std::fmt;
use std::time::Duration;

/// Position of a weekday within a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeekPos {
    /// every week of the month
    Every,
    /// the Nth week, 1 to 4
    Nth(u8),
    /// the last week of the month
    Last,
}

/// A weekday, optionally pinned to a week of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Week {
    /// day of week
    pub weekday: Weekday,
    /// week of month
    pub pos: WeekPos,
}

impl Week {
    /// A weekday recurring every week.
    pub fn every(weekday: Weekday) -> Week {
        Week {
            weekday,
            pos: WeekPos::Every,
        }
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", weekday_abbrev(self.weekday))?;
        match self.pos {
            WeekPos::Every => Ok(()),
            WeekPos::Nth(n) => write!(f, "{}", n),
            WeekPos::Last => write!(f, "5"),
        }
    }
}

/// Inclusive weekday range, `start` may be later in the week than `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekSpan {
    /// first day
    pub start: Week,
    /// last day
    pub end: Week,
}

impl WeekSpan {
    /// A single day.
    pub fn single(week: Week) -> WeekSpan {
        WeekSpan {
            start: week,
            end: week,
        }
    }

    /// Every weekday from start to end inclusive, wrapping at the end of
    /// the week.
    pub fn weekdays(&self) -> Vec<Weekday> {
        let mut days = vec![self.start.weekday];
        let mut day = self.start.weekday;
        while day != self.end.weekday {
            day = day.succ();
            days.push(day);
        }
        days
    }
}

impl fmt::Display for WeekSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A time of day range. When `spread` is set the event runs once at a
/// random point inside the window, otherwise at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClockSpan {
    /// window start
    pub start: Clock,
    /// window end, equal to start for an instant
    pub end: Clock,
    /// pick a random time in the window
    pub spread: bool,
    /// number of sub windows, 0 when not split
    pub split: u32,
}

impl ClockSpan {
    /// A fixed instant.
    pub fn instant(clock: Clock) -> ClockSpan {
        ClockSpan {
            start: clock,
            end: clock,
            spread: false,
            split: 0,
        }
    }

    /// The whole day as a single spread window.
    pub fn whole_day() -> ClockSpan {
        ClockSpan {
            start: Clock::MIDNIGHT,
            end: Clock::END_OF_DAY,
            spread: true,
            split: 0,
        }
    }

    /// Window length, the absolute distance of its bounds.
    pub fn length(&self) -> Duration {
        self.end.distance(self.start)
    }

    /// Expand a split window into its sub windows; an unsplit window
    /// yields itself.
    pub fn clock_spans(&self) -> Vec<ClockSpan> {
        // sub windows are at least a minute long
        let split = u64::from(self.split).min(self.length().as_secs() / 60);
        if split <= 1 {
            return vec![*self];
        }

        let step = Duration::from_secs(self.length().as_secs() / split);
        let mut spans = Vec::with_capacity(split as usize);
        let mut start = self.start;
        for _ in 0..split {
            let end = start.add(step);
            spans.push(ClockSpan {
                start,
                end,
                spread: self.spread,
                split: 0,
            });
            start = end;
        }
        spans
    }
}

impl fmt::Display for ClockSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hm = |c: Clock| format!("{:02}:{:02}", c.hour(), c.minute());
        write!(f, "{}", hm(self.start))?;
        if self.start != self.end || self.spread {
            let sep = if self.spread { '~' } else { '-' };
            write!(f, "{}{}", sep, hm(self.end))?;
        }
        if self.split > 0 {
            write!(f, "/{}", self.split)?;
        }
        Ok(())
    }
}

/// One event set of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    /// days, empty means every day
    pub week_spans: Vec<WeekSpan>,
    /// times of day
    pub clock_spans: Vec<ClockSpan>,
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .week_spans
            .iter()
            .map(|w| w.to_string())
            .chain(self.clock_spans.iter().map(|c| c.to_string()))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Three letter lower case weekday name.
pub fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}
