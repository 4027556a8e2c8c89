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

//! Parser of the textual schedule form.
use crate::clock::Clock;
use crate::error::*;
use crate::schedule::{ClockSpan, Schedule, Week, WeekPos, WeekSpan};
use chrono::Weekday;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while_m_n},
    character::complete::{char, digit1, one_of},
    combinator::{all_consuming, map_res, opt, value},
    sequence::{pair, preceded, tuple},
    IResult,
};

/// Separator of event sets.
const EVENT_SET_SEP: &str = ",,";
/// Separator of events inside a set.
const EVENT_SEP: char = ',';

type RawWeek = (Weekday, Option<char>);
type RawClock<'a> = (&'a str, u32, u32);

fn weekday(i: &str) -> IResult<&str, Weekday> {
    alt((
        value(Weekday::Mon, tag("mon")),
        value(Weekday::Tue, tag("tue")),
        value(Weekday::Wed, tag("wed")),
        value(Weekday::Thu, tag("thu")),
        value(Weekday::Fri, tag("fri")),
        value(Weekday::Sat, tag("sat")),
        value(Weekday::Sun, tag("sun")),
    ))(i)
}

fn week(i: &str) -> IResult<&str, RawWeek> {
    pair(weekday, opt(one_of("12345")))(i)
}

fn week_span(i: &str) -> IResult<&str, (RawWeek, Option<RawWeek>)> {
    pair(week, opt(preceded(char('-'), week)))(i)
}

fn number(min: usize, max: usize) -> impl FnMut(&str) -> IResult<&str, u32> {
    move |i| {
        map_res(
            take_while_m_n(min, max, |c: char| c.is_ascii_digit()),
            str::parse::<u32>,
        )(i)
    }
}

fn clock(i: &str) -> IResult<&str, RawClock> {
    let start = i;
    let (i, (hour, _, minute)) = tuple((number(1, 2), one_of(":."), number(2, 2)))(i)?;
    let text = &start[..start.len() - i.len()];
    Ok((i, (text, hour, minute)))
}

#[allow(clippy::type_complexity)]
fn clock_span(i: &str) -> IResult<&str, (RawClock, Option<(char, RawClock)>, Option<&str>)> {
    tuple((
        clock,
        opt(pair(one_of("-~"), clock)),
        opt(preceded(char('/'), digit1)),
    ))(i)
}

fn to_week(raw: RawWeek) -> Week {
    let pos = match raw.1 {
        None => WeekPos::Every,
        Some('5') => WeekPos::Last,
        Some(c) => WeekPos::Nth(c as u8 - b'0'),
    };
    Week {
        weekday: raw.0,
        pos,
    }
}

fn to_clock(raw: RawClock) -> Result<Clock> {
    Clock::new(raw.1, raw.2).ok_or_else(|| Error::InvalidClock {
        clock: raw.0.to_string(),
    })
}

fn build_week_span(event: &str, start: RawWeek, end: Option<RawWeek>) -> Result<WeekSpan> {
    let start = to_week(start);
    let end = match end {
        Some(end) => to_week(end),
        None => return Ok(WeekSpan::single(start)),
    };

    match (start.pos, end.pos) {
        (WeekPos::Every, WeekPos::Every) | (WeekPos::Last, WeekPos::Last) => {}
        (WeekPos::Nth(s), WeekPos::Nth(e)) => {
            if s > e {
                return Err(Error::InvalidWeekday {
                    span: event.to_string(),
                });
            }
        }
        _ => {
            return Err(Error::MixedWeekPosition {
                span: event.to_string(),
            })
        }
    }

    Ok(WeekSpan { start, end })
}

fn build_clock_span(
    event: &str,
    start: RawClock,
    end: Option<(char, RawClock)>,
    split: Option<&str>,
) -> Result<ClockSpan> {
    let start = to_clock(start)?;
    let (end, spread, ranged) = match end {
        Some((sep, end)) => (to_clock(end)?, sep == '~', true),
        None => (start, false, false),
    };

    // every sub window spans at least one minute
    let minutes = end.distance(start).as_secs() / 60;
    let split = match split {
        None => 0,
        Some(n) => match n.parse::<u32>() {
            Ok(n) if n > 0 && ranged && u64::from(n) <= minutes => n,
            _ => {
                return Err(Error::InvalidSplit {
                    event: event.to_string(),
                })
            }
        },
    };

    Ok(ClockSpan {
        start,
        end,
        spread,
        split,
    })
}

fn parse_event_set(set: &str) -> Result<Schedule> {
    if set.is_empty() {
        return Err(Error::EmptySchedule {
            schedule: set.to_string(),
        });
    }

    let mut sched = Schedule::default();
    for event in set.split(EVENT_SEP) {
        if event.is_empty() {
            return Err(Error::EmptyEvent {
                set: set.to_string(),
            });
        }

        if let Ok((_, (start, end))) = all_consuming(week_span)(event) {
            if !sched.clock_spans.is_empty() {
                return Err(Error::ClockBeforeWeekday {
                    set: set.to_string(),
                    event: event.to_string(),
                });
            }
            sched.week_spans.push(build_week_span(event, start, end)?);
            continue;
        }

        if let Ok((_, (start, end, split))) = all_consuming(clock_span)(event) {
            sched
                .clock_spans
                .push(build_clock_span(event, start, end, split)?);
            continue;
        }

        return Err(Error::InvalidEvent {
            set: set.to_string(),
            event: event.to_string(),
        });
    }

    if sched.clock_spans.is_empty() {
        sched.clock_spans.push(ClockSpan::whole_day());
    }

    Ok(sched)
}

/// Parse a schedule such as `mon-fri,10:00~12:00,,sat,9:00` into its event
/// sets, in the order they appear.
pub fn parse_schedule(text: &str) -> Result<Vec<Schedule>> {
    if text.is_empty() {
        return Err(Error::EmptySchedule {
            schedule: text.to_string(),
        });
    }

    text.split(EVENT_SET_SEP).map(parse_event_set).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(h: u32, m: u32) -> Clock {
        Clock::new(h, m).unwrap()
    }

    #[test]
    fn test_weekday_range_with_time() {
        let scheds = parse_schedule("mon-tue,10:00").unwrap();
        assert_eq!(scheds.len(), 1);
        assert_eq!(
            scheds[0].week_spans,
            vec![WeekSpan {
                start: Week::every(Weekday::Mon),
                end: Week::every(Weekday::Tue),
            }]
        );
        assert_eq!(scheds[0].clock_spans, vec![ClockSpan::instant(clock(10, 0))]);
    }

    #[test]
    fn test_week_positions() {
        let scheds = parse_schedule("fri5,23:59").unwrap();
        assert_eq!(scheds[0].week_spans[0].start.pos, WeekPos::Last);

        let scheds = parse_schedule("mon1-mon2,8:00").unwrap();
        let span = scheds[0].week_spans[0];
        assert_eq!(span.start.pos, WeekPos::Nth(1));
        assert_eq!(span.end.pos, WeekPos::Nth(2));
        assert_eq!(scheds[0].clock_spans[0].start, clock(8, 0));
    }

    #[test]
    fn test_clock_forms() {
        let scheds = parse_schedule("9.30,22:00~02:00,10:00-12:00/4,24:00").unwrap();
        let spans = &scheds[0].clock_spans;
        assert_eq!(spans[0], ClockSpan::instant(clock(9, 30)));
        assert_eq!(
            spans[1],
            ClockSpan {
                start: clock(22, 0),
                end: clock(2, 0),
                spread: true,
                split: 0,
            }
        );
        assert!(!spans[2].spread);
        assert_eq!(spans[2].split, 4);
        assert_eq!(spans[3].start, Clock::END_OF_DAY);
        assert!(scheds[0].week_spans.is_empty());
    }

    #[test]
    fn test_multiple_event_sets() {
        let scheds = parse_schedule("mon,10:00,,fri,15:00").unwrap();
        assert_eq!(scheds.len(), 2);
        assert_eq!(scheds[1].week_spans[0].start.weekday, Weekday::Fri);
        assert_eq!(scheds[1].to_string(), "fri,15:00");
    }

    #[test]
    fn test_weekday_only_runs_all_day() {
        let scheds = parse_schedule("sat-sun").unwrap();
        assert_eq!(scheds[0].clock_spans, vec![ClockSpan::whole_day()]);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_schedule(""),
            Err(Error::EmptySchedule { .. })
        ));
        assert!(matches!(
            parse_schedule("mon,,"),
            Err(Error::EmptySchedule { .. })
        ));
        assert!(matches!(
            parse_schedule("mon,"),
            Err(Error::EmptyEvent { .. })
        ));
        assert!(matches!(
            parse_schedule("monday"),
            Err(Error::InvalidEvent { .. })
        ));
        assert!(matches!(
            parse_schedule("25:00"),
            Err(Error::InvalidClock { .. })
        ));
        assert!(matches!(
            parse_schedule("24:01"),
            Err(Error::InvalidClock { .. })
        ));
        assert!(matches!(
            parse_schedule("10:00/2"),
            Err(Error::InvalidSplit { .. })
        ));
        assert!(matches!(
            parse_schedule("10:00-11:00/0"),
            Err(Error::InvalidSplit { .. })
        ));
        assert!(matches!(
            parse_schedule("10:00~12:00/4000000000"),
            Err(Error::InvalidSplit { .. })
        ));
        assert!(matches!(
            parse_schedule("10:00-10:01/120"),
            Err(Error::InvalidSplit { .. })
        ));
        assert!(matches!(
            parse_schedule("10:00-10:00/2"),
            Err(Error::InvalidSplit { .. })
        ));
        assert!(matches!(
            parse_schedule("mon1-fri"),
            Err(Error::MixedWeekPosition { .. })
        ));
        assert!(matches!(
            parse_schedule("mon1-fri5"),
            Err(Error::MixedWeekPosition { .. })
        ));
        assert!(matches!(
            parse_schedule("mon3-fri1"),
            Err(Error::InvalidWeekday { .. })
        ));
        assert!(matches!(
            parse_schedule("10:00,mon"),
            Err(Error::ClockBeforeWeekday { .. })
        ));
    }
}
