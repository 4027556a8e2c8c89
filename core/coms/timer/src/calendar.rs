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

//! Translate schedules into calendar events of the service manager.
use rand::{Rng, RngCore};
use std::time::Duration;
use timeutil::schedule::weekday_abbrev;
use timeutil::{Schedule, WeekPos, WeekSpan};

/// Cut from the end of spread windows longer than this so that successive
/// runs do not land right after each other.
const SPREAD_MARGIN: Duration = Duration::from_secs(5 * 60);

fn abbrev_weekdays(span: &WeekSpan) -> String {
    span.weekdays()
        .into_iter()
        .map(weekday_abbrev)
        .collect::<Vec<_>>()
        .join(",")
}

fn calendar_days(span: &WeekSpan) -> String {
    let abbrev = abbrev_weekdays(span);
    match (span.start.pos, span.end.pos) {
        (WeekPos::Every, _) => format!("{} *-*-*", abbrev),
        (WeekPos::Last, _) => format!("{} *-*~7/1", abbrev),
        (WeekPos::Nth(start), end) => {
            let end = match end {
                WeekPos::Nth(end) => end,
                _ => start,
            };
            let start_day = (start as u32 - 1) * 7 + 1;
            let end_day = end as u32 * 7;
            if span.start.weekday == span.end.weekday {
                format!("{} *-*-{}..{}/1", abbrev, start_day, end_day)
            } else {
                // not expressible, keep every day of the range
                format!("*-*-{}..{}/1", start_day, end_day)
            }
        }
    }
}

fn randomized_offset(rng: &mut dyn RngCore, length: Duration) -> Duration {
    let secs = length.as_secs();
    if secs == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs(rng.gen_range(0..secs))
}

/// Translate parsed schedules into `OnCalendar` values, in schedule order
/// and day-major order within a schedule. Spread windows take their time
/// from `rng`.
pub fn generate_on_calendar_schedules(
    schedules: &[Schedule],
    rng: &mut dyn RngCore,
) -> Vec<String> {
    let mut events = Vec::with_capacity(schedules.len());
    for sched in schedules {
        let mut days: Vec<String> = sched.week_spans.iter().map(calendar_days).collect();
        if days.is_empty() {
            days.push("*-*-*".to_string());
        }

        let mut start_times = Vec::with_capacity(sched.clock_spans.len());
        for clocks in &sched.clock_spans {
            for span in clocks.clock_spans() {
                let mut when = span.start;
                if span.spread {
                    let mut length = span.length();
                    if length > SPREAD_MARGIN {
                        length -= SPREAD_MARGIN;
                    }
                    when = when.add(randomized_offset(rng, length));
                }
                start_times.push(when.fold_end_of_day().to_string());
            }
        }

        for day in &days {
            for time in &start_times {
                events.push(format!("{} {}", day, time));
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use timeutil::{parse_schedule, Clock};

    fn translate(text: &str) -> Vec<String> {
        let scheds = parse_schedule(text).unwrap();
        generate_on_calendar_schedules(&scheds, &mut StepRng::new(0, 0))
    }

    #[test]
    fn test_fixed_times() {
        assert_eq!(translate("mon-tue,10:00"), vec!["mon,tue *-*-* 10:00:00"]);
        assert_eq!(translate("fri5,23:59"), vec!["fri *-*~7/1 23:59:00"]);
        assert_eq!(translate("mon1-mon2,08:00"), vec!["mon *-*-1..14/1 08:00:00"]);
        assert_eq!(translate("mon1,9:00"), vec!["mon *-*-1..7/1 09:00:00"]);
        assert_eq!(translate("24:00"), vec!["*-*-* 00:00:00"]);
    }

    #[test]
    fn test_week_wrap_and_over_approximation() {
        assert_eq!(
            translate("fri-mon,10:00"),
            vec!["fri,sat,sun,mon *-*-* 10:00:00"]
        );
        assert_eq!(translate("mon1-tue2,10:00"), vec!["*-*-1..14/1 10:00:00"]);
        assert_eq!(translate("sat5-sun5,1:00"), vec!["sat,sun *-*~7/1 01:00:00"]);
    }

    #[test]
    fn test_cross_product_order() {
        assert_eq!(
            translate("mon,fri,10:00,15:30,,sun,11:00"),
            vec![
                "mon *-*-* 10:00:00",
                "mon *-*-* 15:30:00",
                "fri *-*-* 10:00:00",
                "fri *-*-* 15:30:00",
                "sun *-*-* 11:00:00",
            ]
        );
    }

    #[test]
    fn test_ranges_and_splits() {
        assert_eq!(translate("10:00-12:00"), vec!["*-*-* 10:00:00"]);
        assert_eq!(
            translate("10:00-12:00/4"),
            vec![
                "*-*-* 10:00:00",
                "*-*-* 10:30:00",
                "*-*-* 11:00:00",
                "*-*-* 11:30:00",
            ]
        );
        // whole day, offset zero
        assert_eq!(translate("mon"), vec!["mon *-*-* 00:00:00"]);
    }

    #[test]
    fn test_split_down_to_minutes() {
        assert_eq!(
            translate("10:00-10:02/2"),
            vec!["*-*-* 10:00:00", "*-*-* 10:01:00"]
        );
        assert!(parse_schedule("10:00-10:01/120").is_err());
        assert!(parse_schedule("10:00~12:00/4000000000").is_err());
    }

    fn sampled(text: &str, seed: u64) -> Clock {
        let scheds = parse_schedule(text).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let events = generate_on_calendar_schedules(&scheds, &mut rng);
        assert_eq!(events.len(), 1);
        let time = events[0].rsplit(' ').next().unwrap();
        let parts: Vec<u32> = time.split(':').map(|p| p.parse().unwrap()).collect();
        Clock::with_seconds(parts[0], parts[1], parts[2]).unwrap()
    }

    #[test]
    fn test_spread_window_is_reduced() {
        let start = Clock::new(10, 0).unwrap();
        for seed in 0..200 {
            let when = sampled("10:00~10:06", seed);
            assert!(when >= start);
            assert!(when < Clock::new(10, 1).unwrap(), "{}", when);
        }
    }

    #[test]
    fn test_short_spread_window_is_kept() {
        let start = Clock::new(10, 0).unwrap();
        let mut latest = start;
        for seed in 0..200 {
            let when = sampled("10:00~10:04", seed);
            assert!(when >= start);
            assert!(when < Clock::new(10, 4).unwrap(), "{}", when);
            latest = latest.max(when);
        }
        // samples reach past the reduced window of longer spans
        assert!(latest >= Clock::new(10, 1).unwrap());
    }

    #[test]
    fn test_spread_wraps_midnight() {
        for seed in 0..50 {
            let when = sampled("23:58~23:59", seed);
            assert!(when >= Clock::new(23, 58).unwrap());
        }
        assert_eq!(translate("23:30~00:15"), vec!["*-*-* 23:30:00"]);
    }
}
