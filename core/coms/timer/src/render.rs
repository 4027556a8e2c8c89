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

//! Render the timer unit of an application.
use crate::calendar::generate_on_calendar_schedules;
use appcore::validate::validate_app;
use appcore::{ApplicationDescriptor, Error, PackageInfo, Result, ResultExt, ScheduleParseSnafu};
use rand::RngCore;
use std::fmt::Write;
use timeutil::parse_schedule;

/// Validate the application, translate its schedule and render its timer
/// unit. A schedule that does not parse yields no unit.
pub fn generate_timer_file(
    pkg: &PackageInfo,
    app: &ApplicationDescriptor,
    rng: &mut dyn RngCore,
) -> Result<Vec<u8>> {
    validate_app(app)?;
    let timer = app
        .timer
        .as_ref()
        .ok_or_else(|| Error::validation(&app.name, "no timer"))?;

    let schedules = parse_schedule(&timer.timer).context(ScheduleParseSnafu {
        app: app.name.clone(),
    })?;
    let events = generate_on_calendar_schedules(&schedules, rng);
    log::debug!(
        "Timer of {}.{}: {:?} => {:?}",
        pkg.instance_name(),
        app.name,
        timer.timer,
        events
    );

    let mount_unit = pkg.mount_unit();
    let mut out = String::new();
    let _ = writeln!(out, "[Unit]");
    let _ = writeln!(out, "{}", constants::UNIT_AUTOGEN_COMMENT);
    let _ = writeln!(
        out,
        "Description=Timer {} for snap application {}.{}",
        app.name,
        pkg.instance_name(),
        app.name
    );
    let _ = writeln!(out, "Requires={}", mount_unit);
    let _ = writeln!(out, "After={}", mount_unit);
    let _ = writeln!(out, "{}", constants::UNIT_MARKER);
    let _ = writeln!(out);
    let _ = writeln!(out, "[Timer]");
    let _ = writeln!(out, "Unit={}", pkg.service_name(app));
    for event in &events {
        let _ = writeln!(out, "OnCalendar={}", event);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[Install]");
    let _ = writeln!(out, "WantedBy={}", constants::TIMERS_TARGET);

    Ok(out.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use appcore::TimerDescriptor;
    use rand::rngs::mock::StepRng;

    fn app(schedule: &str) -> ApplicationDescriptor {
        ApplicationDescriptor {
            name: "svc".to_string(),
            daemon: "oneshot".to_string(),
            command: "bin/job".to_string(),
            timer: Some(TimerDescriptor {
                timer: schedule.to_string(),
            }),
            ..Default::default()
        }
    }

    fn pkg() -> PackageInfo {
        PackageInfo {
            name: "hello".to_string(),
            instance_key: String::new(),
            revision: "7".to_string(),
            apps: Vec::new(),
        }
    }

    #[test]
    fn test_timer_file() {
        let out = generate_timer_file(&pkg(), &app("mon-tue,10:00,,fri5,23:59"), &mut StepRng::new(0, 0))
            .unwrap();
        let expected = "[Unit]
# Auto-generated, DO NOT EDIT
Description=Timer svc for snap application hello.svc
Requires=snap-hello-7.mount
After=snap-hello-7.mount
X-Snappy=yes

[Timer]
Unit=snap.hello.svc.service
OnCalendar=mon,tue *-*-* 10:00:00
OnCalendar=fri *-*~7/1 23:59:00

[Install]
WantedBy=timers.target
";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_bad_schedule() {
        let err = generate_timer_file(&pkg(), &app("mon,25:00"), &mut StepRng::new(0, 0))
            .unwrap_err();
        assert!(matches!(err, Error::ScheduleParse { .. }));
    }

    #[test]
    fn test_no_timer() {
        let mut a = app("10:00");
        a.timer = None;
        assert!(matches!(
            generate_timer_file(&pkg(), &a, &mut StepRng::new(0, 0)),
            Err(Error::Validation { .. })
        ));
    }
}
