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

//! appmaster command line.
use appcore::{ApplicationDescriptor, Dirs, Error, LogInteracter, PackageInfo, Result};
use appmaster::config::ManagerConfig;
use appmaster::manifest::load_manifest;
use appmaster::systemctl::Systemctl;
use appmaster::wrappers::{ServiceWrappers, StopReason};
use clap::Parser;
use std::path::PathBuf;
use std::process::exit;
use std::rc::Rc;

/// parse program arguments
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[clap(short, long)]
    config: Option<String>,

    /// Root directory overriding RootDir of the configuration
    #[clap(long)]
    root: Option<String>,

    #[clap(subcommand)]
    subcmd: SubCmd,
}

#[derive(Parser, Debug)]
enum SubCmd {
    /// Write and enable the units of a package
    #[clap(display_order = 1)]
    Add {
        manifest: PathBuf,
        /// Service to leave disabled
        #[clap(long)]
        disabled: Vec<String>,
    },

    /// Start services, all of them when none is named
    #[clap(display_order = 2)]
    Start {
        manifest: PathBuf,
        apps: Vec<String>,
    },

    /// Stop services, all of them when none is named
    #[clap(display_order = 3)]
    Stop {
        manifest: PathBuf,
        /// other, refresh or remove
        #[clap(long, default_value = "other")]
        reason: StopReason,
        apps: Vec<String>,
    },

    /// Disable and delete the units of a package
    #[clap(display_order = 4)]
    Remove { manifest: PathBuf },

    /// Show whether each service is enabled
    #[clap(display_order = 5)]
    Status { manifest: PathBuf },

    /// Print the units generated for an app
    #[clap(display_order = 6)]
    Render { manifest: PathBuf, app: String },

    /// Print the OnCalendar lines of a timer schedule
    #[clap(display_order = 7)]
    Calendar { schedule: String },
}

/// Named apps in the given order, every service when no name is given.
fn select_apps<'a>(pkg: &'a PackageInfo, names: &[String]) -> Result<Vec<&'a ApplicationDescriptor>> {
    if names.is_empty() {
        return Ok(pkg.services().collect());
    }
    names
        .iter()
        .map(|n| {
            pkg.app(n).ok_or_else(|| Error::Other {
                msg: format!("package {} has no app {:?}", pkg.instance_name(), n),
            })
        })
        .collect()
}

fn render(wrappers: &ServiceWrappers, pkg: &PackageInfo, name: &str) -> Result<()> {
    let app = pkg.app(name).ok_or_else(|| Error::Other {
        msg: format!("package {} has no app {:?}", pkg.instance_name(), name),
    })?;
    let dirs = wrappers.dirs();

    let mut units = vec![(
        dirs.service_file(pkg, app),
        service::generate_service_file(pkg, app, dirs)?,
    )];
    units.extend(socket::generate_socket_files(pkg, app, dirs)?);
    if app.timer.is_some() {
        units.push((dirs.timer_file(pkg, app), wrappers.generate_timer_file(pkg, app)?));
    }

    for (path, content) in units {
        println!("# {}", path.display());
        println!("{}", String::from_utf8_lossy(&content));
    }
    Ok(())
}

fn run(args: Args, config: &ManagerConfig) -> Result<()> {
    let wrappers = ServiceWrappers::from_config(Rc::new(Systemctl::new(
        &config.SystemctlPath,
        &Dirs::new(&config.RootDir, &config.LauncherPath),
        config.default_start_timeout(),
    )), config);
    let inter = LogInteracter;

    match args.subcmd {
        SubCmd::Add { manifest, disabled } => {
            let pkg = load_manifest(&manifest)?;
            wrappers.add_services(&pkg, &disabled, &inter)
        }
        SubCmd::Start { manifest, apps } => {
            let pkg = load_manifest(&manifest)?;
            let apps = select_apps(&pkg, &apps)?;
            wrappers.start_services(&pkg, &apps, &inter)
        }
        SubCmd::Stop {
            manifest,
            reason,
            apps,
        } => {
            let pkg = load_manifest(&manifest)?;
            let apps = select_apps(&pkg, &apps)?;
            wrappers.stop_services(&pkg, &apps, reason, &inter)
        }
        SubCmd::Remove { manifest } => {
            let pkg = load_manifest(&manifest)?;
            wrappers.remove_services(&pkg, &inter)
        }
        SubCmd::Status { manifest } => {
            let pkg = load_manifest(&manifest)?;
            let states = wrappers.services_enable_state(&pkg)?;
            for app in pkg.services() {
                let state = match states.get(&app.name) {
                    Some(true) => "enabled",
                    _ => "disabled",
                };
                println!("{}\t{}", app.name, state);
            }
            Ok(())
        }
        SubCmd::Render { manifest, app } => {
            let pkg = load_manifest(&manifest)?;
            render(&wrappers, &pkg, &app)
        }
        SubCmd::Calendar { schedule } => {
            let schedules = timeutil::parse_schedule(&schedule).map_err(|e| Error::Other {
                msg: e.to_string(),
            })?;
            let mut rng = rand::thread_rng();
            for line in timer::generate_on_calendar_schedules(&schedules, &mut rng) {
                println!("{}", line);
            }
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();

    let mut config = ManagerConfig::new(args.config.as_deref());
    if let Some(root) = &args.root {
        config.RootDir = root.clone();
    }
    log::init_log(
        "appmaster",
        log::parse_level(&config.LogLevel),
        &config.log_targets(),
        &config.LogFile,
    );

    if let Err(e) = run(args, &config) {
        log::error!("{}", e);
        eprintln!("appmaster: {}", e);
        exit(1);
    }
}
