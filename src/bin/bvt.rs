use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use droidbvt::app::adb::locator::{resolve_adb_program, validate_adb_program};
use droidbvt::app::adb::runner::run_adb;
use droidbvt::app::adb::shell::parse_adb_devices;
use droidbvt::app::bvt::{resolve_cases, run_case, CaseReport, ConnectivityContext};
use droidbvt::app::config::{load_config, TimeoutSettings};
use droidbvt::app::error::AppError;
use droidbvt::app::launcher::strategy_for_package;
use droidbvt::app::logging::init_logging;
use droidbvt::app::net_probe::ReqwestProbe;
use droidbvt::app::uiauto::session::AdbUiSession;
use droidbvt::app::wifi::AdbWifiController;

#[derive(Debug, Clone)]
struct Args {
    serial: Option<String>,
    case_selection: String,
    open_all_apps: Option<String>,
    json: bool,
}

#[derive(Serialize)]
struct RunSummary {
    tool: &'static str,
    status: &'static str,
    trace_id: String,
    timestamp_utc: String,
    serial: String,
    adb_program: String,
    cases: Vec<CaseReport>,
}

fn parse_args() -> Result<Args, String> {
    let mut serial = std::env::var("ANDROID_SERIAL")
        .ok()
        .filter(|value| !value.trim().is_empty());
    let mut case_selection = "all".to_string();
    let mut open_all_apps: Option<String> = None;
    let mut json = false;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--serial" => {
                serial = Some(iter.next().ok_or("--serial requires a value")?);
            }
            "--case" => {
                case_selection = iter.next().ok_or("--case requires a value")?;
            }
            "--open-all-apps" => {
                open_all_apps = Some(iter.next().ok_or("--open-all-apps requires a value")?);
            }
            "--json" => json = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    Ok(Args {
        serial,
        case_selection,
        open_all_apps,
        json,
    })
}

fn print_usage() {
    println!(
        "bvt - connectivity build verification over adb\n\n\
         Usage: bvt [--serial SERIAL] [--case all|wifi-connection|wifi-ap-ui]\n\
         \x20          [--open-all-apps LAUNCHER_PACKAGE] [--json]\n\n\
         The serial defaults to ANDROID_SERIAL, then to the only attached\n\
         device. --open-all-apps runs the launcher strategy check for the\n\
         given launcher package before the BVT cases."
    );
}

fn pick_serial(
    program: &str,
    requested: Option<String>,
    timeout: Duration,
    trace_id: &str,
) -> Result<String, AppError> {
    let output = run_adb(
        program,
        &["devices".to_string(), "-l".to_string()],
        timeout,
        trace_id,
    )?;
    let devices: Vec<_> = parse_adb_devices(&output.stdout)
        .into_iter()
        .filter(|device| device.state == "device")
        .collect();

    if let Some(serial) = requested {
        if devices.iter().any(|device| device.serial == serial) {
            return Ok(serial);
        }
        return Err(AppError::dependency(
            format!("Device {serial} is not attached (or not in 'device' state)"),
            trace_id,
        ));
    }
    match devices.as_slice() {
        [] => Err(AppError::dependency("No device attached", trace_id)),
        [only] => Ok(only.serial.clone()),
        many => Err(AppError::validation(
            format!(
                "Multiple devices attached ({}); pass --serial",
                many.iter()
                    .map(|device| device.serial.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            trace_id,
        )),
    }
}

fn open_all_apps_check(
    package: &str,
    session: &AdbUiSession,
    timeouts: &TimeoutSettings,
    trace_id: &str,
) -> CaseReport {
    let start = Instant::now();
    let result = strategy_for_package(package, timeouts)
        .ok_or_else(|| {
            AppError::validation(format!("No strategy for launcher package {package}"), trace_id)
        })
        .and_then(|strategy| strategy.open_all_apps(session, true))
        .map(|_| ());
    let duration_ms = start.elapsed().as_millis();
    match result {
        Ok(()) => CaseReport {
            case: "open-all-apps",
            status: "pass",
            duration_ms,
            error_code: None,
            error: None,
        },
        Err(err) => CaseReport {
            case: "open-all-apps",
            status: "fail",
            duration_ms,
            error_code: Some(err.code),
            error: Some(err.error),
        },
    }
}

fn run() -> Result<RunSummary, AppError> {
    let args = parse_args().map_err(|err| AppError::validation(err, ""))?;
    let trace_id = Uuid::new_v4().to_string();

    let config = load_config()?;
    let program = resolve_adb_program(&config.adb.command_path);
    validate_adb_program(&program, &trace_id)?;
    let command_timeout = Duration::from_secs(config.adb.command_timeout.max(1) as u64);

    let serial = pick_serial(&program, args.serial.clone(), command_timeout, &trace_id)?;
    let session = AdbUiSession::new(
        program.as_str(),
        serial.as_str(),
        config.timeouts.clone(),
        command_timeout,
        trace_id.as_str(),
    );
    let wifi =
        AdbWifiController::new(program.as_str(), serial.as_str(), command_timeout, trace_id.as_str());
    let probe = ReqwestProbe;

    let mut reports = Vec::new();
    if let Some(package) = &args.open_all_apps {
        reports.push(open_all_apps_check(package, &session, &config.timeouts, &trace_id));
    }

    let ctx = ConnectivityContext {
        session: &session,
        wifi: &wifi,
        probe: &probe,
        timeouts: &config.timeouts,
        probe_settings: &config.probe,
        trace_id: &trace_id,
    };
    for case in resolve_cases(&args.case_selection)? {
        reports.push(run_case(&ctx, case));
    }

    let all_passed = reports.iter().all(CaseReport::passed);
    let summary = RunSummary {
        tool: "bvt",
        status: if all_passed { "pass" } else { "fail" },
        trace_id,
        timestamp_utc: Utc::now().to_rfc3339(),
        serial,
        adb_program: program,
        cases: reports,
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        for case in &summary.cases {
            match &case.error {
                Some(error) => println!("{:<16} {}  {} ({}ms)", case.case, case.status, error, case.duration_ms),
                None => println!("{:<16} {}  ({}ms)", case.case, case.status, case.duration_ms),
            }
        }
        println!("overall: {}", summary.status);
    }
    Ok(summary)
}

fn main() {
    init_logging();
    match run() {
        Ok(summary) if summary.status == "pass" => {}
        Ok(_) => std::process::exit(1),
        Err(err) => {
            eprintln!("bvt: {err}");
            std::process::exit(2);
        }
    }
}
