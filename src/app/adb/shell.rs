use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub serial: String,
    pub state: String,
    pub model: Option<String>,
}

pub fn parse_adb_devices(output: &str) -> Vec<DeviceSummary> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.trim_start().starts_with('*'))
        .filter(|line| !line.to_lowercase().contains("list of devices"))
        .filter_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < 2 {
                return None;
            }
            let serial = tokens[0].to_string();
            let state = tokens[1].to_string();
            let model = tokens
                .iter()
                .skip(2)
                .find_map(|token| token.strip_prefix("model:").map(|value| value.to_string()));
            Some(DeviceSummary { serial, state, model })
        })
        .collect()
}

/// `adb -s SERIAL shell ...` argument vector for a device shell command.
pub fn shell_args(serial: &str, tail: &[&str]) -> Vec<String> {
    let mut args = vec!["-s".to_string(), serial.to_string(), "shell".to_string()];
    args.extend(tail.iter().map(|part| part.to_string()));
    args
}

pub fn input_keyevent_args(serial: &str, keycode: &str) -> Vec<String> {
    shell_args(serial, &["input", "keyevent", keycode])
}

/// `input swipe` takes a duration in milliseconds; uiautomator expressed the
/// same gesture in steps of roughly 5 ms each, so callers pass steps and a
/// per-step cost.
pub fn input_swipe_args(
    serial: &str,
    start_x: i32,
    start_y: i32,
    end_x: i32,
    end_y: i32,
    steps: i32,
    step_ms: u64,
) -> Vec<String> {
    let duration_ms = (steps.max(1) as u64) * step_ms.max(1);
    shell_args(
        serial,
        &[
            "input",
            "swipe",
            &start_x.to_string(),
            &start_y.to_string(),
            &end_x.to_string(),
            &end_y.to_string(),
            &duration_ms.to_string(),
        ],
    )
}

pub fn input_tap_args(serial: &str, x: i32, y: i32) -> Vec<String> {
    shell_args(serial, &["input", "tap", &x.to_string(), &y.to_string()])
}

pub fn am_start_action_args(serial: &str, action: &str) -> Vec<String> {
    shell_args(serial, &["am", "start", "-a", action])
}

pub fn uiautomator_dump_args(serial: &str) -> Vec<String> {
    // Dump to stdout; the /dev/tty trick is flaky across builds, so dump to a
    // fixed file and cat it in one shell invocation.
    shell_args(
        serial,
        &[
            "sh",
            "-c",
            "uiautomator dump /sdcard/droidbvt_window_dump.xml >/dev/null 2>&1 && cat /sdcard/droidbvt_window_dump.xml",
        ],
    )
}

pub fn wm_size_args(serial: &str) -> Vec<String> {
    shell_args(serial, &["wm", "size"])
}

pub fn getprop_args(serial: &str, prop: &str) -> Vec<String> {
    shell_args(serial, &["getprop", prop])
}

pub fn settings_put_system_args(serial: &str, key: &str, value: &str) -> Vec<String> {
    shell_args(serial, &["settings", "put", "system", key, value])
}

/// Parses `wm size` output. An `Override size:` line wins over the physical
/// size when both are present.
pub fn parse_wm_size(output: &str) -> Option<(i32, i32)> {
    let size_re = Regex::new(r"(?i)(physical|override)\s+size:\s*(\d+)\s*x\s*(\d+)").ok()?;
    let mut physical = None;
    let mut override_size = None;
    for caps in size_re.captures_iter(output) {
        let width = caps[2].parse::<i32>().ok()?;
        let height = caps[3].parse::<i32>().ok()?;
        if caps[1].eq_ignore_ascii_case("override") {
            override_size = Some((width, height));
        } else {
            physical = Some((width, height));
        }
    }
    override_size.or(physical)
}

pub fn parse_getprop_int(output: &str) -> Option<i32> {
    output
        .lines()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())?
        .parse::<i32>()
        .ok()
}
