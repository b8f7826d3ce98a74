use std::time::Duration;

use regex::Regex;

use crate::app::adb::runner::run_adb;
use crate::app::adb::shell::shell_args;
use crate::app::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiConnectionInfo {
    pub network_id: i32,
    pub ssid: Option<String>,
}

/// The slice of the platform connectivity manager the BVT cases consume.
/// Production control goes over adb; tests script this trait.
pub trait WifiController {
    fn is_wifi_enabled(&self) -> Result<bool, AppError>;
    /// Currently associated network, `None` when not connected.
    fn connection_info(&self) -> Result<Option<WifiConnectionInfo>, AppError>;
    fn disconnect(&self) -> Result<bool, AppError>;
    fn disable_network(&self, network_id: i32) -> Result<bool, AppError>;
    fn enable_network(&self, network_id: i32, attempt_connect: bool) -> Result<bool, AppError>;
    fn save_configuration(&self) -> Result<bool, AppError>;
}

/// Parses a `settings get global wifi_on` style value.
pub fn parse_settings_bool(output: &str) -> Option<bool> {
    let value = output
        .lines()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())?;
    if let Ok(num) = value.parse::<i32>() {
        return Some(num != 0);
    }
    match value.to_lowercase().as_str() {
        "true" | "on" | "enabled" => Some(true),
        "false" | "off" | "disabled" => Some(false),
        _ => None,
    }
}

/// Pulls the associated network out of `dumpsys wifi` output. The interesting
/// line looks like `mWifiInfo SSID: "lab-ap", BSSID: .., Net ID: 3, ..`;
/// a net id of -1 means not associated.
pub fn parse_connection_info(output: &str) -> Option<WifiConnectionInfo> {
    let net_id_re = Regex::new(r"(?i)\bNet(?:work)?\s*ID:\s*(-?\d+)").ok()?;
    let ssid_re = Regex::new(r#"(?i)\bSSID:\s*"([^"]+)""#).ok()?;

    let network_id = net_id_re
        .captures(output)
        .and_then(|caps| caps[1].parse::<i32>().ok())?;
    if network_id < 0 {
        return None;
    }
    let ssid = ssid_re
        .captures(output)
        .map(|caps| caps[1].to_string())
        .filter(|ssid| ssid != "<unknown ssid>");
    Some(WifiConnectionInfo { network_id, ssid })
}

/// Wi-Fi control over adb. Per-network granularity collapses onto the radio
/// switch here: there is no shell surface for `enableNetwork(netId)`, and a
/// lab device reconnects to its one saved network as soon as the radio comes
/// back. The network id is still tracked so fixtures restore what they took.
pub struct AdbWifiController {
    program: String,
    serial: String,
    command_timeout: Duration,
    trace_id: String,
}

impl AdbWifiController {
    pub fn new(
        program: impl Into<String>,
        serial: impl Into<String>,
        command_timeout: Duration,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            serial: serial.into(),
            command_timeout,
            trace_id: trace_id.into(),
        }
    }

    fn shell(&self, tail: &[&str]) -> Result<(bool, String), AppError> {
        let args = shell_args(&self.serial, tail);
        let output = run_adb(&self.program, &args, self.command_timeout, &self.trace_id)?;
        Ok((output.succeeded(), output.stdout))
    }
}

impl WifiController for AdbWifiController {
    fn is_wifi_enabled(&self) -> Result<bool, AppError> {
        let (ok, stdout) = self.shell(&["settings", "get", "global", "wifi_on"])?;
        if !ok {
            return Err(AppError::dependency("Failed to read wifi_on setting", &self.trace_id));
        }
        parse_settings_bool(&stdout).ok_or_else(|| {
            AppError::dependency(
                format!("Unrecognized wifi_on value: {}", stdout.trim()),
                &self.trace_id,
            )
        })
    }

    fn connection_info(&self) -> Result<Option<WifiConnectionInfo>, AppError> {
        let (ok, stdout) = self.shell(&["dumpsys", "wifi"])?;
        if !ok {
            return Err(AppError::dependency("dumpsys wifi failed", &self.trace_id));
        }
        Ok(parse_connection_info(&stdout))
    }

    fn disconnect(&self) -> Result<bool, AppError> {
        let (ok, _) = self.shell(&["svc", "wifi", "disable"])?;
        Ok(ok)
    }

    fn disable_network(&self, _network_id: i32) -> Result<bool, AppError> {
        let (ok, _) = self.shell(&["cmd", "wifi", "set-wifi-enabled", "disabled"])?;
        Ok(ok)
    }

    fn enable_network(&self, _network_id: i32, _attempt_connect: bool) -> Result<bool, AppError> {
        let (ok, _) = self.shell(&["svc", "wifi", "enable"])?;
        Ok(ok)
    }

    fn save_configuration(&self) -> Result<bool, AppError> {
        // Network configuration persists automatically on current builds;
        // kept so the fixture contract matches the manager surface.
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_settings_bool_values() {
        assert_eq!(parse_settings_bool("1\n"), Some(true));
        assert_eq!(parse_settings_bool("0\n"), Some(false));
        assert_eq!(parse_settings_bool("enabled"), Some(true));
        assert_eq!(parse_settings_bool("off"), Some(false));
        assert_eq!(parse_settings_bool("null"), None);
        assert_eq!(parse_settings_bool(""), None);
    }

    #[test]
    fn parses_connected_dumpsys_output() {
        let output = r#"Wi-Fi is enabled
mWifiInfo SSID: "lab-ap-5g", BSSID: aa:bb:cc:dd:ee:ff, MAC: 02:00:00:00:00:00, Supplicant state: COMPLETED, Wi-Fi standard: 5, RSSI: -55, Net ID: 3, Metered hint: false"#;
        let info = parse_connection_info(output).expect("connected");
        assert_eq!(info.network_id, 3);
        assert_eq!(info.ssid.as_deref(), Some("lab-ap-5g"));
    }

    #[test]
    fn disassociated_dumpsys_yields_none() {
        let output = r#"mWifiInfo SSID: "<unknown ssid>", BSSID: <none>, Supplicant state: DISCONNECTED, Net ID: -1, Metered hint: false"#;
        assert_eq!(parse_connection_info(output), None);
        assert_eq!(parse_connection_info("no wifi lines at all"), None);
    }

    #[test]
    fn unknown_ssid_still_reports_network_id() {
        let output = r#"mWifiInfo SSID: "<unknown ssid>", Net ID: 7"#;
        let info = parse_connection_info(output).expect("associated");
        assert_eq!(info.network_id, 7);
        assert_eq!(info.ssid, None);
    }
}
