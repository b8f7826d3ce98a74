pub mod connectivity;

use std::time::Instant;

use serde::Serialize;
use tracing::{error, info};

use crate::app::error::AppError;

pub use connectivity::ConnectivityContext;

/// The connectivity BVT cases this harness ships. One-at-a-time execution;
/// each case runs SETUP, its scripted body, then best-effort TEARDOWN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvtCase {
    WifiConnection,
    WifiDiscoveredApShownUi,
}

impl BvtCase {
    pub fn name(&self) -> &'static str {
        match self {
            BvtCase::WifiConnection => "wifi-connection",
            BvtCase::WifiDiscoveredApShownUi => "wifi-ap-ui",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wifi-connection" => Some(BvtCase::WifiConnection),
            "wifi-ap-ui" => Some(BvtCase::WifiDiscoveredApShownUi),
            _ => None,
        }
    }

    pub fn all() -> Vec<BvtCase> {
        vec![BvtCase::WifiConnection, BvtCase::WifiDiscoveredApShownUi]
    }
}

#[derive(Debug, Serialize)]
pub struct CaseReport {
    pub case: &'static str,
    pub status: &'static str, // pass|fail
    pub duration_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.status == "pass"
    }
}

pub fn run_case(ctx: &ConnectivityContext, case: BvtCase) -> CaseReport {
    let start = Instant::now();
    info!(case = case.name(), "running BVT case");

    let result = connectivity::setup(ctx).and_then(|_| match case {
        BvtCase::WifiConnection => connectivity::test_wifi_connection(ctx),
        BvtCase::WifiDiscoveredApShownUi => connectivity::test_wifi_discovered_ap_shown_ui(ctx),
    });
    // Teardown runs whether or not the case failed; mid-case failures can
    // leave the network disabled and that is accepted.
    connectivity::teardown(ctx);

    let duration_ms = start.elapsed().as_millis();
    match result {
        Ok(()) => {
            info!(case = case.name(), duration_ms = duration_ms as u64, "case passed");
            CaseReport {
                case: case.name(),
                status: "pass",
                duration_ms,
                error_code: None,
                error: None,
            }
        }
        Err(err) => {
            error!(case = case.name(), code = %err.code, error = %err.error, "case failed");
            CaseReport {
                case: case.name(),
                status: "fail",
                duration_ms,
                error_code: Some(err.code),
                error: Some(err.error),
            }
        }
    }
}

pub fn resolve_cases(selection: &str) -> Result<Vec<BvtCase>, AppError> {
    if selection == "all" {
        return Ok(BvtCase::all());
    }
    BvtCase::from_name(selection)
        .map(|case| vec![case])
        .ok_or_else(|| AppError::validation(format!("Unknown case: {selection}"), ""))
}
