use std::time::{Duration, Instant};

use tracing::debug;

use crate::app::adb::runner::run_adb;
use crate::app::adb::shell::{
    am_start_action_args, getprop_args, input_keyevent_args, input_swipe_args, input_tap_args,
    parse_getprop_int, parse_wm_size, settings_put_system_args, uiautomator_dump_args,
    wm_size_args,
};
use crate::app::config::TimeoutSettings;
use crate::app::error::AppError;
use crate::app::uiauto::hierarchy::{parse_hierarchy, UiNode};
use crate::app::uiauto::selector::Selector;

/// The UI-automation capability surface the launcher strategies and BVT cases
/// consume: element lookup by selector, bounded waits, synthetic gestures,
/// display geometry, and a handful of device controls. Production sessions run
/// over adb; tests script this trait directly.
pub trait UiSession {
    fn has_object(&self, selector: &Selector) -> Result<bool, AppError>;
    fn find_object(&self, selector: &Selector) -> Result<Option<UiNode>, AppError>;
    /// Polls for the selector until found or the timeout elapses. A timeout
    /// yields `Ok(None)`; only transport failures are errors.
    fn wait_for_object(&self, selector: &Selector, timeout: Duration)
        -> Result<Option<UiNode>, AppError>;
    /// Swipe with uiautomator step semantics (one step is roughly 5 ms).
    fn swipe(&self, start_x: i32, start_y: i32, end_x: i32, end_y: i32, steps: i32)
        -> Result<(), AppError>;
    fn click(&self, x: i32, y: i32) -> Result<(), AppError>;
    fn press_home(&self) -> Result<(), AppError>;
    fn wake_up(&self) -> Result<(), AppError>;
    fn display_width(&self) -> Result<i32, AppError>;
    fn display_height(&self) -> Result<i32, AppError>;
    fn wait_for_idle(&self) -> Result<(), AppError>;
    fn set_orientation_natural(&self) -> Result<(), AppError>;
    fn unfreeze_rotation(&self) -> Result<(), AppError>;
    /// API level the device first shipped with (`ro.product.first_api_level`,
    /// falling back to the running SDK level).
    fn first_api_level(&self) -> Result<i32, AppError>;
    fn start_activity(&self, action: &str) -> Result<(), AppError>;
}

pub struct AdbUiSession {
    program: String,
    serial: String,
    timeouts: TimeoutSettings,
    command_timeout: Duration,
    trace_id: String,
}

impl AdbUiSession {
    pub fn new(
        program: impl Into<String>,
        serial: impl Into<String>,
        timeouts: TimeoutSettings,
        command_timeout: Duration,
        trace_id: impl Into<String>,
    ) -> Self {
        Self {
            program: program.into(),
            serial: serial.into(),
            timeouts,
            command_timeout,
            trace_id: trace_id.into(),
        }
    }

    pub fn serial(&self) -> &str {
        &self.serial
    }

    fn shell(&self, args: Vec<String>) -> Result<String, AppError> {
        let output = run_adb(&self.program, &args, self.command_timeout, &self.trace_id)?;
        if !output.succeeded() {
            let detail = if output.stderr.trim().is_empty() {
                output.stdout.trim().to_string()
            } else {
                output.stderr.trim().to_string()
            };
            return Err(AppError::dependency(
                format!("adb shell failed: {detail}"),
                &self.trace_id,
            ));
        }
        Ok(output.stdout)
    }

    /// Fresh snapshot per query; hierarchy state is never cached.
    fn dump_hierarchy(&self) -> Result<UiNode, AppError> {
        let xml = self.shell(uiautomator_dump_args(&self.serial))?;
        parse_hierarchy(&xml).map_err(|err| {
            AppError::dependency(format!("Failed to parse hierarchy dump: {err}"), &self.trace_id)
        })
    }

    fn keyevent(&self, keycode: &str) -> Result<(), AppError> {
        self.shell(input_keyevent_args(&self.serial, keycode))?;
        Ok(())
    }
}

impl UiSession for AdbUiSession {
    fn has_object(&self, selector: &Selector) -> Result<bool, AppError> {
        Ok(self.find_object(selector)?.is_some())
    }

    fn find_object(&self, selector: &Selector) -> Result<Option<UiNode>, AppError> {
        let root = self.dump_hierarchy()?;
        Ok(root.find(selector).cloned())
    }

    fn wait_for_object(
        &self,
        selector: &Selector,
        timeout: Duration,
    ) -> Result<Option<UiNode>, AppError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(node) = self.find_object(selector)? {
                return Ok(Some(node));
            }
            if Instant::now() >= deadline {
                debug!(selector = %selector, timeout_ms = timeout.as_millis() as u64,
                    "wait_for_object timed out");
                return Ok(None);
            }
            std::thread::sleep(Duration::from_millis(self.timeouts.poll_interval_ms));
        }
    }

    fn swipe(
        &self,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        steps: i32,
    ) -> Result<(), AppError> {
        self.shell(input_swipe_args(
            &self.serial,
            start_x,
            start_y,
            end_x,
            end_y,
            steps,
            self.timeouts.swipe_step_ms,
        ))?;
        Ok(())
    }

    fn click(&self, x: i32, y: i32) -> Result<(), AppError> {
        self.shell(input_tap_args(&self.serial, x, y))?;
        Ok(())
    }

    fn press_home(&self) -> Result<(), AppError> {
        self.keyevent("KEYCODE_HOME")
    }

    fn wake_up(&self) -> Result<(), AppError> {
        self.keyevent("KEYCODE_WAKEUP")
    }

    fn display_width(&self) -> Result<i32, AppError> {
        let output = self.shell(wm_size_args(&self.serial))?;
        parse_wm_size(&output)
            .map(|(width, _)| width)
            .ok_or_else(|| AppError::dependency("Failed to parse wm size output", &self.trace_id))
    }

    fn display_height(&self) -> Result<i32, AppError> {
        let output = self.shell(wm_size_args(&self.serial))?;
        parse_wm_size(&output)
            .map(|(_, height)| height)
            .ok_or_else(|| AppError::dependency("Failed to parse wm size output", &self.trace_id))
    }

    fn wait_for_idle(&self) -> Result<(), AppError> {
        // No accessibility idle callback over adb; a fixed settle sleep is the
        // host-side equivalent.
        std::thread::sleep(Duration::from_millis(self.timeouts.idle_settle_ms));
        Ok(())
    }

    fn set_orientation_natural(&self) -> Result<(), AppError> {
        self.shell(settings_put_system_args(&self.serial, "accelerometer_rotation", "0"))?;
        self.shell(settings_put_system_args(&self.serial, "user_rotation", "0"))?;
        Ok(())
    }

    fn unfreeze_rotation(&self) -> Result<(), AppError> {
        self.shell(settings_put_system_args(&self.serial, "accelerometer_rotation", "1"))?;
        Ok(())
    }

    fn first_api_level(&self) -> Result<i32, AppError> {
        let output = self.shell(getprop_args(&self.serial, "ro.product.first_api_level"))?;
        if let Some(level) = parse_getprop_int(&output) {
            return Ok(level);
        }
        let fallback = self.shell(getprop_args(&self.serial, "ro.build.version.sdk"))?;
        parse_getprop_int(&fallback).ok_or_else(|| {
            AppError::dependency("Device reports no usable API level", &self.trace_id)
        })
    }

    fn start_activity(&self, action: &str) -> Result<(), AppError> {
        let output = self.shell(am_start_action_args(&self.serial, action))?;
        if output.contains("Error:") {
            return Err(AppError::dependency(
                format!("am start {action} failed: {}", output.trim()),
                &self.trace_id,
            ));
        }
        Ok(())
    }
}
