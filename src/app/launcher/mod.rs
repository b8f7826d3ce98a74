pub mod launcher3;
pub mod nexus;

use crate::app::config::TimeoutSettings;
use crate::app::error::AppError;
use crate::app::uiauto::hierarchy::UiNode;
use crate::app::uiauto::selector::Selector;
use crate::app::uiauto::session::UiSession;

pub use launcher3::Launcher3Strategy;
pub use nexus::NexusLauncherStrategy;

/// Capability contract every supported launcher exposes. One variant per OEM
/// launcher build; the variant knows the resource ids and gesture sequences
/// for that launcher's drawer and overview surfaces.
pub trait LauncherStrategy {
    /// The launcher package this variant matches; the lookup table routes on it.
    fn supported_launcher_package(&self) -> &'static str;
    fn all_apps_selector(&self) -> Selector;
    /// Some launchers removed the dedicated all-apps button; those variants
    /// report `ERR_UNSUPPORTED` and callers must treat it as a permanent
    /// capability gap, not a transient failure.
    fn all_apps_button_selector(&self) -> Result<Selector, AppError>;
    fn hot_seat_selector(&self) -> Selector;
    /// Go to the launcher home screen.
    fn open(&self, session: &dyn UiSession) -> Result<(), AppError>;
    /// Open the all-apps drawer, re-navigating from home when needed (or when
    /// `reset` forces it), and return the located container node.
    fn open_all_apps(&self, session: &dyn UiSession, reset: bool) -> Result<UiNode, AppError>;
}

/// Explicit package-name lookup, not hierarchy dispatch. Closed set: adding a
/// launcher means adding a variant and an arm here.
pub fn strategy_for_package(
    package: &str,
    timeouts: &TimeoutSettings,
) -> Option<Box<dyn LauncherStrategy>> {
    match package {
        nexus::LAUNCHER_PACKAGE => Some(Box::new(NexusLauncherStrategy::new(timeouts.clone()))),
        launcher3::LAUNCHER_PACKAGE => Some(Box::new(Launcher3Strategy::new(timeouts.clone()))),
        _ => None,
    }
}

pub fn supported_launcher_packages() -> Vec<&'static str> {
    vec![nexus::LAUNCHER_PACKAGE, launcher3::LAUNCHER_PACKAGE]
}

/// ~100 px of travel per step, never fewer than one step.
pub(crate) fn steps_for_distance(start_y: i32, end_y: i32) -> i32 {
    ((start_y - end_y) / 100).max(1)
}
