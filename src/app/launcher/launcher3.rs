use std::time::Duration;

use crate::app::config::TimeoutSettings;
use crate::app::error::AppError;
use crate::app::launcher::LauncherStrategy;
use crate::app::uiauto::hierarchy::UiNode;
use crate::app::uiauto::selector::Selector;
use crate::app::uiauto::session::UiSession;

pub const LAUNCHER_PACKAGE: &str = "com.android.launcher3";

/// Baseline AOSP Launcher3 strategy: the drawer opens through a dedicated
/// all-apps button on the hotseat.
pub struct Launcher3Strategy {
    timeouts: TimeoutSettings,
}

impl Launcher3Strategy {
    pub fn new(timeouts: TimeoutSettings) -> Self {
        Self { timeouts }
    }

    fn element_wait(&self) -> Duration {
        Duration::from_millis(self.timeouts.element_wait_ms)
    }
}

impl LauncherStrategy for Launcher3Strategy {
    fn supported_launcher_package(&self) -> &'static str {
        LAUNCHER_PACKAGE
    }

    fn all_apps_selector(&self) -> Selector {
        Selector::res(self.supported_launcher_package(), "apps_view")
    }

    fn all_apps_button_selector(&self) -> Result<Selector, AppError> {
        Ok(Selector::res(self.supported_launcher_package(), "all_apps_button"))
    }

    fn hot_seat_selector(&self) -> Selector {
        Selector::res(self.supported_launcher_package(), "hotseat")
    }

    fn open(&self, session: &dyn UiSession) -> Result<(), AppError> {
        session.press_home()
    }

    fn open_all_apps(&self, session: &dyn UiSession, reset: bool) -> Result<UiNode, AppError> {
        let all_apps = self.all_apps_selector();
        if !session.has_object(&all_apps)? || reset {
            self.open(session)?;
            let button_selector = self.all_apps_button_selector()?;
            let button = session
                .wait_for_object(&button_selector, self.element_wait())?
                .ok_or_else(|| {
                    AppError::assertion("openAllApps: did not find all apps button", "")
                })?;
            session.click(button.bounds.center_x(), button.bounds.center_y())?;
        }
        session
            .wait_for_object(&all_apps, self.element_wait())?
            .ok_or_else(|| {
                AppError::assertion("openAllApps: did not find all apps container", "")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::uiauto::fake::FakeUiSession;
    use crate::app::uiauto::hierarchy::Bounds;

    const APPS_VIEW: &str = "com.android.launcher3:id/apps_view";
    const ALL_APPS_BUTTON: &str = "com.android.launcher3:id/all_apps_button";

    fn strategy() -> Launcher3Strategy {
        let mut timeouts = TimeoutSettings::default();
        timeouts.element_wait_ms = 1;
        timeouts.poll_interval_ms = 50;
        Launcher3Strategy::new(timeouts)
    }

    #[test]
    fn exposes_an_all_apps_button() {
        let selector = strategy().all_apps_button_selector().expect("supported here");
        assert_eq!(selector.qualified_id(), ALL_APPS_BUTTON);
    }

    #[test]
    fn open_all_apps_clicks_the_button() {
        let session = FakeUiSession::new(1080, 1920, 24);
        session.place(ALL_APPS_BUTTON, Bounds { left: 490, top: 1650, right: 590, bottom: 1750 });
        session.reveal_on_click(APPS_VIEW, Bounds { left: 0, top: 0, right: 1080, bottom: 1920 });
        let node = strategy().open_all_apps(&session, false).expect("all apps");
        assert_eq!(node.resource_id, APPS_VIEW);
        assert_eq!(
            session.actions(),
            vec!["press_home".to_string(), "click 540,1700".to_string()]
        );
    }

    #[test]
    fn open_all_apps_is_a_no_op_when_drawer_open_and_no_reset() {
        let session = FakeUiSession::new(1080, 1920, 24);
        session.place(APPS_VIEW, Bounds { left: 0, top: 0, right: 1080, bottom: 1920 });
        strategy().open_all_apps(&session, false).expect("all apps");
        assert!(session.actions().is_empty());
    }
}
