use std::time::Duration;

use tracing::debug;

use crate::app::config::TimeoutSettings;
use crate::app::error::AppError;
use crate::app::launcher::{steps_for_distance, LauncherStrategy};
use crate::app::uiauto::hierarchy::UiNode;
use crate::app::uiauto::selector::Selector;
use crate::app::uiauto::session::UiSession;

pub const LAUNCHER_PACKAGE: &str = "com.google.android.apps.nexuslauncher";
const SYSTEMUI_PACKAGE: &str = "com.android.systemui";

/// First device API level at which the launcher puts overview in front of the
/// drawer gesture (Android O).
const FIRST_API_LEVEL_O: i32 = 26;

/// Strategy for the Nexus/Pixel launcher.
pub struct NexusLauncherStrategy {
    timeouts: TimeoutSettings,
}

impl NexusLauncherStrategy {
    pub fn new(timeouts: TimeoutSettings) -> Self {
        Self { timeouts }
    }

    fn overview_selector(&self) -> Selector {
        Selector::res(LAUNCHER_PACKAGE, "overview_panel")
    }

    fn element_wait(&self) -> Duration {
        Duration::from_millis(self.timeouts.element_wait_ms)
    }

    /// Swipe from the navigation home button to 3/4 down the screen to bring
    /// up the overview panel.
    fn press_ui_recent_apps(&self, session: &dyn UiSession) -> Result<(), AppError> {
        let home_button = session
            .find_object(&Selector::res(SYSTEMUI_PACKAGE, "home_button"))?
            .ok_or_else(|| AppError::assertion("Home button not found", ""))?;
        let center_x = home_button.bounds.center_x();
        let center_y = home_button.bounds.center_y();
        let three_quarter_height = session.display_height()? * 3 / 4;
        session.swipe(
            center_x,
            center_y,
            center_x,
            three_quarter_height,
            steps_for_distance(center_y, three_quarter_height),
        )?;
        session.wait_for_idle()?;

        let overview_wait = Duration::from_millis(self.timeouts.overview_wait_ms);
        session
            .wait_for_object(&self.overview_selector(), overview_wait)?
            .ok_or_else(|| AppError::assertion("Recents didn't appear", ""))?;
        Ok(())
    }
}

impl LauncherStrategy for NexusLauncherStrategy {
    fn supported_launcher_package(&self) -> &'static str {
        LAUNCHER_PACKAGE
    }

    fn all_apps_selector(&self) -> Selector {
        Selector::res(self.supported_launcher_package(), "apps_view")
    }

    fn all_apps_button_selector(&self) -> Result<Selector, AppError> {
        Err(AppError::unsupported("UI element no longer exists.", ""))
    }

    fn hot_seat_selector(&self) -> Selector {
        Selector::res(self.supported_launcher_package(), "hotseat")
    }

    fn open(&self, session: &dyn UiSession) -> Result<(), AppError> {
        session.press_home()
    }

    fn open_all_apps(&self, session: &dyn UiSession, reset: bool) -> Result<UiNode, AppError> {
        let all_apps = self.all_apps_selector();
        // Any one of the three conditions triggers the full re-navigation.
        let needs_renavigation = !session.has_object(&all_apps)?
            || session.has_object(&self.overview_selector())?
            || reset;
        if needs_renavigation {
            debug!(reset, "re-navigating to all apps from the home screen");
            self.open(session)?;
            if session.first_api_level()? >= FIRST_API_LEVEL_O {
                // Overview sits in front of the drawer gesture on Pixel 2 and
                // above; open it first.
                self.press_ui_recent_apps(session)?;
            }
            // Swipe from the hotseat to near the top, e.g. 10% of the screen.
            let hotseat = session
                .wait_for_object(&self.hot_seat_selector(), self.element_wait())?
                .ok_or_else(|| AppError::assertion("openAllApps: did not find hotseat", ""))?;
            let start_x = hotseat.bounds.center_x();
            let start_y = hotseat.bounds.center_y();
            let end_y = (session.display_height()? as f32 * 0.1) as i32;
            session.swipe(start_x, start_y, start_x, end_y, steps_for_distance(start_y, end_y))?;
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

    const APPS_VIEW: &str = "com.google.android.apps.nexuslauncher:id/apps_view";
    const OVERVIEW: &str = "com.google.android.apps.nexuslauncher:id/overview_panel";
    const HOTSEAT: &str = "com.google.android.apps.nexuslauncher:id/hotseat";
    const HOME_BUTTON: &str = "com.android.systemui:id/home_button";

    fn strategy() -> NexusLauncherStrategy {
        let mut timeouts = TimeoutSettings::default();
        // Keep failed waits fast under test.
        timeouts.element_wait_ms = 1;
        timeouts.overview_wait_ms = 1;
        timeouts.poll_interval_ms = 50;
        NexusLauncherStrategy::new(timeouts)
    }

    /// 1080x1920 device on the home screen: home button and hotseat visible,
    /// drawer closed. The first swipe surfaces the overview panel, the second
    /// surfaces the all-apps container.
    fn home_screen_session() -> FakeUiSession {
        let session = FakeUiSession::new(1080, 1920, 28);
        session.place(HOME_BUTTON, Bounds { left: 440, top: 1840, right: 640, bottom: 1900 });
        session.place(HOTSEAT, Bounds { left: 0, top: 1620, right: 1080, bottom: 1820 });
        session.reveal_on_swipe(OVERVIEW, Bounds { left: 0, top: 200, right: 1080, bottom: 1600 });
        session.reveal_on_swipe(APPS_VIEW, Bounds { left: 0, top: 0, right: 1080, bottom: 1920 });
        session
    }

    // Full re-navigation as recorded by the fake: home press, recents-trigger
    // swipe (home button center down to 3/4 height, distance-scaled steps),
    // then the hotseat swipe up to 10% of display height.
    const FULL_SEQUENCE: &[&str] = &[
        "press_home",
        "swipe 540,1870 -> 540,1440 steps=4",
        "wait_for_idle",
        "swipe 540,1720 -> 540,192 steps=15",
    ];

    #[test]
    fn open_all_apps_renavigates_when_drawer_absent() {
        let session = home_screen_session();
        let node = strategy().open_all_apps(&session, false).expect("all apps");
        assert_eq!(node.resource_id, APPS_VIEW);
        assert_eq!(session.actions(), FULL_SEQUENCE);
    }

    #[test]
    fn open_all_apps_renavigates_when_overview_visible() {
        let session = home_screen_session();
        // Drawer open but overview in front: still a full re-navigation.
        session.place(APPS_VIEW, Bounds { left: 0, top: 0, right: 1080, bottom: 1920 });
        session.place(OVERVIEW, Bounds { left: 0, top: 200, right: 1080, bottom: 1600 });
        strategy().open_all_apps(&session, false).expect("all apps");
        assert_eq!(session.actions(), FULL_SEQUENCE);
    }

    #[test]
    fn open_all_apps_with_reset_always_renavigates() {
        let session = home_screen_session();
        session.place(APPS_VIEW, Bounds { left: 0, top: 0, right: 1080, bottom: 1920 });
        strategy().open_all_apps(&session, true).expect("all apps");
        assert_eq!(session.actions(), FULL_SEQUENCE);
    }

    #[test]
    fn open_all_apps_skips_navigation_when_drawer_already_open() {
        let session = home_screen_session();
        session.place(APPS_VIEW, Bounds { left: 0, top: 0, right: 1080, bottom: 1920 });
        let node = strategy().open_all_apps(&session, false).expect("all apps");
        assert_eq!(node.resource_id, APPS_VIEW);
        assert!(session.actions().is_empty());
    }

    #[test]
    fn open_all_apps_skips_recents_below_api_26() {
        let session = FakeUiSession::new(1080, 1920, 25);
        session.place(HOME_BUTTON, Bounds { left: 440, top: 1840, right: 640, bottom: 1900 });
        session.place(HOTSEAT, Bounds { left: 0, top: 1620, right: 1080, bottom: 1820 });
        session.reveal_on_swipe(APPS_VIEW, Bounds { left: 0, top: 0, right: 1080, bottom: 1920 });
        strategy().open_all_apps(&session, true).expect("all apps");
        assert_eq!(
            session.actions(),
            vec!["press_home".to_string(), "swipe 540,1720 -> 540,192 steps=15".to_string()]
        );
    }

    #[test]
    fn hotseat_swipe_ends_at_ten_percent_of_display_height() {
        let session = home_screen_session();
        strategy().open_all_apps(&session, true).expect("all apps");
        let hotseat_swipe = session
            .actions()
            .into_iter()
            .rev()
            .find(|action| action.starts_with("swipe"))
            .expect("hotseat swipe recorded");
        // (1920 as f32 * 0.1) as i32 == 192, truncated.
        assert!(hotseat_swipe.contains("-> 540,192 "), "unexpected swipe: {hotseat_swipe}");
    }

    #[test]
    fn missing_overview_after_recents_gesture_is_an_assertion_failure() {
        let session = FakeUiSession::new(1080, 1920, 28);
        session.place(HOME_BUTTON, Bounds { left: 440, top: 1840, right: 640, bottom: 1900 });
        session.place(HOTSEAT, Bounds { left: 0, top: 1620, right: 1080, bottom: 1820 });
        let err = strategy().open_all_apps(&session, true).expect_err("no overview");
        assert!(err.is_assertion());
        assert_eq!(err.error, "Recents didn't appear");
    }

    #[test]
    fn all_apps_button_selector_is_a_permanent_capability_gap() {
        let err = strategy().all_apps_button_selector().expect_err("unsupported");
        assert!(err.is_unsupported());
        // Repeat calls signal the same gap; there is nothing transient here.
        assert!(strategy().all_apps_button_selector().is_err());
    }

    #[test]
    fn selectors_use_the_launcher_package() {
        let strategy = strategy();
        assert_eq!(strategy.all_apps_selector().qualified_id(), APPS_VIEW);
        assert_eq!(strategy.hot_seat_selector().qualified_id(), HOTSEAT);
    }
}
