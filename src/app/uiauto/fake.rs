//! Scripted `UiSession` for tests: a mutable bag of visible nodes plus reveal
//! queues that simulate UI transitions after gestures, and a log of the
//! actions the code under test performed.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::app::error::AppError;
use crate::app::uiauto::hierarchy::{Bounds, UiNode};
use crate::app::uiauto::selector::Selector;
use crate::app::uiauto::session::UiSession;

pub struct FakeUiSession {
    width: i32,
    height: i32,
    first_api_level: Cell<i32>,
    nodes: RefCell<HashMap<String, UiNode>>,
    swipe_reveals: RefCell<VecDeque<UiNode>>,
    click_reveals: RefCell<VecDeque<UiNode>>,
    activity_reveals: RefCell<VecDeque<UiNode>>,
    actions: RefCell<Vec<String>>,
}

fn bare_node(qualified_id: &str, bounds: Bounds) -> UiNode {
    UiNode {
        resource_id: qualified_id.to_string(),
        bounds,
        ..UiNode::default()
    }
}

impl FakeUiSession {
    pub fn new(width: i32, height: i32, first_api_level: i32) -> Self {
        Self {
            width,
            height,
            first_api_level: Cell::new(first_api_level),
            nodes: RefCell::new(HashMap::new()),
            swipe_reveals: RefCell::new(VecDeque::new()),
            click_reveals: RefCell::new(VecDeque::new()),
            activity_reveals: RefCell::new(VecDeque::new()),
            actions: RefCell::new(Vec::new()),
        }
    }

    /// Makes a node visible immediately.
    pub fn place(&self, qualified_id: &str, bounds: Bounds) {
        self.place_node(bare_node(qualified_id, bounds));
    }

    pub fn place_node(&self, node: UiNode) {
        self.nodes.borrow_mut().insert(node.resource_id.clone(), node);
    }

    /// Queues a node to become visible after the next swipe (FIFO, one per
    /// swipe).
    pub fn reveal_on_swipe(&self, qualified_id: &str, bounds: Bounds) {
        self.swipe_reveals.borrow_mut().push_back(bare_node(qualified_id, bounds));
    }

    pub fn reveal_on_click(&self, qualified_id: &str, bounds: Bounds) {
        self.click_reveals.borrow_mut().push_back(bare_node(qualified_id, bounds));
    }

    pub fn reveal_on_activity(&self, node: UiNode) {
        self.activity_reveals.borrow_mut().push_back(node);
    }

    /// Gestures and device actions recorded in call order.
    pub fn actions(&self) -> Vec<String> {
        self.actions.borrow().clone()
    }

    fn record(&self, action: impl Into<String>) {
        self.actions.borrow_mut().push(action.into());
    }

    fn pop_reveal(&self, queue: &RefCell<VecDeque<UiNode>>) {
        if let Some(node) = queue.borrow_mut().pop_front() {
            self.place_node(node);
        }
    }
}

impl UiSession for FakeUiSession {
    fn has_object(&self, selector: &Selector) -> Result<bool, AppError> {
        Ok(self.nodes.borrow().contains_key(&selector.qualified_id()))
    }

    fn find_object(&self, selector: &Selector) -> Result<Option<UiNode>, AppError> {
        Ok(self.nodes.borrow().get(&selector.qualified_id()).cloned())
    }

    fn wait_for_object(
        &self,
        selector: &Selector,
        _timeout: Duration,
    ) -> Result<Option<UiNode>, AppError> {
        // Transitions are applied synchronously by the reveal queues, so a
        // single lookup stands in for the bounded poll.
        self.find_object(selector)
    }

    fn swipe(
        &self,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        steps: i32,
    ) -> Result<(), AppError> {
        self.record(format!("swipe {start_x},{start_y} -> {end_x},{end_y} steps={steps}"));
        self.pop_reveal(&self.swipe_reveals);
        Ok(())
    }

    fn click(&self, x: i32, y: i32) -> Result<(), AppError> {
        self.record(format!("click {x},{y}"));
        self.pop_reveal(&self.click_reveals);
        Ok(())
    }

    fn press_home(&self) -> Result<(), AppError> {
        self.record("press_home");
        Ok(())
    }

    fn wake_up(&self) -> Result<(), AppError> {
        self.record("wake_up");
        Ok(())
    }

    fn display_width(&self) -> Result<i32, AppError> {
        Ok(self.width)
    }

    fn display_height(&self) -> Result<i32, AppError> {
        Ok(self.height)
    }

    fn wait_for_idle(&self) -> Result<(), AppError> {
        self.record("wait_for_idle");
        Ok(())
    }

    fn set_orientation_natural(&self) -> Result<(), AppError> {
        self.record("set_orientation_natural");
        Ok(())
    }

    fn unfreeze_rotation(&self) -> Result<(), AppError> {
        self.record("unfreeze_rotation");
        Ok(())
    }

    fn first_api_level(&self) -> Result<i32, AppError> {
        Ok(self.first_api_level.get())
    }

    fn start_activity(&self, action: &str) -> Result<(), AppError> {
        self.record(format!("start_activity {action}"));
        self.pop_reveal(&self.activity_reveals);
        Ok(())
    }
}
