//! Page load sanity checks

use crate::config::PageConfig;
use crate::console::{ConsoleSink, DevConsole};
use crate::page::dom::MockDom;
use serde::{Deserialize, Serialize};

/// What the load check found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Required selectors that were not found
    pub missing: Vec<String>,
    /// Number of console demo buttons on the page
    pub demo_buttons: usize,
    /// Number the page should have
    pub expected_demo_buttons: usize,
}

impl LoadReport {
    /// True when nothing is missing and the button count matches
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.missing.is_empty() && self.demo_buttons == self.expected_demo_buttons
    }
}

/// Logs the load checks for a page whose structure is already known
///
/// `is_present` answers whether a selector resolves on the page.
pub fn check_page<S: ConsoleSink>(
    config: &PageConfig,
    is_present: impl Fn(&str) -> bool,
    demo_buttons: usize,
    console: &mut DevConsole<S>,
) -> LoadReport {
    console.log("Page loaded successfully");

    let mut missing = Vec::new();
    for selector in config.required_selectors() {
        if !is_present(&selector) {
            console.error(&format!("Required element not found: {selector}"));
            missing.push(selector);
        }
    }

    console.log(&format!("Found {demo_buttons} console demo buttons"));
    if demo_buttons != config.expected_demo_buttons {
        console.warn(&format!(
            "Expected {} buttons, found {demo_buttons}",
            config.expected_demo_buttons
        ));
    }

    LoadReport {
        missing,
        demo_buttons,
        expected_demo_buttons: config.expected_demo_buttons,
    }
}

/// Runs the load checks against a mock document
pub fn check_dom<S: ConsoleSink>(
    config: &PageConfig,
    dom: &MockDom,
    console: &mut DevConsole<S>,
) -> LoadReport {
    let buttons = dom.count_children_with_tag(&config.demo_buttons_id, "button");
    check_page(
        config,
        |selector| dom.query_selector(selector).is_some(),
        buttons,
        console,
    )
}

/// Deferred task run shortly after load
pub fn delayed_initialization<S: ConsoleSink>(console: &mut DevConsole<S>) {
    console.log("Delayed initialization completed");
}
