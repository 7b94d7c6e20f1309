//! Console demo buttons
//!
//! Fifteen buttons, each showing off one console capability. The only state
//! is whether the demo group and the demo timer are currently open.

use crate::config::PageConfig;
use crate::console::{ConsoleSink, DevConsole};
use crate::page::dom::DomElement;
use crate::page::observer::ErrorEvent;
use crate::page::PageError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// The demo buttons, in page order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DemoButton {
    /// `console.log` with an object
    Log,
    /// `console.error`
    Error,
    /// `console.count`
    Count,
    /// `console.warn`
    Warn,
    /// `console.assert(false, ...)`
    Assert,
    /// `console.clear`
    Clear,
    /// `console.dir` of the result element
    Dir,
    /// `console.dirxml` of the result element
    DirXml,
    /// Opens the demo group
    GroupStart,
    /// Closes the demo group
    GroupEnd,
    /// `console.table` of sample rows
    Table,
    /// Starts the demo timer
    TimerStart,
    /// Stops the demo timer
    TimerEnd,
    /// `console.trace` from a nested call chain
    Trace,
    /// Raises an uncaught error
    GlobalError,
}

impl DemoButton {
    /// All buttons in page order
    pub const ALL: [Self; 15] = [
        Self::Log,
        Self::Error,
        Self::Count,
        Self::Warn,
        Self::Assert,
        Self::Clear,
        Self::Dir,
        Self::DirXml,
        Self::GroupStart,
        Self::GroupEnd,
        Self::Table,
        Self::TimerStart,
        Self::TimerEnd,
        Self::Trace,
        Self::GlobalError,
    ];

    /// Button at a page index
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Page index of this button
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|b| *b == self).unwrap_or_default()
    }

    /// Button caption
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Log => "Console Log",
            Self::Error => "Console Error",
            Self::Count => "Console Count",
            Self::Warn => "Console Warn",
            Self::Assert => "Console Assert",
            Self::Clear => "Console Clear",
            Self::Dir => "Console Dir",
            Self::DirXml => "Console dirxml",
            Self::GroupStart => "Console Group Start",
            Self::GroupEnd => "Console Group End",
            Self::Table => "Console Table",
            Self::TimerStart => "Start Timer",
            Self::TimerEnd => "End Timer",
            Self::Trace => "Console Trace",
            Self::GlobalError => "Trigger a Global Error",
        }
    }
}

/// What a click produced beyond console output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DemoEffect {
    /// Nothing else happened
    None,
    /// An error escaped and must reach the global observer on the next tick
    Uncaught(ErrorEvent),
}

/// State of the console demo
#[derive(Debug, Clone)]
pub struct ConsoleDemo {
    counter_label: String,
    group_label: String,
    timer_label: String,
    group_started: bool,
    timer_started: bool,
}

impl Default for ConsoleDemo {
    fn default() -> Self {
        Self::new(&PageConfig::default())
    }
}

impl ConsoleDemo {
    /// Creates the demo with labels from `config`
    #[must_use]
    pub fn new(config: &PageConfig) -> Self {
        Self {
            counter_label: config.counter_label.clone(),
            group_label: config.group_label.clone(),
            timer_label: config.timer_label.clone(),
            group_started: false,
            timer_started: false,
        }
    }

    /// Whether the demo group is open
    #[must_use]
    pub fn group_started(&self) -> bool {
        self.group_started
    }

    /// Whether the demo timer is running
    #[must_use]
    pub fn timer_started(&self) -> bool {
        self.timer_started
    }

    /// Clicks the button at `index`
    pub fn click_index<S: ConsoleSink>(
        &mut self,
        index: usize,
        console: &mut DevConsole<S>,
        result: Option<&DomElement>,
    ) -> Result<DemoEffect, PageError> {
        let button = DemoButton::from_index(index).ok_or(PageError::UnknownDemoButton(index))?;
        Ok(self.click(button, console, result))
    }

    /// Clicks a button. `result` is the result element shown by dir/dirxml.
    pub fn click<S: ConsoleSink>(
        &mut self,
        button: DemoButton,
        console: &mut DevConsole<S>,
        result: Option<&DomElement>,
    ) -> DemoEffect {
        match button {
            DemoButton::Log => {
                let timestamp = crate::clock::iso_timestamp(console.clock().now());
                console.log_with(
                    "This is a console log message with data:",
                    json!({ "timestamp": timestamp, "user": "testUser" }),
                );
            }
            DemoButton::Error => console.error("This is a console error with stack trace"),
            DemoButton::Count => {
                console.count(&self.counter_label);
            }
            DemoButton::Warn => {
                console.warn("This is a console warning - potential issue detected");
            }
            DemoButton::Assert => console.assert(
                false,
                "This assertion failed - expected condition was not met",
            ),
            DemoButton::Clear => console.clear(),
            DemoButton::Dir => {
                let object = result
                    .and_then(|e| serde_json::to_value(e).ok())
                    .unwrap_or(Value::Null);
                console.dir(object);
            }
            DemoButton::DirXml => {
                let markup = result.map_or_else(|| "null".to_string(), DomElement::to_markup);
                console.dirxml(&markup);
            }
            DemoButton::GroupStart => self.start_group(console),
            DemoButton::GroupEnd => self.end_group(console),
            DemoButton::Table => console.table(sample_people()),
            DemoButton::TimerStart => self.start_timer(console),
            DemoButton::TimerEnd => self.end_timer(console),
            DemoButton::Trace => level1(console),
            DemoButton::GlobalError => {
                return DemoEffect::Uncaught(ErrorEvent::capture(
                    "This is a deliberately triggered global error for testing purposes",
                ));
            }
        }
        DemoEffect::None
    }

    fn start_group<S: ConsoleSink>(&mut self, console: &mut DevConsole<S>) {
        if self.group_started {
            console.log("Group already started - click \"Console Group End\" first");
            return;
        }
        console.group(&self.group_label);
        console.log("This is inside the group");
        console.log("Another message in the group");
        console.warn("Warning inside group");
        self.group_started = true;
    }

    fn end_group<S: ConsoleSink>(&mut self, console: &mut DevConsole<S>) {
        if !self.group_started {
            console.log("No group to end - click \"Console Group Start\" first");
            return;
        }
        console.group_end();
        self.group_started = false;
    }

    fn start_timer<S: ConsoleSink>(&mut self, console: &mut DevConsole<S>) {
        if self.timer_started {
            console.log("Timer already running - click \"End Timer\" first");
            return;
        }
        console.time(&self.timer_label);
        self.timer_started = true;
        console.log("Timer started - click \"End Timer\" to see elapsed time");
    }

    fn end_timer<S: ConsoleSink>(&mut self, console: &mut DevConsole<S>) {
        if !self.timer_started {
            console.log("No timer to end - click \"Start Timer\" first");
            return;
        }
        console.time_end(&self.timer_label);
        self.timer_started = false;
    }
}

/// Rows shown by the table button
#[must_use]
pub fn sample_people() -> Value {
    json!([
        { "name": "John", "age": 25, "city": "New York" },
        { "name": "Jane", "age": 30, "city": "Los Angeles" },
        { "name": "Bob", "age": 35, "city": "Chicago" }
    ])
}

fn level1<S: ConsoleSink>(console: &mut DevConsole<S>) {
    level2(console, &["level1"]);
}

fn level2<S: ConsoleSink>(console: &mut DevConsole<S>, callers: &[&str]) {
    let mut frames = vec!["level2"];
    frames.extend_from_slice(callers);
    level3(console, &frames);
}

fn level3<S: ConsoleSink>(console: &mut DevConsole<S>, callers: &[&str]) {
    let mut frames = vec!["level3"];
    frames.extend_from_slice(callers);
    console.trace("This is a stack trace from level 3", &frames);
}
