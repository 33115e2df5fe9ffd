//! Recorded user flows.
//!
//! Flows use the Chrome DevTools Recorder JSON layout:
//!
//! ```json
//! {
//!   "title": "Search docs",
//!   "steps": [
//!     {"type": "setViewport", "width": 1280, "height": 720, "isMobile": false},
//!     {"type": "navigate", "url": "https://example.com",
//!      "assertedEvents": [{"type": "navigation", "url": "https://example.com"}]},
//!     {"type": "click", "selectors": [["#search"]], "offsetX": 4, "offsetY": 8}
//!   ]
//! }
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An ordered, optionally titled sequence of recorded steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Flow title shown as the audit session name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Steps in recording order
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Flow {
    /// Create a flow from parts.
    #[must_use]
    pub fn new(title: Option<String>, steps: Vec<Step>) -> Self {
        Self { title, steps }
    }

    /// Parse a recorder JSON export.
    ///
    /// # Errors
    ///
    /// Returns a JSON error for malformed documents and unknown step types.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a recorder JSON export from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize back to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Session display name: the title, or `"undefined"` when absent or empty.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => "undefined",
        }
    }
}

/// One recorded action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Kind-specific payload, tagged by the recorder's `type` field
    #[serde(flatten)]
    pub kind: StepKind,
    /// Events the recorder observed as a consequence of this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asserted_events: Vec<AssertedEvent>,
    /// Target page (`"main"` for the top-level page)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Per-step timeout in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

/// Step payloads, one variant per recorder step type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StepKind {
    /// Device emulation change
    SetViewport {
        /// Width in CSS pixels
        width: u32,
        /// Height in CSS pixels
        height: u32,
        /// Device pixel ratio
        #[serde(default = "default_scale_factor")]
        device_scale_factor: f64,
        /// Mobile emulation
        is_mobile: bool,
        /// Touch support
        #[serde(default)]
        has_touch: bool,
        /// Landscape orientation
        #[serde(default)]
        is_landscape: bool,
    },
    /// Load a URL
    Navigate {
        /// Destination URL
        url: String,
    },
    /// Mouse click
    Click {
        /// Candidate selectors, best first
        selectors: Vec<Selector>,
        /// Click offset from the element's left edge
        #[serde(default)]
        offset_x: f64,
        /// Click offset from the element's top edge
        #[serde(default)]
        offset_y: f64,
    },
    /// Mouse double click
    DoubleClick {
        /// Candidate selectors, best first
        selectors: Vec<Selector>,
        /// Click offset from the element's left edge
        #[serde(default)]
        offset_x: f64,
        /// Click offset from the element's top edge
        #[serde(default)]
        offset_y: f64,
    },
    /// Pointer hover
    Hover {
        /// Candidate selectors, best first
        selectors: Vec<Selector>,
    },
    /// Form input value change
    Change {
        /// Candidate selectors, best first
        selectors: Vec<Selector>,
        /// New value
        value: String,
    },
    /// Key press
    KeyDown {
        /// Key name
        key: String,
    },
    /// Key release
    KeyUp {
        /// Key name
        key: String,
    },
    /// Scroll the window, or an element when selectors are present
    Scroll {
        /// Element to scroll; empty scrolls the window
        #[serde(default)]
        selectors: Vec<Selector>,
        /// Horizontal scroll position
        #[serde(default)]
        x: f64,
        /// Vertical scroll position
        #[serde(default)]
        y: f64,
    },
    /// Wait until an element exists
    WaitForElement {
        /// Candidate selectors, best first
        selectors: Vec<Selector>,
    },
    /// Wait until a JS expression is truthy
    WaitForExpression {
        /// Expression source
        expression: String,
    },
    /// Network throttling
    EmulateNetworkConditions {
        /// Download throughput in bytes/s
        download: f64,
        /// Upload throughput in bytes/s
        upload: f64,
        /// Added latency in ms
        latency: f64,
    },
    /// Close the target page
    Close,
    /// Extension-defined step
    CustomStep {
        /// Custom step name
        name: String,
        /// Free-form parameters
        #[serde(default)]
        parameters: serde_json::Value,
    },
}

const fn default_scale_factor() -> f64 {
    1.0
}

/// A selector: a single query, or a chain descending through shadow roots
/// and frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    /// Single query string
    Single(String),
    /// Chain of queries
    Chain(Vec<String>),
}

impl Selector {
    /// Query string understood by Puppeteer. Chains pierce shadow roots.
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::Chain(parts) => parts.join(" >>> "),
        }
    }
}

/// An event the recorder saw while recording a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertedEvent {
    /// Event type
    #[serde(rename = "type")]
    pub event_type: AssertedEventType,
    /// URL after the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Page title after the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Asserted event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssertedEventType {
    /// Full page navigation
    Navigation,
    /// Any event type this crate does not interpret
    #[serde(other)]
    Other,
}

impl Step {
    /// Wrap a payload with no asserted events, target or timeout.
    #[must_use]
    pub const fn new(kind: StepKind) -> Self {
        Self {
            kind,
            asserted_events: Vec::new(),
            target: None,
            timeout: None,
        }
    }

    /// `setViewport` step with a default desktop-ish size.
    #[must_use]
    pub const fn set_viewport(width: u32, height: u32, is_mobile: bool) -> Self {
        Self::new(StepKind::SetViewport {
            width,
            height,
            device_scale_factor: 1.0,
            is_mobile,
            has_touch: is_mobile,
            is_landscape: false,
        })
    }

    /// `navigate` step that asserts the resulting navigation.
    #[must_use]
    pub fn navigate(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::new(StepKind::Navigate { url: url.clone() }).with_navigation_event(url)
    }

    /// `click` step on a single selector.
    #[must_use]
    pub fn click(selector: impl Into<String>) -> Self {
        Self::new(StepKind::Click {
            selectors: vec![Selector::Single(selector.into())],
            offset_x: 0.0,
            offset_y: 0.0,
        })
    }

    /// `change` step on a single selector.
    #[must_use]
    pub fn change(selector: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(StepKind::Change {
            selectors: vec![Selector::Single(selector.into())],
            value: value.into(),
        })
    }

    /// `keyDown` step.
    #[must_use]
    pub fn key_down(key: impl Into<String>) -> Self {
        Self::new(StepKind::KeyDown { key: key.into() })
    }

    /// Record that this step triggered a navigation to `url`.
    #[must_use]
    pub fn with_navigation_event(mut self, url: impl Into<String>) -> Self {
        self.asserted_events.push(AssertedEvent {
            event_type: AssertedEventType::Navigation,
            url: Some(url.into()),
            title: None,
        });
        self
    }

    /// Recorder type tag (`setViewport`, `navigate`, ...).
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self.kind {
            StepKind::SetViewport { .. } => "setViewport",
            StepKind::Navigate { .. } => "navigate",
            StepKind::Click { .. } => "click",
            StepKind::DoubleClick { .. } => "doubleClick",
            StepKind::Hover { .. } => "hover",
            StepKind::Change { .. } => "change",
            StepKind::KeyDown { .. } => "keyDown",
            StepKind::KeyUp { .. } => "keyUp",
            StepKind::Scroll { .. } => "scroll",
            StepKind::WaitForElement { .. } => "waitForElement",
            StepKind::WaitForExpression { .. } => "waitForExpression",
            StepKind::EmulateNetworkConditions { .. } => "emulateNetworkConditions",
            StepKind::Close => "close",
            StepKind::CustomStep { .. } => "customStep",
        }
    }

    /// Whether this is a device emulation change.
    #[must_use]
    pub const fn is_viewport_change(&self) -> bool {
        matches!(self.kind, StepKind::SetViewport { .. })
    }

    /// Mobile flag of a viewport change; `None` for every other kind.
    #[must_use]
    pub const fn viewport_is_mobile(&self) -> Option<bool> {
        match self.kind {
            StepKind::SetViewport { is_mobile, .. } => Some(is_mobile),
            _ => None,
        }
    }

    /// Whether the recorder saw a navigation caused by this step.
    #[must_use]
    pub fn asserts_navigation(&self) -> bool {
        self.asserted_events
            .iter()
            .any(|e| e.event_type == AssertedEventType::Navigation)
    }
}
