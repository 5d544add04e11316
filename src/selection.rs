/// Range selection engine
///
/// Holds the loaded parts, the committed `[from, to]` window, the speed
/// factor and the raw text of the three input fields. Text edits are stored
/// as drafts and only validated on commit, so a field can be empty while the
/// user is typing without touching committed state.
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::durations::{compute_durations, DerivedDurations};
use crate::error::{DomainError, RangeViolation, Result};
use crate::parts::Part;

pub const MIN_SPEED: f64 = 0.1;
pub const DEFAULT_SPEED: f64 = 1.0;

/// Inclusive 1-based window, `1 <= from <= to <= max(parts, 1)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionWindow {
    from: usize,
    to: usize,
}

impl SelectionWindow {
    pub fn new() -> Self {
        Self { from: 1, to: 1 }
    }

    /// Select every part
    pub fn all(count: usize) -> Self {
        Self {
            from: 1,
            to: count.max(1),
        }
    }

    pub fn from(&self) -> usize {
        self.from
    }

    pub fn to(&self) -> usize {
        self.to
    }

    pub fn is_single(&self) -> bool {
        self.from == self.to
    }
}

impl Default for SelectionWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// Which bound the next list click updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Focus {
    #[default]
    None,
    From,
    To,
}

/// Editable input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    From,
    To,
    Speed,
}

/// Result of a successful list click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// `from` moved while the from-field had focus
    StartSet(usize),
    /// `to` moved while the to-field had focus
    EndSet(usize),
    /// New single-part selection
    Started(usize),
    /// Single-part selection grown to a range
    Extended { from: usize, to: usize },
    /// Clicked the sole selected part again
    Unchanged,
}

impl ClickOutcome {
    /// Confirmation text for the transient message, `None` for no-ops
    pub fn message(&self) -> Option<String> {
        match self {
            ClickOutcome::StartSet(p) => Some(format!("Start set to P{}", p)),
            ClickOutcome::EndSet(p) => Some(format!("End set to P{}", p)),
            ClickOutcome::Started(p) => Some(format!("Selected P{}", p)),
            ClickOutcome::Extended { from, to } => Some(format!("Selected P{}-P{}", from, to)),
            ClickOutcome::Unchanged => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Drafts {
    from: String,
    to: String,
    speed: String,
}

impl Drafts {
    fn from_committed(window: SelectionWindow, speed: f64) -> Self {
        Self {
            from: window.from.to_string(),
            to: window.to.to_string(),
            speed: speed.to_string(),
        }
    }
}

/// Parse a field draft; blank, non-numeric and non-finite text yields `None`
fn parse_draft(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone)]
pub struct SelectionEngine {
    parts: Vec<Part>,
    window: SelectionWindow,
    speed: f64,
    focus: Focus,
    drafts: Drafts,
    durations: DerivedDurations,
}

impl SelectionEngine {
    pub fn new() -> Self {
        let window = SelectionWindow::new();
        Self {
            parts: Vec::new(),
            window,
            speed: DEFAULT_SPEED,
            focus: Focus::None,
            drafts: Drafts::from_committed(window, DEFAULT_SPEED),
            durations: DerivedDurations::default(),
        }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn window(&self) -> SelectionWindow {
        self.window
    }

    pub fn from(&self) -> usize {
        self.window.from
    }

    pub fn to(&self) -> usize {
        self.window.to
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Result of the last recomputation
    pub fn durations(&self) -> DerivedDurations {
        self.durations
    }

    /// Raw, possibly uncommitted, text of a field
    pub fn draft(&self, field: Field) -> &str {
        match field {
            Field::From => &self.drafts.from,
            Field::To => &self.drafts.to,
            Field::Speed => &self.drafts.speed,
        }
    }

    fn max_page(&self) -> usize {
        self.parts.len().max(1)
    }

    fn recompute(&mut self) {
        self.durations =
            compute_durations(&self.parts, self.window.from, self.window.to, self.speed);
    }

    fn sync_window_drafts(&mut self) {
        self.drafts.from = self.window.from.to_string();
        self.drafts.to = self.window.to.to_string();
    }

    /// Replace the parts list and select all of it
    ///
    /// An empty list is rejected and leaves the engine untouched.
    pub fn load_parts(&mut self, parts: Vec<Part>) -> Result<()> {
        if parts.is_empty() {
            return Err(DomainError::EmptyResult { bvid: None });
        }

        self.window = SelectionWindow::all(parts.len());
        self.parts = parts;
        self.sync_window_drafts();
        self.recompute();
        debug!("Loaded {} parts, window {}-{}", self.parts.len(), self.window.from, self.window.to);
        Ok(())
    }

    /// Drop all parts and return the window to its defaults; speed is kept
    pub fn clear(&mut self) {
        self.parts.clear();
        self.window = SelectionWindow::new();
        self.sync_window_drafts();
        self.recompute();
    }

    /// Record a keystroke-level edit without validating it
    pub fn set_input(&mut self, field: Field, text: impl Into<String>) {
        let text = text.into();
        match field {
            Field::From => self.drafts.from = text,
            Field::To => self.drafts.to = text,
            Field::Speed => self.drafts.speed = text,
        }
    }

    pub fn set_from(&mut self, text: impl Into<String>) {
        self.set_input(Field::From, text);
    }

    pub fn set_to(&mut self, text: impl Into<String>) {
        self.set_input(Field::To, text);
    }

    pub fn set_speed(&mut self, text: impl Into<String>) {
        self.set_input(Field::Speed, text);
    }

    /// Validate the from-draft: blank or below 1 resets to 1, otherwise
    /// clamps to the loaded parts. `to` is raised if it would fall below.
    pub fn commit_from(&mut self) -> usize {
        let max = self.max_page();
        let from = match parse_draft(&self.drafts.from) {
            Some(v) if v >= 1.0 => (v.floor() as usize).min(max),
            _ => 1,
        };

        self.window.from = from;
        if self.window.to < from {
            self.window.to = from;
        }
        self.sync_window_drafts();
        self.recompute();
        from
    }

    /// Validate the to-draft: blank or below `from` resets to `from`,
    /// otherwise clamps to `[from, parts]`.
    pub fn commit_to(&mut self) -> usize {
        let from = self.window.from;
        let max = self.max_page().max(from);
        let to = match parse_draft(&self.drafts.to) {
            Some(v) if v >= from as f64 => (v.floor() as usize).clamp(from, max),
            _ => from,
        };

        self.window.to = to;
        self.sync_window_drafts();
        self.recompute();
        to
    }

    /// Validate the speed-draft: blank or below 0.1 resets to 1.0
    pub fn commit_speed(&mut self) -> f64 {
        let speed = match parse_draft(&self.drafts.speed) {
            Some(v) if v >= MIN_SPEED => v,
            _ => DEFAULT_SPEED,
        };

        self.speed = speed;
        self.drafts.speed = speed.to_string();
        self.recompute();
        speed
    }

    pub fn commit(&mut self, field: Field) {
        match field {
            Field::From => {
                self.commit_from();
            }
            Field::To => {
                self.commit_to();
            }
            Field::Speed => {
                self.commit_speed();
            }
        }
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Apply a click on the part at 0-based `index`
    ///
    /// With a focused bound the click moves that bound, refusing to cross
    /// the other one. Without focus it runs the two-click gesture: start a
    /// single-part selection, then extend it to a range.
    pub fn handle_part_click(&mut self, index: usize) -> Result<ClickOutcome> {
        if index >= self.parts.len() {
            return Err(DomainError::UnknownPart {
                index,
                count: self.parts.len(),
            });
        }

        let page = index + 1;
        let SelectionWindow { from, to } = self.window;

        let outcome = match self.focus {
            Focus::From => {
                if page > to {
                    return Err(DomainError::RangeConstraint(RangeViolation::StartAfterEnd));
                }
                self.window.from = page;
                ClickOutcome::StartSet(page)
            }
            Focus::To => {
                if page < from {
                    return Err(DomainError::RangeConstraint(RangeViolation::EndBeforeStart));
                }
                self.window.to = page;
                ClickOutcome::EndSet(page)
            }
            Focus::None => {
                let single = self.window.is_single();
                if single && page == from {
                    ClickOutcome::Unchanged
                } else if single && page > from {
                    self.window.to = page;
                    ClickOutcome::Extended { from, to: page }
                } else {
                    self.window = SelectionWindow { from: page, to: page };
                    ClickOutcome::Started(page)
                }
            }
        };

        if outcome != ClickOutcome::Unchanged {
            self.sync_window_drafts();
            self.recompute();
        }
        Ok(outcome)
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
