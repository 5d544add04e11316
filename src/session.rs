//! Interactive session
//!
//! Owns the selection engine, the busy flag, the error line and the two
//! transient timers (message auto-dismiss and focus-loss grace). UI layers
//! forward their events here and render [`SessionSnapshot`]s.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{DomainError, Result};
use crate::identifier::require_identifier;
use crate::parts::Part;
use crate::selection::{ClickOutcome, Field, Focus, SelectionEngine};
use crate::timer::TimerSlot;
use crate::upstream::PartsProvider;

/// Everything a UI needs to draw the current state
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SessionSnapshot {
    pub parts: Vec<Part>,
    pub from: usize,
    pub to: usize,
    pub speed: f64,
    pub from_input: String,
    pub to_input: String,
    pub speed_input: String,
    pub total_duration: u64,
    pub adjusted_total_duration: f64,
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub toast_message: Option<String>,
    pub focus: Focus,
}

#[derive(Debug)]
struct Toast {
    id: u64,
    text: String,
}

#[derive(Debug)]
struct SessionState {
    engine: SelectionEngine,
    is_loading: bool,
    error: Option<String>,
    toast: Option<Toast>,
    next_toast_id: u64,
}

type SharedState = Arc<Mutex<SessionState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the busy flag even if the search future is dropped mid-flight
struct LoadingGuard {
    state: SharedState,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        lock(&self.state).is_loading = false;
    }
}

pub struct Session {
    state: SharedState,
    provider: Arc<dyn PartsProvider>,
    toast_timer: Mutex<TimerSlot>,
    blur_timer: Mutex<TimerSlot>,
    toast_delay: Duration,
    blur_grace: Duration,
}

impl Session {
    pub fn new(provider: Arc<dyn PartsProvider>, config: &SessionConfig) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                engine: SelectionEngine::new(),
                is_loading: false,
                error: None,
                toast: None,
                next_toast_id: 0,
            })),
            provider,
            toast_timer: Mutex::new(TimerSlot::new("toast")),
            blur_timer: Mutex::new(TimerSlot::new("blur")),
            toast_delay: Duration::from_millis(config.toast_millis),
            blur_grace: Duration::from_millis(config.blur_grace_millis),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = lock(&self.state);
        let engine = &state.engine;
        let durations = engine.durations();

        SessionSnapshot {
            parts: engine.parts().to_vec(),
            from: engine.from(),
            to: engine.to(),
            speed: engine.speed(),
            from_input: engine.draft(Field::From).to_string(),
            to_input: engine.draft(Field::To).to_string(),
            speed_input: engine.draft(Field::Speed).to_string(),
            total_duration: durations.total,
            adjusted_total_duration: durations.adjusted,
            is_loading: state.is_loading,
            error_message: state.error.clone(),
            toast_message: state.toast.as_ref().map(|t| t.text.clone()),
            focus: engine.focus(),
        }
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).is_loading
    }

    /// Normalize `raw`, fetch its parts and select all of them
    ///
    /// Only one search runs at a time. Input without an identifier fails
    /// before the provider is contacted. Any failure leaves the part list
    /// empty and the window at its defaults.
    pub async fn search(&self, raw: &str) -> Result<Vec<Part>> {
        let bvid = {
            let mut state = lock(&self.state);
            if state.is_loading {
                return Err(DomainError::SearchInFlight);
            }

            state.error = None;
            state.engine.clear();

            match require_identifier(raw) {
                Ok(bvid) => {
                    state.is_loading = true;
                    bvid
                }
                Err(e) => {
                    warn!("Rejected search input '{}': {}", raw.trim(), e);
                    state.error = Some(e.to_string());
                    return Err(e);
                }
            }
        };

        let _loading = LoadingGuard {
            state: self.state.clone(),
        };
        info!("🔍 Searching {} via {}", bvid, self.provider.name());

        let fetched = self.provider.fetch_parts(&bvid).await;

        let mut state = lock(&self.state);
        let outcome = fetched.and_then(|parts| {
            state
                .engine
                .load_parts(parts)
                .map_err(|_| DomainError::EmptyResult {
                    bvid: Some(bvid.clone()),
                })?;
            Ok(state.engine.parts().to_vec())
        });

        match &outcome {
            Ok(parts) => info!("📚 Loaded {} parts for {}", parts.len(), bvid),
            Err(e) => {
                warn!("❌ Search for {} failed: {}", bvid, e);
                state.engine.clear();
                state.error = Some(e.to_string());
            }
        }
        outcome
    }

    pub fn on_from_change(&self, text: &str) {
        lock(&self.state).engine.set_from(text);
    }

    pub fn on_to_change(&self, text: &str) {
        lock(&self.state).engine.set_to(text);
    }

    pub fn on_speed_change(&self, text: &str) {
        lock(&self.state).engine.set_speed(text);
    }

    /// A field gained focus; a pending focus-loss is superseded
    pub fn on_focus(&self, field: Field) {
        self.blur_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();

        let focus = match field {
            Field::From => Focus::From,
            Field::To => Focus::To,
            Field::Speed => Focus::None,
        };
        lock(&self.state).engine.set_focus(focus);
        debug!("Focus moved to {:?}", focus);
    }

    /// Commit a field's draft without touching focus
    pub fn commit_field(&self, field: Field) {
        lock(&self.state).engine.commit(field);
    }

    /// A field lost focus: commit it now, drop the focus after the grace delay
    ///
    /// Outside a runtime there is no grace delay and the focus drops at once.
    pub fn on_blur(&self, field: Field) {
        self.commit_field(field);

        let state = self.state.clone();
        let armed = self
            .blur_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .arm(self.blur_grace, async move {
                lock(&state).engine.set_focus(Focus::None);
            });
        if !armed {
            lock(&self.state).engine.set_focus(Focus::None);
        }
    }

    /// Click on the part at 0-based `index`
    pub fn on_part_click(&self, index: usize) -> Result<ClickOutcome> {
        let result = lock(&self.state).engine.handle_part_click(index);

        match &result {
            Ok(outcome) => {
                if let Some(message) = outcome.message() {
                    self.show_toast(message);
                }
            }
            Err(e @ DomainError::RangeConstraint(_)) => self.show_toast(e.to_string()),
            Err(e) => debug!("Ignored click: {}", e),
        }
        result
    }

    /// Show a transient message; a newer message replaces it and restarts the delay
    ///
    /// Without a runtime the message stays until the next one replaces it.
    pub fn show_toast(&self, text: impl Into<String>) {
        let text = text.into();
        let id = {
            let mut state = lock(&self.state);
            state.next_toast_id += 1;
            let id = state.next_toast_id;
            debug!("Toast #{}: {}", id, text);
            state.toast = Some(Toast { id, text });
            id
        };

        let state = self.state.clone();
        self.toast_timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .arm(self.toast_delay, async move {
                let mut state = lock(&state);
                if state.toast.as_ref().map_or(false, |t| t.id == id) {
                    state.toast = None;
                }
            });
    }
}
