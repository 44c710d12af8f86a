//! Debounced search input.
//!
//! Keystrokes update the raw text right away; the text is only committed to the
//! engine once no further input has arrived for [`SEARCH_DEBOUNCE`]. There is a
//! single deadline slot: arming always replaces the previous one.

use std::time::{Duration, Instant};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    Pending,
}

#[derive(Clone, Debug)]
pub struct Debouncer {
    raw: String,
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            raw: String::new(),
            delay,
            deadline: None,
        }
    }

    /// Text as typed, for display in the search prompt.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn state(&self) -> DebounceState {
        if self.deadline.is_some() {
            DebounceState::Pending
        } else {
            DebounceState::Idle
        }
    }

    /// Record new raw text and (re)arm the deadline.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.raw = text.into();
        self.deadline = Some(now + self.delay);
    }

    pub fn push_char(&mut self, c: char, now: Instant) {
        let mut text = std::mem::take(&mut self.raw);
        text.push(c);
        self.input(text, now);
    }

    pub fn pop_char(&mut self, now: Instant) {
        let mut text = std::mem::take(&mut self.raw);
        text.pop();
        self.input(text, now);
    }

    /// Commit the raw text once the deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(self.raw.clone())
            }
            _ => None,
        }
    }

    /// Drop any armed deadline without committing.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            tracing::debug!("search debounce cancelled");
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}
