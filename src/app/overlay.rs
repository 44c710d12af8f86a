//! Detail overlay controller: open/close state, focus trap and focus restoration.

use super::loader::DetailState;

/// Focusable controls inside the overlay, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverlayControl {
    /// Header close control; always present and focused on open.
    Close,
    /// `mailto:` link for the loaded user.
    Email,
    /// Close button under the loaded detail.
    CloseButton,
    /// Close button on the error panel.
    ErrorClose,
}

impl OverlayControl {
    pub fn closes(self) -> bool {
        !matches!(self, OverlayControl::Email)
    }
}

/// Controls that can take focus for the given detail state.
pub fn controls_for(detail: &DetailState) -> &'static [OverlayControl] {
    match detail {
        DetailState::Loaded(_) => &[
            OverlayControl::Close,
            OverlayControl::Email,
            OverlayControl::CloseButton,
        ],
        DetailState::Failed(_) => &[OverlayControl::Close, OverlayControl::ErrorClose],
        DetailState::Idle | DetailState::Loading => &[OverlayControl::Close],
    }
}

/// The table row that opened the overlay, identified by user id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trigger {
    pub user_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Open {
        user_id: String,
        trigger: Trigger,
        focus: usize,
    },
}

#[derive(Clone, Debug)]
pub struct Overlay {
    state: OverlayState,
    pending_restore: Option<Trigger>,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            state: OverlayState::Closed,
            pending_restore: None,
        }
    }
}

impl Overlay {
    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, OverlayState::Open { .. })
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.state {
            OverlayState::Open { user_id, .. } => Some(user_id),
            OverlayState::Closed => None,
        }
    }

    /// Open for `user_id`, remembering `trigger` and focusing the close control.
    pub fn open(&mut self, user_id: &str, trigger: Trigger) {
        self.pending_restore = None;
        self.state = OverlayState::Open {
            user_id: user_id.to_string(),
            trigger,
            focus: 0,
        };
    }

    /// Currently focused control, clamped to what `controls` offers.
    pub fn focused(&self, controls: &[OverlayControl]) -> Option<OverlayControl> {
        match self.state {
            OverlayState::Open { focus, .. } if !controls.is_empty() => {
                Some(controls[focus.min(controls.len() - 1)])
            }
            _ => None,
        }
    }

    /// Tab: next control, wrapping from last to first.
    pub fn focus_next(&mut self, controls: &[OverlayControl]) {
        if let OverlayState::Open { focus, .. } = &mut self.state {
            let n = controls.len().max(1);
            *focus = ((*focus).min(n - 1) + 1) % n;
        }
    }

    /// Shift+Tab: previous control, wrapping from first to last.
    pub fn focus_prev(&mut self, controls: &[OverlayControl]) {
        if let OverlayState::Open { focus, .. } = &mut self.state {
            let n = controls.len().max(1);
            *focus = ((*focus).min(n - 1) + n - 1) % n;
        }
    }

    /// Hide the overlay. Focus goes back to the trigger on the next tick.
    pub fn close(&mut self) {
        let prev = std::mem::replace(&mut self.state, OverlayState::Closed);
        if let OverlayState::Open { trigger, .. } = prev {
            self.pending_restore = Some(trigger);
        }
    }

    /// Take the trigger whose focus should be restored now.
    pub fn take_restore(&mut self) -> Option<Trigger> {
        self.pending_restore.take()
    }
}
