//! Editable surfaces - technology-neutral descriptions of a block's view.
//!
//! A host turns a [`Surface`] into whatever widgets it draws and reports user
//! edits back as [`BlockInput`]s. The timer's countdown is the only live part:
//! it is a watch channel the host re-reads whenever it changes.

use quill_api::{CountdownSnapshot, Remaining};
use tokio::sync::watch;

/// The rendered view of one block.
#[derive(Debug, Clone)]
pub struct Surface {
    /// CSS-ish class of the block wrapper.
    pub class: &'static str,
    pub controls: Vec<Control>,
}

#[derive(Debug, Clone)]
pub enum Control {
    /// Single-choice selector bound to a payload field.
    Select {
        field: &'static str,
        options: Vec<SelectOption>,
        selected: String,
    },
    /// Multi-line text bound to a payload field.
    TextArea {
        field: &'static str,
        placeholder: &'static str,
        value: String,
    },
    /// Local date-time picker bound to a payload field.
    DateTimeInput { field: &'static str, value: String },
    /// Container that the child session for `slot` draws into.
    Slot { slot: usize, container_id: String },
    /// Self-updating countdown preview.
    Countdown(LiveCountdown),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A user edit reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockInput {
    /// A `Select` control changed.
    Selected { field: String, value: String },
    /// A `TextArea` or `DateTimeInput` control changed.
    Text { field: String, value: String },
}

impl BlockInput {
    pub fn selected(field: impl Into<String>, value: impl Into<String>) -> Self {
        BlockInput::Selected {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn text(field: impl Into<String>, value: impl Into<String>) -> Self {
        BlockInput::Text {
            field: field.into(),
            value: value.into(),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            BlockInput::Selected { field, .. } => format!("selection on `{field}`"),
            BlockInput::Text { field, .. } => format!("text on `{field}`"),
        }
    }
}

// ============================================================================
// Countdown preview
// ============================================================================

/// What the countdown preview currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountdownView {
    /// No deadline set.
    #[default]
    Hidden,
    Ticking(Remaining),
    TimeUp,
    Invalid,
}

impl CountdownView {
    /// Inline message shown instead of the clock, if any.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CountdownView::TimeUp => Some("Time is up!"),
            CountdownView::Invalid => Some("Invalid date format"),
            CountdownView::Hidden | CountdownView::Ticking(_) => None,
        }
    }

    /// Value/label pairs for the clock face.
    pub fn units(&self) -> Option<[(u64, &'static str); 4]> {
        match self {
            CountdownView::Ticking(r) => Some([
                (r.days, "days"),
                (r.hours, "hours"),
                (r.minutes, "mins"),
                (r.seconds, "secs"),
            ]),
            _ => None,
        }
    }
}

impl From<CountdownSnapshot> for CountdownView {
    fn from(snapshot: CountdownSnapshot) -> Self {
        match snapshot {
            CountdownSnapshot::Remaining(r) => CountdownView::Ticking(r),
            CountdownSnapshot::Expired => CountdownView::TimeUp,
            CountdownSnapshot::Invalid => CountdownView::Invalid,
        }
    }
}

/// Read side of a countdown preview.
#[derive(Debug, Clone)]
pub struct LiveCountdown {
    rx: watch::Receiver<CountdownView>,
}

impl LiveCountdown {
    pub(crate) fn new(rx: watch::Receiver<CountdownView>) -> Self {
        Self { rx }
    }

    pub fn current(&self) -> CountdownView {
        *self.rx.borrow()
    }

    /// Wait for the next update. Returns `false` once the timer block is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}
