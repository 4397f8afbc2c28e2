//! Countdown timer block.
//!
//! The block stores a single deadline. While rendered it keeps a live preview
//! of the time left, refreshed by a [`LiveViewScheduler`] until the deadline
//! passes, the deadline is edited, or the block is dropped.

pub mod countdown;
pub mod scheduler;

use std::sync::Arc;

use async_trait::async_trait;
use quill_api::{BlockKind, FieldPolicy, SanitizePolicy, TimerPayload, Toolbox};
use serde_json::Value;
use tokio::sync::watch;

use crate::surface::{BlockInput, Control, CountdownView, LiveCountdown, Surface};
use crate::{Block, BlockError, BlockTool, HostApi};

pub use countdown::{compute_snapshot, parse_deadline, to_input_value};
pub use scheduler::{LiveViewScheduler, SchedulerState};

pub struct TimerTool;

impl BlockTool for TimerTool {
    fn name(&self) -> &str {
        BlockKind::Timer.as_str()
    }

    fn toolbox(&self) -> Toolbox {
        Toolbox::new("Countdown Timer", r#"<i class="bi bi-clock"></i>"#)
    }

    fn sanitize(&self) -> SanitizePolicy {
        SanitizePolicy::new().field("countdownDate", FieldPolicy::Trusted)
    }

    fn construct(&self, data: &Value, host: &HostApi) -> Box<dyn Block> {
        Box::new(TimerBlock::new(TimerPayload::from_data(data), host))
    }
}

pub struct TimerBlock {
    payload: TimerPayload,
    scheduler: LiveViewScheduler,
    view: Arc<watch::Sender<CountdownView>>,
}

impl TimerBlock {
    pub fn new(payload: TimerPayload, host: &HostApi) -> Self {
        let (view, _) = watch::channel(CountdownView::Hidden);
        Self {
            payload,
            scheduler: LiveViewScheduler::new(Arc::clone(&host.clock), &host.scheduler),
            view: Arc::new(view),
        }
    }

    pub fn payload(&self) -> &TimerPayload {
        &self.payload
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// A handle on the live preview, independent of any rendered surface.
    pub fn preview(&self) -> LiveCountdown {
        LiveCountdown::new(self.view.subscribe())
    }

    fn refresh_preview(&mut self) {
        if self.payload.deadline.trim().is_empty() {
            self.scheduler.stop();
            self.view.send_replace(CountdownView::Hidden);
            return;
        }

        let on_tick = Arc::clone(&self.view);
        let on_expire = Arc::clone(&self.view);
        self.scheduler.start(
            &self.payload.deadline,
            move |snapshot| {
                on_tick.send_replace(CountdownView::from(snapshot));
            },
            move || {
                on_expire.send_replace(CountdownView::TimeUp);
            },
        );
    }
}

#[async_trait]
impl Block for TimerBlock {
    fn name(&self) -> &str {
        BlockKind::Timer.as_str()
    }

    fn render(&mut self) -> Surface {
        self.refresh_preview();
        Surface {
            class: "editor-timer-block",
            controls: vec![
                Control::DateTimeInput {
                    field: "countdownDate",
                    value: to_input_value(&self.payload.deadline),
                },
                Control::Countdown(self.preview()),
            ],
        }
    }

    fn apply(&mut self, input: BlockInput) -> Result<(), BlockError> {
        match input {
            BlockInput::Text { field, value } if field == "countdownDate" => {
                self.payload.deadline = value;
                self.refresh_preview();
                Ok(())
            }
            other => Err(BlockError::UnsupportedInput {
                block: "timer",
                input: other.describe(),
            }),
        }
    }

    async fn save(&self) -> Result<Value, BlockError> {
        Ok(serde_json::to_value(&self.payload)?)
    }
}
