//! Quill Blocks - Custom block plugins for the rich-text editor.
//!
//! Three block kinds ship here: alerts, multi-column layouts with nested
//! editors, and countdown timers. Hosts look them up through a
//! [`BlockRegistry`] and drive them via the [`Block`] trait.

mod alert;
pub mod columns;
mod config;
mod error;
mod host;
mod registry;
mod surface;
pub mod timer;

pub use alert::{AlertBlock, AlertTool};
pub use columns::{ColumnLayout, ColumnsBlock, ColumnsTool, NestedEditorOrchestrator};
pub use config::{
    ChildEditorConfig, HeaderTool, ImageEndpoints, ImageTool, InlineTool, SchedulerConfig,
};
pub use error::{BlockError, LayoutError};
pub use host::{
    ChildSession, Clock, HostApi, MemorySession, MemorySessionFactory, SessionFactory,
    SystemClock, TokioClock,
};
pub use registry::{Block, BlockRegistry, BlockTool};
pub use surface::{BlockInput, Control, CountdownView, LiveCountdown, SelectOption, Surface};
pub use timer::{LiveViewScheduler, SchedulerState, TimerBlock, TimerTool, compute_snapshot};
