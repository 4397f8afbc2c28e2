//! Host collaborators - what the editor runtime hands to blocks at construct time.
//!
//! Blocks never reach for ambient globals: the wall clock and the child
//! editing sessions both come in through [`HostApi`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use quill_api::BlockSequence;

use crate::config::{ChildEditorConfig, SchedulerConfig};
use crate::BlockError;

// ============================================================================
// Clocks
// ============================================================================

/// Source of "now" for countdowns.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall-clock time anchored once and then advanced by tokio's monotonic clock.
///
/// Under a paused tokio runtime this clock moves only when tokio time does,
/// so tick cadence and countdown arithmetic stay in lockstep.
#[derive(Debug, Clone)]
pub struct TokioClock {
    anchor: DateTime<Utc>,
    base: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        Self {
            anchor,
            base: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.base.elapsed()).unwrap_or(TimeDelta::MAX);
        self.anchor
            .checked_add_signed(elapsed)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

// ============================================================================
// Child sessions
// ============================================================================

/// A live editing context for one column's block sequence.
#[async_trait]
pub trait ChildSession: Send + Sync {
    /// Slot this session was provisioned for.
    fn slot(&self) -> usize;

    /// Serialize the session's current blocks.
    async fn save(&self) -> Result<BlockSequence, BlockError>;

    /// Release the session. Called once, when its slot is re-provisioned or
    /// the owning block is torn down. The handle must not be used afterwards.
    fn destroy(&self) {}
}

/// Creates child sessions on behalf of the host runtime.
pub trait SessionFactory: Send + Sync {
    fn create(
        &self,
        slot: usize,
        initial: &BlockSequence,
        config: &ChildEditorConfig,
    ) -> Arc<dyn ChildSession>;
}

/// Headless session: holds its blocks in memory and hands them back on save.
///
/// Used when no interactive editor is attached, e.g. when a document is
/// loaded and re-saved server-side.
#[derive(Debug)]
pub struct MemorySession {
    slot: usize,
    blocks: Mutex<BlockSequence>,
    destroyed: AtomicBool,
}

impl MemorySession {
    pub fn new(slot: usize, initial: BlockSequence) -> Self {
        Self {
            slot,
            blocks: Mutex::new(initial),
            destroyed: AtomicBool::new(false),
        }
    }

    /// Replace the session's blocks, as an edit in the child editor would.
    pub fn replace(&self, blocks: BlockSequence) {
        *self.blocks.lock().unwrap_or_else(PoisonError::into_inner) = blocks;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChildSession for MemorySession {
    fn slot(&self) -> usize {
        self.slot
    }

    async fn save(&self) -> Result<BlockSequence, BlockError> {
        Ok(self
            .blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }
}

/// Factory for [`MemorySession`]s. Keeps the sessions it created until they
/// are destroyed, so callers can reach them after provisioning.
#[derive(Debug, Default)]
pub struct MemorySessionFactory {
    created: Mutex<Vec<Arc<MemorySession>>>,
}

impl MemorySessionFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions created and not yet destroyed, oldest first.
    pub fn live(&self) -> Vec<Arc<MemorySession>> {
        let mut created = self.created.lock().unwrap_or_else(PoisonError::into_inner);
        created.retain(|s| !s.is_destroyed());
        created.clone()
    }
}

impl SessionFactory for MemorySessionFactory {
    fn create(
        &self,
        slot: usize,
        initial: &BlockSequence,
        _config: &ChildEditorConfig,
    ) -> Arc<dyn ChildSession> {
        let session = Arc::new(MemorySession::new(slot, initial.clone()));
        let mut created = self.created.lock().unwrap_or_else(PoisonError::into_inner);
        created.retain(|s| !s.is_destroyed());
        created.push(Arc::clone(&session));
        session
    }
}

// ============================================================================
// HostApi
// ============================================================================

/// Everything a block may use from the host runtime.
#[derive(Clone)]
pub struct HostApi {
    pub clock: Arc<dyn Clock>,
    pub sessions: Arc<dyn SessionFactory>,
    pub child_config: ChildEditorConfig,
    pub scheduler: SchedulerConfig,
}

impl HostApi {
    pub fn new(sessions: Arc<dyn SessionFactory>) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            sessions,
            child_config: ChildEditorConfig::default(),
            scheduler: SchedulerConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_child_config(mut self, config: ChildEditorConfig) -> Self {
        self.child_config = config;
        self
    }

    pub fn with_scheduler(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = config;
        self
    }
}

impl Default for HostApi {
    fn default() -> Self {
        Self::new(Arc::new(MemorySessionFactory::new()))
    }
}
