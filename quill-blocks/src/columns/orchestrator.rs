//! Nested editor orchestrator - one child session per column slot.
//!
//! Sessions live in an immutable [`SessionSet`] behind an `Arc`. Provisioning
//! builds a whole new set and swaps it in; serialization captures the set
//! current at call time. A save racing a re-provision therefore sees either
//! the old set or the new one, never a mix.

use std::future::Future;
use std::sync::Arc;

use futures::future::try_join_all;
use quill_api::BlockSequence;

use super::layout::ColumnLayout;
use crate::config::ChildEditorConfig;
use crate::host::{ChildSession, SessionFactory};
use crate::BlockError;

/// One generation of child sessions, in slot order.
pub struct SessionSet {
    generation: u64,
    sessions: Vec<Arc<dyn ChildSession>>,
}

impl SessionSet {
    fn empty(generation: u64) -> Self {
        Self {
            generation,
            sessions: Vec::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn sessions(&self) -> &[Arc<dyn ChildSession>] {
        &self.sessions
    }

    /// Save every session concurrently. Results come back in slot order;
    /// the first failure fails the whole set.
    pub async fn save_all(&self) -> Result<Vec<BlockSequence>, BlockError> {
        let saves = self.sessions.iter().enumerate().map(|(slot, session)| async move {
            session.save().await.map_err(|err| BlockError::ChildSave {
                slot,
                message: err.to_string(),
            })
        });

        try_join_all(saves).await.inspect_err(|err| {
            tracing::warn!(generation = self.generation, %err, "column save failed");
        })
    }

    fn decommission(&self) {
        for session in &self.sessions {
            session.destroy();
        }
    }
}

pub struct NestedEditorOrchestrator {
    current: Arc<SessionSet>,
    config: ChildEditorConfig,
}

impl NestedEditorOrchestrator {
    pub fn new(config: ChildEditorConfig) -> Self {
        Self {
            current: Arc::new(SessionSet::empty(0)),
            config,
        }
    }

    /// Generation of the live session set; `0` until first provisioned.
    pub fn generation(&self) -> u64 {
        self.current.generation
    }

    pub fn is_provisioned(&self) -> bool {
        self.current.generation > 0
    }

    pub fn session_count(&self) -> usize {
        self.current.len()
    }

    /// The live session set.
    pub fn sessions(&self) -> Arc<SessionSet> {
        Arc::clone(&self.current)
    }

    /// Replace every session with a fresh one seeded from `layout`.
    ///
    /// Handles from earlier generations are destroyed and must not be used.
    /// Returns the new generation.
    pub fn provision(&mut self, layout: &ColumnLayout, factory: &dyn SessionFactory) -> u64 {
        let generation = self.current.generation + 1;
        self.current.decommission();

        let sessions = layout
            .slots()
            .iter()
            .enumerate()
            .map(|(slot, initial)| factory.create(slot, initial, &self.config))
            .collect();

        self.current = Arc::new(SessionSet {
            generation,
            sessions,
        });
        tracing::debug!(generation, columns = layout.column_count(), "column sessions provisioned");
        generation
    }

    /// Serialize all live sessions.
    ///
    /// The session set is captured before this returns, so the future is
    /// unaffected by a later `provision`.
    pub fn serialize_all(
        &self,
    ) -> impl Future<Output = Result<Vec<BlockSequence>, BlockError>> + Send + use<> {
        let set = Arc::clone(&self.current);
        async move { set.save_all().await }
    }

    /// Destroy all sessions, leaving an empty set.
    pub fn teardown(&mut self) {
        if self.current.is_empty() {
            return;
        }
        self.current.decommission();
        self.current = Arc::new(SessionSet::empty(self.current.generation + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemorySession, MemorySessionFactory};
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    /// Session whose save completes after a per-slot delay.
    struct DelayedSession {
        slot: usize,
        delay: Duration,
        fail: bool,
    }

    #[async_trait]
    impl ChildSession for DelayedSession {
        fn slot(&self) -> usize {
            self.slot
        }

        async fn save(&self) -> Result<BlockSequence, BlockError> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(BlockError::Session("editor crashed".to_string()));
            }
            Ok(vec![json!({ "slot": self.slot })])
        }
    }

    struct DelayedFactory {
        delays_ms: Vec<u64>,
        failing_slot: Option<usize>,
    }

    impl SessionFactory for DelayedFactory {
        fn create(
            &self,
            slot: usize,
            _initial: &BlockSequence,
            _config: &ChildEditorConfig,
        ) -> Arc<dyn ChildSession> {
            Arc::new(DelayedSession {
                slot,
                delay: Duration::from_millis(self.delays_ms[slot]),
                fail: self.failing_slot == Some(slot),
            })
        }
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_results_in_slot_order_despite_reverse_completion() {
        let factory = DelayedFactory {
            delays_ms: vec![300, 200, 100],
            failing_slot: None,
        };
        let mut orchestrator = NestedEditorOrchestrator::new(ChildEditorConfig::default());
        orchestrator.provision(&ColumnLayout::new(3).unwrap(), &factory);

        let content = orchestrator.serialize_all().await.unwrap();
        assert_eq!(
            content,
            vec![
                vec![json!({ "slot": 0 })],
                vec![json!({ "slot": 1 })],
                vec![json!({ "slot": 2 })],
            ]
        );
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_saves_run_concurrently() {
        let factory = DelayedFactory {
            delays_ms: vec![1_000, 1_000, 1_000, 1_000],
            failing_slot: None,
        };
        let mut orchestrator = NestedEditorOrchestrator::new(ChildEditorConfig::default());
        orchestrator.provision(&ColumnLayout::new(4).unwrap(), &factory);

        let started = tokio::time::Instant::now();
        orchestrator.serialize_all().await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(1_500));
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_any_failure_fails_the_whole_save() {
        let factory = DelayedFactory {
            delays_ms: vec![100, 500, 10],
            failing_slot: Some(1),
        };
        let mut orchestrator = NestedEditorOrchestrator::new(ChildEditorConfig::default());
        orchestrator.provision(&ColumnLayout::new(3).unwrap(), &factory);

        let err = orchestrator.serialize_all().await.unwrap_err();
        match err {
            BlockError::ChildSave { slot, message } => {
                assert_eq!(slot, 1);
                assert!(message.contains("editor crashed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_provision_seeds_from_layout_and_invalidates_old_sessions() {
        let factory = MemorySessionFactory::new();
        let layout = ColumnLayout::from_persisted(&json!({
            "columns": 2,
            "content": [[{ "type": "header" }], []]
        }));
        let mut orchestrator = NestedEditorOrchestrator::new(ChildEditorConfig::default());
        assert!(!orchestrator.is_provisioned());

        assert_eq!(orchestrator.provision(&layout, &factory), 1);
        assert_eq!(orchestrator.session_count(), 2);
        assert_eq!(
            orchestrator.serialize_all().await.unwrap(),
            vec![vec![json!({ "type": "header" })], vec![]]
        );

        let first: Vec<Arc<MemorySession>> = factory.live();
        assert_eq!(orchestrator.provision(&ColumnLayout::new(3).unwrap(), &factory), 2);
        assert!(first.iter().all(|s| s.is_destroyed()));
        assert_eq!(orchestrator.session_count(), 3);
        assert_eq!(orchestrator.sessions().generation(), 2);
        assert_eq!(factory.live().len(), 3);
    }

    #[tokio::test]
    async fn test_inflight_save_sees_one_consistent_set() {
        let factory = MemorySessionFactory::new();
        let mut orchestrator = NestedEditorOrchestrator::new(ChildEditorConfig::default());
        let layout = ColumnLayout::from_persisted(&json!({
            "columns": 2,
            "content": [[1], [2]]
        }));
        orchestrator.provision(&layout, &factory);

        let pending = orchestrator.serialize_all();
        orchestrator.provision(&ColumnLayout::new(4).unwrap(), &factory);
        let after = orchestrator.serialize_all();

        assert_eq!(pending.await.unwrap(), vec![vec![json!(1)], vec![json!(2)]]);
        assert_eq!(after.await.unwrap(), vec![BlockSequence::new(); 4]);
    }

    #[tokio::test]
    async fn test_teardown_destroys_sessions() {
        let factory = MemorySessionFactory::new();
        let mut orchestrator = NestedEditorOrchestrator::new(ChildEditorConfig::default());
        orchestrator.provision(&ColumnLayout::default(), &factory);
        let sessions = factory.live();

        orchestrator.teardown();
        assert_eq!(orchestrator.session_count(), 0);
        assert!(sessions.iter().all(|s| s.is_destroyed()));
        assert!(factory.live().is_empty());
        assert!(orchestrator.serialize_all().await.unwrap().is_empty());
    }
}
