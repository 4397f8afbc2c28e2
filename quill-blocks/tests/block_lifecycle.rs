//! Integration tests for the full block lifecycle.
//!
//! A document is loaded through the registry, rendered, edited through the
//! same inputs a host would report, and saved back. Saved output must load
//! again into an equivalent document.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, TimeZone, Utc};
use quill_api::{CountdownSnapshot, Remaining};
use quill_blocks::{
    Block, BlockInput, BlockRegistry, Clock, Control, CountdownView, HostApi, MemorySessionFactory,
    Surface, TokioClock, compute_snapshot,
};
use serde_json::{Value, json};

/// Loads a document's blocks through the built-in registry.
struct DocumentTest {
    registry: BlockRegistry,
    host: HostApi,
    factory: Arc<MemorySessionFactory>,
    blocks: Vec<Box<dyn Block>>,
}

impl DocumentTest {
    fn new() -> Self {
        let factory = Arc::new(MemorySessionFactory::new());
        Self {
            registry: BlockRegistry::with_builtins(),
            host: HostApi::new(factory.clone()),
            factory,
            blocks: Vec::new(),
        }
    }

    fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.host = self.host.with_clock(clock);
        self
    }

    fn load(&mut self, document: &Value) {
        let entries = document["blocks"].as_array().expect("document has blocks");
        for entry in entries {
            let kind = entry["type"].as_str().expect("block has a type");
            let block = self
                .registry
                .construct(kind, &entry["data"], &self.host)
                .expect("known block kind");
            self.blocks.push(block);
        }
    }

    fn render_all(&mut self) -> Vec<Surface> {
        self.blocks.iter_mut().map(|b| b.render()).collect()
    }

    async fn save(&self) -> Value {
        let mut blocks = Vec::new();
        for block in &self.blocks {
            let data = block.save().await.expect("block saves");
            blocks.push(json!({ "type": block.name(), "data": data }));
        }
        json!({ "blocks": blocks })
    }
}

#[tokio::test]
async fn test_document_round_trip() {
    let document = json!({
        "blocks": [
            { "type": "alert", "data": { "type": "warning", "message": "<b>Heads up</b>" } },
            { "type": "columns", "data": {
                "columns": 2,
                "content": [
                    [{ "type": "paragraph", "data": { "text": "left" } }],
                    [{ "type": "header", "data": { "text": "right", "level": 2 } }]
                ]
            } },
            { "type": "timer", "data": { "countdownDate": "2040-01-01T00:00:00Z" } }
        ]
    });

    let mut test = DocumentTest::new();
    test.load(&document);
    assert_eq!(test.save().await, document);

    test.render_all();
    let saved = test.save().await;
    assert_eq!(saved, document);

    let mut reloaded = DocumentTest::new();
    reloaded.load(&saved);
    assert_eq!(reloaded.save().await, document);
}

#[tokio::test]
async fn test_malformed_data_loads_with_defaults() {
    let mut test = DocumentTest::new();
    test.load(&json!({
        "blocks": [
            { "type": "alert", "data": { "type": "rainbow" } },
            { "type": "columns", "data": { "columns": 7, "content": "nope" } },
            { "type": "timer", "data": null }
        ]
    }));

    assert_eq!(
        test.save().await,
        json!({
            "blocks": [
                { "type": "alert", "data": { "type": "primary", "message": "" } },
                { "type": "columns", "data": { "columns": 2, "content": [[], []] } },
                { "type": "timer", "data": { "countdownDate": "" } }
            ]
        })
    );
}

#[tokio::test]
async fn test_editing_every_block_kind() {
    let mut test = DocumentTest::new();
    test.load(&json!({
        "blocks": [
            { "type": "alert", "data": {} },
            { "type": "columns", "data": { "columns": 3, "content": [[1], [2], [3]] } },
            { "type": "timer", "data": {} }
        ]
    }));
    test.render_all();
    let first_render = test.factory.live();

    test.blocks[0]
        .apply(BlockInput::selected("type", "success"))
        .unwrap();
    test.blocks[0]
        .apply(BlockInput::text("message", "Saved <i>everything</i>"))
        .unwrap();

    test.blocks[1]
        .apply(BlockInput::selected("columns", "1"))
        .unwrap();
    let sessions = test.factory.live();
    sessions[0].replace(vec![json!({ "type": "paragraph", "data": { "text": "only" } })]);

    test.blocks[2]
        .apply(BlockInput::text("countdownDate", "2035-06-01T09:00"))
        .unwrap();

    let saved = test.save().await;
    assert_eq!(
        saved["blocks"][0]["data"],
        json!({ "type": "success", "message": "Saved <i>everything</i>" })
    );
    assert_eq!(
        saved["blocks"][1]["data"],
        json!({
            "columns": 1,
            "content": [[{ "type": "paragraph", "data": { "text": "only" } }]]
        })
    );
    assert_eq!(
        saved["blocks"][2]["data"],
        json!({ "countdownDate": "2035-06-01T09:00" })
    );

    // Three sessions from the first render, one after the resize.
    assert_eq!(first_render.len(), 3);
    assert!(first_render.iter().all(|s| s.is_destroyed()));
    assert_eq!(sessions.len(), 1);
}

#[test]
fn test_one_hour_one_minute_one_second() {
    let now = Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap();
    let deadline = (now + TimeDelta::seconds(3_661)).to_rfc3339();

    assert_eq!(
        compute_snapshot(&deadline, now),
        Some(CountdownSnapshot::Remaining(Remaining {
            days: 0,
            hours: 1,
            minutes: 1,
            seconds: 1
        }))
    );
}

#[tokio::test(flavor = "current_thread", start_paused = true)]
async fn test_timer_counts_down_to_time_up() {
    let clock = Arc::new(TokioClock::new());
    let deadline = (clock.now() + TimeDelta::milliseconds(3_661_500)).to_rfc3339();

    let mut test = DocumentTest::new().with_clock(clock);
    test.load(&json!({
        "blocks": [{ "type": "timer", "data": { "countdownDate": deadline } }]
    }));
    let surfaces = test.render_all();
    let live = surfaces[0]
        .controls
        .iter()
        .find_map(|c| match c {
            Control::Countdown(live) => Some(live.clone()),
            _ => None,
        })
        .expect("timer has a countdown");

    let units = live.current().units().expect("ticking");
    assert_eq!(units, [(0, "days"), (1, "hours"), (1, "mins"), (1, "secs")]);

    tokio::time::sleep(Duration::from_millis(61_500)).await;
    assert_eq!(
        live.current(),
        CountdownView::Ticking(Remaining {
            days: 0,
            hours: 1,
            minutes: 0,
            seconds: 0
        })
    );

    tokio::time::sleep(Duration::from_secs(3_601)).await;
    assert_eq!(live.current(), CountdownView::TimeUp);
    assert_eq!(live.current().message(), Some("Time is up!"));
}
