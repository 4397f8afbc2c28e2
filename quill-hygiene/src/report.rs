//! Subscriber exports and the cleanup pass over them.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Classifier, HygieneError, Reason, Verdict};

/// One exported subscriber document. Fields other than `_id` and `email`
/// pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    #[serde(rename = "_id")]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl Subscriber {
    /// Display form of the id; unwraps extended-JSON `{"$oid": ...}` ids.
    pub fn display_id(&self) -> String {
        match &self.id {
            Value::String(id) => id.clone(),
            Value::Object(map) => match map.get("$oid") {
                Some(Value::String(oid)) => oid.clone(),
                _ => self.id.to_string(),
            },
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub subscriber: Subscriber,
    pub reason: Reason,
}

impl fmt::Display for Removal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "removing {}: {} ({})",
            self.subscriber.display_id(),
            self.reason,
            self.subscriber.email.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub kept: Vec<Subscriber>,
    pub removed: Vec<Removal>,
}

/// Split subscribers into kept and removed, preserving input order in both.
pub fn partition(classifier: &Classifier, subscribers: Vec<Subscriber>) -> Report {
    let mut report = Report::default();
    for subscriber in subscribers {
        let email = subscriber.email.as_deref().unwrap_or("");
        match classifier.classify(email) {
            Verdict::Keep => report.kept.push(subscriber),
            Verdict::Remove(reason) => {
                let removal = Removal { subscriber, reason };
                tracing::info!("{removal}");
                report.removed.push(removal);
            }
        }
    }
    tracing::debug!(
        kept = report.kept.len(),
        removed = report.removed.len(),
        "partition complete"
    );
    report
}

/// Read a JSON array export.
pub fn load_export(path: &Path) -> Result<Vec<Subscriber>, HygieneError> {
    let text = fs::read_to_string(path).map_err(|source| HygieneError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| HygieneError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write subscribers as a pretty-printed JSON array.
pub fn write_export(path: &Path, subscribers: &[Subscriber]) -> Result<(), HygieneError> {
    let text = serde_json::to_string_pretty(subscribers)?;
    fs::write(path, text + "\n").map_err(|source| HygieneError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscriber(value: Value) -> Subscriber {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unknown_fields_survive() {
        let raw = json!({
            "_id": { "$oid": "65a1" },
            "email": "a@b.com",
            "createdAt": "2024-01-01",
            "tags": ["news"]
        });
        let sub = subscriber(raw.clone());
        assert_eq!(sub.display_id(), "65a1");
        assert_eq!(sub.rest.len(), 2);
        assert_eq!(serde_json::to_value(&sub).unwrap(), raw);
    }

    #[test]
    fn test_partition_preserves_order() {
        let classifier = Classifier::new().unwrap();
        let report = partition(
            &classifier,
            vec![
                subscriber(json!({ "_id": 1, "email": "ok@example.com" })),
                subscriber(json!({ "_id": 2, "email": "10.0.0.1@example.com" })),
                subscriber(json!({ "_id": 3 })),
                subscriber(json!({ "_id": 4, "email": "also.ok@example.org" })),
            ],
        );

        let kept: Vec<_> = report.kept.iter().map(Subscriber::display_id).collect();
        assert_eq!(kept, ["1", "4"]);

        let removed: Vec<_> = report
            .removed
            .iter()
            .map(|r| (r.subscriber.display_id(), r.reason))
            .collect();
        assert_eq!(
            removed,
            [
                ("2".to_string(), Reason::IpLocalPart),
                ("3".to_string(), Reason::Malformed)
            ]
        );
    }

    #[test]
    fn test_removal_line() {
        let removal = Removal {
            subscriber: subscriber(json!({ "_id": "abc", "email": "bad@" })),
            reason: Reason::Malformed,
        };
        assert_eq!(removal.to_string(), "removing abc: invalid email (bad@)");
    }
}
