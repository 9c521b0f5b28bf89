use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::Frame;
use crate::domain::{ContinuityKey, ContinuityStatus};

/// Continuity checklist. Every known key is present; missing keys read as open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuityChecks {
    #[serde(deserialize_with = "deserialize_checks")]
    pub checks: BTreeMap<ContinuityKey, ContinuityStatus>,
}

impl Default for ContinuityChecks {
    fn default() -> Self {
        Self {
            checks: ContinuityKey::ordered()
                .into_iter()
                .map(|key| (key, ContinuityStatus::Open))
                .collect(),
        }
    }
}

/// Entries with an unrecognised key or status are skipped; the rest of the map is kept.
fn deserialize_checks<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<ContinuityKey, ContinuityStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    let mut checks = BTreeMap::new();
    for (name, status) in raw {
        let key = serde_json::from_value::<ContinuityKey>(Value::String(name.clone()));
        match (key, serde_json::from_value::<ContinuityStatus>(status)) {
            (Ok(key), Ok(status)) => {
                checks.insert(key, status);
            }
            _ => warn!(item = %name, "unrecognised continuity entry skipped"),
        }
    }
    Ok(checks)
}

impl Frame for ContinuityChecks {
    const SUFFIX: &'static str = "continuity";

    fn migrate(self) -> Self {
        let mut merged = Self::default();
        merged.checks.extend(self.checks);
        merged
    }
}

impl ContinuityChecks {
    pub fn set(&mut self, key: ContinuityKey, status: ContinuityStatus) {
        self.checks.insert(key, status);
    }

    pub fn status(&self, key: ContinuityKey) -> ContinuityStatus {
        self.checks.get(&key).copied().unwrap_or_default()
    }

    pub fn open_items(&self) -> Vec<ContinuityKey> {
        ContinuityKey::ordered()
            .into_iter()
            .filter(|key| self.status(*key) == ContinuityStatus::Open)
            .collect()
    }
}
