use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require_text, unique_id, Frame, RecordError};
use crate::domain::{RiskBoundary, RiskBoundaryCategory};

/// User-authored lines that would abort, force, or reassess a move. Insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskBoundaries {
    pub boundaries: Vec<RiskBoundary>,
}

impl Frame for RiskBoundaries {
    const SUFFIX: &'static str = "risk-boundaries";
}

impl RiskBoundaries {
    pub fn add(
        &mut self,
        category: RiskBoundaryCategory,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<&RiskBoundary, RecordError> {
        let description = require_text(description, "description")?;
        let base_id = format!("{}-{}", now.timestamp_millis(), category.label());
        let id = unique_id(base_id, self.boundaries.iter().map(|b| b.id.as_str()));

        self.boundaries.push(RiskBoundary {
            id,
            category,
            description,
            added_at: now,
        });
        let last = self.boundaries.len() - 1;
        Ok(&self.boundaries[last])
    }

    pub fn remove(&mut self, id: &str) -> Result<RiskBoundary, RecordError> {
        let position = self
            .boundaries
            .iter()
            .position(|boundary| boundary.id == id)
            .ok_or_else(|| RecordError::NotFound {
                kind: "risk boundary",
                id: id.to_string(),
            })?;
        Ok(self.boundaries.remove(position))
    }

    pub fn reset(&mut self) {
        self.boundaries.clear();
    }

    pub fn by_category(&self, category: RiskBoundaryCategory) -> impl Iterator<Item = &RiskBoundary> {
        self.boundaries
            .iter()
            .filter(move |boundary| boundary.category == category)
    }
}
