use serde::Serialize;

use crate::catalog::{all_sections, section_count, SectionKey};
use crate::protocol::{Score, SectionStatus};
use crate::store::SectionStore;

/// One sidebar row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRow {
    pub key: SectionKey,
    pub title: &'static str,
    pub route_id: &'static str,
    pub status: SectionStatus,
    pub api_score: Option<Score>,
}

/// Rollup of the whole appraisal, read fresh from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_score: Score,
    pub completed: usize,
    pub total_sections: usize,
    pub percentage: f64,
    pub sections: Vec<SectionRow>,
}

impl Dashboard {
    /// Counts only catalogue sections, so statuses left under foreign keys
    /// never push the percentage past 100.
    pub fn read(store: &SectionStore) -> Self {
        let record = store.get_all();
        let total_sections = section_count();

        let sections: Vec<SectionRow> = all_sections()
            .iter()
            .map(|def| SectionRow {
                key: def.key,
                title: def.title,
                route_id: def.route_id,
                status: record.status(def.key),
                api_score: record.section(def.key).and_then(|s| s.api_score()),
            })
            .collect();
        let completed = sections
            .iter()
            .filter(|row| row.status == SectionStatus::Completed)
            .count();

        Self {
            total_score: store.get_total_score(),
            completed,
            total_sections,
            percentage: (completed as f64 / total_sections as f64 * 100.0).min(100.0),
            sections,
        }
    }

    /// Percentage rounded for display.
    pub fn rounded_percentage(&self) -> u32 {
        self.percentage.round() as u32
    }
}
