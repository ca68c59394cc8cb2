pub mod backend;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::SectionKey;
use crate::error::Result;
use crate::protocol::{AppraisalRecord, Score, SectionData, SectionStatus, STATUS_KEY};

pub use backend::{FileStorage, MemoryStorage, StorageBackend};

// ── Slot names ──────────────────────────────────────────────────────

pub const APPRAISAL_SLOT: &str = "jiit_faculty_appraisal_data";
pub const USER_SLOT: &str = "jiit_faculty_user";
pub const AUTH_SLOT: &str = "jiit_faculty_auth";
pub const USER_ID_SLOT: &str = "user_id";
pub const AUTH_TOKEN_SLOT: &str = "auth_token";

// ── Section store ───────────────────────────────────────────────────

/// Single owner of the persisted appraisal record. Cloning shares the
/// same backend.
#[derive(Clone)]
pub struct SectionStore {
    backend: Arc<dyn StorageBackend>,
}

impl SectionStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    // ── Record ──────────────────────────────────────────────────────

    /// The persisted record, or an empty one if the slot is missing,
    /// unreadable, or not a JSON object. Sections that do not decode are
    /// skipped. Never fails.
    pub fn get_all(&self) -> AppraisalRecord {
        match self.read_record_map() {
            Ok(Some(map)) => {
                let (record, rejected) = AppraisalRecord::from_map(map);
                if !rejected.is_empty() {
                    warn!("Skipping unreadable sections {:?} in appraisal record", rejected);
                }
                record
            }
            Ok(None) => AppraisalRecord::default(),
            Err(e) => {
                warn!("Failed to load appraisal record: {}. Using empty record.", e);
                AppraisalRecord::default()
            }
        }
    }

    /// Overwrite the persisted record wholesale.
    pub fn set_all(&self, record: &AppraisalRecord) -> Result<()> {
        self.write_json(APPRAISAL_SLOT, record)
    }

    /// Attach `score` to the section, mark its status, and persist.
    /// Returns the section as stored.
    ///
    /// Only this section's key and status are replaced; every other key in
    /// the stored object is written back as it was. Fails without writing
    /// if the slot holds something other than a JSON object.
    pub fn update_section(
        &self,
        mut data: SectionData,
        score: Score,
        status: SectionStatus,
    ) -> Result<SectionData> {
        let key = data.key();
        data.meta_mut().api_score = Some(score);

        let mut map = self.read_record_map()?.unwrap_or_default();
        map.insert(key.data_key().to_string(), data.to_value()?);
        let statuses = map
            .entry(STATUS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !statuses.is_object() {
            *statuses = Value::Object(Map::new());
        }
        if let Value::Object(statuses) = statuses {
            statuses.insert(key.data_key().to_string(), serde_json::to_value(status)?);
        }
        self.write_json(APPRAISAL_SLOT, &map)?;

        info!("Section {} stored with score {} ({:?})", key.data_key(), score, status);
        Ok(data)
    }

    /// `update_section` with the default `completed` status.
    pub fn complete_section(&self, data: SectionData, score: Score) -> Result<SectionData> {
        self.update_section(data, score, SectionStatus::Completed)
    }

    pub fn get_section(&self, key: SectionKey) -> Option<SectionData> {
        self.get_all().section(key)
    }

    pub fn get_status(&self, key: SectionKey) -> SectionStatus {
        self.get_all().status(key)
    }

    /// Sum of every recorded score. Unscored sections count as 0.
    pub fn get_total_score(&self) -> Score {
        self.get_all()
            .scores()
            .into_iter()
            .filter_map(|(_, score)| score)
            .filter(|score| score.is_finite())
            .fold(0.0, |total, score| total + score)
    }

    pub fn get_completed_count(&self) -> usize {
        self.get_all()
            .section_status
            .values()
            .filter(|status| **status == SectionStatus::Completed)
            .count()
    }

    /// Remove the appraisal slot entirely.
    pub fn clear_all(&self) -> Result<()> {
        self.backend.remove(APPRAISAL_SLOT)?;
        info!("Appraisal record cleared");
        Ok(())
    }

    fn read_record_map(&self) -> Result<Option<Map<String, Value>>> {
        self.read_json(APPRAISAL_SLOT)
    }

    // ── Auxiliary slots ─────────────────────────────────────────────

    pub fn read_json<T: DeserializeOwned>(&self, slot: &str) -> Result<Option<T>> {
        match self.backend.read(slot)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn write_json<T: Serialize>(&self, slot: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.write(slot, &raw)
    }

    /// Raw string slot, for values stored unquoted (user id, auth token).
    pub fn read_raw(&self, slot: &str) -> Option<String> {
        match self.backend.read(slot) {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to read slot {}: {}", slot, e);
                None
            }
        }
    }

    pub fn write_raw(&self, slot: &str, value: &str) -> Result<()> {
        self.backend.write(slot, value)
    }

    pub fn remove_slot(&self, slot: &str) -> Result<()> {
        self.backend.remove(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        ConferenceEntry, ConferenceSection, EntriesSection, MembershipsSection, Participation,
        ProjectGuidanceSection, PublicationType, ResearchPaperEntry,
    };

    fn conference() -> SectionData {
        SectionData::ConferenceEvents(ConferenceSection::new(vec![ConferenceEntry {
            id: "c1".to_string(),
            attended_organized: Participation::Organized,
            ..Default::default()
        }]))
    }

    #[test]
    fn empty_store_reads_empty_record() {
        let store = SectionStore::in_memory();
        assert_eq!(store.get_all(), AppraisalRecord::default());
        assert_eq!(store.get_total_score(), 0.0);
        assert_eq!(store.get_completed_count(), 0);
        assert!(store.get_section(SectionKey::GeneralDetails).is_none());
    }

    #[test]
    fn malformed_blob_reads_empty_record() {
        let store = SectionStore::in_memory();
        store.write_raw(APPRAISAL_SLOT, "{not json").unwrap();
        assert_eq!(store.get_all(), AppraisalRecord::default());
    }

    #[test]
    fn empty_total_is_positive_zero() {
        let store = SectionStore::in_memory();
        assert!(store.get_total_score().is_sign_positive());
    }

    #[test]
    fn submit_keeps_sections_that_do_not_decode() {
        let store = SectionStore::in_memory();
        store
            .write_raw(
                APPRAISAL_SLOT,
                r#"{
                    "conferenceEvents": {"entries": [{"id": "c1", "attendedOrganized": "organized"}], "apiScore": 10},
                    "researchProjects": {"entries": [{"id": "p1", "status": "Abandoned"}]},
                    "legacySection": {"rows": 3},
                    "sectionStatus": {"conferenceEvents": "completed", "researchProjects": "completed"}
                }"#,
            )
            .unwrap();

        store
            .complete_section(SectionData::Memberships(MembershipsSection::default()), 5.0)
            .unwrap();

        let conference = store.get_section(SectionKey::ConferenceEvents).unwrap();
        assert_eq!(conference.api_score(), Some(10.0));
        assert_eq!(store.get_status(SectionKey::Memberships), SectionStatus::Completed);
        assert_eq!(store.get_completed_count(), 3);
        assert!(store.get_section(SectionKey::ResearchProjects).is_none());

        let raw: Value = serde_json::from_str(&store.read_raw(APPRAISAL_SLOT).unwrap()).unwrap();
        assert_eq!(raw["researchProjects"]["entries"][0]["status"], "Abandoned");
        assert_eq!(raw["legacySection"]["rows"], 3);
        assert_eq!(raw["memberships"]["apiScore"], 5.0);
    }

    #[test]
    fn submit_refuses_to_overwrite_unparseable_slot() {
        let store = SectionStore::in_memory();
        store.write_raw(APPRAISAL_SLOT, "{not json").unwrap();
        assert!(store.complete_section(conference(), 10.0).is_err());
        assert_eq!(store.read_raw(APPRAISAL_SLOT).as_deref(), Some("{not json"));

        store.clear_all().unwrap();
        assert!(store.complete_section(conference(), 10.0).is_ok());
    }

    #[test]
    fn update_then_get_returns_score() {
        let store = SectionStore::in_memory();
        let stored = store.complete_section(conference(), 10.0).unwrap();
        assert_eq!(stored.api_score(), Some(10.0));

        let loaded = store.get_section(SectionKey::ConferenceEvents).unwrap();
        assert_eq!(loaded.api_score(), Some(10.0));
        assert_eq!(loaded, stored);
        assert_eq!(store.get_status(SectionKey::ConferenceEvents), SectionStatus::Completed);
        assert_eq!(store.get_status(SectionKey::Memberships), SectionStatus::NotStarted);
    }

    #[test]
    fn in_progress_status_is_recorded_but_not_completed() {
        let store = SectionStore::in_memory();
        store
            .update_section(conference(), 5.0, SectionStatus::InProgress)
            .unwrap();
        assert_eq!(store.get_status(SectionKey::ConferenceEvents), SectionStatus::InProgress);
        assert_eq!(store.get_completed_count(), 0);
    }

    #[test]
    fn total_score_skips_unsubmitted_sections() {
        let store = SectionStore::in_memory();
        store.complete_section(conference(), 10.0).unwrap();
        store
            .complete_section(
                SectionData::ResearchPapers(EntriesSection::new(vec![ResearchPaperEntry {
                    pub_type: PublicationType::NJ,
                    ..Default::default()
                }])),
                15.0,
            )
            .unwrap();
        store
            .complete_section(SectionData::Memberships(MembershipsSection::default()), 0.0)
            .unwrap();

        // Present in the record but never scored.
        let mut record = store.get_all();
        record.project_guidance = Some(ProjectGuidanceSection::default());
        store.set_all(&record).unwrap();

        assert_eq!(store.get_total_score(), 25.0);
        assert_eq!(store.get_completed_count(), 3);
    }

    #[test]
    fn resubmit_overwrites_section() {
        let store = SectionStore::in_memory();
        store.complete_section(conference(), 10.0).unwrap();
        store.complete_section(conference(), 4.0).unwrap();
        assert_eq!(store.get_total_score(), 4.0);
        assert_eq!(store.get_completed_count(), 1);
    }

    #[test]
    fn clear_all_resets_record() {
        let store = SectionStore::in_memory();
        store.complete_section(conference(), 10.0).unwrap();
        store.clear_all().unwrap();
        assert_eq!(store.get_all(), AppraisalRecord::default());
    }
}
