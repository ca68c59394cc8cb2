//! Examination duties, where invigilation rows come in allotted/performed
//! pairs.
//!
//! A pair is recognised only by equal `t1`/`t2`/`t3` values, so two
//! unrelated invigilation rows with the same counts are treated as partners.

use tracing::info;

use crate::catalog::SectionKey;
use crate::error::{AppraisalError, Result};
use crate::protocol::{
    ClassLevel, EntryId, ExamActivity, ExamDutiesSection, ExamDutyEntry, InvigilationType,
    ScoreMeta, SectionData,
};

use super::entry::{new_entry_id, EntryList, FieldValue};
use super::sections::{ListForm, SectionForm};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExamDutiesForm {
    pub entries: EntryList<ExamDutyEntry>,
    pub meta: ScoreMeta,
}

fn is_invigilation(entry: &ExamDutyEntry) -> bool {
    entry.activity == ExamActivity::InvigilationDuties
}

impl ExamDutiesForm {
    /// Partner of `entry`: an invigilation row of the opposite type with the
    /// same term counts.
    pub fn partner_of(&self, id: &str) -> Option<&ExamDutyEntry> {
        self.partners_of(id).into_iter().next()
    }

    /// Every row that counts as a partner of `id`.
    pub fn partners_of(&self, id: &str) -> Vec<&ExamDutyEntry> {
        let Some(entry) = self.entries.get(id) else {
            return Vec::new();
        };
        if !is_invigilation(entry) {
            return Vec::new();
        }
        let wanted = entry.invigilation_type.unwrap_or(InvigilationType::Allotted).opposite();
        self.entries
            .entries()
            .iter()
            .filter(|e| {
                e.id != entry.id
                    && is_invigilation(e)
                    && e.invigilation_type == Some(wanted)
                    && e.terms() == entry.terms()
            })
            .collect()
    }

    fn change_activity(&mut self, id: &str, value: FieldValue) -> Result<()> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| AppraisalError::EntryNotFound(id.to_string()))?;
        let was_invigilation = is_invigilation(entry);

        self.entries.update(id, "activity", value)?;

        let entries = self.entries.entries_mut();
        let Some(index) = entries.iter().position(|e| e.id == id) else {
            return Ok(());
        };
        let now_invigilation = is_invigilation(&entries[index]);

        match (was_invigilation, now_invigilation) {
            (false, true) => {
                let entry = &mut entries[index];
                entry.invigilation_type = Some(InvigilationType::Allotted);
                entry.class_level = None;
                let terms = entry.terms();

                let paired = entries.iter().any(|e| {
                    e.id != id
                        && is_invigilation(e)
                        && e.invigilation_type == Some(InvigilationType::Performed)
                        && e.terms() == terms
                });
                if !paired {
                    let partner = ExamDutyEntry {
                        id: new_entry_id(),
                        activity: ExamActivity::InvigilationDuties,
                        class_level: None,
                        invigilation_type: Some(InvigilationType::Performed),
                        t1: terms.0,
                        t2: terms.1,
                        t3: terms.2,
                    };
                    info!("Added performed invigilation row {} for {}", partner.id, id);
                    entries.push(partner);
                }
            }
            (true, false) => {
                let entry = &mut entries[index];
                entry.class_level = Some(ClassLevel::Ug);
                entry.invigilation_type = None;
            }
            _ => {}
        }
        Ok(())
    }
}

impl SectionForm for ExamDutiesForm {
    const KEY: SectionKey = SectionKey::ExamDuties;

    fn from_stored(data: SectionData) -> Option<Self> {
        match data {
            SectionData::ExamDuties(s) => Some(Self {
                entries: EntryList::from_entries(s.entries, 1),
                meta: s.meta,
            }),
            _ => None,
        }
    }

    fn to_payload(&self) -> SectionData {
        SectionData::ExamDuties(ExamDutiesSection {
            entries: self.entries.to_vec(),
            meta: ScoreMeta {
                api_score: None,
                hod_remarks: self.meta.hod_remarks.clone(),
            },
        })
    }
}

impl ListForm for ExamDutiesForm {
    type Entry = ExamDutyEntry;

    fn list(&self) -> &EntryList<ExamDutyEntry> {
        &self.entries
    }

    fn list_mut(&mut self) -> &mut EntryList<ExamDutyEntry> {
        &mut self.entries
    }

    fn update_entry(&mut self, id: &str, field: &str, value: FieldValue) -> Result<()> {
        if field == "activity" {
            self.change_activity(id, value)
        } else {
            self.entries.update(id, field, value)
        }
    }

    /// Removing an invigilation row takes every partner with it. A removal
    /// that would leave the list empty leaves one blank row behind.
    fn remove_entry(&mut self, id: &str) -> bool {
        if self.entries.len() <= 1 {
            return false;
        }
        let partners: Vec<EntryId> = self.partners_of(id).into_iter().map(|p| p.id.clone()).collect();
        if !self.entries.remove(id) {
            return false;
        }
        if !partners.is_empty() {
            self.entries.entries_mut().retain(|e| !partners.contains(&e.id));
            info!("Removed paired invigilation rows {:?}", partners);
            if self.entries.is_empty() {
                self.entries.add();
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(form: &mut ExamDutiesForm, id: &str, field: &str, value: impl Into<FieldValue>) {
        form.update_entry(id, field, value.into()).unwrap();
    }

    fn performed(form: &ExamDutiesForm) -> Vec<&ExamDutyEntry> {
        form.entries
            .entries()
            .iter()
            .filter(|e| e.invigilation_type == Some(InvigilationType::Performed))
            .collect()
    }

    #[test]
    fn switching_to_invigilation_creates_one_pair() {
        let mut form = ExamDutiesForm::default();
        let id = form.entries.entries()[0].id.clone();
        set(&mut form, &id, "t1", 2u32);
        set(&mut form, &id, "t2", 3u32);
        set(&mut form, &id, "activity", "invigilation_duties");

        assert_eq!(form.entries.len(), 2);
        let allotted = form.entries.get(&id).unwrap();
        assert_eq!(allotted.invigilation_type, Some(InvigilationType::Allotted));
        assert_eq!(allotted.class_level, None);

        let pairs = performed(&form);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].terms(), (2, 3, 0));
        assert_eq!(pairs[0].class_level, None);
        assert_eq!(form.partner_of(&id).map(|p| p.id.clone()), Some(pairs[0].id.clone()));
    }

    #[test]
    fn pairing_only_happens_on_activity_change() {
        let mut form = ExamDutiesForm::default();
        let id = form.entries.entries()[0].id.clone();
        set(&mut form, &id, "activity", "invigilation_duties");
        assert_eq!(form.entries.len(), 2);

        // Editing counts afterwards neither re-pairs nor adds rows.
        set(&mut form, &id, "t1", 9u32);
        assert_eq!(form.entries.len(), 2);
        // Re-selecting the same activity is not a change.
        set(&mut form, &id, "activity", "invigilation_duties");
        assert_eq!(form.entries.len(), 2);
    }

    #[test]
    fn existing_matching_pair_is_reused() {
        let mut form = ExamDutiesForm::default();
        let first = form.entries.entries()[0].id.clone();
        set(&mut form, &first, "activity", "invigilation_duties");

        let second = form.add_entry();
        set(&mut form, &second, "activity", "invigilation_duties");
        // Both allotted rows have terms (0,0,0) and share the one partner.
        assert_eq!(performed(&form).len(), 1);
        assert_eq!(form.entries.len(), 3);
    }

    #[test]
    fn removing_either_member_removes_both() {
        let mut form = ExamDutiesForm::default();
        let keep = form.entries.entries()[0].id.clone();
        set(&mut form, &keep, "t1", 5u32);

        let allotted = form.add_entry();
        set(&mut form, &allotted, "activity", "invigilation_duties");
        assert_eq!(form.entries.len(), 3);
        assert!(form.remove_entry(&allotted));
        assert_eq!(form.entries.len(), 1);
        assert_eq!(form.entries.entries()[0].id, keep);

        let allotted = form.add_entry();
        set(&mut form, &allotted, "activity", "invigilation_duties");
        let partner = performed(&form)[0].id.clone();
        assert!(form.remove_entry(&partner));
        assert_eq!(form.entries.len(), 1);
        assert!(form.entries.get(&allotted).is_none());
    }

    #[test]
    fn removing_shared_partner_removes_every_match() {
        let mut form = ExamDutiesForm::default();
        let keep = form.entries.entries()[0].id.clone();
        let first = form.add_entry();
        set(&mut form, &first, "activity", "invigilation_duties");
        let second = form.add_entry();
        set(&mut form, &second, "activity", "invigilation_duties");
        assert_eq!(form.entries.len(), 4);
        assert_eq!(form.partners_of(&performed(&form)[0].id).len(), 2);

        let shared = performed(&form)[0].id.clone();
        assert!(form.remove_entry(&shared));
        assert_eq!(form.entries.len(), 1);
        assert_eq!(form.entries.entries()[0].id, keep);
    }

    #[test]
    fn edited_counts_break_the_pair() {
        let mut form = ExamDutiesForm::default();
        let id = form.entries.entries()[0].id.clone();
        set(&mut form, &id, "activity", "invigilation_duties");
        set(&mut form, &id, "t3", 4u32);
        assert!(form.partner_of(&id).is_none());

        assert!(form.remove_entry(&id));
        assert_eq!(form.entries.len(), 1);
        assert_eq!(performed(&form).len(), 1);
    }

    #[test]
    fn removing_a_lone_pair_leaves_a_blank_row() {
        let mut form = ExamDutiesForm::default();
        let id = form.entries.entries()[0].id.clone();
        set(&mut form, &id, "activity", "invigilation_duties");
        assert!(form.remove_entry(&id));
        assert_eq!(form.entries.len(), 1);
        let blank = &form.entries.entries()[0];
        assert_eq!(blank.activity, ExamActivity::QpSet);
        assert_eq!(blank.class_level, Some(ClassLevel::Ug));
    }

    #[test]
    fn single_row_is_never_removed() {
        let mut form = ExamDutiesForm::default();
        let id = form.entries.entries()[0].id.clone();
        assert!(!form.remove_entry(&id));
        assert_eq!(form.entries.len(), 1);
    }

    #[test]
    fn switching_away_restores_class_level() {
        let mut form = ExamDutiesForm::default();
        let id = form.entries.entries()[0].id.clone();
        set(&mut form, &id, "activity", "invigilation_duties");
        set(&mut form, &id, "activity", "qp_set");
        let entry = form.entries.get(&id).unwrap();
        assert_eq!(entry.class_level, Some(ClassLevel::Ug));
        assert_eq!(entry.invigilation_type, None);
        // The synthetic partner stays.
        assert_eq!(form.entries.len(), 2);
    }

    #[test]
    fn unknown_activity_is_rejected() {
        let mut form = ExamDutiesForm::default();
        let id = form.entries.entries()[0].id.clone();
        assert!(form
            .update_entry(&id, "activity", FieldValue::from("marking"))
            .is_err());
        assert_eq!(form.entries.len(), 1);
        assert!(form.update_entry("nope", "activity", FieldValue::from("qp_set")).is_err());
    }
}
