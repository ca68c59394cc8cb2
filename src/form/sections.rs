use crate::catalog::SectionKey;
use crate::error::{AppraisalError, Result};
use crate::protocol::{
    BookChapterEntry, ConferenceEntry, CourseEntry, EntriesSection, EntryId, GeneralDetails,
    GeneralDetailsSection, IndustryExpert, LecturesTutorialsSection, MembershipEntry,
    MentorshipActivity, OtherContribution, OtherInfoSection, OutputDetail, ProjectGuidance,
    ProjectGuidanceSection, ReadingMaterialEntry, ResearchGuidanceEntry, ResearchPaperEntry,
    ResearchProjectEntry, ScoreMeta, SectionData, SelfAssessedOutput, StudentActivitiesSection,
    StudentEvent, TechCommunityActivity,
};

use super::entry::{self, set_field, Entry, EntryList, FieldValue};

// ── Form traits ─────────────────────────────────────────────────────

/// Editable state of one section.
pub trait SectionForm: Default + Send {
    const KEY: SectionKey;

    /// Rebuild the form from stored data. `None` if `data` belongs to
    /// another section.
    fn from_stored(data: SectionData) -> Option<Self>;

    /// Section payload built from the current state, without a score.
    fn to_payload(&self) -> SectionData;
}

/// A section edited as one list of rows.
pub trait ListForm: SectionForm {
    type Entry: Entry;

    fn list(&self) -> &EntryList<Self::Entry>;
    fn list_mut(&mut self) -> &mut EntryList<Self::Entry>;

    fn add_entry(&mut self) -> EntryId {
        self.list_mut().add()
    }

    fn remove_entry(&mut self, id: &str) -> bool {
        self.list_mut().remove(id)
    }

    fn update_entry(&mut self, id: &str, field: &str, value: FieldValue) -> Result<()> {
        self.list_mut().update(id, field, value)
    }
}

// ── Single-list sections ────────────────────────────────────────────

/// Ties an entry type to the section that stores it.
pub trait SectionEntry: Entry + Send {
    const KEY: SectionKey;

    fn wrap(section: EntriesSection<Self>) -> SectionData;
    fn unwrap(data: SectionData) -> Option<EntriesSection<Self>>;
}

macro_rules! section_entry {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl SectionEntry for $ty {
                const KEY: SectionKey = SectionKey::$variant;

                fn wrap(section: EntriesSection<Self>) -> SectionData {
                    SectionData::$variant(section)
                }

                fn unwrap(data: SectionData) -> Option<EntriesSection<Self>> {
                    match data {
                        SectionData::$variant(section) => Some(section),
                        _ => None,
                    }
                }
            }
        )*
    };
}

section_entry! {
    ConferenceEntry => ConferenceEvents,
    ReadingMaterialEntry => ReadingMaterial,
    ResearchPaperEntry => ResearchPapers,
    BookChapterEntry => BooksChapters,
    ResearchProjectEntry => ResearchProjects,
    ResearchGuidanceEntry => ResearchGuidance,
    MembershipEntry => Memberships,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntriesForm<E: Entry> {
    pub entries: EntryList<E>,
    pub meta: ScoreMeta,
}

impl<E: SectionEntry> SectionForm for EntriesForm<E> {
    const KEY: SectionKey = E::KEY;

    fn from_stored(data: SectionData) -> Option<Self> {
        let section = E::unwrap(data)?;
        Some(Self {
            entries: EntryList::from_entries(section.entries, 1),
            meta: section.meta,
        })
    }

    fn to_payload(&self) -> SectionData {
        E::wrap(EntriesSection {
            entries: self.entries.to_vec(),
            meta: unscored(&self.meta),
        })
    }
}

impl<E: SectionEntry> ListForm for EntriesForm<E> {
    type Entry = E;

    fn list(&self) -> &EntryList<E> {
        &self.entries
    }

    fn list_mut(&mut self) -> &mut EntryList<E> {
        &mut self.entries
    }
}

pub type ConferenceForm = EntriesForm<ConferenceEntry>;
pub type ReadingMaterialForm = EntriesForm<ReadingMaterialEntry>;
pub type ResearchPapersForm = EntriesForm<ResearchPaperEntry>;
pub type BooksChaptersForm = EntriesForm<BookChapterEntry>;
pub type ResearchProjectsForm = EntriesForm<ResearchProjectEntry>;
pub type ResearchGuidanceForm = EntriesForm<ResearchGuidanceEntry>;
pub type MembershipsForm = EntriesForm<MembershipEntry>;

/// Reviewer remarks carry over; the score is attached on submit.
fn unscored(meta: &ScoreMeta) -> ScoreMeta {
    ScoreMeta {
        api_score: None,
        hod_remarks: meta.hod_remarks.clone(),
    }
}

// ── General details ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeneralDetailsForm {
    pub details: GeneralDetails,
    pub meta: ScoreMeta,
}

impl GeneralDetailsForm {
    pub fn update_field(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        set_field(&mut self.details, "general details", field, value.into())
    }
}

impl SectionForm for GeneralDetailsForm {
    const KEY: SectionKey = SectionKey::GeneralDetails;

    fn from_stored(data: SectionData) -> Option<Self> {
        match data {
            SectionData::GeneralDetails(s) => Some(Self {
                details: s.details,
                meta: s.meta,
            }),
            _ => None,
        }
    }

    fn to_payload(&self) -> SectionData {
        SectionData::GeneralDetails(GeneralDetailsSection {
            details: self.details.clone(),
            meta: unscored(&self.meta),
        })
    }
}

// ── Project guidance ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectGuidanceForm {
    pub guidance: ProjectGuidance,
    pub meta: ScoreMeta,
}

impl ProjectGuidanceForm {
    pub fn update_field(&mut self, field: &str, value: impl Into<FieldValue>) -> Result<()> {
        set_field(&mut self.guidance, "project guidance", field, value.into())
    }
}

impl SectionForm for ProjectGuidanceForm {
    const KEY: SectionKey = SectionKey::ProjectGuidance;

    fn from_stored(data: SectionData) -> Option<Self> {
        match data {
            SectionData::ProjectGuidance(s) => Some(Self {
                guidance: s.guidance,
                meta: s.meta,
            }),
            _ => None,
        }
    }

    fn to_payload(&self) -> SectionData {
        SectionData::ProjectGuidance(ProjectGuidanceSection {
            guidance: self.guidance.clone(),
            meta: unscored(&self.meta),
        })
    }
}

// ── Lectures / tutorials ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Semester {
    Odd,
    Even,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LecturesForm {
    pub odd_semester: EntryList<CourseEntry>,
    pub even_semester: EntryList<CourseEntry>,
    pub meta: ScoreMeta,
}

impl LecturesForm {
    pub fn semester(&self, semester: Semester) -> &EntryList<CourseEntry> {
        match semester {
            Semester::Odd => &self.odd_semester,
            Semester::Even => &self.even_semester,
        }
    }

    fn semester_mut(&mut self, semester: Semester) -> &mut EntryList<CourseEntry> {
        match semester {
            Semester::Odd => &mut self.odd_semester,
            Semester::Even => &mut self.even_semester,
        }
    }

    pub fn add_course(&mut self, semester: Semester) -> EntryId {
        self.semester_mut(semester).add()
    }

    pub fn remove_course(&mut self, semester: Semester, id: &str) -> bool {
        self.semester_mut(semester).remove(id)
    }

    pub fn update_course(
        &mut self,
        semester: Semester,
        id: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<()> {
        self.semester_mut(semester).update(id, field, value)
    }
}

impl SectionForm for LecturesForm {
    const KEY: SectionKey = SectionKey::LecturesTutorials;

    fn from_stored(data: SectionData) -> Option<Self> {
        match data {
            SectionData::LecturesTutorials(s) => Some(Self {
                odd_semester: EntryList::from_entries(s.odd_semester, 1),
                even_semester: EntryList::from_entries(s.even_semester, 1),
                meta: s.meta,
            }),
            _ => None,
        }
    }

    fn to_payload(&self) -> SectionData {
        SectionData::LecturesTutorials(LecturesTutorialsSection {
            odd_semester: self.odd_semester.to_vec(),
            even_semester: self.even_semester.to_vec(),
            meta: unscored(&self.meta),
        })
    }
}

// ── Student activities ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityList {
    TechCommunities,
    StudentEvents,
    Mentorships,
    OtherContributions,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct StudentActivitiesForm {
    pub tech_communities: EntryList<TechCommunityActivity>,
    pub student_events: EntryList<StudentEvent>,
    pub mentorships: EntryList<MentorshipActivity>,
    pub other_contributions: EntryList<OtherContribution>,
    pub meta: ScoreMeta,
}

impl StudentActivitiesForm {
    pub fn add(&mut self, list: ActivityList) -> EntryId {
        match list {
            ActivityList::TechCommunities => self.tech_communities.add(),
            ActivityList::StudentEvents => self.student_events.add(),
            ActivityList::Mentorships => self.mentorships.add(),
            ActivityList::OtherContributions => self.other_contributions.add(),
        }
    }

    pub fn remove(&mut self, list: ActivityList, id: &str) -> bool {
        match list {
            ActivityList::TechCommunities => self.tech_communities.remove(id),
            ActivityList::StudentEvents => self.student_events.remove(id),
            ActivityList::Mentorships => self.mentorships.remove(id),
            ActivityList::OtherContributions => self.other_contributions.remove(id),
        }
    }

    pub fn update(
        &mut self,
        list: ActivityList,
        id: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<()> {
        match list {
            ActivityList::TechCommunities => self.tech_communities.update(id, field, value),
            ActivityList::StudentEvents => self.student_events.update(id, field, value),
            ActivityList::Mentorships => self.mentorships.update(id, field, value),
            ActivityList::OtherContributions => self.other_contributions.update(id, field, value),
        }
    }

    fn event_mut(&mut self, event_id: &str) -> Result<&mut StudentEvent> {
        self.student_events
            .entries_mut()
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| AppraisalError::EntryNotFound(event_id.to_string()))
    }

    /// Experts invited to an event; the list may be empty.
    pub fn add_expert(&mut self, event_id: &str) -> Result<EntryId> {
        Ok(entry::add_to(&mut self.event_mut(event_id)?.experts_invited))
    }

    pub fn remove_expert(&mut self, event_id: &str, expert_id: &str) -> Result<bool> {
        Ok(entry::remove_from(
            &mut self.event_mut(event_id)?.experts_invited,
            expert_id,
            0,
        ))
    }

    pub fn update_expert(
        &mut self,
        event_id: &str,
        expert_id: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<()> {
        entry::update_in(
            &mut self.event_mut(event_id)?.experts_invited,
            expert_id,
            field,
            value.into(),
        )
    }

    pub fn experts(&self, event_id: &str) -> Option<&[IndustryExpert]> {
        self.student_events
            .get(event_id)
            .map(|e| e.experts_invited.as_slice())
    }
}

impl SectionForm for StudentActivitiesForm {
    const KEY: SectionKey = SectionKey::StudentActivities;

    fn from_stored(data: SectionData) -> Option<Self> {
        match data {
            SectionData::StudentActivities(s) => {
                let mut events = s.student_events;
                for event in events.iter_mut() {
                    entry::normalize(&mut event.experts_invited, 0);
                }
                Some(Self {
                    tech_communities: EntryList::from_entries(s.tech_communities, 1),
                    student_events: EntryList::from_entries(events, 1),
                    mentorships: EntryList::from_entries(s.mentorships, 1),
                    other_contributions: EntryList::from_entries(s.other_contributions, 1),
                    meta: s.meta,
                })
            }
            _ => None,
        }
    }

    fn to_payload(&self) -> SectionData {
        SectionData::StudentActivities(StudentActivitiesSection {
            tech_communities: self.tech_communities.to_vec(),
            student_events: self.student_events.to_vec(),
            mentorships: self.mentorships.to_vec(),
            other_contributions: self.other_contributions.to_vec(),
            meta: unscored(&self.meta),
        })
    }
}

// ── Other information ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputList {
    SelfAssessed,
    National,
    International,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OtherInfoForm {
    pub self_assessed: EntryList<SelfAssessedOutput>,
    pub national: EntryList<OutputDetail>,
    pub international: EntryList<OutputDetail>,
    pub meta: ScoreMeta,
}

impl OtherInfoForm {
    pub fn add(&mut self, list: OutputList) -> EntryId {
        match list {
            OutputList::SelfAssessed => self.self_assessed.add(),
            OutputList::National => self.national.add(),
            OutputList::International => self.international.add(),
        }
    }

    pub fn remove(&mut self, list: OutputList, id: &str) -> bool {
        match list {
            OutputList::SelfAssessed => self.self_assessed.remove(id),
            OutputList::National => self.national.remove(id),
            OutputList::International => self.international.remove(id),
        }
    }

    pub fn update(
        &mut self,
        list: OutputList,
        id: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> Result<()> {
        match list {
            OutputList::SelfAssessed => self.self_assessed.update(id, field, value),
            OutputList::National => self.national.update(id, field, value),
            OutputList::International => self.international.update(id, field, value),
        }
    }
}

impl SectionForm for OtherInfoForm {
    const KEY: SectionKey = SectionKey::OtherInfo;

    fn from_stored(data: SectionData) -> Option<Self> {
        match data {
            SectionData::OtherInfo(s) => Some(Self {
                self_assessed: EntryList::from_entries(s.self_assessed, 1),
                national: EntryList::from_entries(s.national, 1),
                international: EntryList::from_entries(s.international, 1),
                meta: s.meta,
            }),
            _ => None,
        }
    }

    fn to_payload(&self) -> SectionData {
        SectionData::OtherInfo(OtherInfoSection {
            self_assessed: self.self_assessed.to_vec(),
            national: self.national.to_vec(),
            international: self.international.to_vec(),
            meta: unscored(&self.meta),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{ConferenceSection, MembershipsSection};

    #[test]
    fn stored_entries_are_normalized() {
        let mut section = MembershipsSection::new(Vec::new());
        section.meta.api_score = Some(5.0);
        section.meta.hod_remarks = Some("Approved".to_string());
        let form = MembershipsForm::from_stored(SectionData::Memberships(section)).unwrap();
        assert_eq!(form.entries.len(), 1);

        let SectionData::Memberships(payload) = form.to_payload() else {
            panic!("wrong section");
        };
        assert_eq!(payload.meta.api_score, None);
        assert_eq!(payload.meta.hod_remarks.as_deref(), Some("Approved"));
    }

    #[test]
    fn wrong_section_is_rejected() {
        let data = SectionData::ConferenceEvents(ConferenceSection::default());
        assert!(MembershipsForm::from_stored(data.clone()).is_none());
        assert!(ConferenceForm::from_stored(data).is_some());
    }

    #[test]
    fn general_details_fields() {
        let mut form = GeneralDetailsForm::default();
        form.update_field("name", "Dr. A").unwrap();
        form.update_field("presentPayScaleAndPay", "12x").unwrap();
        assert_eq!(form.details.name, "Dr. A");
        assert_eq!(form.details.present_pay_scale_and_pay, 0.0);
        assert!(form.update_field("salary", "1").is_err());
    }

    #[test]
    fn project_guidance_counts() {
        let mut form = ProjectGuidanceForm::default();
        form.update_field("projectsGuided", "4").unwrap();
        form.update_field("studentsGuided", 12u32).unwrap();
        assert_eq!(form.guidance.projects_guided, 4);
        assert_eq!(form.guidance.students_guided, 12);
    }

    #[test]
    fn lectures_keep_one_course_per_semester() {
        let mut form = LecturesForm::default();
        let odd = form.semester(Semester::Odd).entries()[0].id.clone();
        assert!(!form.remove_course(Semester::Odd, &odd));
        let extra = form.add_course(Semester::Even);
        form.update_course(Semester::Even, &extra, "courseCode", "CS201").unwrap();
        assert_eq!(form.semester(Semester::Even).len(), 2);
        assert!(form.update_course(Semester::Odd, &extra, "courseCode", "x").is_err());
    }

    #[test]
    fn experts_list_may_be_emptied() {
        let mut form = StudentActivitiesForm::default();
        let event = form.student_events.entries()[0].id.clone();
        assert_eq!(form.experts(&event).unwrap().len(), 0);

        let expert = form.add_expert(&event).unwrap();
        form.update_expert(&event, &expert, "durationHours", "2.5").unwrap();
        assert_eq!(form.experts(&event).unwrap()[0].duration_hours, 2.5);
        assert!(form.remove_expert(&event, &expert).unwrap());
        assert!(form.experts(&event).unwrap().is_empty());
        assert!(form.add_expert("missing").is_err());
    }

    #[test]
    fn other_info_lists() {
        let mut form = OtherInfoForm::default();
        let id = form.add(OutputList::National);
        form.update(OutputList::National, &id, "details", "Keynote").unwrap();
        assert_eq!(form.national.len(), 2);
        assert!(form.remove(OutputList::National, &id));
        let own = form.self_assessed.entries()[0].id.clone();
        form.update(OutputList::SelfAssessed, &own, "points", "7").unwrap();
        assert_eq!(form.self_assessed.entries()[0].points, 7.0);
    }
}
