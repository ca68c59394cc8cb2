use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::catalog::SectionKey;

// ── Core type aliases ──────────────────────────────────────────────

pub type EntryId = String;
pub type Score = f64;

/// Key of the status map inside the stored record.
pub const STATUS_KEY: &str = "sectionStatus";

/// Reviewer status every new row starts with.
pub const PENDING: &str = "Pending";

fn pending() -> Option<String> {
    Some(PENDING.to_string())
}

// ── Status ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

// ── Score metadata ─────────────────────────────────────────────────

/// Trailing fields shared by every section record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreMeta {
    pub api_score: Option<Score>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hod_remarks: Option<String>,
}

/// A section made of one list of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct EntriesSection<E> {
    pub entries: Vec<E>,
    #[serde(flatten)]
    pub meta: ScoreMeta,
}

impl<E> EntriesSection<E> {
    pub fn new(entries: Vec<E>) -> Self {
        Self {
            entries,
            meta: ScoreMeta::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Author {
    pub id: EntryId,
    pub name: String,
    pub author_type: String,
}

// ── 1. General details ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneralDetails {
    pub name: String,
    pub present_designation: String,
    pub qualifications: String,
    pub department: String,
    pub institute_joining_date: String,
    pub first_designation: String,
    pub present_pay_scale_and_pay: f64,
    pub areas_of_interest: String,
    pub additional_qualification: String,
    pub pursuing_higher_studies: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralDetailsSection {
    #[serde(flatten)]
    pub details: GeneralDetails,
    #[serde(flatten)]
    pub meta: ScoreMeta,
}

// ── 2. Conferences ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Participation {
    #[default]
    Attended,
    Organized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProgramType {
    Course,
    Program,
    Seminar,
    #[default]
    Conference,
    Workshop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ConferenceEntry {
    pub id: EntryId,
    pub title: String,
    pub dates_duration: String,
    pub sponsoring_agency: String,
    pub organisation_place: String,
    pub attended_organized: Participation,
    pub is_chief_organiser: Option<YesNo>,
    pub program_type: ProgramType,
}

pub type ConferenceSection = EntriesSection<ConferenceEntry>;

// ── 3. Lectures / tutorials ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseEntry {
    pub id: EntryId,
    pub course_code: String,
    pub course_title: String,
    pub contact_hours_per_week: String,
    pub scheduled_hours: u32,
    pub engaged_hours: u32,
    pub api_score: Option<Score>,
    pub hod_remarks: Option<String>,
}

impl Default for CourseEntry {
    fn default() -> Self {
        Self {
            id: EntryId::new(),
            course_code: String::new(),
            course_title: String::new(),
            contact_hours_per_week: String::new(),
            scheduled_hours: 0,
            engaged_hours: 0,
            api_score: None,
            hod_remarks: pending(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LecturesTutorialsSection {
    pub odd_semester: Vec<CourseEntry>,
    pub even_semester: Vec<CourseEntry>,
    #[serde(flatten)]
    pub meta: ScoreMeta,
}

// ── 4. Reading material ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadingMaterialEntry {
    pub id: EntryId,
    pub course_code: String,
    /// Knowledge resources consulted
    pub consulted: String,
    /// Knowledge resources prescribed
    pub prescribed: String,
    /// Additional resources provided
    pub additional: String,
    pub self_assessed_api: f64,
    pub hod_remarks: Option<String>,
}

impl Default for ReadingMaterialEntry {
    fn default() -> Self {
        Self {
            id: EntryId::new(),
            course_code: String::new(),
            consulted: String::new(),
            prescribed: String::new(),
            additional: String::new(),
            self_assessed_api: 0.0,
            hod_remarks: pending(),
        }
    }
}

pub type ReadingMaterialSection = EntriesSection<ReadingMaterialEntry>;

// ── 5. Project guidance ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectGuidance {
    pub projects_guided: u32,
    pub students_guided: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProjectGuidanceSection {
    #[serde(flatten)]
    pub guidance: ProjectGuidance,
    #[serde(flatten)]
    pub meta: ScoreMeta,
}

// ── 6. Examination duties ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExamActivity {
    /// Question papers set
    #[default]
    QpSet,
    /// Answer books evaluated
    AbEvaluated,
    PracticalConducted,
    InvigilationDuties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassLevel {
    #[serde(rename = "UG")]
    Ug,
    #[serde(rename = "PG")]
    Pg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvigilationType {
    Allotted,
    Performed,
}

impl InvigilationType {
    pub fn opposite(self) -> Self {
        match self {
            InvigilationType::Allotted => InvigilationType::Performed,
            InvigilationType::Performed => InvigilationType::Allotted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExamDutyEntry {
    pub id: EntryId,
    pub activity: ExamActivity,
    pub class_level: Option<ClassLevel>,
    pub invigilation_type: Option<InvigilationType>,
    pub t1: u32,
    pub t2: u32,
    pub t3: u32,
}

impl Default for ExamDutyEntry {
    fn default() -> Self {
        Self {
            id: EntryId::new(),
            activity: ExamActivity::QpSet,
            class_level: Some(ClassLevel::Ug),
            invigilation_type: None,
            t1: 0,
            t2: 0,
            t3: 0,
        }
    }
}

impl ExamDutyEntry {
    pub fn terms(&self) -> (u32, u32, u32) {
        (self.t1, self.t2, self.t3)
    }
}

pub type ExamDutiesSection = EntriesSection<ExamDutyEntry>;

// ── 7. Student activities ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechCommunityActivity {
    pub id: EntryId,
    pub community_name: String,
    pub role: String,
    pub contribution_details: String,
    pub api_score: Option<Score>,
    pub hod_remarks: Option<String>,
}

impl Default for TechCommunityActivity {
    fn default() -> Self {
        Self {
            id: EntryId::new(),
            community_name: String::new(),
            role: String::new(),
            contribution_details: String::new(),
            api_score: None,
            hod_remarks: pending(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IndustryExpert {
    pub id: EntryId,
    pub name: String,
    pub profile: String,
    pub company: String,
    pub email_id: String,
    pub cell_number: String,
    pub start_date: String,
    pub end_date: String,
    pub duration_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentEvent {
    pub id: EntryId,
    pub event_name: String,
    pub event_type: String,
    pub event_dates: String,
    pub theme: String,
    pub faculty_role: String,
    pub description: String,
    pub experts_invited: Vec<IndustryExpert>,
    pub api_score: Option<Score>,
    pub hod_remarks: Option<String>,
}

impl Default for StudentEvent {
    fn default() -> Self {
        Self {
            id: EntryId::new(),
            event_name: String::new(),
            event_type: "Hackathon".to_string(),
            event_dates: String::new(),
            theme: String::new(),
            faculty_role: String::new(),
            description: String::new(),
            experts_invited: Vec::new(),
            api_score: None,
            hod_remarks: pending(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MentorshipActivity {
    pub id: EntryId,
    pub program_name: String,
    pub involvement_type: String,
    pub details: String,
    pub api_score: Option<Score>,
    pub hod_remarks: Option<String>,
}

impl Default for MentorshipActivity {
    fn default() -> Self {
        Self {
            id: EntryId::new(),
            program_name: String::new(),
            involvement_type: "Mentor".to_string(),
            details: String::new(),
            api_score: None,
            hod_remarks: pending(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherContribution {
    pub id: EntryId,
    pub title: String,
    pub details: String,
    pub api_score: Option<Score>,
    pub hod_remarks: Option<String>,
}

impl Default for OtherContribution {
    fn default() -> Self {
        Self {
            id: EntryId::new(),
            title: String::new(),
            details: String::new(),
            api_score: None,
            hod_remarks: pending(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentActivitiesSection {
    pub tech_communities: Vec<TechCommunityActivity>,
    pub student_events: Vec<StudentEvent>,
    pub mentorships: Vec<MentorshipActivity>,
    pub other_contributions: Vec<OtherContribution>,
    #[serde(flatten)]
    pub meta: ScoreMeta,
}

// ── 8. Research papers ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PublicationType {
    /// International journal
    #[default]
    IJ,
    /// National journal
    NJ,
    /// International conference
    IC,
    /// Patent
    PN,
    /// Open access
    OA,
    /// Other journal
    OJ,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchPaperEntry {
    pub id: EntryId,
    pub title_and_complete_reference: String,
    pub pub_type: PublicationType,
    pub isbn_issn: String,
    pub indexed: bool,
    pub impact_factor: f64,
    pub user_author_type: String,
    pub other_authors: Vec<Author>,
}

pub type ResearchPapersSection = EntriesSection<ResearchPaperEntry>;

// ── 9. Books & chapters ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BookChapterEntry {
    pub id: EntryId,
    pub title_and_complete_reference: String,
    pub publisher_type: String,
    pub is_chapter: bool,
    pub number_of_chapters: u32,
    pub user_author_type: String,
    pub other_authors: Vec<Author>,
}

pub type BooksChaptersSection = EntriesSection<BookChapterEntry>;

// ── 10. Research projects ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProjectStatus {
    #[default]
    Completed,
    Ongoing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InvestigatorRole {
    #[default]
    #[serde(rename = "Chief Investigator")]
    Chief,
    #[serde(rename = "Co-Investigator")]
    Co,
    #[serde(rename = "Principal Investigator")]
    Principal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchProjectEntry {
    pub id: EntryId,
    pub title: String,
    pub sponsoring_agency: String,
    pub duration: String,
    pub sanction_date: String,
    pub status: ProjectStatus,
    pub is_hss: bool,
    pub amount_sanctioned: f64,
    pub is_consultancy: bool,
    pub user_author_type: InvestigatorRole,
    pub other_authors: Vec<Author>,
}

pub type ResearchProjectsSection = EntriesSection<ResearchProjectEntry>;

// ── 11. Research guidance ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DegreeLevel {
    #[default]
    PhD,
    MTech,
    BTech,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchGuidanceEntry {
    pub id: EntryId,
    pub title: String,
    pub enroll_no_and_name: String,
    pub degree: DegreeLevel,
    pub status: ProjectStatus,
    pub months_ongoing: u32,
    pub user_author_type: String,
    pub other_authors: Vec<Author>,
}

pub type ResearchGuidanceSection = EntriesSection<ResearchGuidanceEntry>;

// ── 12. Memberships ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MembershipEntry {
    pub id: EntryId,
    pub position_type: String,
    pub membership_details: String,
}

pub type MembershipsSection = EntriesSection<MembershipEntry>;

// ── 13. Other information ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SelfAssessedOutput {
    pub id: EntryId,
    pub details: String,
    pub points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputDetail {
    pub id: EntryId,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherInfoSection {
    #[serde(rename = "self")]
    pub self_assessed: Vec<SelfAssessedOutput>,
    pub national: Vec<OutputDetail>,
    pub international: Vec<OutputDetail>,
    #[serde(flatten)]
    pub meta: ScoreMeta,
}

// ── Section variants ───────────────────────────────────────────────

/// Submitted data of one section, tagged by section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionData {
    GeneralDetails(GeneralDetailsSection),
    ConferenceEvents(ConferenceSection),
    LecturesTutorials(LecturesTutorialsSection),
    ReadingMaterial(ReadingMaterialSection),
    ProjectGuidance(ProjectGuidanceSection),
    ExamDuties(ExamDutiesSection),
    StudentActivities(StudentActivitiesSection),
    ResearchPapers(ResearchPapersSection),
    BooksChapters(BooksChaptersSection),
    ResearchProjects(ResearchProjectsSection),
    ResearchGuidance(ResearchGuidanceSection),
    Memberships(MembershipsSection),
    OtherInfo(OtherInfoSection),
}

impl SectionData {
    pub fn key(&self) -> SectionKey {
        match self {
            SectionData::GeneralDetails(_) => SectionKey::GeneralDetails,
            SectionData::ConferenceEvents(_) => SectionKey::ConferenceEvents,
            SectionData::LecturesTutorials(_) => SectionKey::LecturesTutorials,
            SectionData::ReadingMaterial(_) => SectionKey::ReadingMaterial,
            SectionData::ProjectGuidance(_) => SectionKey::ProjectGuidance,
            SectionData::ExamDuties(_) => SectionKey::ExamDuties,
            SectionData::StudentActivities(_) => SectionKey::StudentActivities,
            SectionData::ResearchPapers(_) => SectionKey::ResearchPapers,
            SectionData::BooksChapters(_) => SectionKey::BooksChapters,
            SectionData::ResearchProjects(_) => SectionKey::ResearchProjects,
            SectionData::ResearchGuidance(_) => SectionKey::ResearchGuidance,
            SectionData::Memberships(_) => SectionKey::Memberships,
            SectionData::OtherInfo(_) => SectionKey::OtherInfo,
        }
    }

    pub fn meta(&self) -> &ScoreMeta {
        match self {
            SectionData::GeneralDetails(s) => &s.meta,
            SectionData::ConferenceEvents(s) => &s.meta,
            SectionData::LecturesTutorials(s) => &s.meta,
            SectionData::ReadingMaterial(s) => &s.meta,
            SectionData::ProjectGuidance(s) => &s.meta,
            SectionData::ExamDuties(s) => &s.meta,
            SectionData::StudentActivities(s) => &s.meta,
            SectionData::ResearchPapers(s) => &s.meta,
            SectionData::BooksChapters(s) => &s.meta,
            SectionData::ResearchProjects(s) => &s.meta,
            SectionData::ResearchGuidance(s) => &s.meta,
            SectionData::Memberships(s) => &s.meta,
            SectionData::OtherInfo(s) => &s.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut ScoreMeta {
        match self {
            SectionData::GeneralDetails(s) => &mut s.meta,
            SectionData::ConferenceEvents(s) => &mut s.meta,
            SectionData::LecturesTutorials(s) => &mut s.meta,
            SectionData::ReadingMaterial(s) => &mut s.meta,
            SectionData::ProjectGuidance(s) => &mut s.meta,
            SectionData::ExamDuties(s) => &mut s.meta,
            SectionData::StudentActivities(s) => &mut s.meta,
            SectionData::ResearchPapers(s) => &mut s.meta,
            SectionData::BooksChapters(s) => &mut s.meta,
            SectionData::ResearchProjects(s) => &mut s.meta,
            SectionData::ResearchGuidance(s) => &mut s.meta,
            SectionData::Memberships(s) => &mut s.meta,
            SectionData::OtherInfo(s) => &mut s.meta,
        }
    }

    pub fn api_score(&self) -> Option<Score> {
        self.meta().api_score
    }

    /// Decode one stored section by its key.
    pub fn from_value(key: SectionKey, value: Value) -> serde_json::Result<SectionData> {
        Ok(match key {
            SectionKey::GeneralDetails => SectionData::GeneralDetails(serde_json::from_value(value)?),
            SectionKey::ConferenceEvents => SectionData::ConferenceEvents(serde_json::from_value(value)?),
            SectionKey::LecturesTutorials => SectionData::LecturesTutorials(serde_json::from_value(value)?),
            SectionKey::ReadingMaterial => SectionData::ReadingMaterial(serde_json::from_value(value)?),
            SectionKey::ProjectGuidance => SectionData::ProjectGuidance(serde_json::from_value(value)?),
            SectionKey::ExamDuties => SectionData::ExamDuties(serde_json::from_value(value)?),
            SectionKey::StudentActivities => SectionData::StudentActivities(serde_json::from_value(value)?),
            SectionKey::ResearchPapers => SectionData::ResearchPapers(serde_json::from_value(value)?),
            SectionKey::BooksChapters => SectionData::BooksChapters(serde_json::from_value(value)?),
            SectionKey::ResearchProjects => SectionData::ResearchProjects(serde_json::from_value(value)?),
            SectionKey::ResearchGuidance => SectionData::ResearchGuidance(serde_json::from_value(value)?),
            SectionKey::Memberships => SectionData::Memberships(serde_json::from_value(value)?),
            SectionKey::OtherInfo => SectionData::OtherInfo(serde_json::from_value(value)?),
        })
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            SectionData::GeneralDetails(s) => serde_json::to_value(s),
            SectionData::ConferenceEvents(s) => serde_json::to_value(s),
            SectionData::LecturesTutorials(s) => serde_json::to_value(s),
            SectionData::ReadingMaterial(s) => serde_json::to_value(s),
            SectionData::ProjectGuidance(s) => serde_json::to_value(s),
            SectionData::ExamDuties(s) => serde_json::to_value(s),
            SectionData::StudentActivities(s) => serde_json::to_value(s),
            SectionData::ResearchPapers(s) => serde_json::to_value(s),
            SectionData::BooksChapters(s) => serde_json::to_value(s),
            SectionData::ResearchProjects(s) => serde_json::to_value(s),
            SectionData::ResearchGuidance(s) => serde_json::to_value(s),
            SectionData::Memberships(s) => serde_json::to_value(s),
            SectionData::OtherInfo(s) => serde_json::to_value(s),
        }
    }
}

// ── Persisted record ───────────────────────────────────────────────

/// Everything the appraisal slot holds. Field names match the stored
/// JSON blob so existing data loads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AppraisalRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_details: Option<GeneralDetailsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conference_events: Option<ConferenceSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lectures_tutorials: Option<LecturesTutorialsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_material: Option<ReadingMaterialSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_guidance: Option<ProjectGuidanceSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_duties: Option<ExamDutiesSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_activities: Option<StudentActivitiesSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_papers: Option<ResearchPapersSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub books_chapters: Option<BooksChaptersSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_projects: Option<ResearchProjectsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_guidance: Option<ResearchGuidanceSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memberships: Option<MembershipsSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_info: Option<OtherInfoSection>,
    /// Keyed by data key. Foreign keys written by older clients are kept.
    pub section_status: BTreeMap<String, SectionStatus>,
}

impl AppraisalRecord {
    pub fn section(&self, key: SectionKey) -> Option<SectionData> {
        match key {
            SectionKey::GeneralDetails => self.general_details.clone().map(SectionData::GeneralDetails),
            SectionKey::ConferenceEvents => self.conference_events.clone().map(SectionData::ConferenceEvents),
            SectionKey::LecturesTutorials => self.lectures_tutorials.clone().map(SectionData::LecturesTutorials),
            SectionKey::ReadingMaterial => self.reading_material.clone().map(SectionData::ReadingMaterial),
            SectionKey::ProjectGuidance => self.project_guidance.clone().map(SectionData::ProjectGuidance),
            SectionKey::ExamDuties => self.exam_duties.clone().map(SectionData::ExamDuties),
            SectionKey::StudentActivities => self.student_activities.clone().map(SectionData::StudentActivities),
            SectionKey::ResearchPapers => self.research_papers.clone().map(SectionData::ResearchPapers),
            SectionKey::BooksChapters => self.books_chapters.clone().map(SectionData::BooksChapters),
            SectionKey::ResearchProjects => self.research_projects.clone().map(SectionData::ResearchProjects),
            SectionKey::ResearchGuidance => self.research_guidance.clone().map(SectionData::ResearchGuidance),
            SectionKey::Memberships => self.memberships.clone().map(SectionData::Memberships),
            SectionKey::OtherInfo => self.other_info.clone().map(SectionData::OtherInfo),
        }
    }

    pub fn put(&mut self, data: SectionData) {
        match data {
            SectionData::GeneralDetails(s) => self.general_details = Some(s),
            SectionData::ConferenceEvents(s) => self.conference_events = Some(s),
            SectionData::LecturesTutorials(s) => self.lectures_tutorials = Some(s),
            SectionData::ReadingMaterial(s) => self.reading_material = Some(s),
            SectionData::ProjectGuidance(s) => self.project_guidance = Some(s),
            SectionData::ExamDuties(s) => self.exam_duties = Some(s),
            SectionData::StudentActivities(s) => self.student_activities = Some(s),
            SectionData::ResearchPapers(s) => self.research_papers = Some(s),
            SectionData::BooksChapters(s) => self.books_chapters = Some(s),
            SectionData::ResearchProjects(s) => self.research_projects = Some(s),
            SectionData::ResearchGuidance(s) => self.research_guidance = Some(s),
            SectionData::Memberships(s) => self.memberships = Some(s),
            SectionData::OtherInfo(s) => self.other_info = Some(s),
        }
    }

    /// Score recorded for every populated section, in catalogue order.
    pub fn scores(&self) -> Vec<(SectionKey, Option<Score>)> {
        SectionKey::ALL
            .iter()
            .filter_map(|key| self.section(*key).map(|s| (*key, s.api_score())))
            .collect()
    }

    /// Build a record one section at a time. Sections and statuses that do
    /// not decode are left out; their keys are returned.
    pub fn from_map(map: Map<String, Value>) -> (AppraisalRecord, Vec<String>) {
        let mut record = AppraisalRecord::default();
        let mut rejected = Vec::new();

        for (name, value) in map {
            if value.is_null() {
                continue;
            }
            if name == STATUS_KEY {
                let Value::Object(statuses) = value else {
                    rejected.push(name);
                    continue;
                };
                for (key, status) in statuses {
                    match serde_json::from_value::<SectionStatus>(status) {
                        Ok(status) => {
                            record.section_status.insert(key, status);
                        }
                        Err(_) => rejected.push(format!("{}.{}", STATUS_KEY, key)),
                    }
                }
                continue;
            }
            let Some(key) = SectionKey::from_data_key(&name) else {
                continue;
            };
            match SectionData::from_value(key, value) {
                Ok(data) => record.put(data),
                Err(_) => rejected.push(name),
            }
        }

        (record, rejected)
    }

    pub fn status(&self, key: SectionKey) -> SectionStatus {
        self.section_status
            .get(key.data_key())
            .copied()
            .unwrap_or_default()
    }
}

// ── User ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    pub department: String,
}
