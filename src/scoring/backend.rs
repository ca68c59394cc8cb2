use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::{rules, ScoreOutcome, Scorer};
use crate::catalog::SectionKey;
use crate::error::{AppraisalError, Result};
use crate::protocol::{
    Author, BookChapterEntry, ConferenceEntry, CourseEntry, ExamDutyEntry, GeneralDetails,
    MembershipEntry, OtherInfoSection, OutputDetail, Participation, ProjectGuidance,
    ResearchGuidanceEntry, ResearchPaperEntry, ResearchProjectEntry, Score, SectionData,
    StudentActivitiesSection, YesNo,
};
use crate::store::{SectionStore, AUTH_TOKEN_SLOT, USER_ID_SLOT};

pub const DEFAULT_USER_ID: &str = "default_user_id";
const SUBMITTED: &str = "Section submitted successfully";
/// Score assumed for general details when the lookup carries none.
const GENERAL_DETAILS_FALLBACK: Score = 10.0;

// ── HTTP client ─────────────────────────────────────────────────────

/// Client for the appraisal ingestion service.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    store: SectionStore,
}

impl BackendClient {
    /// `store` supplies the `user_id` and `auth_token` slots.
    pub fn new(base_url: impl Into<String>, store: SectionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!("Backend client targeting {}", base_url);
        Self {
            http: reqwest::Client::new(),
            base_url,
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &SectionStore {
        &self.store
    }

    pub fn user_id(&self) -> String {
        self.store
            .read_raw(USER_ID_SLOT)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ID.to_string())
    }

    fn auth_token(&self) -> Option<String> {
        self.store.read_raw(AUTH_TOKEN_SLOT).filter(|t| !t.is_empty())
    }

    pub fn ingest_url(&self, item: &str) -> String {
        format!("{}/api/injest-item-{}/", self.base_url, item)
    }

    pub fn item_by_section_url(&self) -> String {
        format!("{}/api/get-item-by-section/", self.base_url)
    }

    /// POST a body to `injest-item-<item>` and return the decoded response.
    pub async fn ingest(&self, item: &str, body: &Value) -> Result<Value> {
        let url = self.ingest_url(item);
        info!("POST {}", url);
        let request = self.authorize(self.http.post(&url)).json(body);
        self.send(request).await
    }

    /// Fetch what the service holds for one backend section key.
    pub async fn get_item_by_section(&self, section: &str) -> Result<Value> {
        let url = self.item_by_section_url();
        let user_id = self.user_id();
        info!("GET {} section={}", url, section);
        let request = self
            .authorize(self.http.get(&url))
            .query(&[("user_id", user_id.as_str()), ("section", section)]);
        self.send(request).await
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["message"].as_str().map(str::to_string))
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    if text.is_empty() {
                        format!("HTTP error! status: {}", status.as_u16())
                    } else {
                        text.clone()
                    }
                });
            warn!("Backend returned {}: {}", status, message);
            return Err(AppraisalError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

// ── Response parsing ────────────────────────────────────────────────

/// `result.score` of an ingestion response, 0 when absent.
pub fn response_score(response: &Value) -> Score {
    clean(response["result"]["score"].as_f64().unwrap_or(0.0))
}

pub fn response_message(response: &Value) -> String {
    response["message"]
        .as_str()
        .filter(|m| !m.is_empty())
        .unwrap_or(SUBMITTED)
        .to_string()
}

fn clean(score: Score) -> Score {
    if score.is_finite() {
        score.max(0.0)
    } else {
        0.0
    }
}

// ── Request bodies ──────────────────────────────────────────────────

fn authors(list: &[Author]) -> Value {
    list.iter()
        .map(|a| json!({ "name": a.name, "author_type": a.author_type }))
        .collect()
}

pub fn general_details_body(user_id: &str, d: &GeneralDetails) -> Value {
    json!({
        "user_id": user_id,
        "full_name": d.name,
        "present_designation": d.present_designation,
        "qualifications": d.qualifications,
        "department": d.department,
        "institute_joining_date": d.institute_joining_date,
        "first_designation": d.first_designation,
        "present_pay_scale_&_pay": d.present_pay_scale_and_pay,
        "areas_of_specialization_and_current_interest": d.areas_of_interest,
        "additional_qualification_acquired": d.additional_qualification,
        "pursuing_higher_studies": d.pursuing_higher_studies,
    })
}

pub fn conference_data(entries: &[ConferenceEntry]) -> Value {
    entries
        .iter()
        .map(|e| {
            let (start, end) = e
                .dates_duration
                .split_once(" to ")
                .unwrap_or((e.dates_duration.as_str(), e.dates_duration.as_str()));
            json!({
                "title": e.title,
                "start_date": start,
                "end_date": end,
                "attended/organized": e.attended_organized == Participation::Organized,
                "program_type": e.program_type,
                "is_chief_organizer": e.is_chief_organiser == Some(YesNo::Yes),
                "sponsoring_agency": e.sponsoring_agency,
                "organisation_&_place": e.organisation_place,
            })
        })
        .collect()
}

/// Leading integer of free text, 0 when there is none.
fn leading_int(text: &str) -> i64 {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

pub fn semester_data(courses: &[CourseEntry]) -> Value {
    courses
        .iter()
        .map(|c| {
            json!({
                "course_code": c.course_code,
                "course_title": c.course_title,
                "contact_hr_per_week": leading_int(&c.contact_hours_per_week),
                "total_hour_scheduled": c.scheduled_hours,
                "total_hour_engaged": c.engaged_hours,
            })
        })
        .collect()
}

pub fn guidance_and_duties_data(guidance: &ProjectGuidance, duties: &[ExamDutyEntry]) -> Value {
    let duties: Vec<Value> = duties
        .iter()
        .map(|d| {
            json!({
                "activity": d.activity,
                "class": d.class_level.map(|c| json!(c)).unwrap_or_else(|| json!("")),
                "t1": d.t1,
                "t2": d.t2,
                "t3": d.t3,
            })
        })
        .collect();
    json!({
        "12.3": {
            "number_of_projects_guided": guidance.projects_guided,
            "number_of_students_guided": guidance.students_guided,
        },
        "12.4": duties,
    })
}

/// The service groups student activities into lettered blocks A to E.
pub fn student_activities_data(s: &StudentActivitiesSection) -> Value {
    let a: Vec<Value> = s
        .tech_communities
        .iter()
        .map(|t| {
            json!({
                "name_of_club": t.community_name,
                "played_lead_role": t.role.to_lowercase().contains("lead"),
                "details_of_activities": t.contribution_details,
            })
        })
        .collect();
    let b: Vec<Value> = s
        .student_events
        .iter()
        .map(|e| json!({ "role": e.faculty_role, "details_of_activities": e.description }))
        .collect();
    let c: Vec<Value> = s
        .mentorships
        .iter()
        .map(|m| json!({ "position_type": m.involvement_type, "details_of_activities": m.details }))
        .collect();
    let d: Vec<Value> = s
        .other_contributions
        .iter()
        .map(|o| json!({ "nature": o.title, "details_of_activities": o.details }))
        .collect();
    json!({ "A": a, "B": b, "C": c, "D": d, "E": [] })
}

pub fn research_papers_data(entries: &[ResearchPaperEntry]) -> Value {
    entries
        .iter()
        .map(|e| {
            json!({
                "title_and_complete_reference": e.title_and_complete_reference,
                "pub_type": e.pub_type,
                "isbn_issn": e.isbn_issn,
                "indexed": e.indexed,
                "impact_factor": e.impact_factor,
                "user_author_type": e.user_author_type,
                "other_authors": authors(&e.other_authors),
            })
        })
        .collect()
}

pub fn books_chapters_data(entries: &[BookChapterEntry]) -> Value {
    entries
        .iter()
        .map(|e| {
            json!({
                "title_and_complete_reference": e.title_and_complete_reference,
                "publisher_type": e.publisher_type,
                "is_chapter": e.is_chapter,
                "number_of_chapters": e.number_of_chapters,
                "user_author_type": e.user_author_type,
                "other_authors": authors(&e.other_authors),
            })
        })
        .collect()
}

pub fn research_projects_data(entries: &[ResearchProjectEntry]) -> Value {
    entries
        .iter()
        .map(|e| {
            json!({
                "title": e.title,
                "sponsoring_agency": e.sponsoring_agency,
                "duration": e.duration,
                "sanction_date": e.sanction_date,
                "status": e.status,
                "is_hss": e.is_hss,
                "amount_sanctioned": e.amount_sanctioned,
                "is_consultancy": e.is_consultancy,
                "user_author_type": e.user_author_type,
                "other_authors": authors(&e.other_authors),
            })
        })
        .collect()
}

pub fn research_guidance_data(entries: &[ResearchGuidanceEntry]) -> Value {
    entries
        .iter()
        .map(|e| {
            json!({
                "title": e.title,
                "enroll_no_and_name": e.enroll_no_and_name,
                "degree": e.degree,
                "status": e.status,
                "months_ongoing": e.months_ongoing,
                "user_author_type": e.user_author_type,
                "other_authors": authors(&e.other_authors),
            })
        })
        .collect()
}

pub fn memberships_data(entries: &[MembershipEntry]) -> Value {
    entries
        .iter()
        .map(|e| {
            json!({
                "position_type": e.position_type,
                "membership_details": e.membership_details,
            })
        })
        .collect()
}

pub fn other_info_data(s: &OtherInfoSection) -> Value {
    json!({
        "self": s.self_assessed.iter()
            .map(|o| json!({ "details": o.details, "points": o.points }))
            .collect::<Vec<_>>(),
        "national": described_outputs(&s.national),
        "international": described_outputs(&s.international),
    })
}

fn described_outputs(outputs: &[OutputDetail]) -> Vec<Value> {
    outputs
        .iter()
        .filter(|o| !o.details.trim().is_empty())
        .map(|o| json!({ "details": o.details }))
        .collect()
}

// ── Scorer ──────────────────────────────────────────────────────────

/// Scores sections by submitting them to the ingestion service.
pub struct BackendScorer {
    client: BackendClient,
}

impl BackendScorer {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    async fn ingest_data(&self, key: SectionKey, data: Value) -> Result<ScoreOutcome> {
        let item = key.def().ingest_item.ok_or_else(|| AppraisalError::Backend {
            status: 0,
            message: format!("no ingestion endpoint for {}", key.data_key()),
        })?;
        let body = json!({ "user_id": self.client.user_id(), "data": data });
        let response = self.client.ingest(item, &body).await?;
        Ok(ScoreOutcome::new(response_score(&response), response_message(&response)))
    }

    async fn general_details(&self, details: &GeneralDetails) -> Result<ScoreOutcome> {
        let key = SectionKey::GeneralDetails;
        let user_id = self.client.user_id();
        let item = key.def().ingest_item.unwrap_or("1-to-10");
        let response = self
            .client
            .ingest(item, &general_details_body(&user_id, details))
            .await?;

        let stored = self.client.get_item_by_section(key.backend_key()).await?;
        let score = stored["score"]
            .as_f64()
            .filter(|s| *s != 0.0)
            .map(clean)
            .unwrap_or(GENERAL_DETAILS_FALLBACK);
        Ok(ScoreOutcome::new(score, response_message(&response)))
    }

    async fn lectures(&self, odd: &[CourseEntry], even: &[CourseEntry]) -> Result<ScoreOutcome> {
        let item = SectionKey::LecturesTutorials.def().ingest_item.unwrap_or("12-1");
        let user_id = self.client.user_id();

        let mut scores = [0.0; 2];
        for (slot, (semester, courses)) in [("odd", odd), ("even", even)].into_iter().enumerate() {
            if courses.is_empty() {
                continue;
            }
            let body = json!({
                "user_id": user_id,
                "semester": semester,
                "data": semester_data(courses),
            });
            let response = self.client.ingest(item, &body).await?;
            scores[slot] = response_score(&response);
        }

        Ok(ScoreOutcome::new(
            scores[0] + scores[1],
            format!(
                "{}. Odd semester: {}, Even semester: {}",
                SUBMITTED, scores[0], scores[1]
            ),
        ))
    }

    fn local(&self, data: &SectionData) -> ScoreOutcome {
        let score = rules::score_section(data);
        info!(
            "No ingestion endpoint for {}, scored locally: {}",
            data.key().data_key(),
            score
        );
        ScoreOutcome::new(score, format!("{}. API Score: {}", SUBMITTED, score))
    }
}

#[async_trait]
impl Scorer for BackendScorer {
    async fn score(&self, data: &SectionData) -> Result<ScoreOutcome> {
        let key = data.key();
        match data {
            SectionData::GeneralDetails(s) => self.general_details(&s.details).await,
            SectionData::ConferenceEvents(s) => self.ingest_data(key, conference_data(&s.entries)).await,
            SectionData::LecturesTutorials(s) => self.lectures(&s.odd_semester, &s.even_semester).await,
            SectionData::ReadingMaterial(_) | SectionData::ExamDuties(_) => Ok(self.local(data)),
            SectionData::ProjectGuidance(s) => {
                // Both halves of 12.3-12.4 travel together; duties come from
                // whatever was last stored.
                let duties = self
                    .client
                    .store()
                    .get_all()
                    .exam_duties
                    .map(|d| d.entries)
                    .unwrap_or_default();
                self.ingest_data(key, guidance_and_duties_data(&s.guidance, &duties))
                    .await
            }
            SectionData::StudentActivities(s) => self.ingest_data(key, student_activities_data(s)).await,
            SectionData::ResearchPapers(s) => self.ingest_data(key, research_papers_data(&s.entries)).await,
            SectionData::BooksChapters(s) => self.ingest_data(key, books_chapters_data(&s.entries)).await,
            SectionData::ResearchProjects(s) => {
                self.ingest_data(key, research_projects_data(&s.entries)).await
            }
            SectionData::ResearchGuidance(s) => {
                self.ingest_data(key, research_guidance_data(&s.entries)).await
            }
            SectionData::Memberships(s) => self.ingest_data(key, memberships_data(&s.entries)).await,
            SectionData::OtherInfo(s) => self.ingest_data(key, other_info_data(s)).await,
        }
    }
}
