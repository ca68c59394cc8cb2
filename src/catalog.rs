use serde::{Deserialize, Serialize};

// ── Section identifiers ─────────────────────────────────────────────

/// One appraisal section. Serialized as its camelCase data key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKey {
    GeneralDetails,
    ConferenceEvents,
    LecturesTutorials,
    ReadingMaterial,
    ProjectGuidance,
    ExamDuties,
    StudentActivities,
    ResearchPapers,
    BooksChapters,
    ResearchProjects,
    ResearchGuidance,
    Memberships,
    OtherInfo,
}

// ── Section definition ──────────────────────────────────────────────

pub struct SectionDef {
    pub key: SectionKey,
    pub title: &'static str,
    /// Kebab-case id used by the form pages when asking for a score.
    pub route_id: &'static str,
    /// Numbered page id, when the page covers exactly this one section.
    pub page_id: Option<&'static str>,
    /// camelCase key inside the persisted record.
    pub data_key: &'static str,
    /// Section key understood by `get-item-by-section`.
    pub backend_key: &'static str,
    /// Suffix of the `injest-item-<N>` endpoint, if the backend has one.
    pub ingest_item: Option<&'static str>,
}

/// Page that submits the project guidance and exam duties sections together.
pub const COMBINED_GUIDANCE_PAGE: &str = "12-3-4-project-guidance-and-exam-duties";

/// Returns the full, ordered section catalogue.
pub fn all_sections() -> &'static [SectionDef] {
    use SectionKey::*;

    static SECTIONS: &[SectionDef] = &[
        SectionDef {
            key: GeneralDetails,
            title: "1. General Details",
            route_id: "general-details",
            page_id: Some("general-details"),
            data_key: "generalDetails",
            backend_key: "1-10",
            ingest_item: Some("1-to-10"),
        },
        SectionDef {
            key: ConferenceEvents,
            title: "2. Conference and All",
            route_id: "conference-events",
            page_id: Some("11-conference-events"),
            data_key: "conferenceEvents",
            backend_key: "11",
            ingest_item: Some("11"),
        },
        SectionDef {
            key: LecturesTutorials,
            title: "3. Lectures/Tutorials/Practicals",
            route_id: "lectures-tutorials",
            page_id: Some("12-1-lectures-tutorials"),
            data_key: "lecturesTutorials",
            backend_key: "12.1",
            ingest_item: Some("12-1"),
        },
        SectionDef {
            key: ReadingMaterial,
            title: "4. Reading Material",
            route_id: "reading-material",
            page_id: Some("12-2-reading-material"),
            data_key: "readingMaterial",
            backend_key: "12.2",
            ingest_item: None,
        },
        SectionDef {
            key: ProjectGuidance,
            title: "5. Project Guidance",
            route_id: "project-guidance",
            page_id: None,
            data_key: "projectGuidance",
            backend_key: "12.3-12.4",
            ingest_item: Some("12-3-to-12-4"),
        },
        SectionDef {
            key: ExamDuties,
            title: "6. Examination Duties",
            route_id: "exam-duties",
            page_id: None,
            data_key: "examDuties",
            backend_key: "12.3-12.4",
            ingest_item: None,
        },
        SectionDef {
            key: StudentActivities,
            title: "7. Student Activities",
            route_id: "student-activities",
            page_id: Some("13-student-activities"),
            data_key: "studentActivities",
            backend_key: "13",
            ingest_item: Some("13"),
        },
        SectionDef {
            key: ResearchPapers,
            title: "8. Research Papers",
            route_id: "research-papers",
            page_id: Some("14-research-papers"),
            data_key: "researchPapers",
            backend_key: "14",
            ingest_item: Some("14"),
        },
        SectionDef {
            key: BooksChapters,
            title: "9. Books & Chapters",
            route_id: "books-chapters",
            page_id: Some("15-books-chapters"),
            data_key: "booksChapters",
            backend_key: "15",
            ingest_item: Some("15"),
        },
        SectionDef {
            key: ResearchProjects,
            title: "10. Research Projects",
            route_id: "research-projects",
            page_id: Some("16-research-projects"),
            data_key: "researchProjects",
            backend_key: "16",
            ingest_item: Some("16"),
        },
        SectionDef {
            key: ResearchGuidance,
            title: "11. Research Guidance",
            route_id: "research-guidance",
            page_id: Some("17-research-guidance"),
            data_key: "researchGuidance",
            backend_key: "17",
            ingest_item: Some("17"),
        },
        SectionDef {
            key: Memberships,
            title: "12. Memberships",
            route_id: "memberships",
            page_id: Some("18-memberships"),
            data_key: "memberships",
            backend_key: "18",
            ingest_item: Some("18"),
        },
        SectionDef {
            key: OtherInfo,
            title: "13. Other Information",
            route_id: "other-info",
            page_id: Some("19-other-info"),
            data_key: "otherInfo",
            backend_key: "19",
            ingest_item: Some("19"),
        },
    ];

    SECTIONS
}

/// Number of sections the dashboard measures completion against.
pub fn section_count() -> usize {
    all_sections().len()
}

impl SectionKey {
    pub const ALL: [SectionKey; 13] = [
        SectionKey::GeneralDetails,
        SectionKey::ConferenceEvents,
        SectionKey::LecturesTutorials,
        SectionKey::ReadingMaterial,
        SectionKey::ProjectGuidance,
        SectionKey::ExamDuties,
        SectionKey::StudentActivities,
        SectionKey::ResearchPapers,
        SectionKey::BooksChapters,
        SectionKey::ResearchProjects,
        SectionKey::ResearchGuidance,
        SectionKey::Memberships,
        SectionKey::OtherInfo,
    ];

    pub fn def(self) -> &'static SectionDef {
        // The catalogue is ordered like `ALL`.
        &all_sections()[self as usize]
    }

    pub fn data_key(self) -> &'static str {
        self.def().data_key
    }

    pub fn route_id(self) -> &'static str {
        self.def().route_id
    }

    pub fn title(self) -> &'static str {
        self.def().title
    }

    pub fn backend_key(self) -> &'static str {
        self.def().backend_key
    }

    /// Translate a kebab-case route id (short or numbered page form) into
    /// its section. The combined guidance page is not a single section and
    /// resolves through [`page_sections`] instead.
    pub fn from_route_id(id: &str) -> Option<SectionKey> {
        all_sections()
            .iter()
            .find(|s| s.route_id == id || s.page_id == Some(id))
            .map(|s| s.key)
    }

    pub fn from_data_key(key: &str) -> Option<SectionKey> {
        all_sections()
            .iter()
            .find(|s| s.data_key == key)
            .map(|s| s.key)
    }
}

/// Sections submitted by one form page.
pub fn page_sections(page_id: &str) -> Vec<SectionKey> {
    if page_id == COMBINED_GUIDANCE_PAGE {
        return vec![SectionKey::ProjectGuidance, SectionKey::ExamDuties];
    }
    SectionKey::from_route_id(page_id).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_order_matches_key_order() {
        for (i, key) in SectionKey::ALL.iter().enumerate() {
            assert_eq!(all_sections()[i].key, *key);
        }
        assert_eq!(section_count(), 13);
    }

    #[test]
    fn route_ids_map_to_exactly_one_data_key() {
        let mut data_keys = HashSet::new();
        let mut route_ids = HashSet::new();
        for key in SectionKey::ALL {
            assert!(data_keys.insert(key.data_key()));
            assert!(route_ids.insert(key.route_id()));
            assert_eq!(SectionKey::from_route_id(key.route_id()), Some(key));
            assert_eq!(SectionKey::from_data_key(key.data_key()), Some(key));
        }
    }

    #[test]
    fn data_key_matches_serde_name() {
        for key in SectionKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.data_key()));
        }
    }

    #[test]
    fn numbered_page_ids_resolve() {
        assert_eq!(
            SectionKey::from_route_id("14-research-papers"),
            Some(SectionKey::ResearchPapers)
        );
        assert_eq!(SectionKey::from_route_id(COMBINED_GUIDANCE_PAGE), None);
        assert_eq!(
            page_sections(COMBINED_GUIDANCE_PAGE),
            vec![SectionKey::ProjectGuidance, SectionKey::ExamDuties]
        );
        assert!(page_sections("no-such-page").is_empty());
    }
}
