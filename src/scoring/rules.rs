//! Fixed point tables for every appraisal section.
//! Each function is pure: same entries in, same score out.

use crate::protocol::{
    BookChapterEntry, ConferenceEntry, CourseEntry, DegreeLevel, ExamActivity, ExamDutyEntry,
    InvestigatorRole, MembershipEntry, OtherInfoSection, OutputDetail, Participation,
    ProjectGuidance,
    ProjectStatus, PublicationType, ReadingMaterialEntry, ResearchGuidanceEntry,
    ResearchPaperEntry, ResearchProjectEntry, Score, SectionData, StudentActivitiesSection,
};

/// Upper bound on the student activities total.
pub const STUDENT_ACTIVITIES_CAP: Score = 60.0;
pub const MEMBERSHIPS_CAP: Score = 25.0;
pub const SELF_ASSESSED_OUTPUT_CAP: Score = 30.0;
pub const NATIONAL_OUTPUT_POINTS: Score = 30.0;
pub const INTERNATIONAL_OUTPUT_POINTS: Score = 50.0;
pub const READING_MATERIAL_ENTRY_CAP: Score = 5.0;
/// Upper bound on the other information total.
pub const OTHER_INFO_CAP: Score = 100.0;

pub fn general_details() -> Score {
    10.0
}

pub fn conference_points(entry: &ConferenceEntry) -> Score {
    match entry.attended_organized {
        Participation::Attended => 5.0,
        Participation::Organized => 10.0,
    }
}

pub fn conference_events(entries: &[ConferenceEntry]) -> Score {
    entries.iter().map(conference_points).sum()
}

pub fn lectures_tutorials(odd: &[CourseEntry], even: &[CourseEntry]) -> Score {
    ((odd.len() + even.len()) * 10) as Score
}

pub fn publication_points(pub_type: PublicationType) -> Score {
    match pub_type {
        PublicationType::IJ => 20.0,
        PublicationType::NJ => 15.0,
        PublicationType::IC => 10.0,
        PublicationType::PN => 25.0,
        PublicationType::OA => 12.0,
        _ => 10.0,
    }
}

pub fn research_papers(entries: &[ResearchPaperEntry]) -> Score {
    entries.iter().map(|e| publication_points(e.pub_type)).sum()
}

pub fn reading_material(entries: &[ReadingMaterialEntry]) -> Score {
    entries
        .iter()
        .map(|e| {
            let api = if e.self_assessed_api.is_finite() { e.self_assessed_api } else { 0.0 };
            api.max(0.0).min(READING_MATERIAL_ENTRY_CAP)
        })
        .sum()
}

pub fn project_guidance(guidance: &ProjectGuidance) -> Score {
    (guidance.projects_guided as Score * 2.0 + guidance.students_guided as Score * 0.2).round()
}

pub fn exam_weight(activity: ExamActivity) -> Score {
    match activity {
        ExamActivity::QpSet => 1.0,
        ExamActivity::AbEvaluated => 0.02,
        ExamActivity::PracticalConducted => 0.5,
        ExamActivity::InvigilationDuties => 0.1,
    }
}

pub fn exam_duties(entries: &[ExamDutyEntry]) -> Score {
    entries
        .iter()
        .map(|e| (e.t1 as Score + e.t2 as Score + e.t3 as Score) * exam_weight(e.activity))
        .sum::<Score>()
        .round()
}

pub fn books_chapters(entries: &[BookChapterEntry]) -> Score {
    entries
        .iter()
        .map(|e| if e.is_chapter { 10.0 } else { 20.0 })
        .sum()
}

pub fn research_project_points(entry: &ResearchProjectEntry) -> Score {
    let base = match (entry.user_author_type, entry.status) {
        // A principal investigator leads the project and earns chief points.
        (InvestigatorRole::Chief | InvestigatorRole::Principal, ProjectStatus::Completed) => 10.0,
        (InvestigatorRole::Chief | InvestigatorRole::Principal, ProjectStatus::Ongoing) => 8.0,
        (InvestigatorRole::Co, ProjectStatus::Completed) => 6.0,
        (InvestigatorRole::Co, ProjectStatus::Ongoing) => 4.0,
    };
    let amount = if entry.amount_sanctioned.is_finite() { entry.amount_sanctioned } else { 0.0 };
    let bonus = (amount / 10_000.0).floor().clamp(0.0, 10.0);
    base + bonus
}

pub fn research_projects(entries: &[ResearchProjectEntry]) -> Score {
    entries.iter().map(research_project_points).sum()
}

pub fn guidance_points(degree: DegreeLevel) -> Score {
    match degree {
        DegreeLevel::PhD => 10.0,
        DegreeLevel::BTech => 8.0,
        DegreeLevel::MTech => 6.0,
        DegreeLevel::Other => 5.0,
    }
}

pub fn research_guidance(entries: &[ResearchGuidanceEntry]) -> Score {
    entries.iter().map(|e| guidance_points(e.degree)).sum()
}

pub fn memberships(entries: &[MembershipEntry]) -> Score {
    ((entries.len() * 5) as Score).min(MEMBERSHIPS_CAP)
}

pub fn student_activities(section: &StudentActivitiesSection) -> Score {
    let communities = section.tech_communities.len() as Score * 5.0;
    let events: Score = section
        .student_events
        .iter()
        .map(|ev| 10.0 + (ev.experts_invited.len() as Score).min(5.0))
        .sum();
    let mentorships = section.mentorships.len() as Score * 5.0;
    let others = section.other_contributions.len() as Score * 3.0;
    (communities + events + mentorships + others).min(STUDENT_ACTIVITIES_CAP)
}

fn described(outputs: &[OutputDetail]) -> Score {
    outputs.iter().filter(|o| !o.details.trim().is_empty()).count() as Score
}

/// Rows without details are not counted.
pub fn other_info(section: &OtherInfoSection) -> Score {
    let self_points: Score = section
        .self_assessed
        .iter()
        .map(|e| if e.points.is_finite() { e.points.max(0.0) } else { 0.0 })
        .sum();
    let total = self_points.min(SELF_ASSESSED_OUTPUT_CAP)
        + described(&section.national) * NATIONAL_OUTPUT_POINTS
        + described(&section.international) * INTERNATIONAL_OUTPUT_POINTS;
    total.min(OTHER_INFO_CAP)
}

/// Score any section with its table.
pub fn score_section(data: &SectionData) -> Score {
    match data {
        SectionData::GeneralDetails(_) => general_details(),
        SectionData::ConferenceEvents(s) => conference_events(&s.entries),
        SectionData::LecturesTutorials(s) => lectures_tutorials(&s.odd_semester, &s.even_semester),
        SectionData::ReadingMaterial(s) => reading_material(&s.entries),
        SectionData::ProjectGuidance(s) => project_guidance(&s.guidance),
        SectionData::ExamDuties(s) => exam_duties(&s.entries),
        SectionData::StudentActivities(s) => student_activities(s),
        SectionData::ResearchPapers(s) => research_papers(&s.entries),
        SectionData::BooksChapters(s) => books_chapters(&s.entries),
        SectionData::ResearchProjects(s) => research_projects(&s.entries),
        SectionData::ResearchGuidance(s) => research_guidance(&s.entries),
        SectionData::Memberships(s) => memberships(&s.entries),
        SectionData::OtherInfo(s) => other_info(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        IndustryExpert, MentorshipActivity, OtherContribution, SelfAssessedOutput, StudentEvent,
        TechCommunityActivity,
    };

    fn conference(p: Participation) -> ConferenceEntry {
        ConferenceEntry {
            attended_organized: p,
            ..Default::default()
        }
    }

    fn paper(t: PublicationType) -> ResearchPaperEntry {
        ResearchPaperEntry {
            pub_type: t,
            ..Default::default()
        }
    }

    fn duty(activity: ExamActivity, t: (u32, u32, u32)) -> ExamDutyEntry {
        ExamDutyEntry {
            activity,
            t1: t.0,
            t2: t.1,
            t3: t.2,
            ..Default::default()
        }
    }

    fn output(details: &str) -> OutputDetail {
        OutputDetail {
            details: details.to_string(),
            ..Default::default()
        }
    }

    fn project(role: InvestigatorRole, status: ProjectStatus, amount: f64) -> ResearchProjectEntry {
        ResearchProjectEntry {
            user_author_type: role,
            status,
            amount_sanctioned: amount,
            ..Default::default()
        }
    }

    #[test]
    fn conference_is_deterministic() {
        let entries = vec![conference(Participation::Organized), conference(Participation::Attended)];
        assert_eq!(conference_events(&entries), 15.0);
        assert_eq!(conference_events(&entries), conference_events(&entries));
    }

    #[test]
    fn research_papers_by_type() {
        let entries = vec![
            paper(PublicationType::IJ),
            paper(PublicationType::PN),
            paper(PublicationType::NJ),
        ];
        assert_eq!(research_papers(&entries), 60.0);
        assert_eq!(publication_points(PublicationType::OJ), 10.0);
        assert_eq!(publication_points(PublicationType::OA), 12.0);
        assert_eq!(publication_points(PublicationType::IC), 10.0);
    }

    #[test]
    fn lectures_count_both_semesters() {
        let odd = vec![CourseEntry::default(), CourseEntry::default()];
        let even = vec![CourseEntry::default()];
        assert_eq!(lectures_tutorials(&odd, &even), 30.0);
        assert_eq!(lectures_tutorials(&[], &[]), 0.0);
    }

    #[test]
    fn reading_material_clamps_each_entry() {
        let entries: Vec<ReadingMaterialEntry> = [7.0, -3.0, 2.5, f64::NAN]
            .iter()
            .map(|api| ReadingMaterialEntry {
                self_assessed_api: *api,
                ..Default::default()
            })
            .collect();
        assert_eq!(reading_material(&entries), 7.5);
    }

    #[test]
    fn project_guidance_rounds() {
        let g = ProjectGuidance {
            projects_guided: 3,
            students_guided: 8,
        };
        // 6 + 1.6 = 7.6
        assert_eq!(project_guidance(&g), 8.0);
        assert_eq!(project_guidance(&ProjectGuidance::default()), 0.0);
    }

    #[test]
    fn exam_duties_weighted_and_rounded() {
        let entries = vec![
            duty(ExamActivity::QpSet, (1, 1, 1)),
            duty(ExamActivity::AbEvaluated, (50, 50, 50)),
            duty(ExamActivity::PracticalConducted, (1, 0, 0)),
            duty(ExamActivity::InvigilationDuties, (2, 2, 2)),
        ];
        // 3 + 3 + 0.5 + 0.6 = 7.1
        assert_eq!(exam_duties(&entries), 7.0);
    }

    #[test]
    fn books_and_chapters() {
        let entries = vec![
            BookChapterEntry::default(),
            BookChapterEntry {
                is_chapter: true,
                ..Default::default()
            },
        ];
        assert_eq!(books_chapters(&entries), 30.0);
    }

    #[test]
    fn research_projects_role_status_and_bonus() {
        assert_eq!(research_project_points(&project(InvestigatorRole::Chief, ProjectStatus::Completed, 0.0)), 10.0);
        assert_eq!(research_project_points(&project(InvestigatorRole::Chief, ProjectStatus::Ongoing, 0.0)), 8.0);
        assert_eq!(research_project_points(&project(InvestigatorRole::Co, ProjectStatus::Completed, 0.0)), 6.0);
        assert_eq!(research_project_points(&project(InvestigatorRole::Co, ProjectStatus::Ongoing, 45_000.0)), 8.0);
        assert_eq!(research_project_points(&project(InvestigatorRole::Co, ProjectStatus::Ongoing, 5_000_000.0)), 14.0);
    }

    #[test]
    fn principal_investigator_scores_as_chief() {
        assert_eq!(research_project_points(&project(InvestigatorRole::Principal, ProjectStatus::Completed, 0.0)), 10.0);
        assert_eq!(research_project_points(&project(InvestigatorRole::Principal, ProjectStatus::Ongoing, 20_000.0)), 10.0);
    }

    #[test]
    fn research_guidance_levels() {
        let entries: Vec<ResearchGuidanceEntry> =
            [DegreeLevel::PhD, DegreeLevel::BTech, DegreeLevel::MTech, DegreeLevel::Other]
                .iter()
                .map(|d| ResearchGuidanceEntry {
                    degree: *d,
                    ..Default::default()
                })
                .collect();
        assert_eq!(research_guidance(&entries), 29.0);
    }

    #[test]
    fn memberships_capped() {
        assert_eq!(memberships(&vec![MembershipEntry::default(); 3]), 15.0);
        assert_eq!(memberships(&vec![MembershipEntry::default(); 9]), 25.0);
    }

    #[test]
    fn student_activities_heuristic_and_cap() {
        let mut section = StudentActivitiesSection {
            tech_communities: vec![TechCommunityActivity::default()],
            student_events: vec![StudentEvent {
                experts_invited: vec![IndustryExpert::default(); 7],
                ..Default::default()
            }],
            mentorships: vec![MentorshipActivity::default()],
            other_contributions: vec![OtherContribution::default()],
            ..Default::default()
        };
        // 5 + (10 + 5) + 5 + 3
        assert_eq!(student_activities(&section), 28.0);

        section.student_events = vec![StudentEvent::default(); 6];
        assert_eq!(student_activities(&section), STUDENT_ACTIVITIES_CAP);
    }

    #[test]
    fn other_info_caps_self_points() {
        let section = OtherInfoSection {
            self_assessed: vec![
                SelfAssessedOutput {
                    points: 20.0,
                    ..Default::default()
                },
                SelfAssessedOutput {
                    points: 25.0,
                    ..Default::default()
                },
            ],
            national: vec![output("Patent filed")],
            ..Default::default()
        };
        assert_eq!(other_info(&section), 30.0 + 30.0);
    }

    #[test]
    fn other_info_ignores_blank_rows() {
        let section = OtherInfoSection {
            self_assessed: vec![SelfAssessedOutput::default()],
            national: vec![OutputDetail::default(), output("  ")],
            international: vec![OutputDetail::default()],
            ..Default::default()
        };
        assert_eq!(other_info(&section), 0.0);
    }

    #[test]
    fn other_info_total_is_capped() {
        let section = OtherInfoSection {
            national: vec![output("Award")],
            international: vec![output("Keynote"), output("Patent granted")],
            ..Default::default()
        };
        assert_eq!(other_info(&section), OTHER_INFO_CAP);
    }

    #[test]
    fn every_section_scores_non_negative() {
        use crate::protocol::*;
        let sections = vec![
            SectionData::GeneralDetails(GeneralDetailsSection::default()),
            SectionData::ConferenceEvents(ConferenceSection::default()),
            SectionData::LecturesTutorials(LecturesTutorialsSection::default()),
            SectionData::ReadingMaterial(ReadingMaterialSection::default()),
            SectionData::ProjectGuidance(ProjectGuidanceSection::default()),
            SectionData::ExamDuties(ExamDutiesSection::default()),
            SectionData::StudentActivities(StudentActivitiesSection::default()),
            SectionData::ResearchPapers(ResearchPapersSection::default()),
            SectionData::BooksChapters(BooksChaptersSection::default()),
            SectionData::ResearchProjects(ResearchProjectsSection::default()),
            SectionData::ResearchGuidance(ResearchGuidanceSection::default()),
            SectionData::Memberships(MembershipsSection::default()),
            SectionData::OtherInfo(OtherInfoSection::default()),
        ];
        for s in &sections {
            let score = score_section(s);
            assert!(score.is_finite() && score >= 0.0, "{:?} scored {}", s.key(), score);
        }
        assert_eq!(score_section(&sections[0]), 10.0);
    }
}
