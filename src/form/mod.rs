pub mod entry;
pub mod exam_duties;
pub mod sections;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use crate::protocol::{EntryId, Score};
use crate::scoring::Scorer;
use crate::store::SectionStore;

pub use entry::{Entry, EntryList, FieldValue};
pub use exam_duties::ExamDutiesForm;
pub use sections::{
    ActivityList, BooksChaptersForm, ConferenceForm, EntriesForm, GeneralDetailsForm, LecturesForm,
    ListForm, MembershipsForm, OtherInfoForm, OutputList, ProjectGuidanceForm, ReadingMaterialForm,
    ResearchGuidanceForm, ResearchPapersForm, ResearchProjectsForm, SectionForm, Semester,
    StudentActivitiesForm,
};

pub const SUBMIT_FAILED: &str = "Failed to submit section";

// ── Notices ─────────────────────────────────────────────────────────

/// What the user is told after a submit.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success { message: String, score: Score },
    Failure { message: String },
    /// A submit sharing the same guard is still running.
    Busy,
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success { .. })
    }
}

/// Clears the submit flag however the submit ends, including when its
/// future is dropped.
struct SubmitGuard(Arc<AtomicBool>);

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ── Controller ──────────────────────────────────────────────────────

/// Drives one section: load, edit, submit.
pub struct SectionController<F: SectionForm> {
    form: F,
    store: SectionStore,
    scorer: Arc<dyn Scorer>,
    submitting: Arc<AtomicBool>,
    last_score: Option<Score>,
}

impl<F: SectionForm> SectionController<F> {
    pub fn new(store: SectionStore, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            form: F::default(),
            store,
            scorer,
            submitting: Arc::new(AtomicBool::new(false)),
            last_score: None,
        }
    }

    /// Share one submit guard between controllers on the same page.
    pub fn with_submit_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.submitting = flag;
        self
    }

    pub fn submit_flag(&self) -> Arc<AtomicBool> {
        self.submitting.clone()
    }

    /// Replace the form with the stored section, if any. Returns whether
    /// stored data was found.
    pub fn load(&mut self) -> bool {
        let Some(data) = self.store.get_section(F::KEY) else {
            return false;
        };
        let score = data.api_score();
        match F::from_stored(data) {
            Some(form) => {
                self.form = form;
                self.last_score = score;
                true
            }
            None => false,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn last_score(&self) -> Option<Score> {
        self.last_score
    }

    /// Score the current form and persist it. Stored data is left alone
    /// when scoring or persisting fails.
    pub async fn submit(&mut self) -> Notice {
        if self.submitting.swap(true, Ordering::SeqCst) {
            return Notice::Busy;
        }
        let _guard = SubmitGuard(self.submitting.clone());

        let payload = self.form.to_payload();
        let key = F::KEY.data_key();
        info!("Submitting section {}", key);

        let outcome = match self.scorer.score(&payload).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Scoring {} failed: {}", key, e);
                return Notice::Failure {
                    message: SUBMIT_FAILED.to_string(),
                };
            }
        };

        if let Err(e) = self.store.complete_section(payload, outcome.score) {
            error!("Saving {} failed: {}", key, e);
            return Notice::Failure {
                message: SUBMIT_FAILED.to_string(),
            };
        }

        self.last_score = Some(outcome.score);
        info!("Section {} submitted with score {}", key, outcome.score);
        Notice::Success {
            message: outcome.message,
            score: outcome.score,
        }
    }
}

impl<F: ListForm> SectionController<F> {
    pub fn entries(&self) -> &[F::Entry] {
        self.form.list().entries()
    }

    pub fn add_entry(&mut self) -> EntryId {
        self.form.add_entry()
    }

    /// No-op when `id` is the last remaining row.
    pub fn remove_entry(&mut self, id: &str) -> bool {
        self.form.remove_entry(id)
    }

    pub fn update_entry(
        &mut self,
        id: &str,
        field: &str,
        value: impl Into<FieldValue>,
    ) -> crate::error::Result<()> {
        self.form.update_entry(id, field, value.into())
    }
}
