//! Multi-step onboarding wizards.
//!
//! `FormWizard` owns the step counter, the in-progress draft and the per-field
//! errors; the draft type decides how many steps there are, how a patch is
//! merged and what each step validates. Two drafts exist: worker profiles
//! (five steps) and recruitment offices (three steps).

mod office;
pub(crate) mod rules;
mod worker;

use std::collections::BTreeMap;

pub use office::{OfficeDraftPatch, OfficeOnboarding};
pub use worker::{WorkerDraftPatch, WorkerOnboarding};

/// Field name → message for the step that was last validated.
pub type FieldErrors = BTreeMap<&'static str, String>;

pub trait WizardDraft: Default + Clone {
    type Patch;
    type Submission;

    const TOTAL_STEPS: u8;

    /// Shallow merge; returns the names of the fields the patch set.
    fn apply(&mut self, patch: Self::Patch) -> Vec<&'static str>;

    fn validate_step(&self, step: u8) -> FieldErrors;

    /// Builds the API payload. Only meaningful once every step validates.
    fn to_submission(&self) -> Option<Self::Submission>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormWizard<D> {
    current_step: u8,
    form_data: D,
    is_editing: bool,
    editing_id: Option<String>,
    errors: FieldErrors,
}

pub type WorkerWizard = FormWizard<WorkerOnboarding>;
pub type OfficeWizard = FormWizard<OfficeOnboarding>;

impl<D> Default for FormWizard<D>
where
    D: WizardDraft,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D> FormWizard<D>
where
    D: WizardDraft,
{
    pub fn new() -> Self {
        Self {
            current_step: 1,
            form_data: D::default(),
            is_editing: false,
            editing_id: None,
            errors: FieldErrors::new(),
        }
    }

    pub fn total_steps(&self) -> u8 {
        D::TOTAL_STEPS
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn form_data(&self) -> &D {
        &self.form_data
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_first_step(&self) -> bool {
        self.current_step == 1
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == D::TOTAL_STEPS
    }

    /// Jumps to `step` when it lies in `1..=TOTAL_STEPS`; otherwise ignored.
    pub fn set_step(&mut self, step: u8) -> bool {
        if !(1..=D::TOTAL_STEPS).contains(&step) {
            return false;
        }
        self.current_step = step;
        self.errors.clear();
        true
    }

    pub fn next_step(&mut self) {
        if self.current_step < D::TOTAL_STEPS {
            self.current_step += 1;
        }
        self.errors.clear();
    }

    pub fn prev_step(&mut self) {
        if self.current_step > 1 {
            self.current_step -= 1;
        }
        self.errors.clear();
    }

    /// Merges the patch and clears the error of every field it touched.
    pub fn update_form_data(&mut self, patch: D::Patch) {
        for field in self.form_data.apply(patch) {
            self.errors.remove(field);
        }
    }

    pub fn set_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    /// Pre-fills the wizard for editing a published record.
    pub fn initialize_for_edit(&mut self, id: impl Into<String>, patch: D::Patch) {
        let mut form_data = D::default();
        form_data.apply(patch);
        *self = Self {
            current_step: 1,
            form_data,
            is_editing: true,
            editing_id: Some(id.into()),
            errors: FieldErrors::new(),
        };
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Validates one step, replacing `errors` with the outcome.
    pub fn validate_step(&mut self, step: u8) -> bool {
        self.errors = self.form_data.validate_step(step);
        self.errors.is_empty()
    }

    pub fn validate_current_step(&mut self) -> bool {
        self.validate_step(self.current_step)
    }

    /// Validate-then-advance, the sequence every step screen runs.
    pub fn advance(&mut self) -> bool {
        if !self.validate_current_step() {
            return false;
        }
        self.next_step();
        true
    }

    /// Validates every step. On failure the wizard moves to the first failing
    /// step with its errors populated.
    pub fn validate_all(&mut self) -> bool {
        for step in 1..=D::TOTAL_STEPS {
            let errors = self.form_data.validate_step(step);
            if !errors.is_empty() {
                self.current_step = step;
                self.errors = errors;
                return false;
            }
        }
        self.errors.clear();
        true
    }

    pub fn submission(&mut self) -> Result<D::Submission, FieldErrors> {
        if !self.validate_all() {
            return Err(self.errors.clone());
        }
        self.form_data
            .to_submission()
            .ok_or_else(|| self.errors.clone())
    }
}
