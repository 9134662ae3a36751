use chrono::{Local, NaiveDate};

use super::rules::{is_http_url, require, require_text, REQUIRED};
use super::{FieldErrors, WizardDraft};
use crate::lookup;
use crate::models::{Availability, EmploymentType, MaidDraft, MaidProfile, MaritalStatus};

pub const MIN_WORKER_AGE: u32 = 21;
pub const MAX_WORKER_AGE: u32 = 60;
pub const MAX_EXPERIENCE_YEARS: u8 = 40;
pub const MIN_MONTHLY_SALARY: u32 = 800;
pub const MAX_MONTHLY_SALARY: u32 = 10_000;
const MAX_BIO_CHARS: usize = 500;

/// In-progress worker profile. Everything is optional until submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerOnboarding {
    pub name: String,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub religion: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    pub languages: Vec<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<u8>,
    pub previous_countries: Vec<String>,
    pub monthly_salary: Option<u32>,
    pub employment_type: Option<EmploymentType>,
    pub availability: Option<Availability>,
    pub photo_url: Option<String>,
    pub emirate: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkerDraftPatch {
    pub name: Option<String>,
    pub nationality: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub religion: Option<String>,
    pub marital_status: Option<MaritalStatus>,
    pub languages: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub experience_years: Option<u8>,
    pub previous_countries: Option<Vec<String>>,
    pub monthly_salary: Option<u32>,
    pub employment_type: Option<EmploymentType>,
    pub availability: Option<Availability>,
    pub photo_url: Option<String>,
    pub emirate: Option<String>,
    pub bio: Option<String>,
}

impl From<&MaidProfile> for WorkerDraftPatch {
    fn from(profile: &MaidProfile) -> Self {
        let summary = &profile.summary;
        Self {
            name: Some(summary.name.clone()),
            nationality: Some(summary.nationality.clone()),
            date_of_birth: Some(profile.date_of_birth),
            religion: profile.religion.clone(),
            marital_status: profile.marital_status,
            languages: Some(summary.languages.clone()),
            skills: Some(profile.skills.clone()),
            experience_years: Some(summary.experience_years),
            previous_countries: Some(profile.previous_countries.clone()),
            monthly_salary: Some(summary.monthly_salary),
            employment_type: Some(profile.employment_type),
            availability: Some(profile.availability),
            photo_url: summary.photo_url.clone(),
            emirate: summary.emirate.clone(),
            bio: profile.bio.clone(),
        }
    }
}

impl WorkerOnboarding {
    /// Step validation against an explicit calendar date; `validate_step`
    /// uses the local date.
    pub fn validate_step_on(&self, step: u8, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            1 => self.validate_personal(&mut errors, today),
            2 => self.validate_languages(&mut errors),
            3 => self.validate_experience(&mut errors),
            4 => self.validate_terms(&mut errors),
            5 => self.validate_presentation(&mut errors),
            _ => {}
        }
        errors
    }

    fn validate_personal(&self, errors: &mut FieldErrors, today: NaiveDate) {
        require_text(errors, "name", &self.name, 2);

        if let Some(nationality) = &self.nationality {
            if lookup::find_nationality(nationality).is_none() {
                errors.insert("nationality", "Unknown nationality".to_string());
            }
        } else {
            errors.insert("nationality", REQUIRED.to_string());
        }

        match self.date_of_birth {
            None => {
                errors.insert("date_of_birth", REQUIRED.to_string());
            }
            Some(dob) => match today.years_since(dob) {
                None => {
                    errors.insert("date_of_birth", "Date of birth is in the future".to_string());
                }
                Some(age) if !(MIN_WORKER_AGE..=MAX_WORKER_AGE).contains(&age) => {
                    errors.insert(
                        "date_of_birth",
                        format!("Age must be between {MIN_WORKER_AGE} and {MAX_WORKER_AGE}"),
                    );
                }
                Some(_) => {}
            },
        }

        if let Some(religion) = &self.religion {
            if lookup::find_religion(religion).is_none() {
                errors.insert("religion", "Unknown religion".to_string());
            }
        }
        require(errors, "marital_status", &self.marital_status);
    }

    fn validate_languages(&self, errors: &mut FieldErrors) {
        if self.languages.is_empty() {
            errors.insert("languages", "Select at least one language".to_string());
        } else if let Some(unknown) = self
            .languages
            .iter()
            .find(|code| lookup::find_language(code).is_none())
        {
            errors.insert("languages", format!("Unknown language: {unknown}"));
        }

        if let Some(unknown) = self
            .skills
            .iter()
            .find(|code| lookup::find_skill(code).is_none())
        {
            errors.insert("skills", format!("Unknown skill: {unknown}"));
        }
    }

    fn validate_experience(&self, errors: &mut FieldErrors) {
        if let Some(years) = self.experience_years {
            if years > MAX_EXPERIENCE_YEARS {
                errors.insert(
                    "experience_years",
                    format!("Experience cannot exceed {MAX_EXPERIENCE_YEARS} years"),
                );
            }
        } else {
            errors.insert("experience_years", REQUIRED.to_string());
        }

        if self
            .previous_countries
            .iter()
            .any(|country| country.trim().is_empty())
        {
            errors.insert("previous_countries", "Country names cannot be blank".to_string());
        }
    }

    fn validate_terms(&self, errors: &mut FieldErrors) {
        if let Some(salary) = self.monthly_salary {
            if !(MIN_MONTHLY_SALARY..=MAX_MONTHLY_SALARY).contains(&salary) {
                errors.insert(
                    "monthly_salary",
                    format!(
                        "Salary must be between AED {} and AED {}",
                        MIN_MONTHLY_SALARY, MAX_MONTHLY_SALARY
                    ),
                );
            }
        } else {
            errors.insert("monthly_salary", REQUIRED.to_string());
        }
        require(errors, "employment_type", &self.employment_type);
        require(errors, "availability", &self.availability);
    }

    fn validate_presentation(&self, errors: &mut FieldErrors) {
        match self.photo_url.as_deref().map(str::trim) {
            None | Some("") => {
                errors.insert("photo_url", "A photo is required".to_string());
            }
            Some(url) if !is_http_url(url) => {
                errors.insert("photo_url", "Photo must be an http(s) URL".to_string());
            }
            Some(_) => {}
        }

        if let Some(emirate) = &self.emirate {
            if lookup::find_emirate(emirate).is_none() {
                errors.insert("emirate", "Unknown emirate".to_string());
            }
        } else {
            errors.insert("emirate", REQUIRED.to_string());
        }

        if self
            .bio
            .as_deref()
            .is_some_and(|bio| bio.chars().count() > MAX_BIO_CHARS)
        {
            errors.insert("bio", format!("Keep the bio under {MAX_BIO_CHARS} characters"));
        }
    }
}

impl WizardDraft for WorkerOnboarding {
    type Patch = WorkerDraftPatch;
    type Submission = MaidDraft;

    const TOTAL_STEPS: u8 = 5;

    fn apply(&mut self, patch: WorkerDraftPatch) -> Vec<&'static str> {
        let draft = self;
        let mut touched = Vec::new();

        macro_rules! replace {
            ($($field:ident),* $(,)?) => {$(
                if let Some(value) = patch.$field {
                    draft.$field = value;
                    touched.push(stringify!($field));
                }
            )*};
        }
        macro_rules! fill {
            ($($field:ident),* $(,)?) => {$(
                if let Some(value) = patch.$field {
                    draft.$field = Some(value);
                    touched.push(stringify!($field));
                }
            )*};
        }

        replace!(name, languages, skills, previous_countries);
        fill!(
            nationality,
            date_of_birth,
            religion,
            marital_status,
            experience_years,
            monthly_salary,
            employment_type,
            availability,
            photo_url,
            emirate,
            bio,
        );
        touched
    }

    fn validate_step(&self, step: u8) -> FieldErrors {
        self.validate_step_on(step, Local::now().date_naive())
    }

    fn to_submission(&self) -> Option<MaidDraft> {
        Some(MaidDraft {
            name: self.name.trim().to_string(),
            nationality: lookup::find_nationality(self.nationality.as_deref()?)?
                .id
                .to_string(),
            date_of_birth: self.date_of_birth?,
            religion: self
                .religion
                .as_deref()
                .and_then(lookup::find_religion)
                .map(|entry| entry.id.to_string()),
            marital_status: self.marital_status,
            languages: canonical_ids(&self.languages, lookup::find_language)?,
            skills: canonical_ids(&self.skills, lookup::find_skill)?,
            experience_years: self.experience_years?,
            previous_countries: self
                .previous_countries
                .iter()
                .map(|country| country.trim().to_string())
                .collect(),
            monthly_salary: self.monthly_salary?,
            employment_type: self.employment_type?,
            availability: self.availability?,
            photo_url: self.photo_url.as_deref()?.trim().to_string(),
            emirate: lookup::find_emirate(self.emirate.as_deref()?)?.id.to_string(),
            bio: self
                .bio
                .as_deref()
                .map(str::trim)
                .filter(|bio| !bio.is_empty())
                .map(str::to_string),
        })
    }
}

fn canonical_ids(
    codes: &[String],
    find: fn(&str) -> Option<&'static lookup::LookupEntry>,
) -> Option<Vec<String>> {
    codes
        .iter()
        .map(|code| find(code.as_str()).map(|entry| entry.id.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::WorkerWizard;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date")
    }

    fn complete_patch() -> WorkerDraftPatch {
        WorkerDraftPatch {
            name: Some("Maria Santos".to_string()),
            nationality: Some("ph".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1992, 3, 14),
            religion: Some("Christian".to_string()),
            marital_status: Some(MaritalStatus::Single),
            languages: Some(vec!["en".to_string(), "tl".to_string()]),
            skills: Some(vec!["cooking".to_string(), "childcare".to_string()]),
            experience_years: Some(7),
            previous_countries: Some(vec!["Kuwait ".to_string()]),
            monthly_salary: Some(2500),
            employment_type: Some(EmploymentType::FullTime),
            availability: Some(Availability::Immediate),
            photo_url: Some("https://cdn.khadamat.ae/maids/maria.jpg".to_string()),
            emirate: Some("dxb".to_string()),
            bio: Some("  ".to_string()),
        }
    }

    fn draft_with(patch: WorkerDraftPatch) -> WorkerOnboarding {
        let mut draft = WorkerOnboarding::default();
        draft.apply(complete_patch());
        draft.apply(patch);
        draft
    }

    #[test]
    fn complete_draft_passes_every_step() {
        let draft = draft_with(WorkerDraftPatch::default());
        for step in 1..=WorkerOnboarding::TOTAL_STEPS {
            assert!(draft.validate_step_on(step, today()).is_empty(), "step {step}");
        }

        let payload = draft.to_submission().expect("payload");
        assert_eq!(payload.nationality, "PH");
        assert_eq!(payload.emirate, "DXB");
        assert_eq!(payload.religion.as_deref(), Some("christian"));
        assert_eq!(payload.previous_countries, vec!["Kuwait".to_string()]);
        assert_eq!(payload.bio, None);
    }

    #[test]
    fn age_window_is_inclusive() {
        let at = |dob: NaiveDate| {
            draft_with(WorkerDraftPatch {
                date_of_birth: Some(dob),
                ..WorkerDraftPatch::default()
            })
            .validate_step_on(1, today())
        };

        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).expect("date");
        assert!(at(date(2005, 10, 16)).is_empty());
        assert!(at(date(2005, 10, 17)).contains_key("date_of_birth"));
        assert!(at(date(1966, 10, 16)).is_empty());
        assert!(at(date(1965, 10, 15)).contains_key("date_of_birth"));
        assert!(at(date(2030, 1, 1)).contains_key("date_of_birth"));
    }

    #[test]
    fn languages_and_skills_must_come_from_the_tables() {
        let draft = draft_with(WorkerDraftPatch {
            languages: Some(Vec::new()),
            skills: Some(vec!["juggling".to_string()]),
            ..WorkerDraftPatch::default()
        });
        let errors = draft.validate_step_on(2, today());
        assert_eq!(errors["languages"], "Select at least one language");
        assert_eq!(errors["skills"], "Unknown skill: juggling");
    }

    #[test]
    fn salary_and_experience_bounds() {
        let draft = draft_with(WorkerDraftPatch {
            experience_years: Some(41),
            monthly_salary: Some(799),
            ..WorkerDraftPatch::default()
        });
        assert!(draft.validate_step_on(3, today()).contains_key("experience_years"));
        assert!(draft.validate_step_on(4, today()).contains_key("monthly_salary"));

        let draft = draft_with(WorkerDraftPatch {
            experience_years: Some(40),
            monthly_salary: Some(10_000),
            ..WorkerDraftPatch::default()
        });
        assert!(draft.validate_step_on(3, today()).is_empty());
        assert!(draft.validate_step_on(4, today()).is_empty());
    }

    #[test]
    fn last_step_requires_photo_and_emirate() {
        let errors = WorkerOnboarding::default().validate_step_on(5, today());
        assert_eq!(errors["photo_url"], "A photo is required");
        assert_eq!(errors["emirate"], REQUIRED);
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        let mut wizard = WorkerWizard::new();
        for _ in 0..6 {
            wizard.next_step();
        }
        assert_eq!(wizard.current_step(), 5);
        assert!(wizard.is_last_step());

        for _ in 0..9 {
            wizard.prev_step();
        }
        assert_eq!(wizard.current_step(), 1);

        assert!(!wizard.set_step(0));
        assert!(!wizard.set_step(6));
        assert!(wizard.set_step(4));
        assert_eq!(wizard.current_step(), 4);
    }

    #[test]
    fn advance_stops_on_errors_and_updates_clear_only_touched_fields() {
        let mut wizard = WorkerWizard::new();
        assert!(!wizard.advance());
        assert_eq!(wizard.current_step(), 1);
        assert!(wizard.errors().contains_key("name"));
        assert!(wizard.errors().contains_key("nationality"));

        wizard.update_form_data(WorkerDraftPatch {
            name: Some("Maria".to_string()),
            ..WorkerDraftPatch::default()
        });
        assert!(!wizard.errors().contains_key("name"));
        assert!(wizard.errors().contains_key("nationality"));
    }

    #[test]
    fn submission_reports_the_first_failing_step() {
        let mut wizard = WorkerWizard::new();
        wizard.update_form_data(complete_patch());
        wizard.update_form_data(WorkerDraftPatch {
            monthly_salary: Some(50_000),
            ..WorkerDraftPatch::default()
        });
        wizard.set_step(5);

        let errors = wizard.submission().expect_err("salary out of range");
        assert!(errors.contains_key("monthly_salary"));
        assert_eq!(wizard.current_step(), 4);
    }

    #[test]
    fn edit_mode_prefills_from_a_patch() {
        let mut wizard = WorkerWizard::new();
        wizard.next_step();
        wizard.initialize_for_edit("maid-42", complete_patch());

        assert!(wizard.is_editing());
        assert_eq!(wizard.editing_id(), Some("maid-42"));
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(wizard.form_data().name, "Maria Santos");

        wizard.reset();
        assert!(!wizard.is_editing());
        assert_eq!(wizard.form_data(), &WorkerOnboarding::default());
    }
}
