use super::rules::{is_email, is_http_url, is_uae_phone, require_text, REQUIRED};
use super::{FieldErrors, WizardDraft};
use crate::lookup;
use crate::models::{Office, OfficeDraft};

const LICENSE_LEN: std::ops::RangeInclusive<usize> = 5..=20;

/// In-progress office registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfficeOnboarding {
    pub name: String,
    pub license_number: String,
    pub emirate: Option<String>,
    pub address: Option<String>,
    pub phone: String,
    pub email: String,
    pub website: Option<String>,
    pub scopes: Vec<String>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfficeDraftPatch {
    pub name: Option<String>,
    pub license_number: Option<String>,
    pub emirate: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub logo_url: Option<String>,
}

impl From<&Office> for OfficeDraftPatch {
    fn from(office: &Office) -> Self {
        Self {
            name: Some(office.name.clone()),
            license_number: Some(office.license_number.clone()),
            emirate: Some(office.emirate.clone()),
            address: None,
            phone: Some(office.phone.clone()),
            email: Some(office.email.clone()),
            website: office.website.clone(),
            scopes: Some(office.scopes.clone()),
            logo_url: None,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl WizardDraft for OfficeOnboarding {
    type Patch = OfficeDraftPatch;
    type Submission = OfficeDraft;

    const TOTAL_STEPS: u8 = 3;

    fn apply(&mut self, patch: OfficeDraftPatch) -> Vec<&'static str> {
        let mut touched = Vec::new();
        let mut mark = |field: &'static str, changed: bool| {
            if changed {
                touched.push(field);
            }
        };

        mark("name", patch.name.map(|v| self.name = v).is_some());
        mark(
            "license_number",
            patch.license_number.map(|v| self.license_number = v).is_some(),
        );
        mark("emirate", patch.emirate.map(|v| self.emirate = Some(v)).is_some());
        mark("address", patch.address.map(|v| self.address = Some(v)).is_some());
        mark("phone", patch.phone.map(|v| self.phone = v).is_some());
        mark("email", patch.email.map(|v| self.email = v).is_some());
        mark("website", patch.website.map(|v| self.website = Some(v)).is_some());
        mark("scopes", patch.scopes.map(|v| self.scopes = v).is_some());
        mark("logo_url", patch.logo_url.map(|v| self.logo_url = Some(v)).is_some());
        touched
    }

    fn validate_step(&self, step: u8) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            1 => {
                require_text(&mut errors, "name", &self.name, 2);

                let license = self.license_number.trim();
                if license.is_empty() {
                    errors.insert("license_number", REQUIRED.to_string());
                } else if !LICENSE_LEN.contains(&license.len())
                    || !license.chars().all(|c| c.is_ascii_alphanumeric())
                {
                    errors.insert(
                        "license_number",
                        "Licence number must be 5-20 letters or digits".to_string(),
                    );
                }

                match self.emirate.as_deref() {
                    None => {
                        errors.insert("emirate", REQUIRED.to_string());
                    }
                    Some(emirate) if lookup::find_emirate(emirate).is_none() => {
                        errors.insert("emirate", "Unknown emirate".to_string());
                    }
                    Some(_) => {}
                }
            }
            2 => {
                if self.phone.trim().is_empty() {
                    errors.insert("phone", REQUIRED.to_string());
                } else if !is_uae_phone(&self.phone) {
                    errors.insert("phone", "Enter a UAE phone number".to_string());
                }

                if self.email.trim().is_empty() {
                    errors.insert("email", REQUIRED.to_string());
                } else if !is_email(&self.email) {
                    errors.insert("email", "Enter a valid e-mail address".to_string());
                }

                if let Some(website) = non_blank(self.website.as_deref()) {
                    if !is_http_url(&website) {
                        errors.insert(
                            "website",
                            "Website must start with http:// or https://".to_string(),
                        );
                    }
                }
            }
            3 => {
                if self.scopes.is_empty() {
                    errors.insert("scopes", "Select at least one licensed service".to_string());
                } else if let Some(unknown) = self
                    .scopes
                    .iter()
                    .find(|scope| lookup::find_office_scope(scope).is_none())
                {
                    errors.insert("scopes", format!("Unknown service: {unknown}"));
                }
            }
            _ => {}
        }
        errors
    }

    fn to_submission(&self) -> Option<OfficeDraft> {
        Some(OfficeDraft {
            name: self.name.trim().to_string(),
            license_number: self.license_number.trim().to_ascii_uppercase(),
            emirate: lookup::find_emirate(self.emirate.as_deref()?)?.id.to_string(),
            address: non_blank(self.address.as_deref()),
            phone: self
                .phone
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '-')
                .collect(),
            email: self.email.trim().to_ascii_lowercase(),
            website: non_blank(self.website.as_deref()),
            scopes: self
                .scopes
                .iter()
                .map(|scope| lookup::find_office_scope(scope).map(|entry| entry.id.to_string()))
                .collect::<Option<Vec<_>>>()?,
            logo_url: non_blank(self.logo_url.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::OfficeWizard;

    fn complete_patch() -> OfficeDraftPatch {
        OfficeDraftPatch {
            name: Some("Al Noor Tadbeer".to_string()),
            license_number: Some("cn1234567".to_string()),
            emirate: Some("SHJ".to_string()),
            address: Some(" ".to_string()),
            phone: Some("+971 6 555 0100".to_string()),
            email: Some("Hello@AlNoor.ae".to_string()),
            website: None,
            scopes: Some(vec!["recruitment".to_string(), "transfer".to_string()]),
            logo_url: None,
        }
    }

    #[test]
    fn three_steps_and_a_clean_payload() {
        let mut wizard = OfficeWizard::new();
        assert_eq!(wizard.total_steps(), 3);
        wizard.update_form_data(complete_patch());

        assert!(wizard.advance());
        assert!(wizard.advance());
        assert!(wizard.validate_current_step());
        assert!(wizard.is_last_step());

        let payload = wizard.submission().expect("valid office");
        assert_eq!(payload.license_number, "CN1234567");
        assert_eq!(payload.phone, "+97165550100");
        assert_eq!(payload.email, "hello@alnoor.ae");
        assert_eq!(payload.address, None);
    }

    #[test]
    fn licence_number_shape() {
        let check = |license: &str| {
            let mut draft = OfficeOnboarding::default();
            draft.apply(complete_patch());
            draft.apply(OfficeDraftPatch {
                license_number: Some(license.to_string()),
                ..OfficeDraftPatch::default()
            });
            draft.validate_step(1).contains_key("license_number")
        };

        assert!(!check("AB123"));
        assert!(!check("A1234567890123456789"));
        assert!(check("AB12"));
        assert!(check("A12345678901234567890"));
        assert!(check("CN-12345"));
    }

    #[test]
    fn contact_step_rejects_foreign_numbers_and_bad_sites() {
        let mut draft = OfficeOnboarding::default();
        draft.apply(OfficeDraftPatch {
            phone: Some("+44 20 7946 0000".to_string()),
            email: Some("office.ae".to_string()),
            website: Some("www.alnoor.ae".to_string()),
            ..OfficeDraftPatch::default()
        });

        let errors = draft.validate_step(2);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["phone"], "Enter a UAE phone number");
    }

    #[test]
    fn scopes_must_be_known() {
        let mut wizard = OfficeWizard::new();
        wizard.set_step(3);
        assert!(!wizard.validate_current_step());
        assert_eq!(wizard.errors()["scopes"], "Select at least one licensed service");

        wizard.update_form_data(OfficeDraftPatch {
            scopes: Some(vec!["cleaning".to_string()]),
            ..OfficeDraftPatch::default()
        });
        assert!(wizard.errors().is_empty());
        assert!(!wizard.validate_current_step());
        assert_eq!(wizard.errors()["scopes"], "Unknown service: cleaning");
    }
}
