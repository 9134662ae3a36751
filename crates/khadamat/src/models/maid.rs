use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for worker profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaidId(pub String);

impl MaidId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MaidId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Temporary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Immediate,
    WithinMonth,
    Negotiable,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::Immediate => "immediate",
            Availability::WithinMonth => "within_month",
            Availability::Negotiable => "negotiable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaritalStatus {
    Single,
    Married,
    Divorced,
    Widowed,
}

/// Card-level projection used by listing screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaidSummary {
    pub id: MaidId,
    pub name: String,
    pub nationality: String,
    pub age: u8,
    pub experience_years: u8,
    pub monthly_salary: u32,
    #[serde(default)]
    pub emirate: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub office_id: String,
    #[serde(default)]
    pub office_name: Option<String>,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub is_unlocked: bool,
}

/// Full profile. Contact details are never part of it; see `MaidContact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaidProfile {
    #[serde(flatten)]
    pub summary: MaidSummary,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub marital_status: Option<MaritalStatus>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub previous_countries: Vec<String>,
    pub employment_type: EmploymentType,
    pub availability: Availability,
    #[serde(default)]
    pub bio: Option<String>,
}

/// Contact block released after a CV unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaidContact {
    pub maid_id: MaidId,
    pub phone: String,
    #[serde(default)]
    pub whatsapp: Option<String>,
    pub office_phone: String,
}

/// Payload sent when an office publishes or edits a worker profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaidDraft {
    pub name: String,
    pub nationality: String,
    pub date_of_birth: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub religion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<MaritalStatus>,
    pub languages: Vec<String>,
    pub skills: Vec<String>,
    pub experience_years: u8,
    pub previous_countries: Vec<String>,
    pub monthly_salary: u32,
    pub employment_type: EmploymentType,
    pub availability: Availability,
    pub photo_url: String,
    pub emirate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Browse filters; unset fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaidFilters {
    pub nationality: Option<String>,
    pub emirate: Option<String>,
    pub languages: Vec<String>,
    pub skills: Vec<String>,
    pub min_age: Option<u8>,
    pub max_age: Option<u8>,
    pub min_salary: Option<u32>,
    pub max_salary: Option<u32>,
    pub availability: Option<Availability>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl MaidFilters {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: String| query.push((key.to_string(), value));

        if let Some(nationality) = &self.nationality {
            push("nationality", nationality.clone());
        }
        if let Some(emirate) = &self.emirate {
            push("emirate", emirate.clone());
        }
        if !self.languages.is_empty() {
            push("languages", self.languages.join(","));
        }
        if !self.skills.is_empty() {
            push("skills", self.skills.join(","));
        }
        if let Some(min_age) = self.min_age {
            push("minAge", min_age.to_string());
        }
        if let Some(max_age) = self.max_age {
            push("maxAge", max_age.to_string());
        }
        if let Some(min_salary) = self.min_salary {
            push("minSalary", min_salary.to_string());
        }
        if let Some(max_salary) = self.max_salary {
            push("maxSalary", max_salary.to_string());
        }
        if let Some(availability) = self.availability {
            push("availability", availability.as_str().to_string());
        }
        if let Some(page) = self.page {
            push("page", page.to_string());
        }
        if let Some(limit) = self.limit {
            push("limit", limit.to_string());
        }

        query
    }
}

/// Paged list wrapper used by the listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub maid_id: MaidId,
    pub is_favorite: bool,
}
