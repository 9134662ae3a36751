use super::FieldErrors;

pub(crate) const REQUIRED: &str = "This field is required";

pub(crate) fn require_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    min_len: usize,
) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.insert(field, REQUIRED.to_string());
    } else if trimmed.chars().count() < min_len {
        errors.insert(field, format!("Must be at least {min_len} characters"));
    }
}

pub(crate) fn require<T>(errors: &mut FieldErrors, field: &'static str, value: &Option<T>) -> bool {
    if value.is_none() {
        errors.insert(field, REQUIRED.to_string());
        false
    } else {
        true
    }
}

/// UAE numbers in international (`+971`, `00971`) or national (`0`) form.
/// Spaces and dashes are ignored.
pub(crate) fn is_uae_phone(raw: &str) -> bool {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let national = if let Some(rest) = compact.strip_prefix("+971") {
        rest
    } else if let Some(rest) = compact.strip_prefix("00971") {
        rest
    } else if let Some(rest) = compact.strip_prefix('0') {
        rest
    } else {
        return false;
    };

    (8..=9).contains(&national.len())
        && national.chars().all(|c| c.is_ascii_digit())
        && !national.starts_with('0')
}

pub(crate) fn is_email(raw: &str) -> bool {
    let value = raw.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

pub(crate) fn is_http_url(raw: &str) -> bool {
    let value = raw.trim();
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    rest.is_some_and(|host| !host.is_empty() && !host.starts_with('/'))
}
