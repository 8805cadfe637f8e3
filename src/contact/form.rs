//! Contact form validation and sanitization.
//!
//! Validation collects every failure into a list so the caller can
//! surface them all at once; submission is blocked until the list is
//! empty. Sanitization trims and truncates each field to its bound
//! before the record leaves the process.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Field length bounds, enforced by validation and again by truncation.
const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 100;
const PHONE_MIN: usize = 10;
const PHONE_MAX: usize = 20;
const REQUIREMENT_MAX: usize = 50;
const DESCRIPTION_MIN: usize = 10;
const DESCRIPTION_MAX: usize = 500;

/// Raw form payload as received from the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub requirement: Option<String>,
    pub description: Option<String>,
}

/// A validated, sanitized lead record ready for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub requirement: String,
    pub description: String,
    pub submitted_at: String,
}

impl ContactForm {
    /// Validate every field, returning the full list of problems.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let name = trimmed(&self.name);
        if name.is_empty() {
            errors.push("Name is required".to_string());
        } else if name.chars().count() < 2 {
            errors.push("Name must be at least 2 characters".to_string());
        } else if name.chars().count() > NAME_MAX {
            errors.push("Name must not exceed 100 characters".to_string());
        }

        let email = trimmed(&self.email);
        if !is_valid_email(email) {
            errors.push("Valid email is required".to_string());
        } else if email.chars().count() > EMAIL_MAX {
            errors.push("Email must not exceed 100 characters".to_string());
        }

        let phone = trimmed(&self.phone);
        if phone.is_empty() {
            errors.push("Phone is required".to_string());
        } else if phone.chars().count() < PHONE_MIN {
            errors.push("Phone must be at least 10 characters".to_string());
        } else if phone.chars().count() > PHONE_MAX {
            errors.push("Phone must not exceed 20 characters".to_string());
        }

        let requirement = trimmed(&self.requirement);
        if requirement.is_empty() {
            errors.push("Requirement is required".to_string());
        } else if requirement.chars().count() > REQUIREMENT_MAX {
            errors.push("Requirement must not exceed 50 characters".to_string());
        }

        let description = trimmed(&self.description);
        if description.is_empty() {
            errors.push("Description is required".to_string());
        } else if description.chars().count() < DESCRIPTION_MIN {
            errors.push("Description must be at least 10 characters".to_string());
        } else if description.chars().count() > DESCRIPTION_MAX {
            errors.push("Description must not exceed 500 characters".to_string());
        }

        errors
    }

    /// Trim and truncate every field, stamping the submission time.
    ///
    /// Truncation is belt-and-braces: validation already rejected
    /// oversized fields, but the record is clamped again so nothing
    /// oversized can ever leave the process.
    pub fn sanitize(&self) -> ContactSubmission {
        ContactSubmission {
            name: clamp(trimmed(&self.name), NAME_MAX),
            email: clamp(trimmed(&self.email), EMAIL_MAX),
            phone: clamp(trimmed(&self.phone), PHONE_MAX),
            requirement: clamp(trimmed(&self.requirement), REQUIREMENT_MAX),
            description: clamp(trimmed(&self.description), DESCRIPTION_MAX),
            submitted_at: Utc::now().to_rfc3339(),
        }
    }
}

fn trimmed(field: &Option<String>) -> &str {
    field.as_deref().map(str::trim).unwrap_or("")
}

/// Char-boundary-safe truncation to `max` characters.
fn clamp(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// Shape check equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`: one `@`, a
/// dot somewhere in the domain, no whitespace or extra `@` anywhere.
fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
