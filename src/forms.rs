//! Client-side form validation
//!
//! Raw form input arrives as text (from CLI flags or prompts). Each form
//! validates itself into the typed request payload before anything touches
//! the network; a failed check never issues a request.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use crate::model::{AdminCredentials, ConstituencyRef, NewParty, VoterCredentials, VoterRegistration};
use crate::session::Role;

/// Minimum voting age accepted at registration
pub const MIN_VOTER_AGE: i64 = 18;

/// Genders offered by the registration form
pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Errors produced by client-side form checks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Please enter a valid Constituency ID (Positive Number)")]
    InvalidConstituencyId,

    #[error("{field} must be a whole number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("You must be at least 18 years old to register.")]
    Underage { age: i64 },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Gender must be one of Male, Female, Other (got {0:?})")]
    InvalidGender(String),
}

/// Result type alias for form validation
pub type ValidationResult<T> = Result<T, ValidationError>;

fn required(field: &'static str, value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

fn whole_number(field: &'static str, value: &str) -> ValidationResult<i64> {
    let value = required(field, value)?;
    value
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber { field, value })
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"))
}

/// Party registration form
#[derive(Debug, Clone, Default)]
pub struct PartyForm {
    pub name: String,
    pub candidate_name: String,
    /// Party symbol URL
    pub img: String,
    /// Candidate photo URL
    pub candidate_img: String,
    /// Constituency id as typed; converted on submit
    pub constituency_id: String,
}

impl PartyForm {
    /// Validate into a `POST /api/party` payload
    ///
    /// The constituency id must parse to a positive integer; whether it
    /// exists is the backend's call.
    pub fn validate(&self) -> ValidationResult<NewParty> {
        let id = self.constituency_id.trim();
        let id = match id.parse::<i64>() {
            Ok(id) if id > 0 => id as u64,
            _ => return Err(ValidationError::InvalidConstituencyId),
        };

        Ok(NewParty {
            name: required("Party name", &self.name)?,
            candidate_name: required("Candidate name", &self.candidate_name)?,
            img: required("Party symbol URL", &self.img)?,
            candidate_img: required("Candidate photo URL", &self.candidate_img)?,
            constituency: ConstituencyRef { id },
        })
    }
}

/// Voter sign-up form
#[derive(Debug, Clone, Default)]
pub struct VoterSignupForm {
    pub voter_id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: String,
    pub gender: String,
    pub address: String,
    /// Constituency (district) name
    pub constituency: String,
    pub constituency_number: String,
}

impl VoterSignupForm {
    /// Validate into a `POST /api/user/register` payload
    pub fn validate(&self) -> ValidationResult<VoterRegistration> {
        // Age goes first: an underage voter is told so before anything else.
        let age = whole_number("Age", &self.age)?;
        if age < MIN_VOTER_AGE {
            return Err(ValidationError::Underage { age });
        }
        let age = u32::try_from(age).map_err(|_| ValidationError::InvalidNumber {
            field: "Age",
            value: self.age.trim().to_string(),
        })?;

        let voter_id = required("Voter ID", &self.voter_id)?;
        let name = required("Full name", &self.name)?;

        let email = required("Email", &self.email)?;
        if !email_pattern().is_match(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        if self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }

        let gender = required("Gender", &self.gender)?;
        let gender = GENDERS
            .iter()
            .find(|g| g.eq_ignore_ascii_case(&gender))
            .map(|g| g.to_string())
            .ok_or(ValidationError::InvalidGender(gender))?;

        let constituency_number = whole_number("Constituency number", &self.constituency_number)?;
        let constituency_number =
            u32::try_from(constituency_number).map_err(|_| ValidationError::InvalidNumber {
                field: "Constituency number",
                value: self.constituency_number.trim().to_string(),
            })?;

        Ok(VoterRegistration {
            voter_id,
            name,
            email,
            password: self.password.clone(),
            age,
            gender,
            address: required("Address", &self.address)?,
            constituency: required("Constituency", &self.constituency)?,
            constituency_number,
            has_voted: false,
        })
    }
}

/// Login form, in voter or admin mode
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub role: Role,
    /// Voter ID in voter mode, admin ID in admin mode
    pub id: String,
    pub password: String,
}

/// Validated login request
#[derive(Debug, Clone)]
pub enum LoginRequest {
    Voter(VoterCredentials),
    Admin(AdminCredentials),
}

impl LoginForm {
    pub fn new(role: Role, id: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            role,
            id: id.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> ValidationResult<LoginRequest> {
        if self.password.is_empty() {
            return Err(ValidationError::Required("Password"));
        }

        Ok(match self.role {
            Role::Voter => LoginRequest::Voter(VoterCredentials {
                voter_id: required("Voter ID", &self.id)?,
                password: self.password.clone(),
            }),
            Role::Admin => LoginRequest::Admin(AdminCredentials {
                id: required("Admin ID", &self.id)?,
                password: self.password.clone(),
            }),
        })
    }
}
