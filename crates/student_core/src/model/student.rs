//! Student record model.
//!
//! # Responsibility
//! - Hold one student's fields behind validating constructors and setters.
//! - Expose the individual field rules so callers can pre-check input.
//!
//! # Invariants
//! - `id` matches `^[0-9]{5,10}$`.
//! - `first_name`/`last_name` are 2-25 letters (ASCII plus `ğüşıöçĞÜŞİÖÇ`).
//! - `age` is within `16..=100`, `gpa` within `0.0..=100.0`.
//! - A failed setter leaves the record unchanged.
//! - `email`/`phone` are free text and are not part of the canonical table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MIN_AGE: i32 = 16;
pub const MAX_AGE: i32 = 100;
pub const MIN_GPA: f64 = 0.0;
pub const MAX_GPA: f64 = 100.0;

static STUDENT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{5,10}$").expect("valid student id regex"));
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZğüşıöçĞÜŞİÖÇ]{2,25}$").expect("valid name regex"));

/// Field-rule violation raised by `Student` constructors and setters.
#[derive(Debug, Clone, PartialEq)]
pub enum StudentValidationError {
    InvalidId(String),
    InvalidFirstName(String),
    InvalidLastName(String),
    AgeOutOfRange(i32),
    GpaOutOfRange(f64),
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(value) => {
                write!(f, "student id `{value}` must be a 5-10 digit number")
            }
            Self::InvalidFirstName(value) => write!(
                f,
                "first name `{value}` must be 2-25 characters and contain only letters"
            ),
            Self::InvalidLastName(value) => write!(
                f,
                "last name `{value}` must be 2-25 characters and contain only letters"
            ),
            Self::AgeOutOfRange(value) => {
                write!(f, "age {value} must be between {MIN_AGE} and {MAX_AGE}")
            }
            Self::GpaOutOfRange(value) => {
                write!(f, "gpa {value} must be between {MIN_GPA:.1} and {MAX_GPA:.1}")
            }
        }
    }
}

impl Error for StudentValidationError {}

/// One student record.
///
/// Fields are private so every mutation goes through a validating setter.
/// Deserialization routes through [`Student::new`], so invalid payloads are
/// rejected instead of producing an unchecked value.
///
/// `email` and `phone` take part in equality but are never persisted, so a
/// record carrying contact data does not compare equal to its stored copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StudentFields")]
pub struct Student {
    id: String,
    first_name: String,
    last_name: String,
    age: i32,
    gpa: f64,
    email: Option<String>,
    phone: Option<String>,
}

#[derive(Deserialize)]
struct StudentFields {
    id: String,
    first_name: String,
    last_name: String,
    age: i32,
    gpa: f64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

impl TryFrom<StudentFields> for Student {
    type Error = StudentValidationError;

    fn try_from(value: StudentFields) -> Result<Self, Self::Error> {
        let mut student = Student::new(
            value.id,
            value.first_name,
            value.last_name,
            value.age,
            value.gpa,
        )?;
        student.email = value.email;
        student.phone = value.phone;
        Ok(student)
    }
}

impl Student {
    /// Creates a fully validated student without contact details.
    ///
    /// # Errors
    /// - Returns the first violated field rule, checked in declaration order.
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        age: i32,
        gpa: f64,
    ) -> Result<Self, StudentValidationError> {
        let id = id.into();
        let first_name = first_name.into();
        let last_name = last_name.into();

        validate_id(&id)?;
        validate_first_name(&first_name)?;
        validate_last_name(&last_name)?;
        validate_age(age)?;
        validate_gpa(gpa)?;

        Ok(Self {
            id,
            first_name,
            last_name,
            age,
            gpa,
            email: None,
            phone: None,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn age(&self) -> i32 {
        self.age
    }

    pub fn gpa(&self) -> f64 {
        self.gpa
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> Result<(), StudentValidationError> {
        let id = id.into();
        validate_id(&id)?;
        self.id = id;
        Ok(())
    }

    pub fn set_first_name(
        &mut self,
        first_name: impl Into<String>,
    ) -> Result<(), StudentValidationError> {
        let first_name = first_name.into();
        validate_first_name(&first_name)?;
        self.first_name = first_name;
        Ok(())
    }

    pub fn set_last_name(
        &mut self,
        last_name: impl Into<String>,
    ) -> Result<(), StudentValidationError> {
        let last_name = last_name.into();
        validate_last_name(&last_name)?;
        self.last_name = last_name;
        Ok(())
    }

    pub fn set_age(&mut self, age: i32) -> Result<(), StudentValidationError> {
        validate_age(age)?;
        self.age = age;
        Ok(())
    }

    pub fn set_gpa(&mut self, gpa: f64) -> Result<(), StudentValidationError> {
        validate_gpa(gpa)?;
        self.gpa = gpa;
        Ok(())
    }

    /// Sets free-text email. Not validated and not persisted by the store.
    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
    }

    /// Sets free-text phone. Not validated and not persisted by the store.
    pub fn set_phone(&mut self, phone: Option<String>) {
        self.phone = phone;
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, First name: {}, Last name: {}, Email: {}, Phone: {}, Age: {}, GPA: {:.2}",
            self.id,
            self.first_name,
            self.last_name,
            self.email.as_deref().unwrap_or("-"),
            self.phone.as_deref().unwrap_or("-"),
            self.age,
            self.gpa
        )
    }
}

/// Checks the canonical 5-10 digit id rule.
pub fn validate_id(id: &str) -> Result<(), StudentValidationError> {
    if STUDENT_ID_RE.is_match(id) {
        Ok(())
    } else {
        Err(StudentValidationError::InvalidId(id.to_string()))
    }
}

pub fn validate_first_name(name: &str) -> Result<(), StudentValidationError> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(StudentValidationError::InvalidFirstName(name.to_string()))
    }
}

pub fn validate_last_name(name: &str) -> Result<(), StudentValidationError> {
    if NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(StudentValidationError::InvalidLastName(name.to_string()))
    }
}

pub fn validate_age(age: i32) -> Result<(), StudentValidationError> {
    if (MIN_AGE..=MAX_AGE).contains(&age) {
        Ok(())
    } else {
        Err(StudentValidationError::AgeOutOfRange(age))
    }
}

/// Checks the gpa range. NaN never satisfies the range and is rejected.
pub fn validate_gpa(gpa: f64) -> Result<(), StudentValidationError> {
    if (MIN_GPA..=MAX_GPA).contains(&gpa) {
        Ok(())
    } else {
        Err(StudentValidationError::GpaOutOfRange(gpa))
    }
}
