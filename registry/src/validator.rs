//! # Input Validation
//!
//! Stateless checks applied to issuance and update inputs before any state
//! changes. Each failed constraint maps to its own [`RegistryError`]
//! variant, and the checks run in a fixed order — the order is part of the
//! public contract, because each failure is user-visible and distinct.
//!
//! The issuance order is: student sentinel check, then (in the store,
//! between these two halves) issuer authorization, then the field checks:
//! hash, GPA, courses, degree, major, institution, graduation date,
//! credits, location. Updates re-check only GPA and course count.

use crate::config::{
    GPA_MAX, HASH_LENGTH, MAX_COURSES, MAX_DEGREE_LENGTH, MAX_INSTITUTION_LENGTH,
    MAX_LOCATION_LENGTH, MAX_MAJOR_LENGTH,
};
use crate::error::RegistryError;
use crate::identity::Address;
use crate::transcript::IssueRequest;

/// Rejects the null/burn sentinel as a student identity.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidStudent`] for the burn address.
pub fn validate_student(student: &Address) -> Result<(), RegistryError> {
    if student.is_burn() {
        return Err(RegistryError::InvalidStudent);
    }
    Ok(())
}

/// Checks every field constraint on an issuance request, in order.
///
/// Short-circuits on the first failure; the order below is the externally
/// observable precedence.
///
/// # Errors
///
/// One of [`RegistryError::InvalidHash`], [`RegistryError::InvalidGpa`],
/// [`RegistryError::TooManyCourses`], [`RegistryError::InvalidDegree`],
/// [`RegistryError::InvalidMajor`], [`RegistryError::InvalidInstitution`],
/// [`RegistryError::InvalidGraduationDate`],
/// [`RegistryError::InvalidCredits`], or [`RegistryError::InvalidLocation`].
pub fn validate_issue_fields(req: &IssueRequest) -> Result<(), RegistryError> {
    if req.hash.len() != HASH_LENGTH {
        return Err(RegistryError::InvalidHash(req.hash.len()));
    }
    validate_gpa(req.gpa)?;
    validate_courses(&req.courses)?;
    if req.degree.is_empty() || req.degree.chars().count() > MAX_DEGREE_LENGTH {
        return Err(RegistryError::InvalidDegree);
    }
    if req.major.is_empty() || req.major.chars().count() > MAX_MAJOR_LENGTH {
        return Err(RegistryError::InvalidMajor);
    }
    if req.institution.is_empty() || req.institution.chars().count() > MAX_INSTITUTION_LENGTH {
        return Err(RegistryError::InvalidInstitution);
    }
    if req.graduation_date == 0 {
        return Err(RegistryError::InvalidGraduationDate);
    }
    if req.credits < 0 {
        return Err(RegistryError::InvalidCredits(req.credits));
    }
    if req.location.chars().count() > MAX_LOCATION_LENGTH {
        return Err(RegistryError::InvalidLocation);
    }
    Ok(())
}

/// Checks the strict subset of constraints an update may touch: GPA range
/// and course count. Everything else is immutable and never re-validated.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidGpa`] or [`RegistryError::TooManyCourses`].
pub fn validate_update(gpa: u16, courses: &[String]) -> Result<(), RegistryError> {
    validate_gpa(gpa)?;
    validate_courses(courses)?;
    Ok(())
}

fn validate_gpa(gpa: u16) -> Result<(), RegistryError> {
    if gpa > GPA_MAX {
        return Err(RegistryError::InvalidGpa(gpa));
    }
    Ok(())
}

fn validate_courses(courses: &[String]) -> Result<(), RegistryError> {
    if courses.len() > MAX_COURSES {
        return Err(RegistryError::TooManyCourses(courses.len()));
    }
    Ok(())
}
