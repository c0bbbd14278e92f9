//! Field rules applied to drafts before anything is sent to the backend.

use crate::domain::model::{BirthDateRange, ClubDraft, MemberDraft};
use crate::utils::error::Result;
use crate::utils::validation::{
    contains_digit, is_valid_email, not_in_future, today, trimmed_len_between, FieldReport,
    Validate, ValidateFields,
};
use chrono::NaiveDate;

pub const CLUB_NAME_MSG: &str = "Name must be between 3 and 100 characters.";
pub const CLUB_BRANCH_MSG: &str = "A branch must be selected.";
pub const CLUB_DESCRIPTION_MSG: &str = "Description must be between 10 and 500 characters.";
pub const CLUB_ADDRESS_MSG: &str = "Address must be between 10 and 255 characters.";
pub const CLUB_FOUNDED_MSG: &str = "Founding date is required and cannot be in the future.";
pub const CLUB_BUDGET_MSG: &str = "Annual budget cannot be negative.";

pub const MEMBER_FIRST_NAME_MSG: &str =
    "First name must be between 2 and 50 characters and cannot contain digits.";
pub const MEMBER_LAST_NAME_MSG: &str =
    "Last name must be between 2 and 50 characters and cannot contain digits.";
pub const MEMBER_EMAIL_MSG: &str = "Enter a valid email (maximum 100 characters).";
pub const MEMBER_CLUB_MSG: &str = "A club must be selected.";
pub const MEMBER_BIRTH_MSG: &str = "Birth date is required and cannot be in the future.";
pub const MEMBER_HEIGHT_MSG: &str = "Height must be between 0 and 3 meters.";

pub const RANGE_MISSING_MSG: &str = "Both dates must be selected.";
pub const RANGE_ORDER_MSG: &str = "The start date cannot be after the end date.";

const EMAIL_MAX_CHARS: usize = 100;
const HEIGHT_MAX_M: f64 = 3.0;

fn person_name_ok(value: &str) -> bool {
    trimmed_len_between(value, 2, 50) && !contains_digit(value)
}

fn past_or_today(date: Option<NaiveDate>, today: NaiveDate) -> bool {
    date.is_some_and(|d| not_in_future(d, today))
}

impl ValidateFields for ClubDraft {
    fn check_fields(&self, today: NaiveDate) -> FieldReport {
        let mut report = FieldReport::new();
        report
            .require("nombre", trimmed_len_between(&self.name, 3, 100), CLUB_NAME_MSG)
            .require("id_rama", self.branch_id.is_some(), CLUB_BRANCH_MSG)
            .require(
                "descripcion",
                trimmed_len_between(&self.description, 10, 500),
                CLUB_DESCRIPTION_MSG,
            )
            .require(
                "direccion",
                trimmed_len_between(&self.address, 10, 255),
                CLUB_ADDRESS_MSG,
            )
            .require(
                "fecha_fundacion",
                past_or_today(self.founded_on, today),
                CLUB_FOUNDED_MSG,
            )
            // NaN fails this comparison too.
            .require("presupuesto_anual", self.annual_budget >= 0.0, CLUB_BUDGET_MSG);
        report
    }
}

impl ValidateFields for MemberDraft {
    fn check_fields(&self, today: NaiveDate) -> FieldReport {
        let email_ok =
            is_valid_email(&self.email) && self.email.chars().count() <= EMAIL_MAX_CHARS;
        let height_ok = self
            .height_m
            .is_none_or(|h| (0.0..=HEIGHT_MAX_M).contains(&h));

        let mut report = FieldReport::new();
        report
            .require("nombre", person_name_ok(&self.first_name), MEMBER_FIRST_NAME_MSG)
            .require("apellido", person_name_ok(&self.last_name), MEMBER_LAST_NAME_MSG)
            .require("email", email_ok, MEMBER_EMAIL_MSG)
            .require("id_club", self.club_id.is_some(), MEMBER_CLUB_MSG)
            .require(
                "fecha_nacimiento",
                past_or_today(self.birth_date, today),
                MEMBER_BIRTH_MSG,
            )
            .require("altura_metros", height_ok, MEMBER_HEIGHT_MSG);
        report
    }
}

impl ValidateFields for BirthDateRange {
    fn check_fields(&self, _today: NaiveDate) -> FieldReport {
        let mut report = FieldReport::new();
        match (self.from, self.to) {
            (Some(from), Some(to)) => {
                report.require("fechaInicio", from <= to, RANGE_ORDER_MSG);
            }
            _ => {
                report.require("fechaInicio", false, RANGE_MISSING_MSG);
            }
        }
        report
    }
}

impl Validate for ClubDraft {
    fn validate(&self) -> Result<()> {
        self.validate_at(today())
    }
}

impl Validate for MemberDraft {
    fn validate(&self) -> Result<()> {
        self.validate_at(today())
    }
}

impl Validate for BirthDateRange {
    fn validate(&self) -> Result<()> {
        self.validate_at(today())
    }
}
