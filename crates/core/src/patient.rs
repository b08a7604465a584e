//! Patient domain model
//!
//! [`PatientInput`] is what clients send, [`NewPatient`] is an input that
//! passed validation, and [`Patient`] is a stored record with its id.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

use crate::page::SortField;
use crate::validation::{self, ValidationContext, Validator, Violation};

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A stored patient record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: i64,
    pub given_name: String,
    pub family_name: String,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
}

impl Patient {
    pub fn new(id: i64, data: NewPatient) -> Self {
        Self {
            id,
            given_name: data.given_name,
            family_name: data.family_name,
            birth_date: data.birth_date,
            email: data.email,
        }
    }

    /// Whole years between the birth date and `today`
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|born| today.years_since(born))
    }

    /// Age as of the current date; `None` without a birth date
    pub fn age(&self) -> Option<u32> {
        self.age_on(today())
    }

    /// Compare two records on one field. Absent values order first.
    pub fn cmp_by(&self, other: &Self, field: SortField) -> Ordering {
        match field {
            SortField::Id => self.id.cmp(&other.id),
            SortField::GivenName => self.given_name.cmp(&other.given_name),
            SortField::FamilyName => self.family_name.cmp(&other.family_name),
            SortField::BirthDate => self.birth_date.cmp(&other.birth_date),
            SortField::Email => self.email.cmp(&other.email),
        }
    }
}

/// Wire shape of a patient; `age` is filled in at serialization time
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PatientJson<'a> {
    id: i64,
    given_name: &'a str,
    family_name: &'a str,
    birth_date: Option<NaiveDate>,
    email: Option<&'a str>,
    age: Option<u32>,
}

impl Serialize for Patient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PatientJson {
            id: self.id,
            given_name: &self.given_name,
            family_name: &self.family_name,
            birth_date: self.birth_date,
            email: self.email.as_deref(),
            age: self.age(),
        }
        .serialize(serializer)
    }
}

/// Patient payload as received from a client (POST / PUT body)
///
/// `id` is accepted for symmetry with responses but never used: the store
/// assigns ids on insert and the path decides the target on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub email: Option<String>,
}

static PATIENT_RULES: LazyLock<Validator<PatientInput>> = LazyLock::new(|| {
    Validator::new()
        .rule(validation::not_blank("givenName", |p: &PatientInput| {
            p.given_name.as_deref()
        }))
        .rule(validation::not_blank("familyName", |p: &PatientInput| {
            p.family_name.as_deref()
        }))
        .rule(validation::past_or_present("birthDate", |p: &PatientInput| {
            p.birth_date
        }))
        .rule(validation::email("email", |p: &PatientInput| p.email.as_deref()))
});

impl PatientInput {
    /// Run the patient rule set and, on success, produce a [`NewPatient`]
    pub fn validate(self, ctx: &ValidationContext) -> Result<NewPatient, Vec<Violation>> {
        let mut input = self;
        if input.email.as_deref().is_some_and(str::is_empty) {
            input.email = None;
        }

        PATIENT_RULES.validate(&input, ctx)?;

        // both names are present once the not_blank rules passed
        Ok(NewPatient {
            given_name: input.given_name.unwrap_or_default(),
            family_name: input.family_name.unwrap_or_default(),
            birth_date: input.birth_date,
            email: input.email,
        })
    }
}

/// Validated patient data without an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPatient {
    pub given_name: String,
    pub family_name: String,
    pub birth_date: Option<NaiveDate>,
    pub email: Option<String>,
}

impl NewPatient {
    pub fn new(given_name: &str, family_name: &str) -> Self {
        Self {
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
            birth_date: None,
            email: None,
        }
    }

    pub fn born(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }
}

/// Records loaded into an empty store when demo seeding is enabled, in id order
pub fn demo_patients() -> Vec<NewPatient> {
    vec![
        NewPatient::new("Phillip", "Spec")
            .born(NaiveDate::from_ymd_opt(1972, 5, 5).unwrap_or_default())
            .with_email("phillip.spec@example.com"),
        NewPatient::new("Cecilia", "Certify")
            .born(NaiveDate::from_ymd_opt(1985, 9, 14).unwrap_or_default())
            .with_email("cecilia.certify@example.com"),
        NewPatient::new("Norbert", "Neubus")
            .born(NaiveDate::from_ymd_opt(1990, 2, 17).unwrap_or_default())
            .with_email("norbert.neubus@example.com"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ViolationCode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx() -> ValidationContext {
        ValidationContext::new(date(2024, 6, 1))
    }

    fn full_input() -> PatientInput {
        PatientInput {
            id: None,
            given_name: Some("Grace".into()),
            family_name: Some("Hopper".into()),
            birth_date: Some(date(1906, 12, 9)),
            email: Some("grace@example.com".into()),
        }
    }

    #[test]
    fn age_counts_whole_years() {
        let patient = Patient::new(1, NewPatient::new("A", "B").born(date(1980, 6, 2)));
        assert_eq!(patient.age_on(date(2024, 6, 1)), Some(43));
        assert_eq!(patient.age_on(date(2024, 6, 2)), Some(44));

        let unborn = Patient::new(2, NewPatient::new("A", "B"));
        assert_eq!(unborn.age_on(date(2024, 6, 1)), None);
    }

    #[test]
    fn serialized_patient_carries_age() {
        let patient = Patient::new(7, NewPatient::new("Ann", "Lee").born(date(1980, 1, 1)));
        let json = serde_json::to_value(&patient).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["givenName"], "Ann");
        assert_eq!(json["familyName"], "Lee");
        assert_eq!(json["birthDate"], "1980-01-01");
        assert!(json["email"].is_null());
        assert_eq!(json["age"], today().years_since(date(1980, 1, 1)).unwrap());
    }

    #[test]
    fn serialized_age_is_null_without_birth_date() {
        let patient = Patient::new(1, NewPatient::new("Ann", "Lee"));
        let json = serde_json::to_value(&patient).unwrap();
        assert!(json["age"].is_null());
    }

    #[test]
    fn valid_input_becomes_new_patient() {
        let patient = full_input().validate(&ctx()).unwrap();
        assert_eq!(patient.given_name, "Grace");
        assert_eq!(patient.family_name, "Hopper");
        assert_eq!(patient.email.as_deref(), Some("grace@example.com"));
    }

    #[test]
    fn empty_input_reports_both_names() {
        let violations = PatientInput::default().validate(&ctx()).unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["givenName", "familyName"]);
    }

    #[test]
    fn empty_names_are_rejected() {
        let mut input = full_input();
        input.given_name = Some(String::new());
        let violations = input.validate(&ctx()).unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, ViolationCode::NotBlank);

        let mut input = full_input();
        input.family_name = Some("  ".into());
        let violations = input.validate(&ctx()).unwrap_err();
        assert_eq!(violations[0].field, "familyName");
    }

    #[test]
    fn malformed_email_is_rejected() {
        let mut input = full_input();
        input.email = Some("bad/email".into());
        let violations = input.validate(&ctx()).unwrap_err();
        assert_eq!(violations[0].code, ViolationCode::Email);
    }

    #[test]
    fn empty_email_is_treated_as_absent() {
        let mut input = full_input();
        input.email = Some(String::new());
        assert_eq!(input.validate(&ctx()).unwrap().email, None);
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let mut input = full_input();
        input.birth_date = Some(date(2024, 6, 2));
        let violations = input.validate(&ctx()).unwrap_err();
        assert_eq!(violations[0].code, ViolationCode::PastOrPresent);

        let mut input = full_input();
        input.birth_date = Some(date(2024, 6, 1));
        assert!(input.validate(&ctx()).is_ok());
    }

    #[test]
    fn input_ignores_age_and_keeps_id() {
        let input: PatientInput = serde_json::from_str(
            r#"{"id":42,"givenName":"A","familyName":"B","age":99}"#,
        )
        .unwrap();
        assert_eq!(input.id, Some(42));
        assert_eq!(input.given_name.as_deref(), Some("A"));
    }

    #[test]
    fn cmp_by_orders_absent_values_first() {
        let with = Patient::new(1, NewPatient::new("A", "B").with_email("a@example.com"));
        let without = Patient::new(2, NewPatient::new("A", "B"));
        assert_eq!(without.cmp_by(&with, SortField::Email), Ordering::Less);
        assert_eq!(with.cmp_by(&without, SortField::Id), Ordering::Less);
    }

    #[test]
    fn demo_patients_are_valid() {
        let patients = demo_patients();
        let families: Vec<_> = patients.iter().map(|p| p.family_name.as_str()).collect();
        assert_eq!(families, vec!["Spec", "Certify", "Neubus"]);
        assert_eq!(patients[0].birth_date, Some(date(1972, 5, 5)));
    }
}
