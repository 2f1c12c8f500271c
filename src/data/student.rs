use crate::data::validation::{AGE_RANGE, MAX_NAME_LEN, StudentValidationErrors};
use email_address::EmailAddress;
use jiff::civil::Date;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i32,
    pub student_name: String,
    pub address: String,
    pub email: Option<EmailAddress>,
}

impl Student {
    pub fn from_validated(
        id: i32,
        ValidatedStudent {
            student_name,
            address,
            email,
        }: ValidatedStudent,
    ) -> Self {
        Self {
            id,
            student_name,
            address,
            email,
        }
    }

    pub fn seeded() -> Vec<Self> {
        vec![
            Self {
                id: 1,
                student_name: "Student 1".to_string(),
                address: "Hyd, soksoks , soksoks".to_string(),
                email: Some(EmailAddress::new_unchecked("studentemail1@gmail.com")),
            },
            Self {
                id: 2,
                student_name: "Student 2".to_string(),
                address: "Banglore, INDIA".to_string(),
                email: Some(EmailAddress::new_unchecked("studentemail2@gmail.com")),
            },
        ]
    }
}

/// What clients send and receive.
///
/// Everything is optional on the way in so that a missing required field turns into a
/// validation error for that field rather than a deserialisation failure for the whole body.
/// Only `id`, `studentName`, `address` and `email` are kept in the store.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDto {
    #[serde(default, alias = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, alias = "StudentName")]
    pub student_name: Option<String>,
    #[serde(default, alias = "Email")]
    pub email: Option<String>,
    #[serde(default, alias = "Age", skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default, alias = "Address")]
    pub address: Option<String>,
    #[serde(default, alias = "Password", skip_serializing)]
    pub password: Option<SecretString>,
    #[serde(default, alias = "ConfirmPassword", skip_serializing)]
    pub confirm_password: Option<SecretString>,
    #[serde(
        default,
        alias = "AdmissionDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub admission_date: Option<Date>,
}

/// The parts of a [`StudentDto`] that survived validation and get stored.
#[derive(Debug)]
pub struct ValidatedStudent {
    pub student_name: String,
    pub address: String,
    pub email: Option<EmailAddress>,
}

impl StudentDto {
    /// Checks every rule and reports all the ones that failed, not just the first.
    ///
    /// `today` is the earliest admission date that is still accepted.
    pub fn validate(&self, today: Date) -> Result<ValidatedStudent, StudentValidationErrors> {
        let mut errors = StudentValidationErrors::empty();

        let student_name = self.student_name.clone().unwrap_or_default();
        if student_name.trim().is_empty() {
            errors |= StudentValidationErrors::EMPTY_NAME;
        }
        if student_name.chars().count() > MAX_NAME_LEN {
            errors |= StudentValidationErrors::NAME_TOO_LONG;
        }

        let address = self.address.clone().unwrap_or_default();
        if address.trim().is_empty() {
            errors |= StudentValidationErrors::EMPTY_ADDRESS;
        }

        let email = match self.email.as_deref().map(EmailAddress::from_str) {
            None => None,
            Some(Ok(email)) => Some(email),
            Some(Err(_)) => {
                errors |= StudentValidationErrors::INVALID_EMAIL;
                None
            }
        };

        if self.age.is_some_and(|age| !AGE_RANGE.contains(&age)) {
            errors |= StudentValidationErrors::AGE_OUT_OF_RANGE;
        }

        if let (Some(password), Some(confirm_password)) = (&self.password, &self.confirm_password)
        {
            if password.expose_secret() != confirm_password.expose_secret() {
                errors |= StudentValidationErrors::PASSWORD_MISMATCH;
            }
        }

        if self.admission_date.is_some_and(|date| date < today) {
            errors |= StudentValidationErrors::ADMISSION_DATE_IN_PAST;
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidatedStudent {
            student_name,
            address,
            email,
        })
    }
}

impl From<&Student> for StudentDto {
    fn from(student: &Student) -> Self {
        Self {
            id: Some(student.id),
            student_name: Some(student.student_name.clone()),
            email: student.email.as_ref().map(ToString::to_string),
            address: Some(student.address.clone()),
            ..Self::default()
        }
    }
}

impl From<Student> for StudentDto {
    fn from(student: Student) -> Self {
        Self::from(&student)
    }
}
