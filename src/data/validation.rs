use bitflags::bitflags;
use std::collections::BTreeMap;

pub const MAX_NAME_LEN: usize = 30;
pub const AGE_RANGE: std::ops::RangeInclusive<i32> = 10..=20;

bitflags! {
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct StudentValidationErrors: u8 {
        const EMPTY_NAME = 1 << 0;
        const NAME_TOO_LONG = 1 << 1;
        const EMPTY_ADDRESS = 1 << 2;
        const INVALID_EMAIL = 1 << 3;
        const AGE_OUT_OF_RANGE = 1 << 4;
        const PASSWORD_MISMATCH = 1 << 5;
        const ADMISSION_DATE_IN_PAST = 1 << 6;
    }
}

///the DTO field each flag belongs to, and what went wrong with it
const FIELD_MESSAGES: [(StudentValidationErrors, &str, &str); 7] = [
    (
        StudentValidationErrors::EMPTY_NAME,
        "studentName",
        "Student name is required",
    ),
    (
        StudentValidationErrors::NAME_TOO_LONG,
        "studentName",
        "Student name must be at most 30 characters long",
    ),
    (
        StudentValidationErrors::EMPTY_ADDRESS,
        "address",
        "Address is required",
    ),
    (
        StudentValidationErrors::INVALID_EMAIL,
        "email",
        "Please enter valid email address",
    ),
    (
        StudentValidationErrors::AGE_OUT_OF_RANGE,
        "age",
        "Age must be between 10 and 20",
    ),
    (
        StudentValidationErrors::PASSWORD_MISMATCH,
        "confirmPassword",
        "'ConfirmPassword' and 'Password' do not match",
    ),
    (
        StudentValidationErrors::ADMISSION_DATE_IN_PAST,
        "admissionDate",
        "Admission date must be greater than or equal to today's date",
    ),
];

impl StudentValidationErrors {
    pub fn by_field(self) -> BTreeMap<&'static str, Vec<&'static str>> {
        let mut fields: BTreeMap<_, Vec<_>> = BTreeMap::new();
        for (flag, field, message) in FIELD_MESSAGES {
            if self.contains(flag) {
                fields.entry(field).or_default().push(message);
            }
        }
        fields
    }
}
