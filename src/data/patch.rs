//! JSON Patch documents over the flat [`StudentDto`].
//!
//! Every path names a single top-level field (`/studentName`, case-insensitive), so there is
//! no array indexing or nesting to handle.

use crate::data::student::StudentDto;
use secrecy::ExposeSecret;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use snafu::{OptionExt, ResultExt, Snafu, ensure};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum PatchError {
    #[snafu(display("The target location specified by path {:?} was not found", path))]
    UnknownPath { path: String },
    #[snafu(display("The value for {:?} has the wrong type", path))]
    WrongValueType {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("The current value at {:?} is not equal to the test value", path))]
    TestFailed { path: String },
    #[snafu(display("Unknown patch operation {:?}", op))]
    UnknownOperation { op: String },
    #[snafu(display("The {:?} operation needs a `from` location", op))]
    MissingFrom { op: String },
}

/// An operation as it appears on the wire, before `op` has been checked.
#[derive(Deserialize)]
struct RawOperation {
    op: String,
    path: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(try_from = "RawOperation")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl TryFrom<RawOperation> for PatchOperation {
    type Error = PatchError;

    ///op names are matched case-insensitively, so `Replace` is as good as `replace`
    fn try_from(
        RawOperation {
            op,
            path,
            from,
            value,
        }: RawOperation,
    ) -> Result<Self, Self::Error> {
        Ok(match op.to_ascii_lowercase().as_str() {
            "add" => Self::Add { path, value },
            "remove" => Self::Remove { path },
            "replace" => Self::Replace { path, value },
            "move" => Self::Move {
                from: from.context(MissingFromSnafu { op })?,
                path,
            },
            "copy" => Self::Copy {
                from: from.context(MissingFromSnafu { op })?,
                path,
            },
            "test" => Self::Test { path, value },
            _ => return UnknownOperationSnafu { op }.fail(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(pub Vec<PatchOperation>);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StudentField {
    Id,
    StudentName,
    Email,
    Age,
    Address,
    Password,
    ConfirmPassword,
    AdmissionDate,
}

impl StudentField {
    const ALL: [(Self, &'static str); 8] = [
        (Self::Id, "id"),
        (Self::StudentName, "studentName"),
        (Self::Email, "email"),
        (Self::Age, "age"),
        (Self::Address, "address"),
        (Self::Password, "password"),
        (Self::ConfirmPassword, "confirmPassword"),
        (Self::AdmissionDate, "admissionDate"),
    ];

    ///paths are JSON pointers, so they have to start with `/`
    fn from_path(path: &str) -> Result<Self, PatchError> {
        let name = path
            .strip_prefix('/')
            .context(UnknownPathSnafu { path })?;
        Self::ALL
            .into_iter()
            .find(|(_, field_name)| field_name.eq_ignore_ascii_case(name))
            .map(|(field, _)| field)
            .context(UnknownPathSnafu { path })
    }

    fn get(self, dto: &StudentDto) -> Value {
        let string = |s: Option<&str>| s.map_or(Value::Null, |s| Value::String(s.to_string()));

        match self {
            Self::Id => dto.id.map_or(Value::Null, Value::from),
            Self::StudentName => string(dto.student_name.as_deref()),
            Self::Email => string(dto.email.as_deref()),
            Self::Age => dto.age.map_or(Value::Null, Value::from),
            Self::Address => string(dto.address.as_deref()),
            Self::Password => string(dto.password.as_ref().map(|p| p.expose_secret())),
            Self::ConfirmPassword => {
                string(dto.confirm_password.as_ref().map(|p| p.expose_secret()))
            }
            Self::AdmissionDate => dto
                .admission_date
                .map_or(Value::Null, |date| Value::String(date.to_string())),
        }
    }

    fn set(self, dto: &mut StudentDto, value: Value, path: &str) -> Result<(), PatchError> {
        fn decode<T: DeserializeOwned>(value: Value, path: &str) -> Result<T, PatchError> {
            serde_json::from_value(value).context(WrongValueTypeSnafu { path })
        }

        match self {
            Self::Id => dto.id = decode(value, path)?,
            Self::StudentName => dto.student_name = decode(value, path)?,
            Self::Email => dto.email = decode(value, path)?,
            Self::Age => dto.age = decode(value, path)?,
            Self::Address => dto.address = decode(value, path)?,
            Self::Password => dto.password = decode(value, path)?,
            Self::ConfirmPassword => dto.confirm_password = decode(value, path)?,
            Self::AdmissionDate => dto.admission_date = decode(value, path)?,
        }
        Ok(())
    }
}

impl PatchOperation {
    pub fn apply_to(&self, dto: &mut StudentDto) -> Result<(), PatchError> {
        match self {
            Self::Add { path, value } | Self::Replace { path, value } => {
                StudentField::from_path(path)?.set(dto, value.clone(), path)
            }
            Self::Remove { path } => StudentField::from_path(path)?.set(dto, Value::Null, path),
            Self::Copy { from, path } => {
                let value = StudentField::from_path(from)?.get(dto);
                StudentField::from_path(path)?.set(dto, value, path)
            }
            Self::Move { from, path } => {
                let source = StudentField::from_path(from)?;
                let target = StudentField::from_path(path)?;
                let value = source.get(dto);
                source.set(dto, Value::Null, from)?;
                target.set(dto, value, path)
            }
            Self::Test { path, value } => {
                let current = StudentField::from_path(path)?.get(dto);
                ensure!(&current == value, TestFailedSnafu { path });
                Ok(())
            }
        }
    }
}

impl PatchDocument {
    ///applies each operation in order, stopping at the first that fails
    pub fn apply_to(&self, dto: &mut StudentDto) -> Result<(), PatchError> {
        self.0.iter().try_for_each(|operation| operation.apply_to(dto))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn dto() -> StudentDto {
        StudentDto {
            id: Some(1),
            student_name: Some("Student 1".to_string()),
            address: Some("Banglore, INDIA".to_string()),
            email: Some("studentemail1@gmail.com".to_string()),
            ..StudentDto::default()
        }
    }

    fn patch(json: &str) -> PatchDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn replace_is_case_insensitive() {
        let mut dto = dto();
        patch(r#"[{"op":"replace","path":"/StudentName","value":"Renamed"}]"#)
            .apply_to(&mut dto)
            .unwrap();
        assert_eq!(dto.student_name.as_deref(), Some("Renamed"));
    }

    #[test]
    fn remove_clears_field() {
        let mut dto = dto();
        patch(r#"[{"op":"remove","path":"/email"}]"#)
            .apply_to(&mut dto)
            .unwrap();
        assert!(dto.email.is_none());
    }

    #[test]
    fn move_and_copy_between_fields() {
        let mut dto = dto();
        patch(
            r#"[
                {"op":"add","path":"/password","value":"secret"},
                {"op":"copy","from":"/password","path":"/confirmPassword"},
                {"op":"move","from":"/address","path":"/studentName"}
            ]"#,
        )
        .apply_to(&mut dto)
        .unwrap();

        assert_eq!(
            dto.confirm_password.as_ref().map(|p| p.expose_secret()),
            Some("secret")
        );
        assert_eq!(dto.student_name.as_deref(), Some("Banglore, INDIA"));
        assert!(dto.address.is_none());
    }

    #[test]
    fn typed_fields_parse_their_values() {
        let mut dto = dto();
        patch(
            r#"[
                {"op":"add","path":"/age","value":15},
                {"op":"add","path":"/admissionDate","value":"2030-01-02"}
            ]"#,
        )
        .apply_to(&mut dto)
        .unwrap();
        assert_eq!(dto.age, Some(15));
        assert_eq!(dto.admission_date, Some(date(2030, 1, 2)));
    }

    #[test]
    fn wrong_value_type_is_rejected() {
        let err = patch(r#"[{"op":"replace","path":"/age","value":"fifteen"}]"#)
            .apply_to(&mut dto())
            .unwrap_err();
        assert!(matches!(err, PatchError::WrongValueType { .. }));
    }

    #[test]
    fn unknown_path_is_rejected() {
        let err = patch(r#"[{"op":"replace","path":"/house","value":"Red"}]"#)
            .apply_to(&mut dto())
            .unwrap_err();
        assert!(matches!(err, PatchError::UnknownPath { path } if path == "/house"));
    }

    #[test]
    fn test_op_guards_the_patch() {
        let mut dto = dto();
        patch(r#"[{"op":"test","path":"/id","value":1}]"#)
            .apply_to(&mut dto)
            .unwrap();

        let err = patch(
            r#"[
                {"op":"replace","path":"/studentName","value":"Changed"},
                {"op":"test","path":"/studentName","value":"Student 1"}
            ]"#,
        )
        .apply_to(&mut dto)
        .unwrap_err();
        assert!(matches!(err, PatchError::TestFailed { .. }));
    }

    #[test]
    fn paths_must_be_pointers() {
        let err = patch(r#"[{"op":"replace","path":"studentName","value":"Renamed"}]"#)
            .apply_to(&mut dto())
            .unwrap_err();
        assert!(matches!(err, PatchError::UnknownPath { path } if path == "studentName"));
    }

    #[test]
    fn op_names_ignore_case() {
        let mut dto = dto();
        patch(
            r#"[
                {"op":"Replace","path":"/studentName","value":"Renamed"},
                {"op":"TEST","path":"/studentName","value":"Renamed"}
            ]"#,
        )
        .apply_to(&mut dto)
        .unwrap();
        assert_eq!(dto.student_name.as_deref(), Some("Renamed"));
    }

    #[test]
    fn move_without_from_fails_to_parse() {
        let err = serde_json::from_str::<PatchDocument>(r#"[{"op":"move","path":"/email"}]"#)
            .unwrap_err();
        assert!(err.to_string().contains("from"), "{err}");
    }

    #[test]
    fn unknown_op_fails_to_parse() {
        assert!(
            serde_json::from_str::<PatchDocument>(r#"[{"op":"frobnicate","path":"/age"}]"#)
                .is_err()
        );
    }
}
