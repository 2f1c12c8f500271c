use crate::{
    data::{
        patch::PatchDocument,
        student::{Student, StudentDto},
    },
    error::{
        CollegeError, CollegeResult, EmptyNameSnafu, MalformedBodySnafu, MalformedPathSnafu,
        MissingStudentByNameSnafu, MissingStudentSnafu, NonPositiveIdSnafu, ParseIdSnafu,
        PatchSnafu,
    },
    state::CollegeState,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
};
use snafu::{OptionExt, ResultExt, ensure};

/// What the `{id}` segment of `/api/student/{id}` turned out to be.
#[derive(Debug, PartialEq, Eq)]
pub enum StudentKey {
    Id(i32),
    Name(String),
}

impl StudentKey {
    ///anything that looks like an integer is an id, everything else is a name
    pub fn parse(segment: String) -> CollegeResult<Self> {
        let digits = segment.strip_prefix('-').unwrap_or(&segment);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return parse_id(segment).map(Self::Id);
        }

        ensure!(!segment.trim().is_empty(), EmptyNameSnafu);
        Ok(Self::Name(segment))
    }
}

fn parse_id(original: String) -> CollegeResult<i32> {
    let id: i32 = original.parse().context(ParseIdSnafu { original })?;
    ensure!(id > 0, NonPositiveIdSnafu { id });
    Ok(id)
}

pub async fn get_students(State(state): State<CollegeState>) -> Json<Vec<StudentDto>> {
    Json(
        state
            .get_all()
            .await
            .into_iter()
            .map(StudentDto::from)
            .collect(),
    )
}

pub async fn get_student(
    State(state): State<CollegeState>,
    path: Result<Path<String>, PathRejection>,
) -> CollegeResult<Json<StudentDto>> {
    let Path(key) = path.context(MalformedPathSnafu)?;
    let student = match StudentKey::parse(key)? {
        StudentKey::Id(id) => state
            .get_by_id(id)
            .await
            .context(MissingStudentSnafu { id })?,
        StudentKey::Name(name) => {
            let found = state.get_by_name(&name).await;
            found.context(MissingStudentByNameSnafu { name })?
        }
    };

    Ok(Json(student.into()))
}

pub async fn create_student(
    State(state): State<CollegeState>,
    body: Result<Json<StudentDto>, JsonRejection>,
) -> CollegeResult<impl IntoResponse> {
    let Json(dto) = body.context(MalformedBodySnafu)?;

    let validated = dto
        .validate(state.today())
        .map_err(|errors| CollegeError::Validation { errors })?;
    let student = state.insert(validated).await?;
    info!(id = student.id, "Created student");

    let location = format!("/api/student/{}", student.id);
    let created = StudentDto {
        id: Some(student.id),
        ..dto
    };

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

pub async fn update_student(
    State(state): State<CollegeState>,
    body: Result<Json<StudentDto>, JsonRejection>,
) -> CollegeResult<StatusCode> {
    let Json(dto) = body.context(MalformedBodySnafu)?;
    let id = dto.id.unwrap_or_default();
    ensure!(id > 0, NonPositiveIdSnafu { id });

    let today = state.today();
    state
        .modify(id, |_existing| {
            let validated = dto
                .validate(today)
                .map_err(|errors| CollegeError::Validation { errors })?;
            Ok(Student::from_validated(id, validated))
        })
        .await?;
    info!(id, "Updated student");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_student_partial(
    State(state): State<CollegeState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<PatchDocument>, JsonRejection>,
) -> CollegeResult<StatusCode> {
    let Path(id) = path.context(MalformedPathSnafu)?;
    let id = parse_id(id)?;
    let Json(patch) = body.context(MalformedBodySnafu)?;

    let today = state.today();
    state
        .modify(id, |existing| {
            let mut dto = StudentDto::from(existing);
            patch.apply_to(&mut dto).context(PatchSnafu)?;

            let validated = dto
                .validate(today)
                .map_err(|errors| CollegeError::Validation { errors })?;
            Ok(Student::from_validated(id, validated))
        })
        .await?;
    info!(id, operations = patch.0.len(), "Patched student");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_student(
    State(state): State<CollegeState>,
    path: Result<Path<String>, PathRejection>,
) -> CollegeResult<Json<StudentDto>> {
    let Path(id) = path.context(MalformedPathSnafu)?;
    let id = parse_id(id)?;
    let student = state.remove(id).await.context(MissingStudentSnafu { id })?;
    info!(id, "Deleted student");

    Ok(Json(student.into()))
}
