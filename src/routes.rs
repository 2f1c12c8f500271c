use crate::{
    error::CollegeError,
    routes::student::{
        create_student, delete_student, get_student, get_students, update_student,
        update_student_partial,
    },
    state::CollegeState,
};
use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

pub mod student;

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(details, "Handler panicked");

    CollegeError::HandlerPanicked.into_response()
}

pub fn router(state: CollegeState) -> Router {
    let max_body_bytes = state.config().server_config().max_body_bytes;

    Router::new()
        .route("/api/student/All", get(get_students))
        .route("/api/student", post(create_student))
        .route("/api/student/Update", put(update_student))
        .route(
            "/api/student/{id}",
            get(get_student).delete(delete_student),
        )
        .route(
            "/api/student/{id}/UpdatePartial",
            patch(update_student_partial),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RuntimeConfiguration, data::store::StudentStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn oversized_bodies_are_refused() {
        let app = router(CollegeState::new(
            StudentStore::seeded(),
            RuntimeConfiguration::default(),
        ));
        let huge_name = "a".repeat(128 * 1024);
        let body = format!(r#"{{"studentName":"{huge_name}","address":"X"}}"#);

        let response = app
            .oneshot(
                Request::post("/api/student")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, body.len())
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn panics_become_internal_errors() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
