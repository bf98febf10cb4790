use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use shared::services::errors::game_service_errors::GameServiceError;

#[derive(Debug)]
pub enum ApiError {
    GameService(GameServiceError),
    /// Path segment or request body that could not be decoded.
    BadRequest(String),
}

impl From<GameServiceError> for ApiError {
    fn from(error: GameServiceError) -> Self {
        ApiError::GameService(error)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    name: &'static str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::GameService(GameServiceError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::GameService(GameServiceError::ValidationError(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::GameService(GameServiceError::GameNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::GameService(
                GameServiceError::RepositoryError(_) | GameServiceError::SerializationError(_),
            ) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn name(&self) -> &'static str {
        match self.status() {
            StatusCode::BAD_REQUEST => "BadRequestError",
            StatusCode::NOT_FOUND => "NotFoundError",
            StatusCode::UNPROCESSABLE_ENTITY => "UnprocessableEntityError",
            _ => "InternalServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            _ if status.is_server_error() => "Internal Server Error".to_string(),
            ApiError::GameService(error) => error.to_string(),
            ApiError::BadRequest(message) => message.clone(),
        };
        let body = ErrorBody {
            status_code: status.as_u16(),
            name: self.name(),
            message,
        };

        (status, Json(json!({ "error": body }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(GameServiceError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST)]
    #[case(GameServiceError::ValidationError("bad".into()), StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(GameServiceError::GameNotFound(999), StatusCode::NOT_FOUND)]
    #[case(GameServiceError::RepositoryError("down".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(GameServiceError::SerializationError("odd".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] error: GameServiceError, #[case] expected: StatusCode) {
        assert_eq!(ApiError::from(error).into_response().status(), expected);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::from(GameServiceError::GameNotFound(999)).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["error"]["statusCode"], 404);
        assert_eq!(body["error"]["name"], "NotFoundError");
        assert_eq!(body["error"]["message"], "Entity not found: Game with id 999");
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let response =
            ApiError::from(GameServiceError::RepositoryError("secret table".into())).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        assert!(!String::from_utf8_lossy(&body).contains("secret"));
    }
}
