//! Body extractors that answer rejections in the API envelope

use axum::{
    extract::{FromRequest, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json as AxumJson,
};
use serde::de::DeserializeOwned;

use super::error::ApiErrorResponse;

/// Custom JSON extractor that converts all rejection errors to the envelope
///
/// Every malformed body is a 400, whatever axum's own status would be.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Body rejection rendered as `{success: false, message}`
#[derive(Debug)]
pub struct BodyRejection {
    message: String,
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            success: false,
            message: self.message,
        };

        (StatusCode::BAD_REQUEST, AxumJson(response)).into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(Json(value)),
            Err(rejection) => Err(BodyRejection {
                message: format_rejection_message(&rejection),
            }),
        }
    }
}

/// Format the rejection message to be more user-friendly
fn format_rejection_message(rejection: &axum::extract::rejection::JsonRejection) -> String {
    use axum::extract::rejection::JsonRejection::*;

    match rejection {
        JsonDataError(err) => format!("Invalid JSON data: {}", err.body_text()),
        JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err.body_text()),
        MissingJsonContentType(_) => {
            "Missing Content-Type header. Expected 'application/json'.".to_string()
        }
        BytesRejection(err) => format!("Failed to read request body: {}", err.body_text()),
        _ => "Invalid JSON request".to_string(),
    }
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

/// Accepts either a JSON body or an urlencoded form body
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonOrForm<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

        if !is_form {
            let Json(value) = Json::<T>::from_request(req, state).await?;
            return Ok(JsonOrForm(value));
        }

        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(JsonOrForm(value)),
            Err(rejection) => Err(BodyRejection {
                message: format!("Invalid form data: {}", rejection.body_text()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Signup {
        name: String,
        #[serde(rename = "teamSize")]
        team_size: String,
    }

    fn request(content_type: &str, body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn test_body_rejection_into_response() {
        let rejection = BodyRejection {
            message: "Test error".to_string(),
        };

        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_json_into_inner() {
        let json = Json(42);
        assert_eq!(json.into_inner(), 42);
    }

    #[tokio::test]
    async fn test_json_or_form_reads_form() {
        let JsonOrForm(signup) = JsonOrForm::<Signup>::from_request(
            request("application/x-www-form-urlencoded", "name=Ada&teamSize=3"),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(signup.name, "Ada");
        assert_eq!(signup.team_size, "3");
    }

    #[tokio::test]
    async fn test_json_or_form_reads_json() {
        let JsonOrForm(signup) = JsonOrForm::<Signup>::from_request(
            request("application/json", r#"{"name":"Ada","teamSize":"3"}"#),
            &(),
        )
        .await
        .unwrap();

        assert_eq!(signup.name, "Ada");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let rejection = JsonOrForm::<Signup>::from_request(request("application/json", "{oops"), &())
            .await
            .unwrap_err();

        assert!(rejection.message.starts_with("Invalid JSON syntax"));
        assert_eq!(rejection.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
