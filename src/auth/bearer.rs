use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload};
use futures::future::{Ready, ready};
use serde_json::json;

/// The caller's bearer token, forwarded untouched to the attendance backend.
/// Validating it is the backend's job.
pub struct BearerToken(pub String);

impl BearerToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn unauthorized(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::Unauthorized().json(json!({ "message": message })),
    )
    .into()
}

impl FromRequest for BearerToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let header = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
        {
            Some(h) => h,
            None => return ready(Err(unauthorized("Missing Authorization header"))),
        };

        match header.strip_prefix("Bearer ").map(str::trim) {
            Some(t) if !t.is_empty() => ready(Ok(BearerToken(t.to_string()))),
            _ => ready(Err(unauthorized(
                "Authorization header must start with Bearer",
            ))),
        }
    }
}
