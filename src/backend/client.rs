use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};
use uuid::Uuid;

use super::{AttendanceBackend, BackendError, HistoryRange};
use crate::model::attendance::{AttendanceRecord, DayAttendance, MarkAttendance};

/// REST client for the attendance backend.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .header("X-Request-Id", Uuid::new_v4().to_string())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T, BackendError> {
        let resp = req.send().await.map_err(|e| {
            error!(error = %e, path, "Attendance backend unreachable");
            BackendError::from(e)
        })?;

        let status = resp.status();
        debug!(path, status = status.as_u16(), "Attendance backend responded");

        if status == StatusCode::UNAUTHORIZED {
            return Err(BackendError::Unauthorized);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = backend_message(&body, status);
            error!(path, status = status.as_u16(), %message, "Attendance backend rejected request");
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

/// Pulls a human readable reason out of an error body. The backend answers with
/// either `{"message": ..}` or `{"error": ..}`; anything else is passed through.
fn backend_message(body: &str, status: StatusCode) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(msg)) = obj.get(key) {
                return msg.clone();
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl AttendanceBackend for HttpBackend {
    async fn day_attendance(
        &self,
        token: &str,
        date: NaiveDate,
    ) -> Result<DayAttendance, BackendError> {
        let path = "/attendance/status";
        let req = self
            .request(Method::GET, path, token)
            .query(&[("date", date.format("%Y-%m-%d").to_string())]);
        self.send(path, req).await
    }

    async fn record_attendance(
        &self,
        token: &str,
        mark: &MarkAttendance,
    ) -> Result<AttendanceRecord, BackendError> {
        let path = "/attendance";
        let req = self.request(Method::POST, path, token).json(mark);
        self.send(path, req).await
    }

    async fn attendance_history(
        &self,
        token: &str,
        range: &HistoryRange,
    ) -> Result<Vec<AttendanceRecord>, BackendError> {
        let path = "/attendance/history";
        let req = self.request(Method::GET, path, token).query(range);
        self.send(path, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// What the canned backend saw on one status request.
    struct Seen {
        authorization: String,
        request_id: String,
        query: String,
    }

    type Log = Arc<Mutex<Vec<Seen>>>;

    async fn status_route(req: HttpRequest, log: web::Data<Log>) -> HttpResponse {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };
        let seen = Seen {
            authorization: header("authorization"),
            request_id: header("x-request-id"),
            query: req.query_string().to_string(),
        };
        let expired = seen.authorization == "Bearer expired";
        log.lock().unwrap().push(seen);

        if expired {
            return HttpResponse::Unauthorized().json(json!({ "message": "Token expired" }));
        }
        HttpResponse::Ok().json(json!({
            "date": "2026-03-02",
            "marked": true,
            "record": { "date": "2026-03-02", "time": "08:05:00", "status": "attended" }
        }))
    }

    /// Serves the three backend endpoints under `/api` on a random local port.
    fn canned_backend() -> (HttpBackend, Log) {
        let log: Log = Arc::default();
        let shared = log.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(shared.clone()))
                .route("/api/attendance/status", web::get().to(status_route))
                .route(
                    "/api/attendance",
                    web::post().to(|| async {
                        HttpResponse::BadRequest()
                            .json(json!({ "message": "Already checked in today" }))
                    }),
                )
                .route(
                    "/api/attendance/history",
                    web::get().to(|| async {
                        HttpResponse::Ok()
                            .content_type("application/json")
                            .body("not json")
                    }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());

        let backend =
            HttpBackend::new(&format!("http://{addr}/api/"), Duration::from_secs(5)).unwrap();
        (backend, log)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[actix_web::test]
    async fn status_read_forwards_token_request_id_and_date() {
        let (backend, log) = canned_backend();

        let day_status = backend.day_attendance("good-token", day()).await.unwrap();
        assert!(day_status.marked);
        assert_eq!(day_status.record.unwrap().date, day());

        backend.day_attendance("good-token", day()).await.unwrap();

        let seen = log.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].authorization, "Bearer good-token");
        assert_eq!(seen[0].query, "date=2026-03-02");
        assert!(Uuid::parse_str(&seen[0].request_id).is_ok());
        assert_ne!(seen[0].request_id, seen[1].request_id);
    }

    #[actix_web::test]
    async fn backend_401_is_unauthorized() {
        let (backend, _) = canned_backend();
        let err = backend.day_attendance("expired", day()).await;
        assert!(matches!(err, Err(BackendError::Unauthorized)));
    }

    #[actix_web::test]
    async fn backend_400_is_rejected_with_its_message() {
        let (backend, _) = canned_backend();
        let mark = MarkAttendance {
            date: day(),
            time: chrono::NaiveTime::from_hms_opt(8, 5, 0).unwrap(),
        };

        match backend.record_attendance("good-token", &mark).await {
            Err(BackendError::Rejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Already checked in today");
            }
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[actix_web::test]
    async fn malformed_body_is_a_decode_error() {
        let (backend, _) = canned_backend();
        let err = backend
            .attendance_history("good-token", &HistoryRange::default())
            .await;
        assert!(matches!(err, Err(BackendError::Decode(_))));
    }

    #[actix_web::test]
    async fn closed_port_is_unavailable() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let backend =
            HttpBackend::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(5)).unwrap();

        let err = backend.day_attendance("good-token", day()).await;
        assert!(matches!(err, Err(BackendError::Unavailable(_))));
    }

    #[test]
    fn message_prefers_json_fields() {
        assert_eq!(
            backend_message(r#"{"message":"Already checked in today"}"#, StatusCode::BAD_REQUEST),
            "Already checked in today"
        );
        assert_eq!(
            backend_message(r#"{"error":"Invalid role"}"#, StatusCode::FORBIDDEN),
            "Invalid role"
        );
    }

    #[test]
    fn message_falls_back_to_body_then_reason() {
        assert_eq!(
            backend_message("  upstream exploded ", StatusCode::INTERNAL_SERVER_ERROR),
            "upstream exploded"
        );
        assert_eq!(backend_message("", StatusCode::FORBIDDEN), "Forbidden");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let backend = HttpBackend::new("http://hr.local/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.base_url, "http://hr.local/api");
    }
}
