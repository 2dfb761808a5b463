use crate::{api::attendance, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use std::sync::Arc;

// Helper to build per-route limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .milliseconds_per_request(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        // period and burst are both clamped to at least 1 above
        .expect("valid limiter config");
    Governor::new(&cfg)
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let submit_limiter = Arc::new(build_limiter(config.rate_submit_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Every route needs a bearer token; the extractor rejects requests without one
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(protected_limiter)
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .wrap(submit_limiter)
                            .route(web::post().to(attendance::mark_attendance)),
                    )
                    // /attendance/window
                    .service(
                        web::resource("/window").route(web::get().to(attendance::window)),
                    )
                    // /attendance/status?date=
                    .service(
                        web::resource("/status").route(web::get().to(attendance::day_status)),
                    )
                    // /attendance/history
                    .service(
                        web::resource("/history")
                            .route(web::get().to(attendance::attendance_history)),
                    ),
            ),
    );
}

// DASHBOARD MOUNT
//  └─ GET /attendance/window        (monitor snapshot, refreshed every WINDOW_POLL_SECS)

// MARK ATTENDANCE
//  └─ POST /attendance
//       ├─ re-evaluate window from clock
//       ├─ re-read today's status from backend
//       └─ forward to backend
