use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static ALERT_EMAILS_SENT: AtomicU64 = AtomicU64::new(0);
static ALERT_EMAILS_FAILED: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn record_alert_emails(sent: u64, failed: u64) {
    ALERT_EMAILS_SENT.fetch_add(sent, Ordering::Relaxed);
    ALERT_EMAILS_FAILED.fetch_add(failed, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub alert_emails_sent_total: u64,
    pub alert_emails_failed_total: u64,
}

fn snapshot() -> MetricsResponse {
    MetricsResponse {
        http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
        http_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
        alert_emails_sent_total: ALERT_EMAILS_SENT.load(Ordering::Relaxed),
        alert_emails_failed_total: ALERT_EMAILS_FAILED.load(Ordering::Relaxed),
    }
}

fn render(m: &MetricsResponse) -> String {
    format!(
        "# HELP http_requests_total Total number of HTTP requests\n\
         # TYPE http_requests_total counter\n\
         http_requests_total {}\n\
         \n\
         # HELP http_errors_total Total number of HTTP errors\n\
         # TYPE http_errors_total counter\n\
         http_errors_total {}\n\
         \n\
         # HELP alert_emails_sent_total Search alert emails delivered\n\
         # TYPE alert_emails_sent_total counter\n\
         alert_emails_sent_total {}\n\
         \n\
         # HELP alert_emails_failed_total Search alert emails that failed\n\
         # TYPE alert_emails_failed_total counter\n\
         alert_emails_failed_total {}\n",
        m.http_requests_total,
        m.http_errors_total,
        m.alert_emails_sent_total,
        m.alert_emails_failed_total
    )
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus text metrics", body = String)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(render(&snapshot()))
}
