use actix_web::{web, HttpResponse};

use crate::database::MongoDB;
use crate::models::{CreateSearchAlertRequest, SearchAlertQuery, SearchAlertResponse};
use crate::services::search_alert_service;
use crate::utils::error::AppError;

#[utoipa::path(
    post,
    path = "/api/v1/search-alerts",
    tag = "Search Alerts",
    request_body = CreateSearchAlertRequest,
    responses(
        (status = 201, description = "Alert saved", body = SearchAlertResponse),
        (status = 400, description = "Validation failed")
    )
)]
pub async fn create_alert(
    body: web::Json<CreateSearchAlertRequest>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let alert = search_alert_service::create_alert(&db, &body).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "status": "success",
        "searchAlert": SearchAlertResponse::from(alert)
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/search-alerts",
    tag = "Search Alerts",
    params(SearchAlertQuery),
    responses(
        (status = 200, description = "Alerts registered for the email", body = [SearchAlertResponse])
    )
)]
pub async fn list_alerts(
    query: web::Query<SearchAlertQuery>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    let alerts: Vec<SearchAlertResponse> = search_alert_service::list_for_email(&db, &query.email)
        .await?
        .into_iter()
        .map(SearchAlertResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "searchAlerts": alerts,
        "total": alerts.len()
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/search-alerts/{id}",
    tag = "Search Alerts",
    params(("id" = String, Path, description = "Search alert ObjectId")),
    responses(
        (status = 200, description = "Alert removed"),
        (status = 404, description = "Search alert not found")
    )
)]
pub async fn delete_alert(
    path: web::Path<String>,
    db: web::Data<MongoDB>,
) -> Result<HttpResponse, AppError> {
    search_alert_service::delete_alert(&db, &path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "success",
        "message": "Search alert removed"
    })))
}
