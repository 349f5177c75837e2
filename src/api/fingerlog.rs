use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::error::FingerLogError;
use crate::model::fingerlog::{
    AddFingerLogRequest, AddManualFingerLogRequest, DeleteFingerLogRequest, FingerLogRequest,
};
use crate::repository::FingerLogRepository;
use crate::utils::time_parse::{Zone, parse_date, parse_manual_timestamp, parse_timestamp};

/// Day log, grouped per person
#[utoipa::path(
    get,
    path = "/api/fingerlog",
    params(FingerLogRequest),
    responses(
        (status = 200, description = "Punches of the day grouped per person", body = [FingerLogResult]),
        (status = 400, description = "Missing or malformed date", body = Object, example = json!({
            "message": "Parameter 'date' is required"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Finger Log"
)]
#[instrument(name = "get_finger_log", skip_all, fields(date = %query.date))]
pub async fn get_finger_log(
    repo: web::Data<dyn FingerLogRepository>,
    query: web::Query<FingerLogRequest>,
) -> Result<HttpResponse, FingerLogError> {
    let date = parse_date(&query.date)?;
    let logs = repo.get_finger_log(date).await?;

    debug!(people = logs.len(), "Finger log fetched");
    Ok(HttpResponse::Ok().json(logs))
}

/// Punch recorded by a device at the current time
#[utoipa::path(
    post,
    path = "/api/fingerlog",
    request_body = AddFingerLogRequest,
    responses(
        (status = 200, description = "Punch recorded", body = Object, example = json!({
            "message": "Finger log recorded",
            "data": { "nik": "3201" }
        })),
        (status = 400, description = "Missing nik or insert rejected"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Finger Log"
)]
#[instrument(name = "add_finger_log", skip_all, fields(nik = %payload.nik))]
pub async fn add_finger_log(
    repo: web::Data<dyn FingerLogRepository>,
    payload: web::Json<AddFingerLogRequest>,
) -> Result<HttpResponse, FingerLogError> {
    let nik = payload.validate()?;
    repo.add_finger_log(nik).await?;

    info!("Finger log recorded");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Finger log recorded",
        "data": { "nik": nik }
    })))
}

/// Manual punch, `YYYY-MM-DD HH:mm:ss` in the service zone
#[utoipa::path(
    post,
    path = "/api/fingerlog/manual",
    request_body = AddManualFingerLogRequest,
    responses(
        (status = 200, description = "Manual punch added", body = Object, example = json!({
            "message": "Manual finger log added",
            "data": { "nik": "3201", "timestamp": "2025-11-27T08:00:00+07:00" }
        })),
        (status = 400, description = "Missing field, bad time format or insert rejected"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Finger Log"
)]
#[instrument(name = "add_manual_finger_log", skip_all, fields(nik = %payload.nik))]
pub async fn add_manual_finger_log(
    repo: web::Data<dyn FingerLogRepository>,
    zone: web::Data<Zone>,
    payload: web::Json<AddManualFingerLogRequest>,
) -> Result<HttpResponse, FingerLogError> {
    let (nik, raw) = payload.validate()?;
    let parsed = parse_manual_timestamp(raw, &zone)?;

    repo.add_manual_finger_log(nik, parsed.with_timezone(&Utc))
        .await?;

    info!(timestamp = %parsed, "Manual finger log added");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Manual finger log added",
        "data": { "nik": nik, "timestamp": parsed }
    })))
}

/// Deletes one punch; the timestamp must match the stored value exactly
#[utoipa::path(
    delete,
    path = "/api/fingerlog",
    request_body = DeleteFingerLogRequest,
    responses(
        (status = 200, description = "Punch deleted", body = Object, example = json!({
            "message": "Finger log deleted",
            "data": { "nik": "3201", "timestamp": "2025-11-27 17:18:23.838 +0700" }
        })),
        (status = 400, description = "Missing field or unrecognized timestamp"),
        (status = 404, description = "No punch with that exact timestamp", body = Object, example = json!({
            "message": "Data not found. Make sure the date and time match exactly."
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Finger Log"
)]
#[instrument(name = "delete_finger_log", skip_all, fields(nik = %payload.nik))]
pub async fn delete_finger_log(
    repo: web::Data<dyn FingerLogRepository>,
    zone: web::Data<Zone>,
    payload: web::Json<DeleteFingerLogRequest>,
) -> Result<HttpResponse, FingerLogError> {
    let (nik, raw) = payload.validate()?;
    let (parsed, format) = parse_timestamp(raw, &zone)?;
    debug!(format = format.as_ref(), timestamp = %parsed, "Delete timestamp parsed");

    repo.delete_finger_log(nik, parsed.with_timezone(&Utc))
        .await?;

    info!("Finger log deleted");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Finger log deleted",
        "data": { "nik": nik, "timestamp": raw }
    })))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use serde_json::{Value, json};

    use crate::repository::{FingerLogRepository, InMemoryFingerLogRepository};
    use crate::routes::api_routes;
    use crate::utils::time_parse::{Zone, resolve_zone};

    fn state() -> (web::Data<dyn FingerLogRepository>, web::Data<Zone>, InMemoryFingerLogRepository) {
        let zone = resolve_zone("Asia/Jakarta");
        let memory = InMemoryFingerLogRepository::new(zone)
            .with_user("1001", "Ani")
            .unwrap();
        let repo: Arc<dyn FingerLogRepository> = Arc::new(memory.clone());
        (web::Data::from(repo), web::Data::new(zone), memory)
    }

    #[actix_web::test]
    async fn manual_punch_then_day_log() {
        let (repo, zone, _) = state();
        let app = test::init_service(
            App::new().app_data(repo).app_data(zone).configure(api_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/fingerlog/manual")
            .set_json(json!({ "nik": "1001", "timestamp": "2025-11-27 08:00:00" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["timestamp"], "2025-11-27T08:00:00+07:00");

        let req = test::TestRequest::get()
            .uri("/fingerlog?date=2025-11-27")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!([{
                "nik": "1001",
                "full_name": "Ani",
                "timestamps": ["2025-11-27T01:00:00Z"]
            }])
        );
    }

    #[actix_web::test]
    async fn day_log_without_date_is_bad_request() {
        let (repo, zone, _) = state();
        let app = test::init_service(
            App::new().app_data(repo).app_data(zone).configure(api_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/fingerlog").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn manual_punch_rejects_other_layouts() {
        let (repo, zone, memory) = state();
        let app = test::init_service(
            App::new().app_data(repo).app_data(zone).configure(api_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/fingerlog/manual")
            .set_json(json!({ "nik": "1001", "timestamp": "27/11/2025 08:00" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(memory.punch_count().unwrap(), 0);
    }

    #[actix_web::test]
    async fn unknown_nik_insert_is_rejected() {
        let (repo, zone, _) = state();
        let app = test::init_service(
            App::new().app_data(repo).app_data(zone).configure(api_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/fingerlog")
            .set_json(json!({ "nik": "4040" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn device_punch_is_recorded() {
        let (repo, zone, memory) = state();
        let app = test::init_service(
            App::new().app_data(repo).app_data(zone).configure(api_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/fingerlog")
            .set_json(json!({ "nik": "1001" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(memory.punch_count().unwrap(), 1);
    }

    #[actix_web::test]
    async fn delete_needs_exact_match() {
        let (repo, zone, memory) = state();
        let app = test::init_service(
            App::new().app_data(repo).app_data(zone).configure(api_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/fingerlog/manual")
            .set_json(json!({ "nik": "1001", "timestamp": "2025-11-27 08:00:00" }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::delete()
            .uri("/fingerlog")
            .set_json(json!({ "nik": "1001", "timestamp": "2025-11-27 08:00:00.001" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(memory.punch_count().unwrap(), 1);

        // same instant, written with an explicit offset
        let req = test::TestRequest::delete()
            .uri("/fingerlog")
            .set_json(json!({ "nik": "1001", "timestamp": "2025-11-27T01:00:00Z" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(memory.punch_count().unwrap(), 0);
    }

    #[actix_web::test]
    async fn delete_with_garbage_timestamp_is_bad_request() {
        let (repo, zone, _) = state();
        let app = test::init_service(
            App::new().app_data(repo).app_data(zone).configure(api_routes),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri("/fingerlog")
            .set_json(json!({ "nik": "1001", "timestamp": "not-a-date" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "not-a-date");
    }
}
