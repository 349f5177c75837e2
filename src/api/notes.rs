use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::{info, instrument};

use crate::error::FingerLogError;
use crate::model::fingerlog::{FingerLogRequest, NoteRequest};
use crate::repository::FingerLogRepository;
use crate::utils::time_parse::parse_date;

/// Save (or overwrite) the note of one person for one day
#[utoipa::path(
    post,
    path = "/api/notes",
    request_body = NoteRequest,
    responses(
        (status = 200, description = "Note saved", body = Object, example = json!({
            "message": "Note saved",
            "data": { "date": "2025-12-14", "nik": "3201", "note": "Sick leave, letter attached" }
        })),
        (status = 400, description = "Missing nik or date", body = Object, example = json!({
            "message": "NIK and date are required"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Notes"
)]
#[instrument(name = "save_note", skip_all, fields(nik = %payload.nik, date = %payload.date))]
pub async fn save_note(
    repo: web::Data<dyn FingerLogRepository>,
    payload: web::Json<NoteRequest>,
) -> Result<HttpResponse, FingerLogError> {
    let (nik, date) = payload.validate()?;
    repo.save_user_note(nik, date, &payload.note).await?;

    info!("Note saved");
    Ok(HttpResponse::Ok().json(json!({
        "message": "Note saved",
        "data": payload.into_inner()
    })))
}

/// Notes of a day, e.g. `GET /api/notes?date=2025-12-14`
#[utoipa::path(
    get,
    path = "/api/notes",
    params(FingerLogRequest),
    responses(
        (status = 200, description = "Notes of the day", body = [NoteResponse]),
        (status = 400, description = "Missing or malformed date"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Notes"
)]
#[instrument(name = "get_notes", skip_all, fields(date = %query.date))]
pub async fn get_notes(
    repo: web::Data<dyn FingerLogRepository>,
    query: web::Query<FingerLogRequest>,
) -> Result<HttpResponse, FingerLogError> {
    let date = parse_date(&query.date)?;
    let notes = repo.get_notes_by_date(date).await?;

    Ok(HttpResponse::Ok().json(notes))
}
