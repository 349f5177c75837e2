use crate::model::fingerlog::{
    AddFingerLogRequest, AddManualFingerLogRequest, DeleteFingerLogRequest, FingerLogResult,
    NoteRequest, NoteResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Finger Log API",
        version = "0.1.0",
        description = r#"
## Finger Log Service

Attendance punches ("finger logs") and per-day notes for the staff roster.

### Key Features
- **Day log**: punches of one calendar day, grouped per person in NIK order
- **Punches**: device punches at the current time, manual punches
  (`YYYY-MM-DD HH:mm:ss`, service time zone), exact-match deletion
- **Notes**: one note per person per day, saving again overwrites it

### Timestamps
Calendar days and offset-less timestamps use the service zone
(`APP_TIMEZONE`, default `Asia/Jakarta`). Deletion accepts
`YYYY-MM-DD HH:mm:ss.SSS +0700`, `YYYY-MM-DD HH:mm:ss.SSS`,
`YYYY-MM-DD HH:mm:ss` and RFC 3339, and must match the stored value to the
millisecond.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::fingerlog::get_finger_log,
        crate::api::fingerlog::add_finger_log,
        crate::api::fingerlog::add_manual_finger_log,
        crate::api::fingerlog::delete_finger_log,

        crate::api::notes::save_note,
        crate::api::notes::get_notes
    ),
    components(
        schemas(
            FingerLogResult,
            AddFingerLogRequest,
            AddManualFingerLogRequest,
            DeleteFingerLogRequest,
            NoteRequest,
            NoteResponse
        )
    ),
    tags(
        (name = "Finger Log", description = "Attendance punch APIs"),
        (name = "Notes", description = "Per-day note APIs"),
    )
)]
pub struct ApiDoc;
