//! # REST API
//!
//! Builds the axum router that exposes the transcript registry over HTTP.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                                | Description                    |
//! |--------|-------------------------------------|--------------------------------|
//! | GET    | `/health`                           | Liveness probe                 |
//! | GET    | `/status`                           | Node + registry status summary |
//! | POST   | `/transcripts`                      | Issue a transcript             |
//! | GET    | `/transcripts/count`                | Identifier counter             |
//! | GET    | `/transcripts/:id`                  | Transcript by id               |
//! | PATCH  | `/transcripts/:id`                  | Amend GPA and course list      |
//! | GET    | `/transcripts/:id/update`           | Latest amendment record        |
//! | POST   | `/transcripts/:id/verify`           | Check a candidate content hash |
//! | GET    | `/students/:address/transcripts`    | Ids issued to a student        |
//! | GET    | `/ledger/transfers`                 | Fee transfers performed so far |
//! | POST   | `/admin/fee-recipient`              | One-time recipient setup       |
//! | POST   | `/admin/fee`                        | Change the issuance fee        |
//! | POST   | `/admin/issuers`                    | Grant issuance rights          |
//!
//! Caller identity travels in the request body (`issuer` / `updater`) —
//! authentication is resolved by the surrounding deployment, not here.
//! Each mutating request takes the registry's write lock for its whole
//! duration, so operations never interleave at a finer grain than one call.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use attesta_registry::hashing;
use attesta_registry::ledger::{RecordingLedger, TransferRecord};
use attesta_registry::transcript::IssueRequest;
use attesta_registry::{Address, RegistryError, TranscriptRegistry};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone — everything behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The node's reported version string.
    pub version: String,
    /// The registry engine. Write lock per mutating call gives whole-call
    /// atomicity; reads share.
    pub registry: Arc<RwLock<TranscriptRegistry>>,
    /// The in-process fee ledger, kept for the transfers endpoint.
    pub ledger: Arc<RecordingLedger>,
    /// Current ledger height, the engine's timestamp source. Advanced by
    /// the background ticker in `main`.
    pub height: Arc<AtomicU64>,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/transcripts", post(issue_handler))
        .route("/transcripts/count", get(count_handler))
        .route("/transcripts/:id", get(get_transcript_handler))
        .route("/transcripts/:id", patch(update_handler))
        .route("/transcripts/:id/update", get(latest_update_handler))
        .route("/transcripts/:id/verify", post(verify_handler))
        .route("/students/:address/transcripts", get(student_handler))
        .route("/ledger/transfers", get(transfers_handler))
        .route("/admin/fee-recipient", post(set_fee_recipient_handler))
        .route("/admin/fee", post(set_fee_handler))
        .route("/admin/issuers", post(add_issuer_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Request body for `POST /transcripts`.
#[derive(Debug, Deserialize)]
pub struct IssueBody {
    /// The issuing identity (already authenticated upstream).
    pub issuer: String,
    /// The student the transcript is for.
    pub student: String,
    /// Hex-encoded content hash. Must decode to exactly 32 bytes.
    pub hash: String,
    /// Scaled GPA, 0-400.
    pub gpa: u16,
    /// Course names.
    pub courses: Vec<String>,
    pub degree: String,
    pub major: String,
    pub institution: String,
    pub graduation_date: u64,
    pub credits: i64,
    #[serde(default)]
    pub location: String,
}

/// Request body for `PATCH /transcripts/:id`.
#[derive(Debug, Deserialize)]
pub struct UpdateBody {
    /// The amending identity. Must be the transcript's original issuer.
    pub updater: String,
    pub gpa: u16,
    pub courses: Vec<String>,
}

/// Request body for `POST /transcripts/:id/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyBody {
    /// Hex-encoded candidate hash.
    pub hash: String,
}

/// Request body for `POST /admin/fee-recipient`.
#[derive(Debug, Deserialize)]
pub struct FeeRecipientBody {
    pub recipient: String,
}

/// Request body for `POST /admin/fee`.
#[derive(Debug, Deserialize)]
pub struct FeeBody {
    pub fee: u64,
}

/// Request body for `POST /admin/issuers`.
#[derive(Debug, Deserialize)]
pub struct IssuerBody {
    pub issuer: String,
}

/// Response payload for a successful issuance.
#[derive(Debug, Serialize, Deserialize)]
pub struct IssueResponse {
    /// The newly allocated transcript identifier.
    pub id: u64,
    /// The fee that moved for this issuance.
    pub fee: u64,
}

/// Response payload for `POST /transcripts/:id/verify`.
#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub id: u64,
    /// True iff the candidate matched the stored hash byte-for-byte.
    pub matches: bool,
}

/// Response payload for `GET /transcripts/count`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Response payload for `GET /status`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Node software version.
    pub version: String,
    /// Total transcripts ever issued.
    pub transcript_count: u64,
    /// Current ledger height.
    pub ledger_height: u64,
    /// Fee charged per issuance right now.
    pub issuance_fee: u64,
    /// Configured fee recipient, if any.
    pub fee_recipient: Option<String>,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Generic error body returned by REST endpoints on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable machine-readable failure kind.
    pub kind: String,
    /// Human-readable description.
    pub error: String,
}

// ---------------------------------------------------------------------------
// Error Mapping
// ---------------------------------------------------------------------------

/// Stable label for each registry failure kind, used by API consumers.
fn error_kind(err: &RegistryError) -> &'static str {
    match err {
        RegistryError::AlreadyConfigured => "already_configured",
        RegistryError::NotConfigured => "not_configured",
        RegistryError::UnauthorizedIssuer(_) => "unauthorized_issuer",
        RegistryError::Unauthorized { .. } => "unauthorized",
        RegistryError::InvalidStudent => "invalid_student",
        RegistryError::InvalidHash(_) => "invalid_hash",
        RegistryError::InvalidGpa(_) => "invalid_gpa",
        RegistryError::TooManyCourses(_) => "too_many_courses",
        RegistryError::InvalidDegree => "invalid_degree",
        RegistryError::InvalidMajor => "invalid_major",
        RegistryError::InvalidInstitution => "invalid_institution",
        RegistryError::InvalidGraduationDate => "invalid_graduation_date",
        RegistryError::InvalidCredits(_) => "invalid_credits",
        RegistryError::InvalidLocation => "invalid_location",
        RegistryError::MaxExceeded(_) => "max_exceeded",
        RegistryError::NotFound(_) => "not_found",
        RegistryError::LedgerTransferFailed(_) => "ledger_transfer_failed",
    }
}

/// Maps a registry error onto its HTTP status: validation 400,
/// authorization 403, not-found 404, configuration/capacity 409, ledger
/// failure 502.
fn error_status(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::AlreadyConfigured
        | RegistryError::NotConfigured
        | RegistryError::MaxExceeded(_) => StatusCode::CONFLICT,
        RegistryError::UnauthorizedIssuer(_) | RegistryError::Unauthorized { .. } => {
            StatusCode::FORBIDDEN
        }
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::LedgerTransferFailed(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn error_response(err: &RegistryError) -> (StatusCode, Json<ErrorResponse>) {
    (
        error_status(err),
        Json(ErrorResponse {
            kind: error_kind(err).to_string(),
            error: err.to_string(),
        }),
    )
}

/// Rejects a hex string that is not valid hex at all. Wrong *lengths* are
/// passed through so the registry reports them as its own hash error.
fn decode_hash(hash: &str) -> Result<Vec<u8>, (StatusCode, Json<ErrorResponse>)> {
    hashing::from_hex(hash).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                kind: "invalid_hash".to_string(),
                error: format!("hash is not valid hex: {}", e),
            }),
        )
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health` — returns 200 if the node is alive.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status` — node and registry status summary.
async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry.read().await;
    let resp = StatusResponse {
        version: state.version.clone(),
        transcript_count: registry.count(),
        ledger_height: state.height.load(Ordering::Relaxed),
        issuance_fee: registry.config().issuance_fee,
        fee_recipient: registry
            .config()
            .fee_recipient
            .as_ref()
            .map(|a| a.to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };
    Json(resp)
}

/// `POST /transcripts` — issue a new transcript.
///
/// On success returns 201 with the new identifier and the fee that moved.
async fn issue_handler(
    State(state): State<AppState>,
    Json(body): Json<IssueBody>,
) -> impl IntoResponse {
    let timer = state.metrics.issuance_latency_seconds.start_timer();

    let hash = match decode_hash(&body.hash) {
        Ok(h) => h,
        Err(rejection) => {
            state.metrics.operations_rejected_total.inc();
            return rejection.into_response();
        }
    };

    let req = IssueRequest {
        student: Address::from(body.student),
        hash,
        gpa: body.gpa,
        courses: body.courses,
        degree: body.degree,
        major: body.major,
        institution: body.institution,
        graduation_date: body.graduation_date,
        credits: body.credits,
        location: body.location,
    };
    let issuer = Address::from(body.issuer);
    let now = state.height.load(Ordering::Relaxed);

    let mut registry = state.registry.write().await;
    let fee = registry.config().issuance_fee;
    match registry.issue(req, &issuer, now) {
        Ok(id) => {
            state.metrics.transcripts_issued_total.inc();
            state.metrics.fees_collected_total.inc_by(fee);
            state.metrics.transcript_count.set(registry.count() as i64);
            drop(registry);
            timer.observe_duration();
            (StatusCode::CREATED, Json(IssueResponse { id, fee })).into_response()
        }
        Err(e) => {
            state.metrics.operations_rejected_total.inc();
            tracing::debug!(kind = error_kind(&e), "issuance rejected");
            error_response(&e).into_response()
        }
    }
}

/// `GET /transcripts/:id` — transcript by id. 404 when absent.
async fn get_transcript_handler(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let registry = state.registry.read().await;
    match registry.get(id) {
        Some(transcript) => (StatusCode::OK, Json(transcript.clone())).into_response(),
        None => error_response(&RegistryError::NotFound(id)).into_response(),
    }
}

/// `PATCH /transcripts/:id` — amend GPA and course list.
async fn update_handler(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Json(body): Json<UpdateBody>,
) -> impl IntoResponse {
    let updater = Address::from(body.updater);
    let now = state.height.load(Ordering::Relaxed);

    let mut registry = state.registry.write().await;
    match registry.update(id, body.gpa, body.courses, &updater, now) {
        Ok(()) => {
            state.metrics.transcript_updates_total.inc();
            match registry.get(id) {
                Some(transcript) => (StatusCode::OK, Json(transcript.clone())).into_response(),
                None => error_response(&RegistryError::NotFound(id)).into_response(),
            }
        }
        Err(e) => {
            state.metrics.operations_rejected_total.inc();
            error_response(&e).into_response()
        }
    }
}

/// `GET /transcripts/:id/update` — the single latest amendment record.
/// 404 if the transcript has never been amended (or does not exist).
async fn latest_update_handler(
    Path(id): Path<u64>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let registry = state.registry.read().await;
    match registry.latest_update(id) {
        Some(update) => (StatusCode::OK, Json(update.clone())).into_response(),
        None => error_response(&RegistryError::NotFound(id)).into_response(),
    }
}

/// `POST /transcripts/:id/verify` — byte-for-byte hash check.
async fn verify_handler(
    Path(id): Path<u64>,
    State(state): State<AppState>,
    Json(body): Json<VerifyBody>,
) -> impl IntoResponse {
    let candidate = match decode_hash(&body.hash) {
        Ok(h) => h,
        Err(rejection) => return rejection.into_response(),
    };

    let registry = state.registry.read().await;
    match registry.verify_hash(id, &candidate) {
        Ok(matches) => (StatusCode::OK, Json(VerifyResponse { id, matches })).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// `GET /transcripts/count` — the identifier counter.
async fn count_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.registry.read().await;
    Json(CountResponse {
        count: registry.count(),
    })
}

/// `GET /students/:address/transcripts` — ids issued to a student, in
/// issuance order. Empty list (not 404) for an unknown student.
async fn student_handler(
    Path(address): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let registry = state.registry.read().await;
    let ids = registry
        .transcripts_for_student(&Address::from(address))
        .to_vec();
    Json(ids)
}

/// `GET /ledger/transfers` — every fee transfer performed so far.
async fn transfers_handler(State(state): State<AppState>) -> impl IntoResponse {
    let transfers: Vec<TransferRecord> = state.ledger.transfers();
    Json(transfers)
}

/// `POST /admin/fee-recipient` — one-time fee recipient setup.
async fn set_fee_recipient_handler(
    State(state): State<AppState>,
    Json(body): Json<FeeRecipientBody>,
) -> impl IntoResponse {
    let mut registry = state.registry.write().await;
    match registry.set_fee_recipient(Address::from(body.recipient)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            state.metrics.operations_rejected_total.inc();
            error_response(&e).into_response()
        }
    }
}

/// `POST /admin/fee` — change the issuance fee for subsequent issuances.
async fn set_fee_handler(
    State(state): State<AppState>,
    Json(body): Json<FeeBody>,
) -> impl IntoResponse {
    let mut registry = state.registry.write().await;
    match registry.set_issuance_fee(body.fee) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            state.metrics.operations_rejected_total.inc();
            error_response(&e).into_response()
        }
    }
}

/// `POST /admin/issuers` — grant issuance rights to an address.
async fn add_issuer_handler(
    State(state): State<AppState>,
    Json(body): Json<IssuerBody>,
) -> impl IntoResponse {
    let mut registry = state.registry.write().await;
    let added = registry.add_issuer(Address::from(body.issuer));
    Json(serde_json::json!({ "added": added }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
