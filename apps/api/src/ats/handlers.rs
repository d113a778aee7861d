use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ats::analyzer::{analyze, recompute};
use crate::ats::apply::{apply_all, apply_one};
use crate::ats::keywords::{extract_keywords, KeywordSet};
use crate::errors::AppError;
use crate::models::ats::{AnalysisMode, AtsResult};
use crate::models::resume::ResumeSnapshot;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct KeywordsRequest {
    #[serde(default)]
    pub job_text: String,
}

#[derive(Serialize)]
pub struct KeywordsResponse {
    pub keywords: KeywordSet,
    pub general_mode: bool,
}

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub resume: ResumeSnapshot,
    #[serde(default)]
    pub job_text: String,
    /// Defaults to with-jd when job text is present.
    pub mode: Option<AnalysisMode>,
}

#[derive(Deserialize)]
pub struct ApplyRequest {
    pub result: AtsResult,
    pub improvement_id: Uuid,
    pub resume: ResumeSnapshot,
    /// Only read when `ATS_RECOMPUTE_ON_APPLY` is set.
    #[serde(default)]
    pub job_text: String,
}

#[derive(Deserialize)]
pub struct ApplyAllRequest {
    pub result: AtsResult,
    pub resume: ResumeSnapshot,
    #[serde(default)]
    pub job_text: String,
}

#[derive(Deserialize)]
pub struct RecomputeRequest {
    pub result: AtsResult,
    pub resume: ResumeSnapshot,
    #[serde(default)]
    pub job_text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub resume: ResumeSnapshot,
    pub result: AtsResult,
}

/// POST /api/v1/ats/keywords
pub async fn handle_keywords(
    payload: Result<Json<KeywordsRequest>, JsonRejection>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let Json(req) = payload?;
    let keywords = extract_keywords(&req.job_text);
    let general_mode = keywords.is_general_mode();
    Ok(Json(KeywordsResponse {
        keywords,
        general_mode,
    }))
}

/// POST /api/v1/ats/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AtsResult>, AppError> {
    let Json(req) = payload?;
    let mode = req.mode.unwrap_or(if req.job_text.trim().is_empty() {
        AnalysisMode::WithoutJd
    } else {
        AnalysisMode::WithJd
    });
    let mut rng = state.fill_rng();
    Ok(Json(analyze(&req.resume, &req.job_text, mode, &mut rng)))
}

/// POST /api/v1/ats/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    payload: Result<Json<ApplyRequest>, JsonRejection>,
) -> Result<Json<ApplyResponse>, AppError> {
    let Json(req) = payload?;
    let (resume, result) = apply_one(&req.result, req.improvement_id, &req.resume);
    let result = maybe_reconcile(&state, result, &resume, &req.job_text);
    Ok(Json(ApplyResponse { resume, result }))
}

/// POST /api/v1/ats/apply-all
pub async fn handle_apply_all(
    State(state): State<AppState>,
    payload: Result<Json<ApplyAllRequest>, JsonRejection>,
) -> Result<Json<ApplyResponse>, AppError> {
    let Json(req) = payload?;
    let (resume, result) = apply_all(&req.result, &req.resume).await;
    let result = maybe_reconcile(&state, result, &resume, &req.job_text);
    Ok(Json(ApplyResponse { resume, result }))
}

/// POST /api/v1/ats/recompute
pub async fn handle_recompute(
    payload: Result<Json<RecomputeRequest>, JsonRejection>,
) -> Result<Json<AtsResult>, AppError> {
    let Json(req) = payload?;
    Ok(Json(recompute(&req.result, &req.resume, &req.job_text)))
}

/// With `ATS_RECOMPUTE_ON_APPLY`, replaces the patched score with a real one.
/// A with-jd result is only reconciled when the job text came along, otherwise
/// the recompute would silently fall back to general mode.
fn maybe_reconcile(
    state: &AppState,
    result: AtsResult,
    resume: &ResumeSnapshot,
    job_text: &str,
) -> AtsResult {
    let has_context = result.mode == AnalysisMode::WithoutJd || !job_text.trim().is_empty();
    if state.config.recompute_on_apply && result.patched && has_context {
        recompute(&result, resume, job_text)
    } else {
        result
    }
}
