use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::leave::approval::{ApprovalState, OverallStatus, Stage, StageStatus};
use crate::leave::balance::{Provenance, check_requested_balance};
use crate::leave::error::LeaveError;
use crate::leave::history::{LeaveHistoryEntry, format_application};
use crate::leave::registry::{DefaultEntitlements, LeaveType};
use crate::leave::store::{ApprovalUpdate, LeaveStore, PgStore};
use crate::leave::submit::{LeaveApplicationRequest, submit_leave};

#[derive(Deserialize, ToSchema)]
pub struct CheckBalanceRequest {
    #[schema(example = "user_2abc")]
    pub user_id: String,
    #[schema(example = "Vacation Leave")]
    pub leave_type: String,
    #[schema(example = 3.0)]
    pub number_of_days: f64,
}

#[derive(Serialize, ToSchema)]
pub struct CheckBalanceResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = true)]
    pub can_apply: bool,
    #[schema(example = 12.5)]
    pub available_balance: f64,
    #[schema(example = 3.0)]
    pub requested_days: f64,
    #[schema(example = "Vacation Leave")]
    pub leave_type: String,
    /// Where the balance came from: card, entitlement, default or none.
    pub provenance: Provenance,
    #[schema(example = "Available VL credits: 12.500 days")]
    pub message: String,
    #[schema(example = false)]
    pub requires_confirmation: bool,
}

/* =========================
Check leave balance (advisory pre-check, no persistence)
========================= */
#[utoipa::path(
    post,
    path = "/api/leave/check-balance",
    request_body = CheckBalanceRequest,
    responses(
        (status = 200, description = "Sufficiency verdict with client-facing message", body = CheckBalanceResponse),
        (status = 400, description = "Unknown leave type"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Leave"
)]
pub async fn check_balance(
    store: web::Data<PgStore>,
    defaults: web::Data<DefaultEntitlements>,
    payload: web::Json<CheckBalanceRequest>,
) -> Result<impl Responder, LeaveError> {
    let year = Utc::now().date_naive().year();
    let (leave_type, resolved, verdict) = check_requested_balance(
        store.get_ref(),
        defaults.get_ref(),
        &payload.user_id,
        &payload.leave_type,
        payload.number_of_days,
        year,
    )
    .await?;

    Ok(HttpResponse::Ok().json(CheckBalanceResponse {
        success: true,
        can_apply: verdict.sufficient,
        available_balance: verdict.available,
        requested_days: payload.number_of_days,
        leave_type: leave_type.to_string(),
        provenance: resolved.provenance,
        message: verdict.message,
        requires_confirmation: !verdict.sufficient,
    }))
}

/* =========================
Apply for leave
========================= */
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body(
        content = LeaveApplicationRequest,
        description = "Leave filing payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave application filed in Pending state", body = Object,
         example = json!({
            "success": true,
            "message": "Leave application submitted successfully. Available VL credits: 10.000 days"
         })
        ),
        (status = 400, description = "Validation rejection with structured reason"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Leave"
)]
pub async fn apply_leave(
    store: web::Data<PgStore>,
    defaults: web::Data<DefaultEntitlements>,
    payload: web::Json<LeaveApplicationRequest>,
) -> Result<impl Responder, LeaveError> {
    let today = Utc::now().date_naive();
    let submitted = submit_leave(store.get_ref(), defaults.get_ref(), &payload, today).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": format!(
            "Leave application submitted successfully. {}",
            submitted.balance_message
        ),
        "application": format_application(&submitted.application),
    })))
}

/* =========================
Leave history
========================= */
#[utoipa::path(
    get,
    path = "/api/leave/{user_id}",
    params(
        ("user_id" = String, Path, description = "External user id of the filer")
    ),
    responses(
        (status = 200, description = "Applications, most recent filing first", body = [LeaveHistoryEntry]),
        (status = 404, description = "No leave applications found")
    ),
    tag = "Leave"
)]
pub async fn leave_history(
    store: web::Data<PgStore>,
    path: web::Path<String>,
) -> Result<impl Responder, LeaveError> {
    let user_id = path.into_inner();
    let applications = store.applications_for_user(&user_id).await?;

    if applications.is_empty() {
        return Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "No leave applications found"
        })));
    }

    let history: Vec<LeaveHistoryEntry> =
        applications.iter().map(format_application).collect();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "history": history
    })))
}

#[derive(Deserialize, ToSchema)]
pub struct DecisionRequest {
    /// Stage acting on the application.
    #[schema(example = "hr")]
    pub stage: Stage,
    /// Approved or Rejected.
    #[schema(example = "Approved")]
    pub decision: StageStatus,
    #[schema(example = "Maria Reyes", nullable = true)]
    pub approver_name: Option<String>,
    #[schema(example = "Supporting documents incomplete", nullable = true)]
    pub remarks: Option<String>,
}

/* =========================
Record an approval-stage decision
========================= */
#[utoipa::path(
    put,
    path = "/api/leave/{id}/decision",
    params(
        ("id" = i64, Path, description = "Leave application id")
    ),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Stage decision recorded", body = Object, example = json!({
            "success": true,
            "message": "hr decision recorded",
            "status": "Pending"
        })),
        (status = 400, description = "Transition refused (out of order, already decided, or workflow final)"),
        (status = 404, description = "Leave application not found")
    ),
    tag = "Leave"
)]
pub async fn decide_leave(
    store: web::Data<PgStore>,
    path: web::Path<i64>,
    payload: web::Json<DecisionRequest>,
) -> Result<impl Responder, LeaveError> {
    let id = path.into_inner();

    let Some(application) = store.application_by_id(id).await? else {
        return Ok(HttpResponse::NotFound().json(json!({
            "success": false,
            "message": "Leave application not found"
        })));
    };

    let today = Utc::now().date_naive();
    let mut state = ApprovalState::from_application(&application);
    let overall = match state.decide(payload.stage, payload.decision, today) {
        Ok(overall) => overall,
        Err(refusal) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": refusal.to_string()
            })));
        }
    };

    // Terminal decisions also stamp the closing approver block.
    let terminal = !matches!(overall, OverallStatus::Pending);
    let update = ApprovalUpdate {
        office_head_status: state.office_head.status.to_string(),
        office_head_date: state.office_head.date,
        hr_status: state.hr.status.to_string(),
        hr_date: state.hr.date,
        mayor_status: state.mayor.status.to_string(),
        mayor_date: state.mayor.date,
        status: overall.to_string(),
        approver_name: terminal.then(|| payload.approver_name.clone()).flatten(),
        approver_date: terminal.then_some(today),
        remarks: payload.remarks.clone(),
    };
    store.update_approval(id, update).await?;

    info!(
        application_id = id,
        stage = %payload.stage,
        decision = %payload.decision,
        status = %overall,
        "approval stage decision recorded"
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("{} decision recorded", payload.stage),
        "status": overall
    })))
}

#[derive(Serialize, ToSchema)]
pub struct EntitlementView {
    #[schema(example = "VL")]
    pub leave_type: String,
    #[schema(example = "Vacation Leave")]
    pub type_name: String,
    #[schema(example = 12.5)]
    pub balance_days: f64,
    #[schema(example = 3.0, nullable = true)]
    pub total_days: Option<f64>,
}

/* =========================
Entitlement summary (VL/SL card plus entitlement rows)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave/entitlements/{employee_id}",
    params(
        ("employee_id" = i64, Path, description = "Internal employee id")
    ),
    responses(
        (status = 200, description = "Balance rows per leave type", body = [EntitlementView]),
        (status = 404, description = "Employee not found")
    ),
    tag = "Leave"
)]
pub async fn entitlement_summary(
    store: web::Data<PgStore>,
    path: web::Path<i64>,
) -> Result<impl Responder, LeaveError> {
    let employee_id = path.into_inner();

    store
        .employee_by_id(employee_id)
        .await?
        .ok_or(LeaveError::EmployeeNotFound)?;

    let mut rows = Vec::new();

    if let Some(card) = store.latest_leave_card(employee_id).await? {
        rows.push(EntitlementView {
            leave_type: "VL".into(),
            type_name: LeaveType::Vacation.to_string(),
            balance_days: card.vl_balance,
            total_days: None,
        });
        rows.push(EntitlementView {
            leave_type: "SL".into(),
            type_name: LeaveType::Sick.to_string(),
            balance_days: card.sl_balance,
            total_days: None,
        });
    }

    for entitlement in store.entitlement_rows(employee_id).await? {
        let type_name = LeaveType::from_code(&entitlement.leave_type)
            .map(|ty| ty.to_string())
            .unwrap_or_else(|| entitlement.leave_type.clone());
        rows.push(EntitlementView {
            leave_type: entitlement.leave_type.clone(),
            type_name,
            balance_days: entitlement.balance_days(),
            total_days: Some(entitlement.total_days),
        });
    }

    Ok(HttpResponse::Ok().json(rows))
}
