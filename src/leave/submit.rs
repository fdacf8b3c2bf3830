use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use super::balance::{Provenance, check_balance, resolve_balance, resolve_card_backed};
use super::error::LeaveError;
use super::monetization::{parse_credits, validate_monetization};
use super::registry::{DefaultEntitlements, LeaveType};
use super::store::{LeaveStore, NewLeaveApplication};
use crate::model::employee::Employee;
use crate::model::leave_application::{LeaveApplication, to_half_open};

/// Full filing payload. Which fields are required depends on the leave
/// type: monetization needs the monetization block; every other type
/// needs the inclusive date range and day count.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LeaveApplicationRequest {
    /// External user identifier of the filer.
    #[schema(example = "user_2abc")]
    pub user_id: String,
    #[schema(example = "Vacation Leave")]
    pub leave_type: String,
    #[schema(example = 21000.0, nullable = true)]
    pub salary: Option<f64>,
    #[schema(example = "2026-02-20", format = "date", value_type = String, nullable = true)]
    pub date_filing: Option<NaiveDate>,
    pub subtype: Option<String>,
    pub country: Option<String>,
    pub details: Option<String>,
    #[schema(example = "2026-03-01", format = "date", value_type = String, nullable = true)]
    pub date_from: Option<NaiveDate>,
    #[schema(example = "2026-03-05", format = "date", value_type = String, nullable = true)]
    pub date_to: Option<NaiveDate>,
    #[schema(example = 5.0, nullable = true)]
    pub number_of_days: Option<f64>,
    pub commutation_requested: Option<bool>,
    pub attachment: Option<String>,
    /// Required for every leave type.
    #[schema(example = "https://files.example/sig.png", nullable = true)]
    pub signature_url: Option<String>,
    pub monetization_reason: Option<String>,
    pub monetization_amount: Option<f64>,
    /// Free-text credits descriptor, e.g. "5 days VL, 2 days SL".
    #[schema(example = "5 days VL, 2 days SL", nullable = true)]
    pub leave_credits_monetized: Option<String>,
    #[serde(default)]
    pub is_separation_reason: bool,
}

#[derive(Debug)]
pub struct SubmittedLeave {
    pub application: LeaveApplication,
    /// Balance summary echoed back in the success response.
    pub balance_message: String,
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, LeaveError> {
    value.ok_or(LeaveError::MissingRequiredField(field))
}

fn require_text(value: Option<&String>, field: &'static str) -> Result<String, LeaveError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s.clone()),
        _ => Err(LeaveError::MissingRequiredField(field)),
    }
}

/// Validates and records one leave filing.
///
/// Balance is checked but never reserved or decremented here; deduction
/// happens only at approval settlement, so the check is advisory and two
/// concurrent filings can both pass against the same balance.
pub async fn submit_leave<S: LeaveStore>(
    store: &S,
    defaults: &DefaultEntitlements,
    request: &LeaveApplicationRequest,
    today: NaiveDate,
) -> Result<SubmittedLeave, LeaveError> {
    let employee = store
        .employee_by_external_id(&request.user_id)
        .await?
        .ok_or(LeaveError::EmployeeNotFound)?;

    if request
        .signature_url
        .as_deref()
        .is_none_or(|s| s.trim().is_empty())
    {
        return Err(LeaveError::SignatureRequired);
    }

    let leave_type = LeaveType::from_name(&request.leave_type)
        .ok_or_else(|| LeaveError::InvalidLeaveType(request.leave_type.clone()))?;

    let filing = if leave_type.is_monetization() {
        validate_monetized_filing(store, request, &employee).await?
    } else {
        validate_dated_filing(store, defaults, request, &employee, leave_type, today).await?
    };

    let date_filing = request.date_filing.unwrap_or(today);
    let record = NewLeaveApplication {
        user_id: request.user_id.clone(),
        first_name: employee.first_name.clone(),
        middle_name: employee.middle_name.clone(),
        last_name: employee.last_name.clone(),
        office_department: employee.department.clone(),
        position: employee.position.clone(),
        salary: request.salary,
        date_filing,
        leave_type: leave_type.to_string(),
        subtype: request.subtype.clone(),
        country: request.country.clone(),
        details: request.details.clone(),
        inclusive_dates: filing.inclusive_dates,
        number_of_days: filing.number_of_days,
        commutation_requested: request.commutation_requested,
        attachment: request.attachment.clone(),
        signature_url: request.signature_url.clone(),
        monetization_reason: filing.monetization_reason,
        monetization_amount: request.monetization_amount,
        leave_credits_monetized: filing.leave_credits_monetized,
    };

    let notification = format!(
        "{} {} filed a {} leave on {}",
        employee.first_name, employee.last_name, leave_type, date_filing
    );
    let application = store.insert_application(record, &notification).await?;

    info!(
        application_id = application.id,
        user_id = %application.user_id,
        leave_type = %application.leave_type,
        "leave application filed"
    );

    Ok(SubmittedLeave {
        application,
        balance_message: filing.balance_message,
    })
}

struct ValidatedFiling {
    inclusive_dates: Option<sqlx::postgres::types::PgRange<NaiveDate>>,
    number_of_days: f64,
    monetization_reason: Option<String>,
    leave_credits_monetized: Option<String>,
    balance_message: String,
}

/// Date-ranged branch: required range fields, then the shared resolver
/// and sufficiency check. A card-backed type with no card at all is a
/// hard rejection here, unlike the advisory balance-check endpoint.
async fn validate_dated_filing<S: LeaveStore>(
    store: &S,
    defaults: &DefaultEntitlements,
    request: &LeaveApplicationRequest,
    employee: &Employee,
    leave_type: LeaveType,
    today: NaiveDate,
) -> Result<ValidatedFiling, LeaveError> {
    let date_from = require(request.date_from, "date_from")?;
    let date_to = require(request.date_to, "date_to")?;
    let number_of_days = require(request.number_of_days, "number_of_days")?;

    if date_from > date_to {
        return Err(LeaveError::InvalidDateRange);
    }

    let resolved = resolve_balance(store, defaults, employee.id, leave_type, today.year()).await?;
    if resolved.provenance == Provenance::None {
        return Err(LeaveError::NoBalanceRecord);
    }

    let verdict = check_balance(leave_type, &resolved, number_of_days);
    if !verdict.sufficient {
        return Err(LeaveError::InsufficientBalance {
            available: verdict.available,
            requested: number_of_days,
            message: verdict.message,
        });
    }

    let inclusive_dates = to_half_open(date_from, date_to).ok_or(LeaveError::InvalidDateRange)?;

    Ok(ValidatedFiling {
        inclusive_dates: Some(inclusive_dates),
        number_of_days,
        monetization_reason: None,
        leave_credits_monetized: None,
        balance_message: verdict.message,
    })
}

/// Monetization branch: the parsed descriptor total overrides any
/// caller-supplied day count, no date range applies, and only the VL
/// sub-amount is checked (against the card, never entitlements).
async fn validate_monetized_filing<S: LeaveStore>(
    store: &S,
    request: &LeaveApplicationRequest,
    employee: &Employee,
) -> Result<ValidatedFiling, LeaveError> {
    let monetization_reason =
        require_text(request.monetization_reason.as_ref(), "monetization_reason")?;
    let descriptor = require_text(
        request.leave_credits_monetized.as_ref(),
        "leave_credits_monetized",
    )?;
    require(request.salary, "salary")?;

    let credits = parse_credits(&descriptor);

    let card = store.latest_leave_card(employee.id).await?;
    let vl_balance = resolve_card_backed(LeaveType::Vacation, card.as_ref());
    validate_monetization(&credits, request.is_separation_reason, &vl_balance)?;

    Ok(ValidatedFiling {
        inclusive_dates: None,
        number_of_days: credits.total_days,
        monetization_reason: Some(monetization_reason),
        leave_credits_monetized: Some(descriptor),
        balance_message: format!("Leave credits to monetize: {} days", credits.total_days),
    })
}
