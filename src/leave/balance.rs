use serde::Serialize;
use strum_macros::Display;
use utoipa::ToSchema;

use super::error::LeaveError;
use super::registry::{DefaultEntitlements, LeaveType};
use super::store::LeaveStore;
use crate::model::leave_card::LeaveCard;
use crate::model::leave_entitlement::LeaveEntitlement;

/// Where a resolved balance came from. "No card" and "zero balance" must
/// produce different user-facing messages, so the tag travels with the
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Latest leave card (VL/SL).
    Card,
    /// Entitlement row for the current year.
    Entitlement,
    /// Static default table; non-authoritative.
    Default,
    /// No card exists at all.
    None,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBalance {
    pub days: f64,
    pub provenance: Provenance,
}

/// Card-backed resolution for Vacation/Sick Leave. The latest card is
/// authoritative; absence of any card is `Provenance::None`, not zero.
pub fn resolve_card_backed(leave_type: LeaveType, card: Option<&LeaveCard>) -> ResolvedBalance {
    match card {
        Some(card) => {
            let days = if leave_type == LeaveType::Sick {
                card.sl_balance
            } else {
                card.vl_balance
            };
            ResolvedBalance {
                days,
                provenance: Provenance::Card,
            }
        }
        None => ResolvedBalance {
            days: 0.0,
            provenance: Provenance::None,
        },
    }
}

/// Entitlement-backed resolution for every other leave type. A missing
/// row falls back to the default table for the code.
pub fn resolve_entitlement_backed(
    leave_type: LeaveType,
    entitlement: Option<&LeaveEntitlement>,
    defaults: &DefaultEntitlements,
) -> ResolvedBalance {
    match entitlement {
        Some(row) => ResolvedBalance {
            days: row.balance_days(),
            provenance: Provenance::Entitlement,
        },
        None => ResolvedBalance {
            days: defaults.days_for(leave_type.code()),
            provenance: Provenance::Default,
        },
    }
}

/// Single resolution path shared by the balance-check and filing flows.
pub async fn resolve_balance<S: LeaveStore>(
    store: &S,
    defaults: &DefaultEntitlements,
    employee_id: i64,
    leave_type: LeaveType,
    year: i32,
) -> Result<ResolvedBalance, LeaveError> {
    if leave_type.is_card_backed() {
        let card = store.latest_leave_card(employee_id).await?;
        Ok(resolve_card_backed(leave_type, card.as_ref()))
    } else {
        let entitlement = store
            .find_entitlement(employee_id, leave_type.code(), year)
            .await?;
        Ok(resolve_entitlement_backed(
            leave_type,
            entitlement.as_ref(),
            defaults,
        ))
    }
}

/// Sufficiency verdict with the client-facing message. Pure; no
/// persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceVerdict {
    pub sufficient: bool,
    pub available: f64,
    pub message: String,
}

pub fn check_balance(
    leave_type: LeaveType,
    resolved: &ResolvedBalance,
    requested_days: f64,
) -> BalanceVerdict {
    if resolved.provenance == Provenance::None {
        return BalanceVerdict {
            sufficient: false,
            available: 0.0,
            message: "No leave balance record found".to_string(),
        };
    }

    let available = resolved.days;
    let sufficient = available >= requested_days;

    let message = if leave_type.is_card_backed() {
        // VL/SL credits accrue in fractions, so three decimals.
        let code = leave_type.code();
        if sufficient {
            format!("Available {code} credits: {available:.3} days")
        } else {
            format!(
                "Insufficient {code} credits. Available: {available:.3} days, Required: {requested_days} days"
            )
        }
    } else {
        let suffix = if resolved.provenance == Provenance::Default {
            " (default)"
        } else {
            ""
        };
        if sufficient {
            format!("Available {leave_type}: {available} days{suffix}")
        } else {
            format!(
                "Insufficient {leave_type}. Available: {available} days{suffix}, Required: {requested_days} days"
            )
        }
    };

    BalanceVerdict {
        sufficient,
        available,
        message,
    }
}

/// requested-days pre-check shared surface: resolve then judge. The "no
/// card" case is a non-error `sufficient = false` verdict here; the filing
/// path hardens it into a rejection.
pub async fn check_requested_balance<S: LeaveStore>(
    store: &S,
    defaults: &DefaultEntitlements,
    user_id: &str,
    leave_type_name: &str,
    requested_days: f64,
    year: i32,
) -> Result<(LeaveType, ResolvedBalance, BalanceVerdict), LeaveError> {
    let employee = store
        .employee_by_external_id(user_id)
        .await?
        .ok_or(LeaveError::EmployeeNotFound)?;

    let leave_type = LeaveType::from_name(leave_type_name)
        .ok_or_else(|| LeaveError::InvalidLeaveType(leave_type_name.to_string()))?;

    let resolved = resolve_balance(store, defaults, employee.id, leave_type, year).await?;
    let verdict = check_balance(leave_type, &resolved, requested_days);
    Ok((leave_type, resolved, verdict))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(vl: f64, sl: f64) -> LeaveCard {
        LeaveCard {
            id: 10,
            employee_id: 1,
            vl_balance: vl,
            sl_balance: sl,
        }
    }

    fn entitlement(code: &str, total: f64, used: f64) -> LeaveEntitlement {
        LeaveEntitlement {
            id: 1,
            employee_id: 1,
            leave_type: code.to_string(),
            year: 2026,
            total_days: total,
            used_days: used,
        }
    }

    #[test]
    fn vacation_reads_vl_and_sick_reads_sl() {
        let card = card(12.5, 3.0);
        let vl = resolve_card_backed(LeaveType::Vacation, Some(&card));
        let sl = resolve_card_backed(LeaveType::Sick, Some(&card));
        assert_eq!(vl.days, 12.5);
        assert_eq!(sl.days, 3.0);
        assert_eq!(vl.provenance, Provenance::Card);
    }

    #[test]
    fn missing_card_is_tagged_none_not_zero_balance() {
        let resolved = resolve_card_backed(LeaveType::Vacation, None);
        assert_eq!(resolved.provenance, Provenance::None);
        assert_eq!(resolved.days, 0.0);
    }

    #[test]
    fn entitlement_balance_is_total_minus_used() {
        let defaults = DefaultEntitlements::standard();
        let row = entitlement("SPL", 3.0, 1.0);
        let resolved = resolve_entitlement_backed(LeaveType::SpecialPrivilege, Some(&row), &defaults);
        assert_eq!(resolved.days, 2.0);
        assert_eq!(resolved.provenance, Provenance::Entitlement);
    }

    #[test]
    fn missing_entitlement_falls_back_to_defaults() {
        let defaults = DefaultEntitlements::standard();
        let mat = resolve_entitlement_backed(LeaveType::Maternity, None, &defaults);
        assert_eq!(mat.days, 105.0);
        assert_eq!(mat.provenance, Provenance::Default);

        let tl = resolve_entitlement_backed(LeaveType::Terminal, None, &defaults);
        assert_eq!(tl.days, 0.0);
    }

    #[test]
    fn card_sufficiency_boundary() {
        let card = card(5.0, 0.0);
        let resolved = resolve_card_backed(LeaveType::Vacation, Some(&card));

        let at_limit = check_balance(LeaveType::Vacation, &resolved, 5.0);
        assert!(at_limit.sufficient);
        assert_eq!(at_limit.message, "Available VL credits: 5.000 days");

        let over = check_balance(LeaveType::Vacation, &resolved, 6.0);
        assert!(!over.sufficient);
        assert_eq!(over.available, 5.0);
        assert_eq!(
            over.message,
            "Insufficient VL credits. Available: 5.000 days, Required: 6 days"
        );
    }

    #[test]
    fn no_card_verdict_has_distinct_wording() {
        let resolved = resolve_card_backed(LeaveType::Vacation, None);
        let verdict = check_balance(LeaveType::Vacation, &resolved, 2.0);
        assert!(!verdict.sufficient);
        assert_eq!(verdict.available, 0.0);
        assert_eq!(verdict.message, "No leave balance record found");
    }

    #[test]
    fn default_provenance_is_called_out_in_the_message() {
        let defaults = DefaultEntitlements::standard();
        let resolved = resolve_entitlement_backed(LeaveType::Maternity, None, &defaults);
        let verdict = check_balance(LeaveType::Maternity, &resolved, 10.0);
        assert!(verdict.sufficient);
        assert_eq!(
            verdict.message,
            "Available Maternity Leave: 105 days (default)"
        );

        let resolved = resolve_entitlement_backed(LeaveType::Bereavement, None, &defaults);
        let verdict = check_balance(LeaveType::Bereavement, &resolved, 1.0);
        assert!(!verdict.sufficient);
        assert_eq!(
            verdict.message,
            "Insufficient Bereavement Leave. Available: 0 days (default), Required: 1 days"
        );
    }

    #[test]
    fn entitlement_provenance_has_no_default_suffix() {
        let defaults = DefaultEntitlements::standard();
        let row = entitlement("PAT", 7.0, 0.0);
        let resolved = resolve_entitlement_backed(LeaveType::Paternity, Some(&row), &defaults);
        let verdict = check_balance(LeaveType::Paternity, &resolved, 3.0);
        assert_eq!(verdict.message, "Available Paternity Leave: 7 days");
    }
}
