use once_cell::sync::Lazy;
use regex::Regex;

use super::balance::{Provenance, ResolvedBalance};
use super::error::LeaveError;

static NUMERIC_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

// Matches the VL sub-amount in descriptors like "5 days VL, 2 days SL".
static VL_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:days?)?\s*VL\b").unwrap());

/// Day totals extracted from the free-text "credits to monetize"
/// descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MonetizedCredits {
    /// Sum of every numeric token; becomes the application's
    /// `number_of_days` regardless of what the caller supplied.
    pub total_days: f64,
    /// VL-specific sub-amount, when the descriptor names one.
    pub vl_days: Option<f64>,
}

/// Parses a descriptor such as "5 days VL, 2 days SL". A descriptor with
/// no numeric tokens yields 0 days, which is accepted as a filing
/// (observed behaviour, kept pending product clarification).
pub fn parse_credits(descriptor: &str) -> MonetizedCredits {
    let total_days = NUMERIC_TOKEN
        .find_iter(descriptor)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .sum();

    let vl_days = VL_AMOUNT
        .captures(descriptor)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok());

    MonetizedCredits {
        total_days,
        vl_days,
    }
}

/// Verifies the VL sub-amount against the current VL card balance.
/// Skipped entirely when the monetization reason is separation from
/// service. Monetization never consults entitlements or defaults.
pub fn validate_monetization(
    credits: &MonetizedCredits,
    is_separation_reason: bool,
    vl_balance: &ResolvedBalance,
) -> Result<(), LeaveError> {
    if is_separation_reason {
        return Ok(());
    }

    if let Some(vl_days) = credits.vl_days {
        let available = if vl_balance.provenance == Provenance::None {
            0.0
        } else {
            vl_balance.days
        };
        if vl_days > available {
            return Err(LeaveError::InsufficientMonetizationBalance {
                available,
                requested: vl_days,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vl(days: f64) -> ResolvedBalance {
        ResolvedBalance {
            days,
            provenance: Provenance::Card,
        }
    }

    #[test]
    fn sums_every_numeric_token() {
        let credits = parse_credits("5 days VL, 2 days SL");
        assert_eq!(credits.total_days, 7.0);
        assert_eq!(credits.vl_days, Some(5.0));
    }

    #[test]
    fn fractional_tokens_are_summed() {
        let credits = parse_credits("2.5 VL and 1.25 SL");
        assert_eq!(credits.total_days, 3.75);
        assert_eq!(credits.vl_days, Some(2.5));
    }

    #[test]
    fn vl_match_is_case_insensitive() {
        assert_eq!(parse_credits("10 vl").vl_days, Some(10.0));
        assert_eq!(parse_credits("10 Days Vl").vl_days, Some(10.0));
    }

    #[test]
    fn sl_only_descriptor_has_no_vl_amount() {
        let credits = parse_credits("3 days SL");
        assert_eq!(credits.total_days, 3.0);
        assert_eq!(credits.vl_days, None);
    }

    #[test]
    fn empty_descriptor_yields_zero_days() {
        let credits = parse_credits("all remaining credits");
        assert_eq!(credits.total_days, 0.0);
        assert_eq!(credits.vl_days, None);
        // 0-day total is accepted, not an error
        assert!(validate_monetization(&credits, false, &vl(3.0)).is_ok());
    }

    #[test]
    fn vl_shortfall_is_rejected() {
        let credits = parse_credits("5 days VL, 2 days SL");
        let err = validate_monetization(&credits, false, &vl(3.0)).unwrap_err();
        match err {
            LeaveError::InsufficientMonetizationBalance {
                available,
                requested,
            } => {
                assert_eq!(available, 3.0);
                assert_eq!(requested, 5.0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sufficient_vl_passes() {
        let credits = parse_credits("5 days VL, 2 days SL");
        assert!(validate_monetization(&credits, false, &vl(6.0)).is_ok());
    }

    #[test]
    fn separation_reason_skips_the_vl_check() {
        let credits = parse_credits("30 days VL");
        assert!(validate_monetization(&credits, true, &vl(0.0)).is_ok());
    }

    #[test]
    fn missing_card_counts_as_zero_for_the_vl_check() {
        let credits = parse_credits("1 day VL");
        let none = ResolvedBalance {
            days: 0.0,
            provenance: Provenance::None,
        };
        assert!(validate_monetization(&credits, false, &none).is_err());
    }
}
