use std::ops::Bound;

use chrono::NaiveDate;
use sqlx::postgres::types::PgRange;

/// Row from `leave_applications`.
///
/// `inclusive_dates` is stored half-open (`[from, to + 1 day)`) and is null
/// for monetization filings. The three approval-stage columns are the source
/// of truth for the workflow; `status` is their coarse projection.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeaveApplication {
    pub id: i64,
    pub user_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub office_department: Option<String>,
    pub position: Option<String>,
    pub salary: Option<f64>,
    pub date_filing: NaiveDate,
    pub leave_type: String,
    pub subtype: Option<String>,
    pub country: Option<String>,
    pub details: Option<String>,
    pub inclusive_dates: Option<PgRange<NaiveDate>>,
    pub number_of_days: f64,
    pub commutation_requested: Option<bool>,
    pub attachment: Option<String>,
    pub signature_url: Option<String>,
    pub monetization_reason: Option<String>,
    pub monetization_amount: Option<f64>,
    pub leave_credits_monetized: Option<String>,
    pub status: String,
    pub office_head_status: String,
    pub office_head_date: Option<NaiveDate>,
    pub hr_status: String,
    pub hr_date: Option<NaiveDate>,
    pub mayor_status: String,
    pub mayor_date: Option<NaiveDate>,
    pub approver_name: Option<String>,
    pub approver_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

/// Builds the stored half-open range `[from, to + 1 day)` from inclusive
/// client bounds. `None` only when `to` is the last representable date.
pub fn to_half_open(from: NaiveDate, to: NaiveDate) -> Option<PgRange<NaiveDate>> {
    let end = to.succ_opt()?;
    Some(PgRange {
        start: Bound::Included(from),
        end: Bound::Excluded(end),
    })
}

/// Recovers the inclusive `[from, to]` bounds from a stored range.
pub fn inclusive_bounds(range: &PgRange<NaiveDate>) -> Option<(NaiveDate, NaiveDate)> {
    let from = match range.start {
        Bound::Included(d) => d,
        Bound::Excluded(d) => d.succ_opt()?,
        Bound::Unbounded => return None,
    };
    let to = match range.end {
        Bound::Excluded(d) => d.pred_opt()?,
        Bound::Included(d) => d,
        Bound::Unbounded => return None,
    };
    Some((from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn inclusive_bounds_round_trip() {
        let from = date(2024, 3, 1);
        let to = date(2024, 3, 5);
        let range = to_half_open(from, to).unwrap();
        assert_eq!(range.end, Bound::Excluded(date(2024, 3, 6)));
        assert_eq!(inclusive_bounds(&range), Some((from, to)));
    }

    #[test]
    fn single_day_range_round_trips() {
        let day = date(2026, 1, 15);
        let range = to_half_open(day, day).unwrap();
        assert_eq!(inclusive_bounds(&range), Some((day, day)));
    }

    #[test]
    fn unbounded_range_has_no_inclusive_form() {
        let range = PgRange {
            start: Bound::Unbounded,
            end: Bound::Excluded(date(2024, 3, 6)),
        };
        assert_eq!(inclusive_bounds(&range), None);
    }
}
