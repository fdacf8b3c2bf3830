use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::leave_application::{LeaveApplication, inclusive_bounds};

#[derive(Debug, Serialize, ToSchema)]
pub struct StageView {
    #[schema(example = "Approved")]
    pub status: String,
    #[schema(example = "2026-02-03", format = "date", value_type = String, nullable = true)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalStages {
    pub office_head: StageView,
    pub hr: StageView,
    pub mayor: StageView,
}

/// Client-facing history entry: inclusive date bounds restored from the
/// stored half-open range, stage columns grouped into `approval_stages`.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveHistoryEntry {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Vacation Leave")]
    pub leave_type: String,
    pub subtype: Option<String>,
    pub country: Option<String>,
    pub details: Option<String>,
    #[schema(example = "2026-03-01", format = "date", value_type = String, nullable = true)]
    pub date_from: Option<NaiveDate>,
    #[schema(example = "2026-03-05", format = "date", value_type = String, nullable = true)]
    pub date_to: Option<NaiveDate>,
    #[schema(example = 5.0)]
    pub number_of_days: f64,
    #[schema(example = "Pending")]
    pub status: String,
    #[schema(example = "2026-02-20", format = "date", value_type = String)]
    pub date_filing: NaiveDate,
    pub approval_stages: ApprovalStages,
    pub approver_name: Option<String>,
    #[schema(format = "date", value_type = String, nullable = true)]
    pub approver_date: Option<NaiveDate>,
    pub remarks: Option<String>,
    pub attachment: Option<String>,
}

/// Pure read-side projection of a stored application row.
pub fn format_application(app: &LeaveApplication) -> LeaveHistoryEntry {
    let (date_from, date_to) = match app.inclusive_dates.as_ref().and_then(inclusive_bounds) {
        Some((from, to)) => (Some(from), Some(to)),
        None => (None, None),
    };

    LeaveHistoryEntry {
        id: app.id,
        leave_type: app.leave_type.clone(),
        subtype: app.subtype.clone(),
        country: app.country.clone(),
        details: app.details.clone(),
        date_from,
        date_to,
        number_of_days: app.number_of_days,
        status: app.status.clone(),
        date_filing: app.date_filing,
        approval_stages: ApprovalStages {
            office_head: StageView {
                status: app.office_head_status.clone(),
                date: app.office_head_date,
            },
            hr: StageView {
                status: app.hr_status.clone(),
                date: app.hr_date,
            },
            mayor: StageView {
                status: app.mayor_status.clone(),
                date: app.mayor_date,
            },
        },
        approver_name: app.approver_name.clone(),
        approver_date: app.approver_date,
        remarks: app.remarks.clone(),
        attachment: app.attachment.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_application::to_half_open;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn application() -> LeaveApplication {
        LeaveApplication {
            id: 7,
            user_id: "user_2abc".into(),
            first_name: "Juan".into(),
            middle_name: None,
            last_name: "Dela Cruz".into(),
            office_department: Some("Accounting".into()),
            position: Some("Clerk II".into()),
            salary: Some(21_000.0),
            date_filing: date(2024, 2, 20),
            leave_type: "Vacation Leave".into(),
            subtype: None,
            country: None,
            details: None,
            inclusive_dates: to_half_open(date(2024, 3, 1), date(2024, 3, 5)),
            number_of_days: 5.0,
            commutation_requested: Some(false),
            attachment: None,
            signature_url: Some("https://files.example/sig.png".into()),
            monetization_reason: None,
            monetization_amount: None,
            leave_credits_monetized: None,
            status: "Pending".into(),
            office_head_status: "Approved".into(),
            office_head_date: Some(date(2024, 2, 21)),
            hr_status: "Pending".into(),
            hr_date: None,
            mayor_status: "Pending".into(),
            mayor_date: None,
            approver_name: None,
            approver_date: None,
            remarks: None,
        }
    }

    #[test]
    fn restores_inclusive_bounds() {
        let entry = format_application(&application());
        assert_eq!(entry.date_from, Some(date(2024, 3, 1)));
        assert_eq!(entry.date_to, Some(date(2024, 3, 5)));
    }

    #[test]
    fn groups_stage_columns() {
        let entry = format_application(&application());
        assert_eq!(entry.approval_stages.office_head.status, "Approved");
        assert_eq!(
            entry.approval_stages.office_head.date,
            Some(date(2024, 2, 21))
        );
        assert_eq!(entry.approval_stages.hr.status, "Pending");
        assert_eq!(entry.approval_stages.mayor.date, None);
    }

    #[test]
    fn monetization_rows_have_no_date_bounds() {
        let mut app = application();
        app.inclusive_dates = None;
        let entry = format_application(&app);
        assert_eq!(entry.date_from, None);
        assert_eq!(entry.date_to, None);
    }
}
