use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-year allotment of leave days for one leave-type code, used for
/// every leave type except Vacation/Sick (those live on the leave card).
/// Unique per (employee, leave_type, year).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveEntitlement {
    #[schema(example = 7)]
    pub id: i64,

    #[schema(example = 1)]
    pub employee_id: i64,

    /// Leave-type code, e.g. "MAT" or "SPL".
    #[schema(example = "SPL")]
    pub leave_type: String,

    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = 3.0)]
    pub total_days: f64,

    #[schema(example = 1.0)]
    pub used_days: f64,
}

impl LeaveEntitlement {
    /// Derived balance; never negative even if `used_days` overruns.
    pub fn balance_days(&self) -> f64 {
        (self.total_days - self.used_days).max(0.0)
    }
}
