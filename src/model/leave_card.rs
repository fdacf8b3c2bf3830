use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-employee running balance for Vacation Leave and Sick Leave.
///
/// Multiple cards can exist for one employee (one per card period); the
/// highest-id row is the authoritative current balance. Cards are written
/// by the payroll/HR process and are read-only in this service.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveCard {
    #[schema(example = 42)]
    pub id: i64,

    #[schema(example = 1)]
    pub employee_id: i64,

    /// Vacation Leave balance in fractional days.
    #[schema(example = 12.5)]
    pub vl_balance: f64,

    /// Sick Leave balance in fractional days.
    #[schema(example = 8.25)]
    pub sl_balance: f64,
}
