use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Row from `employee_list`. Owned by the employee-management service;
/// this service only reads it for balance lookups and for the snapshot
/// taken into a leave application at filing time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "user_id": "user_2abc",
        "first_name": "Juan",
        "middle_name": "Santos",
        "last_name": "Dela Cruz",
        "department": "Accounting",
        "position": "Clerk II",
        "email": "juan.delacruz@lgu.gov.ph",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: i64,

    /// External user identifier (identity provider id).
    #[schema(example = "user_2abc")]
    pub user_id: String,

    #[schema(example = "Juan")]
    pub first_name: String,

    #[schema(example = "Santos", nullable = true)]
    pub middle_name: Option<String>,

    #[schema(example = "Dela Cruz")]
    pub last_name: String,

    #[schema(example = "Accounting", nullable = true)]
    pub department: Option<String>,

    #[schema(example = "Clerk II", nullable = true)]
    pub position: Option<String>,

    #[schema(example = "juan.delacruz@lgu.gov.ph", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "active", nullable = true)]
    pub status: Option<String>,
}
