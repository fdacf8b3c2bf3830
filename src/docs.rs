use crate::api::leave::{
    CheckBalanceRequest, CheckBalanceResponse, DecisionRequest, EntitlementView,
};
use crate::leave::approval::{Stage, StageStatus};
use crate::leave::balance::Provenance;
use crate::leave::history::{ApprovalStages, LeaveHistoryEntry, StageView};
use crate::leave::submit::LeaveApplicationRequest;
use crate::model::employee::Employee;
use crate::model::leave_card::LeaveCard;
use crate::model::leave_entitlement::LeaveEntitlement;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Service API",
        version = "1.0.0",
        description = r#"
## Leave-Entitlement & Application Workflow Service

Backend for filing and tracking employee leave applications.

### 🔹 Key Features
- **Balance pre-check**
  - Advisory sufficiency verdict against the leave card or entitlement table
- **Leave filing**
  - Type-specific validation, including the monetization sub-workflow
- **Approval workflow**
  - Three sequential stages (office head → HR → mayor) with derived status
- **Leave history**
  - Client-facing projection with inclusive dates and grouped stages

### 📦 Response Format
- JSON-based RESTful responses
- Balance rejections carry available/requested days for direct display

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave::check_balance,
        crate::api::leave::apply_leave,
        crate::api::leave::leave_history,
        crate::api::leave::decide_leave,
        crate::api::leave::entitlement_summary
    ),
    components(
        schemas(
            CheckBalanceRequest,
            CheckBalanceResponse,
            LeaveApplicationRequest,
            LeaveHistoryEntry,
            ApprovalStages,
            StageView,
            DecisionRequest,
            Stage,
            StageStatus,
            Provenance,
            EntitlementView,
            Employee,
            LeaveCard,
            LeaveEntitlement
        )
    ),
    tags(
        (name = "Leave", description = "Leave balance, filing, approval and history APIs"),
    )
)]
pub struct ApiDoc;
