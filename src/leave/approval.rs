use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use utoipa::ToSchema;

use crate::model::leave_application::LeaveApplication;

/// Status of one approval stage as stored in its column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, ToSchema,
)]
pub enum StageStatus {
    Pending,
    Approved,
    Rejected,
}

/// The three sequential approval stages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize, ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    OfficeHead,
    Hr,
    Mayor,
}

/// Coarse projection of the three stage fields onto the application's
/// `status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, ToSchema)]
pub enum OverallStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRecord {
    pub status: StageStatus,
    pub date: Option<NaiveDate>,
}

impl StageRecord {
    fn pending() -> Self {
        Self {
            status: StageStatus::Pending,
            date: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Leave application is already {0}")]
    AlreadyFinal(OverallStatus),

    #[error("The {0} stage has already been decided")]
    StageAlreadyDecided(Stage),

    #[error("The {0} stage cannot be decided before the prior stage approves")]
    PriorStagePending(Stage),

    #[error("Decision must be Approved or Rejected")]
    InvalidDecision,
}

/// The three-stage approval machine. Stage fields are the source of
/// truth; [`ApprovalState::overall`] derives the coarse status and must be
/// re-applied to the application row after every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalState {
    pub office_head: StageRecord,
    pub hr: StageRecord,
    pub mayor: StageRecord,
}

impl ApprovalState {
    pub fn new() -> Self {
        Self {
            office_head: StageRecord::pending(),
            hr: StageRecord::pending(),
            mayor: StageRecord::pending(),
        }
    }

    /// Rebuilds the machine from stored stage columns. Unparseable column
    /// values degrade to `Pending`.
    pub fn from_application(app: &LeaveApplication) -> Self {
        let parse = |s: &str| s.parse().unwrap_or(StageStatus::Pending);
        Self {
            office_head: StageRecord {
                status: parse(&app.office_head_status),
                date: app.office_head_date,
            },
            hr: StageRecord {
                status: parse(&app.hr_status),
                date: app.hr_date,
            },
            mayor: StageRecord {
                status: parse(&app.mayor_status),
                date: app.mayor_date,
            },
        }
    }

    pub fn stage(&self, stage: Stage) -> StageRecord {
        match stage {
            Stage::OfficeHead => self.office_head,
            Stage::Hr => self.hr,
            Stage::Mayor => self.mayor,
        }
    }

    fn stage_mut(&mut self, stage: Stage) -> &mut StageRecord {
        match stage {
            Stage::OfficeHead => &mut self.office_head,
            Stage::Hr => &mut self.hr,
            Stage::Mayor => &mut self.mayor,
        }
    }

    /// Any rejection ends the workflow; mayor approval completes it;
    /// everything else is still pending.
    pub fn overall(&self) -> OverallStatus {
        let stages = [self.office_head, self.hr, self.mayor];
        if stages.iter().any(|s| s.status == StageStatus::Rejected) {
            OverallStatus::Rejected
        } else if self.mayor.status == StageStatus::Approved {
            OverallStatus::Approved
        } else {
            OverallStatus::Pending
        }
    }

    /// Records a stage decision and returns the derived overall status.
    /// A stage may only be decided once, in order, and never after the
    /// workflow has reached a terminal state. Earlier stage records are
    /// never modified.
    pub fn decide(
        &mut self,
        stage: Stage,
        decision: StageStatus,
        date: NaiveDate,
    ) -> Result<OverallStatus, TransitionError> {
        if decision == StageStatus::Pending {
            return Err(TransitionError::InvalidDecision);
        }

        match self.overall() {
            OverallStatus::Pending => {}
            terminal => return Err(TransitionError::AlreadyFinal(terminal)),
        }

        if self.stage(stage).status != StageStatus::Pending {
            return Err(TransitionError::StageAlreadyDecided(stage));
        }

        let prior_approved = match stage {
            Stage::OfficeHead => true,
            Stage::Hr => self.office_head.status == StageStatus::Approved,
            Stage::Mayor => self.hr.status == StageStatus::Approved,
        };
        if !prior_approved {
            return Err(TransitionError::PriorStagePending(stage));
        }

        *self.stage_mut(stage) = StageRecord {
            status: decision,
            date: Some(date),
        };
        Ok(self.overall())
    }
}

impl Default for ApprovalState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
    }

    #[test]
    fn fresh_application_is_pending() {
        assert_eq!(ApprovalState::new().overall(), OverallStatus::Pending);
    }

    #[test]
    fn full_approval_chain_ends_approved() {
        let mut state = ApprovalState::new();
        assert_eq!(
            state.decide(Stage::OfficeHead, StageStatus::Approved, day(1)),
            Ok(OverallStatus::Pending)
        );
        assert_eq!(
            state.decide(Stage::Hr, StageStatus::Approved, day(2)),
            Ok(OverallStatus::Pending)
        );
        assert_eq!(
            state.decide(Stage::Mayor, StageStatus::Approved, day(3)),
            Ok(OverallStatus::Approved)
        );
        assert_eq!(state.office_head.date, Some(day(1)));
        assert_eq!(state.mayor.date, Some(day(3)));
    }

    #[test]
    fn hr_rejection_preserves_office_head_and_rejects_overall() {
        let mut state = ApprovalState::new();
        state
            .decide(Stage::OfficeHead, StageStatus::Approved, day(1))
            .unwrap();
        let overall = state
            .decide(Stage::Hr, StageStatus::Rejected, day(2))
            .unwrap();
        assert_eq!(overall, OverallStatus::Rejected);
        assert_eq!(state.office_head.status, StageStatus::Approved);
        assert_eq!(state.office_head.date, Some(day(1)));
        assert_eq!(state.hr.status, StageStatus::Rejected);
        assert_eq!(state.mayor.status, StageStatus::Pending);
    }

    #[test]
    fn rejection_is_terminal() {
        let mut state = ApprovalState::new();
        state
            .decide(Stage::OfficeHead, StageStatus::Rejected, day(1))
            .unwrap();
        assert_eq!(
            state.decide(Stage::Hr, StageStatus::Approved, day(2)),
            Err(TransitionError::AlreadyFinal(OverallStatus::Rejected))
        );
    }

    #[test]
    fn stages_cannot_run_out_of_order() {
        let mut state = ApprovalState::new();
        assert_eq!(
            state.decide(Stage::Hr, StageStatus::Approved, day(1)),
            Err(TransitionError::PriorStagePending(Stage::Hr))
        );
        assert_eq!(
            state.decide(Stage::Mayor, StageStatus::Approved, day(1)),
            Err(TransitionError::PriorStagePending(Stage::Mayor))
        );
    }

    #[test]
    fn a_stage_cannot_be_decided_twice() {
        let mut state = ApprovalState::new();
        state
            .decide(Stage::OfficeHead, StageStatus::Approved, day(1))
            .unwrap();
        assert_eq!(
            state.decide(Stage::OfficeHead, StageStatus::Approved, day(2)),
            Err(TransitionError::StageAlreadyDecided(Stage::OfficeHead))
        );
    }

    #[test]
    fn pending_is_not_a_decision() {
        let mut state = ApprovalState::new();
        assert_eq!(
            state.decide(Stage::OfficeHead, StageStatus::Pending, day(1)),
            Err(TransitionError::InvalidDecision)
        );
    }
}
