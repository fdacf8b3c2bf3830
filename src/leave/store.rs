use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::types::PgRange;
use thiserror::Error;
use tracing::debug;

use crate::model::employee::Employee;
use crate::model::leave_application::LeaveApplication;
use crate::model::leave_card::LeaveCard;
use crate::model::leave_entitlement::LeaveEntitlement;

/// Data-store failure. The only error class treated as fatal to the
/// request; everything else in the workflow is a structured rejection.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct StoreError(#[from] pub sqlx::Error);

/// Insert payload for a leave application. Employee name, department and
/// position are snapshotted from the employee record at filing time.
#[derive(Debug, Clone)]
pub struct NewLeaveApplication {
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
}

/// Full stage-field write performed after an approval decision. The stage
/// fields are authoritative; `status` is the derived coarse projection.
#[derive(Debug, Clone)]
pub struct ApprovalUpdate {
    pub office_head_status: String,
    pub office_head_date: Option<NaiveDate>,
    pub hr_status: String,
    pub hr_date: Option<NaiveDate>,
    pub mayor_status: String,
    pub mayor_date: Option<NaiveDate>,
    pub status: String,
    pub approver_name: Option<String>,
    pub approver_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

/// Boundary operations the workflow engine needs from the shared store.
/// Implemented by [`PgStore`] in production and by in-memory doubles in
/// tests.
pub trait LeaveStore {
    async fn employee_by_external_id(&self, user_id: &str)
    -> Result<Option<Employee>, StoreError>;

    async fn employee_by_id(&self, employee_id: i64) -> Result<Option<Employee>, StoreError>;

    /// Most recently created card (highest id) for the employee.
    async fn latest_leave_card(&self, employee_id: i64) -> Result<Option<LeaveCard>, StoreError>;

    async fn find_entitlement(
        &self,
        employee_id: i64,
        code: &str,
        year: i32,
    ) -> Result<Option<LeaveEntitlement>, StoreError>;

    /// All non-VL/SL entitlement rows for the employee, newest first.
    async fn entitlement_rows(&self, employee_id: i64)
    -> Result<Vec<LeaveEntitlement>, StoreError>;

    /// Inserts the application (status `Pending`) and its filing
    /// notification in one transaction.
    async fn insert_application(
        &self,
        record: NewLeaveApplication,
        notification: &str,
    ) -> Result<LeaveApplication, StoreError>;

    /// Applications for an external user id, most recent filing first.
    async fn applications_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<LeaveApplication>, StoreError>;

    async fn application_by_id(&self, id: i64) -> Result<Option<LeaveApplication>, StoreError>;

    async fn update_approval(&self, id: i64, update: ApprovalUpdate) -> Result<(), StoreError>;
}

const APPLICATION_COLUMNS: &str = "id, user_id, first_name, middle_name, last_name, \
     office_department, position, salary, date_filing, leave_type, subtype, country, details, \
     inclusive_dates, number_of_days, commutation_requested, attachment, signature_url, \
     monetization_reason, monetization_amount, leave_credits_monetized, status, \
     office_head_status, office_head_date, hr_status, hr_date, mayor_status, mayor_date, \
     approver_name, approver_date, remarks";

/// sqlx-backed store over the shared Postgres database.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl LeaveStore for PgStore {
    async fn employee_by_external_id(
        &self,
        user_id: &str,
    ) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, user_id, first_name, middle_name, last_name, department, position, \
             email, status FROM employee_list WHERE user_id = $1 LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn employee_by_id(&self, employee_id: i64) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            "SELECT id, user_id, first_name, middle_name, last_name, department, position, \
             email, status FROM employee_list WHERE id = $1",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(employee)
    }

    async fn latest_leave_card(&self, employee_id: i64) -> Result<Option<LeaveCard>, StoreError> {
        let card = sqlx::query_as::<_, LeaveCard>(
            "SELECT id, employee_id, vl_balance, sl_balance FROM leave_cards \
             WHERE employee_id = $1 ORDER BY id DESC LIMIT 1",
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(card)
    }

    async fn find_entitlement(
        &self,
        employee_id: i64,
        code: &str,
        year: i32,
    ) -> Result<Option<LeaveEntitlement>, StoreError> {
        let entitlement = sqlx::query_as::<_, LeaveEntitlement>(
            "SELECT id, employee_id, leave_type, year, total_days, used_days \
             FROM leave_entitlements \
             WHERE employee_id = $1 AND leave_type = $2 AND year = $3 LIMIT 1",
        )
        .bind(employee_id)
        .bind(code)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entitlement)
    }

    async fn entitlement_rows(
        &self,
        employee_id: i64,
    ) -> Result<Vec<LeaveEntitlement>, StoreError> {
        let rows = sqlx::query_as::<_, LeaveEntitlement>(
            "SELECT id, employee_id, leave_type, year, total_days, used_days \
             FROM leave_entitlements \
             WHERE employee_id = $1 AND leave_type NOT IN ('VL', 'SL') ORDER BY id DESC",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_application(
        &self,
        record: NewLeaveApplication,
        notification: &str,
    ) -> Result<LeaveApplication, StoreError> {
        // Application and its notification commit together; a crash must
        // not leave one without the other.
        let mut tx = self.pool.begin().await?;

        let insert_sql = format!(
            "INSERT INTO leave_applications (user_id, first_name, middle_name, last_name, \
             office_department, position, salary, date_filing, leave_type, subtype, country, \
             details, inclusive_dates, number_of_days, commutation_requested, attachment, \
             signature_url, monetization_reason, monetization_amount, leave_credits_monetized, \
             status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
             $17, $18, $19, $20, 'Pending') \
             RETURNING {APPLICATION_COLUMNS}"
        );

        let application = sqlx::query_as::<_, LeaveApplication>(&insert_sql)
            .bind(&record.user_id)
            .bind(&record.first_name)
            .bind(&record.middle_name)
            .bind(&record.last_name)
            .bind(&record.office_department)
            .bind(&record.position)
            .bind(record.salary)
            .bind(record.date_filing)
            .bind(&record.leave_type)
            .bind(&record.subtype)
            .bind(&record.country)
            .bind(&record.details)
            .bind(&record.inclusive_dates)
            .bind(record.number_of_days)
            .bind(record.commutation_requested)
            .bind(&record.attachment)
            .bind(&record.signature_url)
            .bind(&record.monetization_reason)
            .bind(record.monetization_amount)
            .bind(&record.leave_credits_monetized)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO notifications (user_id, message) VALUES ($1, $2)")
            .bind(&record.user_id)
            .bind(notification)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            application_id = application.id,
            leave_type = %application.leave_type,
            "leave application persisted"
        );
        Ok(application)
    }

    async fn applications_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<LeaveApplication>, StoreError> {
        let select_sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM leave_applications \
             WHERE user_id = $1 ORDER BY date_filing DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, LeaveApplication>(&select_sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn application_by_id(&self, id: i64) -> Result<Option<LeaveApplication>, StoreError> {
        let select_sql =
            format!("SELECT {APPLICATION_COLUMNS} FROM leave_applications WHERE id = $1");
        let row = sqlx::query_as::<_, LeaveApplication>(&select_sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_approval(&self, id: i64, update: ApprovalUpdate) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE leave_applications SET \
             office_head_status = $1, office_head_date = $2, \
             hr_status = $3, hr_date = $4, \
             mayor_status = $5, mayor_date = $6, \
             status = $7, \
             approver_name = COALESCE($8, approver_name), \
             approver_date = COALESCE($9, approver_date), \
             remarks = COALESCE($10, remarks) \
             WHERE id = $11",
        )
        .bind(&update.office_head_status)
        .bind(update.office_head_date)
        .bind(&update.hr_status)
        .bind(update.hr_date)
        .bind(&update.mayor_status)
        .bind(update.mayor_date)
        .bind(&update.status)
        .bind(&update.approver_name)
        .bind(update.approver_date)
        .bind(&update.remarks)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
