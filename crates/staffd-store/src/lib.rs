//! Data Store contract consumed by the staffd request server.
//!
//! The server core never talks to persistence directly. Every business
//! operation goes through the [`DataStore`] trait, which is shared by all
//! connection sessions at once. Implementations therefore carry the
//! concurrency contract themselves: the trait requires `Send + Sync` and each
//! method must be safe to call from many worker threads without external
//! locking.
//!
//! [`MemoryStore`] is the in-process implementation used by the binary and the
//! test suites.

mod error;
mod memory;
mod records;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use records::{
    Attendance, DashboardStats, Employee, LeaveRequest, LeaveStatus, Meeting, NewAttendance,
    NewEvaluation, NewKpi, NewLeaveRequest, NewMeeting, NewMonthlyEvaluation, NewReport, Role,
    SalaryRecord,
};

/// Persistence and record retrieval for the business operations.
///
/// Save operations return `Ok(false)` when the store rejects the operation
/// without failing (for example an unknown leave request), and `Err` when
/// the store itself could not run it.
pub trait DataStore: Send + Sync {
    /// Returns the employee whose id and password both match.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be queried.
    fn authenticate_user(&self, employee_id: &str, password: &str)
    -> StoreResult<Option<Employee>>;

    /// Lists every employee.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be queried.
    fn all_employees(&self) -> StoreResult<Vec<Employee>>;

    /// Records a division KPI score submitted by a manager.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be written.
    fn save_kpi(&self, kpi: &NewKpi) -> StoreResult<bool>;

    /// Records a supervisor's monthly division report.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be written.
    fn save_report(&self, report: &NewReport) -> StoreResult<bool>;

    /// Records an ad-hoc employee evaluation.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be written.
    fn save_employee_evaluation(&self, evaluation: &NewEvaluation) -> StoreResult<bool>;

    /// Records a monthly employee evaluation.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be written.
    fn save_monthly_evaluation(&self, evaluation: &NewMonthlyEvaluation) -> StoreResult<bool>;

    /// Lists attendance entries of one employee.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be queried.
    fn attendance_by_employee(&self, employee_id: &str) -> StoreResult<Vec<Attendance>>;

    /// Records an attendance entry.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be written.
    fn save_attendance(&self, attendance: &NewAttendance) -> StoreResult<bool>;

    /// Computes the aggregate figures shown on the dashboards.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be queried.
    fn dashboard_stats(&self) -> StoreResult<DashboardStats>;

    /// Lists meetings an employee organises or attends.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be queried.
    fn meetings_by_employee(&self, employee_id: &str) -> StoreResult<Vec<Meeting>>;

    /// Schedules a meeting.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be written.
    fn save_meeting(&self, meeting: &NewMeeting) -> StoreResult<bool>;

    /// Lists leave requests filed by one employee.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be queried.
    fn leave_requests_by_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveRequest>>;

    /// Files a new leave request.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be written.
    fn save_leave_request(&self, request: &NewLeaveRequest) -> StoreResult<bool>;

    /// Approves a pending leave request.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be written.
    fn approve_leave_request(
        &self,
        leave_request_id: u64,
        approver_id: &str,
        notes: &str,
    ) -> StoreResult<bool>;

    /// Rejects a pending leave request.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be written.
    fn reject_leave_request(
        &self,
        leave_request_id: u64,
        approver_id: &str,
        notes: &str,
    ) -> StoreResult<bool>;

    /// Lists salary records of one employee, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the store cannot be queried.
    fn salary_history_by_employee(&self, employee_id: &str) -> StoreResult<Vec<SalaryRecord>>;

    /// Releases the store. Calls after `close` fail with [`StoreError::Closed`].
    fn close(&self);
}
