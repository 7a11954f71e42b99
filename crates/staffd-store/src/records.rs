//! Records exchanged with the store.
//!
//! Stored records serialise in camelCase because they are forwarded verbatim
//! to clients inside response envelopes. The `New*` inputs describe a write
//! before the store has assigned an identifier.

use serde::{Deserialize, Serialize};
use time::Date;

/// Access level of an employee account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular staff.
    Employee,
    /// Leads a team and evaluates its members.
    Supervisor,
    /// Owns a division and its KPI.
    Manager,
    /// Human resources administrator.
    Hr,
}

/// An employee account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Employee number used to log in.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Contact address.
    pub email: String,
    /// Access level.
    pub role: Role,
    /// Division the employee belongs to.
    pub divisi: String,
    /// Job title.
    pub jabatan: String,
    /// Login secret; never serialised.
    #[serde(skip_serializing, default)]
    pub password: String,
}

/// One day of attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    /// Store-assigned identifier.
    pub id: u64,
    /// Employee the entry belongs to.
    pub employee_id: String,
    /// Calendar day of the entry.
    pub date: Date,
    /// Clock-in time as entered by the client.
    pub jam_masuk: String,
    /// Clock-out time as entered by the client.
    pub jam_keluar: String,
    /// Attendance status, for example `Hadir` or `Izin`.
    pub status: String,
}

/// A scheduled meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// Store-assigned identifier.
    pub id: u64,
    /// Short title.
    pub title: String,
    /// Agenda text.
    pub description: String,
    /// Day the meeting takes place.
    pub date: Date,
    /// Start time as entered by the organiser.
    pub start_time: String,
    /// End time as entered by the organiser.
    pub end_time: String,
    /// Room or link.
    pub location: String,
    /// Employee who scheduled the meeting.
    pub organizer_id: String,
    /// Invited employees.
    pub participant_ids: Vec<String>,
}

/// Review state of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a decision.
    Pending,
    /// Granted by an approver.
    Approved,
    /// Declined by an approver.
    Rejected,
}

/// A leave request and its review outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    /// Store-assigned identifier.
    pub id: u64,
    /// Employee requesting leave.
    pub employee_id: String,
    /// Kind of leave, for example `annual` or `sick`.
    pub leave_type: String,
    /// First day of leave.
    pub start_date: Date,
    /// Last day of leave.
    pub end_date: Date,
    /// Free-text justification.
    pub reason: String,
    /// Review state.
    pub status: LeaveStatus,
    /// Employee who decided the request.
    pub approver_id: Option<String>,
    /// Approver's notes.
    pub notes: Option<String>,
}

/// One month of pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    /// Store-assigned identifier.
    pub id: u64,
    /// Employee paid.
    pub employee_id: String,
    /// Calendar month, 1-12.
    pub month: u8,
    /// Calendar year.
    pub year: i32,
    /// Base pay in minor currency units.
    pub base_salary: i64,
    /// KPI-linked bonus in minor currency units.
    pub kpi_bonus: i64,
    /// Deductions in minor currency units.
    pub deductions: i64,
    /// Net pay in minor currency units.
    pub total: i64,
}

/// Aggregate figures for the dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of employee accounts.
    pub total_employees: usize,
    /// Attendance entries recorded for today.
    pub present_today: usize,
    /// Leave requests awaiting a decision.
    pub pending_leave_requests: usize,
    /// Meetings on record.
    pub total_meetings: usize,
    /// KPI submissions on record.
    pub kpi_submissions: usize,
}

/// Division KPI submission.
#[derive(Debug, Clone, PartialEq)]
pub struct NewKpi {
    /// Division scored.
    pub divisi: String,
    /// Month scored, 1-12.
    pub bulan: u8,
    /// Year scored.
    pub tahun: i32,
    /// Score between 0 and 100.
    pub score: f64,
    /// Submitting manager.
    pub manager_id: String,
}

/// Supervisor report upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    /// Submitting supervisor.
    pub supervisor_id: String,
    /// Division reported on.
    pub divisi: String,
    /// Month reported, 1-12.
    pub bulan: u8,
    /// Year reported.
    pub tahun: i32,
    /// Location of the uploaded file.
    pub file_path: String,
}

/// Ad-hoc employee evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvaluation {
    /// Employee evaluated.
    pub employee_id: String,
    /// Evaluating supervisor.
    pub supervisor_id: String,
    /// Punctuality score.
    pub punctuality_score: i32,
    /// Attendance score.
    pub attendance_score: i32,
    /// Overall rating.
    pub overall_rating: f64,
    /// Free-text comments.
    pub comments: String,
}

/// Monthly employee evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMonthlyEvaluation {
    /// Employee evaluated.
    pub employee_id: String,
    /// Evaluating supervisor.
    pub supervisor_id: String,
    /// Month evaluated, 1-12.
    pub month: u8,
    /// Year evaluated.
    pub year: i32,
    /// Punctuality score.
    pub punctuality_score: i32,
    /// Attendance score.
    pub attendance_score: i32,
    /// Productivity score.
    pub productivity_score: i32,
    /// Overall rating.
    pub overall_rating: f64,
    /// Free-text comments.
    pub comments: String,
}

/// Attendance entry to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    /// Employee clocking in.
    pub employee_id: String,
    /// Day recorded.
    pub date: Date,
    /// Clock-in time.
    pub jam_masuk: String,
    /// Clock-out time.
    pub jam_keluar: String,
    /// Attendance status.
    pub status: String,
}

/// Meeting to schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeeting {
    /// Short title.
    pub title: String,
    /// Agenda text.
    pub description: String,
    /// Day of the meeting.
    pub date: Date,
    /// Start time.
    pub start_time: String,
    /// End time.
    pub end_time: String,
    /// Room or link.
    pub location: String,
    /// Employee scheduling the meeting.
    pub organizer_id: String,
    /// Invited employees.
    pub participant_ids: Vec<String>,
}

/// Leave request to file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeaveRequest {
    /// Employee requesting leave.
    pub employee_id: String,
    /// Kind of leave.
    pub leave_type: String,
    /// First day of leave.
    pub start_date: Date,
    /// Last day of leave.
    pub end_date: Date,
    /// Free-text justification.
    pub reason: String,
}
