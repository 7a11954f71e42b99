//! One handler per action, each a thin adapter onto the store.
//!
//! [`registry`] is the single place actions are bound to their handlers.
//! Every handler decodes its own payload and takes identity from the
//! request's acting user.

use serde::Serialize;
use serde_json::Value;
use staffd_store::{
    DataStore, NewAttendance, NewEvaluation, NewKpi, NewLeaveRequest, NewMeeting,
    NewMonthlyEvaluation, NewReport,
};
use time::OffsetDateTime;

use super::action::{Action, ActionRegistry};
use super::arguments::{
    AttendanceArgs, AttendanceQuery, EvaluationArgs, KpiArgs, LeaveArgs, LeaveDecisionArgs,
    LoginArgs, MeetingArgs, MonthlyEvaluationArgs, ReportArgs, decode_args,
};
use super::errors::DispatchError;

/// Successful outcome of a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub message: &'static str,
    pub data: Option<Value>,
}

impl Reply {
    const fn done(message: &'static str) -> Self {
        Self {
            message,
            data: None,
        }
    }

    fn with<T: Serialize>(message: &'static str, data: &T) -> Result<Self, DispatchError> {
        let data = serde_json::to_value(data).map_err(DispatchError::SerializeResult)?;
        Ok(Self {
            message,
            data: Some(data),
        })
    }
}

/// Builds the registry binding every action to its handler.
pub fn registry() -> ActionRegistry {
    let mut registry = ActionRegistry::default();
    registry.register(Action::Login, login);
    registry.register(Action::GetEmployees, get_employees);
    registry.register(Action::UpdateKpi, update_kpi);
    registry.register(Action::UploadReport, upload_report);
    registry.register(Action::EvaluateEmployee, evaluate_employee);
    registry.register(Action::GetAttendance, get_attendance);
    registry.register(Action::SaveAttendance, save_attendance);
    registry.register(Action::GetDashboardStats, get_dashboard_stats);
    registry.register(Action::GetMeetings, get_meetings);
    registry.register(Action::SaveMeeting, save_meeting);
    registry.register(Action::GetLeaveRequests, get_leave_requests);
    registry.register(Action::SaveLeaveRequest, save_leave_request);
    registry.register(Action::ApproveLeaveRequest, decide_leave_request);
    registry.register(Action::GetSalaryHistory, get_salary_history);
    registry.register(Action::SaveMonthlyEvaluation, save_monthly_evaluation);
    registry
}

fn acting(user_id: Option<&str>) -> Result<&str, DispatchError> {
    user_id.ok_or(DispatchError::MissingUser)
}

/// Maps a store verdict to the operation's success or failure message.
fn confirm(
    saved: bool,
    success: &'static str,
    failure: &'static str,
) -> Result<Reply, DispatchError> {
    if saved {
        Ok(Reply::done(success))
    } else {
        Err(DispatchError::Rejected { message: failure })
    }
}

fn login(
    store: &dyn DataStore,
    _user_id: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let args: LoginArgs = decode_args(Action::Login, data)?;
    match store.authenticate_user(&args.employee_id, &args.password)? {
        Some(employee) => Reply::with("Login successful", &employee),
        None => Err(DispatchError::InvalidCredentials),
    }
}

fn get_employees(
    store: &dyn DataStore,
    _user: Option<&str>,
    _data: Value,
) -> Result<Reply, DispatchError> {
    Reply::with("Employees retrieved", &store.all_employees()?)
}

fn get_attendance(
    store: &dyn DataStore,
    _user: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let query: AttendanceQuery = decode_args(Action::GetAttendance, data)?;
    Reply::with(
        "Attendance retrieved",
        &store.attendance_by_employee(&query.employee_id)?,
    )
}

fn get_dashboard_stats(
    store: &dyn DataStore,
    _user: Option<&str>,
    _data: Value,
) -> Result<Reply, DispatchError> {
    Reply::with("Dashboard stats retrieved", &store.dashboard_stats()?)
}

fn get_meetings(
    store: &dyn DataStore,
    user: Option<&str>,
    _data: Value,
) -> Result<Reply, DispatchError> {
    Reply::with(
        "Meetings retrieved",
        &store.meetings_by_employee(acting(user)?)?,
    )
}

fn get_leave_requests(
    store: &dyn DataStore,
    user: Option<&str>,
    _data: Value,
) -> Result<Reply, DispatchError> {
    Reply::with(
        "Leave requests retrieved",
        &store.leave_requests_by_employee(acting(user)?)?,
    )
}

fn get_salary_history(
    store: &dyn DataStore,
    user: Option<&str>,
    _data: Value,
) -> Result<Reply, DispatchError> {
    Reply::with(
        "Salary history retrieved",
        &store.salary_history_by_employee(acting(user)?)?,
    )
}

fn update_kpi(
    store: &dyn DataStore,
    user_id: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let args: KpiArgs = decode_args(Action::UpdateKpi, data)?;
    let user = acting(user_id)?;
    let kpi = NewKpi {
        divisi: args.divisi,
        bulan: args.bulan,
        tahun: args.tahun,
        score: args.score,
        manager_id: user.to_owned(),
    };
    confirm(
        store.save_kpi(&kpi)?,
        "KPI updated successfully",
        "Failed to update KPI",
    )
}

fn upload_report(
    store: &dyn DataStore,
    user_id: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let args: ReportArgs = decode_args(Action::UploadReport, data)?;
    let user = acting(user_id)?;
    let report = NewReport {
        supervisor_id: user.to_owned(),
        divisi: args.divisi,
        bulan: args.bulan,
        tahun: args.tahun,
        file_path: args.file_path,
    };
    confirm(
        store.save_report(&report)?,
        "Report uploaded successfully",
        "Failed to upload report",
    )
}

fn evaluate_employee(
    store: &dyn DataStore,
    user_id: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let args: EvaluationArgs = decode_args(Action::EvaluateEmployee, data)?;
    let user = acting(user_id)?;
    let evaluation = NewEvaluation {
        employee_id: args.employee_id,
        supervisor_id: user.to_owned(),
        punctuality_score: args.punctuality_score,
        attendance_score: args.attendance_score,
        overall_rating: args.overall_rating,
        comments: args.comments,
    };
    confirm(
        store.save_employee_evaluation(&evaluation)?,
        "Employee evaluation saved successfully",
        "Failed to save evaluation",
    )
}

fn save_attendance(
    store: &dyn DataStore,
    user_id: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let args: AttendanceArgs = decode_args(Action::SaveAttendance, data)?;
    let user = acting(user_id)?;
    let attendance = NewAttendance {
        employee_id: user.to_owned(),
        date: OffsetDateTime::now_utc().date(),
        jam_masuk: args.jam_masuk,
        jam_keluar: args.jam_keluar,
        status: args.status,
    };
    confirm(
        store.save_attendance(&attendance)?,
        "Attendance saved successfully",
        "Failed to save attendance",
    )
}

fn save_meeting(
    store: &dyn DataStore,
    user_id: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let args: MeetingArgs = decode_args(Action::SaveMeeting, data)?;
    let user = acting(user_id)?;
    let meeting = NewMeeting {
        title: args.title,
        description: args.description,
        date: args.tanggal,
        start_time: args.waktu_mulai,
        end_time: args.waktu_selesai,
        location: args.lokasi,
        organizer_id: user.to_owned(),
        participant_ids: args.participant_ids,
    };
    confirm(
        store.save_meeting(&meeting)?,
        "Meeting saved successfully",
        "Failed to save meeting",
    )
}

fn save_leave_request(
    store: &dyn DataStore,
    user_id: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let args: LeaveArgs = decode_args(Action::SaveLeaveRequest, data)?;
    let user = acting(user_id)?;
    let request = NewLeaveRequest {
        employee_id: user.to_owned(),
        leave_type: args.leave_type,
        start_date: args.start_date,
        end_date: args.end_date,
        reason: args.reason,
    };
    confirm(
        store.save_leave_request(&request)?,
        "Leave request submitted successfully",
        "Failed to submit leave request",
    )
}

fn decide_leave_request(
    store: &dyn DataStore,
    user_id: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let args: LeaveDecisionArgs = decode_args(Action::ApproveLeaveRequest, data)?;
    let user = acting(user_id)?;
    if args.approves() {
        confirm(
            store.approve_leave_request(args.leave_request_id, user, &args.notes)?,
            "Leave request approved successfully",
            "Failed to approve leave request",
        )
    } else {
        confirm(
            store.reject_leave_request(args.leave_request_id, user, &args.notes)?,
            "Leave request rejected successfully",
            "Failed to reject leave request",
        )
    }
}

fn save_monthly_evaluation(
    store: &dyn DataStore,
    user_id: Option<&str>,
    data: Value,
) -> Result<Reply, DispatchError> {
    let args: MonthlyEvaluationArgs = decode_args(Action::SaveMonthlyEvaluation, data)?;
    let user = acting(user_id)?;
    let evaluation = NewMonthlyEvaluation {
        employee_id: args.employee_id,
        supervisor_id: user.to_owned(),
        month: args.month,
        year: args.year,
        punctuality_score: args.punctuality_score,
        attendance_score: args.attendance_score,
        productivity_score: args.productivity_score,
        overall_rating: args.overall_rating,
        comments: args.comments,
    };
    confirm(
        store.save_monthly_evaluation(&evaluation)?,
        "Monthly evaluation saved successfully",
        "Failed to save monthly evaluation",
    )
}
