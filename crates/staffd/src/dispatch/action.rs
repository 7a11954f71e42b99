//! Action names and the handler table keyed by them.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use staffd_store::DataStore;

use super::errors::DispatchError;
use super::handlers::Reply;

/// Every business operation the server answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Credential check returning the employee record.
    Login,
    /// Lists every employee.
    GetEmployees,
    /// Manager submits a division KPI score.
    UpdateKpi,
    /// Supervisor uploads a division report.
    UploadReport,
    /// Supervisor evaluates an employee.
    EvaluateEmployee,
    /// Lists attendance of one employee.
    GetAttendance,
    /// Acting user records today's attendance.
    SaveAttendance,
    /// Aggregate dashboard figures.
    GetDashboardStats,
    /// Lists the acting user's meetings.
    GetMeetings,
    /// Acting user schedules a meeting.
    SaveMeeting,
    /// Lists the acting user's leave requests.
    GetLeaveRequests,
    /// Acting user files a leave request.
    SaveLeaveRequest,
    /// Acting user approves or rejects a leave request.
    ApproveLeaveRequest,
    /// Lists the acting user's salary records.
    GetSalaryHistory,
    /// Supervisor files a monthly evaluation.
    SaveMonthlyEvaluation,
}

impl Action {
    /// All actions, in registration order.
    pub const ALL: [Self; 15] = [
        Self::Login,
        Self::GetEmployees,
        Self::UpdateKpi,
        Self::UploadReport,
        Self::EvaluateEmployee,
        Self::GetAttendance,
        Self::SaveAttendance,
        Self::GetDashboardStats,
        Self::GetMeetings,
        Self::SaveMeeting,
        Self::GetLeaveRequests,
        Self::SaveLeaveRequest,
        Self::ApproveLeaveRequest,
        Self::GetSalaryHistory,
        Self::SaveMonthlyEvaluation,
    ];

    /// Wire name of the action. Matching is case-sensitive.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::GetEmployees => "getEmployees",
            Self::UpdateKpi => "updateKPI",
            Self::UploadReport => "uploadReport",
            Self::EvaluateEmployee => "evaluateEmployee",
            Self::GetAttendance => "getAttendance",
            Self::SaveAttendance => "saveAttendance",
            Self::GetDashboardStats => "getDashboardStats",
            Self::GetMeetings => "getMeetings",
            Self::SaveMeeting => "saveMeeting",
            Self::GetLeaveRequests => "getLeaveRequests",
            Self::SaveLeaveRequest => "saveLeaveRequest",
            Self::ApproveLeaveRequest => "approveLeaveRequest",
            Self::GetSalaryHistory => "getSalaryHistory",
            Self::SaveMonthlyEvaluation => "saveMonthlyEvaluation",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry point of one action: decodes its own payload, then runs it against
/// the store on behalf of the acting user.
pub type Handler = fn(&dyn DataStore, Option<&str>, Value) -> Result<Reply, DispatchError>;

/// A registered action and the handler that serves it.
#[derive(Clone, Copy)]
pub struct Route {
    /// Action the handler was registered for.
    pub action: Action,
    /// Handler invoked for requests naming the action.
    pub handler: Handler,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// Name-to-handler table, built once when the router is created.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    routes: HashMap<&'static str, Route>,
}

impl ActionRegistry {
    /// Registers `handler` under the wire name of `action`, replacing any
    /// earlier registration.
    pub fn register(&mut self, action: Action, handler: Handler) {
        self.routes.insert(action.as_str(), Route { action, handler });
    }

    /// Looks up a route by its exact wire name.
    pub fn resolve(&self, name: &str) -> Option<Route> {
        self.routes.get(name).copied()
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.routes.len()
    }
}
