//! Typed payloads decoded from a request's `data` object.
//!
//! Decoding happens in two stages. The codec first produces a generic
//! envelope; once the router has resolved the action, its handler decodes the
//! envelope's `data` into the argument struct below that it expects. A shape
//! mismatch surfaces as [`DispatchError::InvalidArguments`].

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::{Date, OffsetDateTime};

use super::action::Action;
use super::errors::DispatchError;

/// Payload of `login`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginArgs {
    pub employee_id: String,
    pub password: String,
}

/// Payload of `updateKPI`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KpiArgs {
    pub divisi: String,
    pub bulan: u8,
    pub tahun: i32,
    pub score: f64,
}

/// Payload of `uploadReport`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportArgs {
    pub divisi: String,
    pub bulan: u8,
    pub tahun: i32,
    pub file_path: String,
}

/// Payload of `evaluateEmployee`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationArgs {
    pub employee_id: String,
    pub punctuality_score: i32,
    pub attendance_score: i32,
    pub overall_rating: f64,
    pub comments: String,
}

/// Payload of `saveMonthlyEvaluation`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEvaluationArgs {
    pub employee_id: String,
    pub month: u8,
    pub year: i32,
    pub punctuality_score: i32,
    pub attendance_score: i32,
    pub productivity_score: i32,
    pub overall_rating: f64,
    pub comments: String,
}

/// Payload of `getAttendance`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub employee_id: String,
}

/// Payload of `saveAttendance`. The date is always the server's today.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceArgs {
    pub status: String,
    pub jam_masuk: String,
    pub jam_keluar: String,
}

/// Payload of `saveMeeting`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingArgs {
    pub title: String,
    pub description: String,
    #[serde(deserialize_with = "epoch_millis_date")]
    pub tanggal: Date,
    pub waktu_mulai: String,
    pub waktu_selesai: String,
    pub lokasi: String,
    pub participant_ids: Vec<String>,
}

/// Payload of `saveLeaveRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveArgs {
    pub leave_type: String,
    #[serde(deserialize_with = "epoch_millis_date")]
    pub start_date: Date,
    #[serde(deserialize_with = "epoch_millis_date")]
    pub end_date: Date,
    pub reason: String,
}

/// Payload of `approveLeaveRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDecisionArgs {
    pub leave_request_id: u64,
    pub notes: String,
    pub action: String,
}

impl LeaveDecisionArgs {
    /// Only the exact word `approve` approves; anything else rejects.
    pub fn approves(&self) -> bool {
        self.action == "approve"
    }
}

/// Decodes `data` into the payload `action` requires.
///
/// # Errors
///
/// Returns [`DispatchError::InvalidArguments`] when a field is missing or has
/// the wrong type.
pub fn decode_args<T: DeserializeOwned>(action: Action, data: Value) -> Result<T, DispatchError> {
    serde_json::from_value(data)
        .map_err(|error| DispatchError::invalid_arguments(action.as_str(), &error))
}

/// Reads epoch milliseconds and keeps the UTC calendar day.
fn epoch_millis_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let millis = i64::deserialize(deserializer)?;
    date_from_epoch_millis(millis).ok_or_else(|| {
        serde::de::Error::custom(format!("timestamp {millis} is out of range"))
    })
}

pub(crate) fn date_from_epoch_millis(millis: i64) -> Option<Date> {
    let nanos = i128::from(millis).checked_mul(1_000_000)?;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .map(OffsetDateTime::date)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;
    use time::Month;

    use super::*;

    #[test]
    fn decodes_login_payload() {
        let args: LoginArgs = decode_args(
            Action::Login,
            json!({"employeeId": "EMP001", "password": "secret"}),
        )
        .expect("login decodes");
        assert_eq!(
            args,
            LoginArgs {
                employee_id: "EMP001".to_owned(),
                password: "secret".to_owned(),
            }
        );
    }

    #[test]
    fn converts_epoch_millis_to_utc_dates() {
        let leave: LeaveArgs = decode_args(
            Action::SaveLeaveRequest,
            json!({
                "leaveType": "annual",
                "startDate": 1_704_067_200_000_i64,
                "endDate": 1_704_239_999_000_i64,
                "reason": "family visit",
            }),
        )
        .expect("leave decodes");
        assert_eq!(
            leave.start_date,
            Date::from_calendar_date(2024, Month::January, 1).expect("valid date")
        );
        assert_eq!(
            leave.end_date,
            Date::from_calendar_date(2024, Month::January, 2).expect("valid date")
        );
    }

    #[test]
    fn ignores_extra_fields() {
        let query: AttendanceQuery = decode_args(
            Action::GetAttendance,
            json!({"employeeId": "EMP003", "page": 2}),
        )
        .expect("extra fields are ignored");
        assert_eq!(query.employee_id, "EMP003");
    }

    fn rejection(action: Action, data: Value) -> DispatchError {
        let outcome = match action {
            Action::Login => decode_args::<LoginArgs>(action, data).map(drop),
            Action::UpdateKpi => decode_args::<KpiArgs>(action, data).map(drop),
            Action::UploadReport => decode_args::<ReportArgs>(action, data).map(drop),
            Action::SaveMeeting => decode_args::<MeetingArgs>(action, data).map(drop),
            Action::ApproveLeaveRequest => {
                decode_args::<LeaveDecisionArgs>(action, data).map(drop)
            }
            _ => decode_args::<AttendanceArgs>(action, data).map(drop),
        };
        outcome.expect_err("payload should be rejected")
    }

    #[rstest]
    #[case(Action::Login, json!({"employeeId": "EMP001"}))]
    #[case(Action::UpdateKpi, json!({"divisi": "IT", "bulan": "May", "tahun": 2024, "score": 90.0}))]
    #[case(Action::UpdateKpi, json!({"divisi": "IT", "bulan": 5.0, "tahun": 2024, "score": 90.0}))]
    #[case(Action::UploadReport, json!({"divisi": "IT", "bulan": 5, "tahun": 2024}))]
    #[case(Action::SaveMeeting, json!({"title": "Sync", "tanggal": "tomorrow"}))]
    #[case(Action::ApproveLeaveRequest, json!({"leaveRequestId": -1, "notes": "", "action": "approve"}))]
    #[case(Action::SaveAttendance, json!([]))]
    fn rejects_mismatched_payloads(#[case] action: Action, #[case] data: Value) {
        let error = rejection(action, data);
        assert!(
            matches!(error, DispatchError::InvalidArguments { action: name, .. } if name == action.as_str())
        );
    }

    #[rstest]
    #[case("approve", true)]
    #[case("reject", false)]
    #[case("Approve", false)]
    #[case("", false)]
    fn only_exact_approve_approves(#[case] word: &str, #[case] approves: bool) {
        let args = LeaveDecisionArgs {
            leave_request_id: 1,
            notes: String::new(),
            action: word.to_owned(),
        };
        assert_eq!(args.approves(), approves);
    }

    #[test]
    fn rejects_out_of_range_timestamps() {
        assert!(date_from_epoch_millis(i64::MAX).is_none());
        assert!(date_from_epoch_millis(0).is_some());
    }
}
