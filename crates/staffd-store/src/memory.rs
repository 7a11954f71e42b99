//! In-process [`DataStore`] backed by a reader-writer lock.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::OffsetDateTime;
use tracing::debug;

use crate::records::{
    Attendance, DashboardStats, Employee, LeaveRequest, LeaveStatus, Meeting, NewAttendance,
    NewEvaluation, NewKpi, NewLeaveRequest, NewMeeting, NewMonthlyEvaluation, NewReport, Role,
    SalaryRecord,
};
use crate::{DataStore, StoreError, StoreResult};

const STORE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::memory");

#[derive(Debug, Default)]
struct State {
    employees: Vec<Employee>,
    kpis: Vec<NewKpi>,
    reports: Vec<NewReport>,
    evaluations: Vec<NewEvaluation>,
    monthly_evaluations: Vec<NewMonthlyEvaluation>,
    attendance: Vec<Attendance>,
    meetings: Vec<Meeting>,
    leave_requests: Vec<LeaveRequest>,
    salaries: Vec<SalaryRecord>,
}

impl State {
    fn has_employee(&self, employee_id: &str) -> bool {
        self.employees.iter().any(|employee| employee.id == employee_id)
    }
}

/// Thread-safe store keeping every record in memory.
///
/// Reads share the lock; writes take it exclusively. Identifiers are drawn
/// from a single counter so they stay unique across record kinds.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<State>,
    next_id: AtomicU64,
    closed: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    /// Creates a store holding a small demonstration staff.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the seed records cannot be inserted.
    pub fn with_demo_data() -> StoreResult<Self> {
        let store = Self::new();
        let staff = [
            ("EMP001", "Rina Wijaya", Role::Manager, "Operasional", "Manajer"),
            ("EMP002", "Budi Santoso", Role::Supervisor, "Operasional", "Supervisor"),
            ("EMP003", "Sari Lestari", Role::Employee, "Operasional", "Staf"),
            ("EMP004", "Dewi Anggraini", Role::Hr, "SDM", "Staf SDM"),
        ];
        for (id, name, role, divisi, jabatan) in staff {
            store.add_employee(Employee {
                id: id.to_owned(),
                name: name.to_owned(),
                email: format!("{}@example.com", id.to_ascii_lowercase()),
                role,
                divisi: divisi.to_owned(),
                jabatan: jabatan.to_owned(),
                password: "password".to_owned(),
            })?;
        }
        for month in 1..=3 {
            store.add_salary_record(SalaryRecord {
                id: 0,
                employee_id: "EMP003".to_owned(),
                month,
                year: 2024,
                base_salary: 6_000_000,
                kpi_bonus: 500_000,
                deductions: 150_000,
                total: 6_350_000,
            })?;
        }
        Ok(store)
    }

    /// Inserts or replaces an employee account.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store is closed or poisoned.
    pub fn add_employee(&self, employee: Employee) -> StoreResult<()> {
        self.write(|state| {
            state.employees.retain(|existing| existing.id != employee.id);
            state.employees.push(employee);
        })
    }

    /// Inserts a salary record, assigning it a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store is closed or poisoned.
    pub fn add_salary_record(&self, record: SalaryRecord) -> StoreResult<u64> {
        let id = self.allocate_id();
        self.write(|state| {
            state.salaries.push(SalaryRecord { id, ..record });
            id
        })
    }

    /// Reports whether [`DataStore::close`] has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.is_closed() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    fn read<R>(&self, f: impl FnOnce(&State) -> R) -> StoreResult<R> {
        self.ensure_open()?;
        let guard: RwLockReadGuard<'_, State> =
            self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&guard))
    }

    fn write<R>(&self, f: impl FnOnce(&mut State) -> R) -> StoreResult<R> {
        self.ensure_open()?;
        let mut guard: RwLockWriteGuard<'_, State> =
            self.state.write().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&mut guard))
    }

    fn decide_leave(
        &self,
        leave_request_id: u64,
        approver_id: &str,
        notes: &str,
        outcome: LeaveStatus,
    ) -> StoreResult<bool> {
        self.write(|state| {
            let Some(request) = state
                .leave_requests
                .iter_mut()
                .find(|candidate| candidate.id == leave_request_id)
            else {
                return false;
            };
            if request.status != LeaveStatus::Pending {
                return false;
            }
            request.status = outcome;
            request.approver_id = Some(approver_id.to_owned());
            request.notes = Some(notes.to_owned());
            true
        })
    }
}

const fn valid_month(month: u8) -> bool {
    month >= 1 && month <= 12
}

impl DataStore for MemoryStore {
    fn authenticate_user(
        &self,
        employee_id: &str,
        password: &str,
    ) -> StoreResult<Option<Employee>> {
        self.read(|state| {
            state
                .employees
                .iter()
                .find(|employee| employee.id == employee_id && employee.password == password)
                .cloned()
        })
    }

    fn all_employees(&self) -> StoreResult<Vec<Employee>> {
        self.read(|state| state.employees.clone())
    }

    fn save_kpi(&self, kpi: &NewKpi) -> StoreResult<bool> {
        self.write(|state| {
            let accepted = valid_month(kpi.bulan)
                && (0.0..=100.0).contains(&kpi.score)
                && state.has_employee(&kpi.manager_id);
            if accepted {
                state.kpis.push(kpi.clone());
            }
            accepted
        })
    }

    fn save_report(&self, report: &NewReport) -> StoreResult<bool> {
        self.write(|state| {
            let accepted = valid_month(report.bulan)
                && !report.file_path.trim().is_empty()
                && state.has_employee(&report.supervisor_id);
            if accepted {
                state.reports.push(report.clone());
            }
            accepted
        })
    }

    fn save_employee_evaluation(&self, evaluation: &NewEvaluation) -> StoreResult<bool> {
        self.write(|state| {
            let accepted = state.has_employee(&evaluation.employee_id);
            if accepted {
                state.evaluations.push(evaluation.clone());
            }
            accepted
        })
    }

    fn save_monthly_evaluation(&self, evaluation: &NewMonthlyEvaluation) -> StoreResult<bool> {
        self.write(|state| {
            let accepted =
                valid_month(evaluation.month) && state.has_employee(&evaluation.employee_id);
            if accepted {
                state.monthly_evaluations.push(evaluation.clone());
            }
            accepted
        })
    }

    fn attendance_by_employee(&self, employee_id: &str) -> StoreResult<Vec<Attendance>> {
        self.read(|state| {
            state
                .attendance
                .iter()
                .filter(|entry| entry.employee_id == employee_id)
                .cloned()
                .collect()
        })
    }

    fn save_attendance(&self, attendance: &NewAttendance) -> StoreResult<bool> {
        let id = self.allocate_id();
        self.write(|state| {
            let duplicate = state.attendance.iter().any(|entry| {
                entry.employee_id == attendance.employee_id && entry.date == attendance.date
            });
            if duplicate || !state.has_employee(&attendance.employee_id) {
                return false;
            }
            state.attendance.push(Attendance {
                id,
                employee_id: attendance.employee_id.clone(),
                date: attendance.date,
                jam_masuk: attendance.jam_masuk.clone(),
                jam_keluar: attendance.jam_keluar.clone(),
                status: attendance.status.clone(),
            });
            true
        })
    }

    fn dashboard_stats(&self) -> StoreResult<DashboardStats> {
        let today = OffsetDateTime::now_utc().date();
        self.read(|state| DashboardStats {
            total_employees: state.employees.len(),
            present_today: state
                .attendance
                .iter()
                .filter(|entry| entry.date == today)
                .count(),
            pending_leave_requests: state
                .leave_requests
                .iter()
                .filter(|request| request.status == LeaveStatus::Pending)
                .count(),
            total_meetings: state.meetings.len(),
            kpi_submissions: state.kpis.len(),
        })
    }

    fn meetings_by_employee(&self, employee_id: &str) -> StoreResult<Vec<Meeting>> {
        self.read(|state| {
            state
                .meetings
                .iter()
                .filter(|meeting| {
                    meeting.organizer_id == employee_id
                        || meeting.participant_ids.iter().any(|id| id == employee_id)
                })
                .cloned()
                .collect()
        })
    }

    fn save_meeting(&self, meeting: &NewMeeting) -> StoreResult<bool> {
        let id = self.allocate_id();
        self.write(|state| {
            let known = state.has_employee(&meeting.organizer_id)
                && meeting
                    .participant_ids
                    .iter()
                    .all(|participant| state.has_employee(participant));
            if !known {
                return false;
            }
            state.meetings.push(Meeting {
                id,
                title: meeting.title.clone(),
                description: meeting.description.clone(),
                date: meeting.date,
                start_time: meeting.start_time.clone(),
                end_time: meeting.end_time.clone(),
                location: meeting.location.clone(),
                organizer_id: meeting.organizer_id.clone(),
                participant_ids: meeting.participant_ids.clone(),
            });
            true
        })
    }

    fn leave_requests_by_employee(&self, employee_id: &str) -> StoreResult<Vec<LeaveRequest>> {
        self.read(|state| {
            state
                .leave_requests
                .iter()
                .filter(|request| request.employee_id == employee_id)
                .cloned()
                .collect()
        })
    }

    fn save_leave_request(&self, request: &NewLeaveRequest) -> StoreResult<bool> {
        let id = self.allocate_id();
        self.write(|state| {
            if request.end_date < request.start_date || !state.has_employee(&request.employee_id)
            {
                return false;
            }
            state.leave_requests.push(LeaveRequest {
                id,
                employee_id: request.employee_id.clone(),
                leave_type: request.leave_type.clone(),
                start_date: request.start_date,
                end_date: request.end_date,
                reason: request.reason.clone(),
                status: LeaveStatus::Pending,
                approver_id: None,
                notes: None,
            });
            true
        })
    }

    fn approve_leave_request(
        &self,
        leave_request_id: u64,
        approver_id: &str,
        notes: &str,
    ) -> StoreResult<bool> {
        self.decide_leave(leave_request_id, approver_id, notes, LeaveStatus::Approved)
    }

    fn reject_leave_request(
        &self,
        leave_request_id: u64,
        approver_id: &str,
        notes: &str,
    ) -> StoreResult<bool> {
        self.decide_leave(leave_request_id, approver_id, notes, LeaveStatus::Rejected)
    }

    fn salary_history_by_employee(&self, employee_id: &str) -> StoreResult<Vec<SalaryRecord>> {
        self.read(|state| {
            let mut history: Vec<SalaryRecord> = state
                .salaries
                .iter()
                .filter(|record| record.employee_id == employee_id)
                .cloned()
                .collect();
            history.sort_by(|left, right| (right.year, right.month).cmp(&(left.year, left.month)));
            history
        })
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!(target: STORE_TARGET, "memory store closed");
        }
    }
}
