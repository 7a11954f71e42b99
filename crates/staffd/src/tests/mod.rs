//! Behavioural and lifecycle suites for the daemon.

mod session_behaviour;
mod support;
