//! Attendance window: when an employee may mark attendance, and the checks
//! run before a mark is forwarded to the backend.

pub mod clock;
pub mod gate;
pub mod history;
pub mod monitor;
pub mod window;
