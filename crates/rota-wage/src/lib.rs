//! Wage/overtime computation and week aggregation for Rota.
//!
//! Everything in this crate is a pure, synchronous function over
//! pre-sorted snapshots: no suspension points, no clocks, no global
//! calendar state. The mutation engine and the API layer call in with
//! explicit shift slices and policies.

pub mod aggregate;
pub mod calc;

pub use aggregate::{UpdatesCount, aggregate_week, updates_count};
pub use calc::{EmployeeWeekWages, ShiftWage, employee_week_wages};
