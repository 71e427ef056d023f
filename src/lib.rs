pub mod error;
pub mod loan;
pub mod parse;
#[cfg(feature = "serde")]
pub mod record;

pub use error::LoanError;
pub use loan::{calculate, LoanSpec, MonthEntry, ScheduleResult};
pub use parse::InputValue;
