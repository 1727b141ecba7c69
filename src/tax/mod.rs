pub mod corporation;
pub mod dividend;
pub mod ni;
pub mod uk;

pub use dividend::split_dividends;
pub use ni::employer_ni;
pub use uk::{TaxYear, TaxYearRates, FIXED_SALARY};
