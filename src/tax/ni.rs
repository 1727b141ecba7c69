use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Secondary threshold for employer Class 1 National Insurance
pub const SECONDARY_THRESHOLD: Decimal = dec!(5000);

/// Employer Class 1 National Insurance rate
pub const EMPLOYER_NI_RATE: Decimal = dec!(0.15);

/// Employer National Insurance due on an annual salary
pub fn employer_ni(salary: Decimal) -> Decimal {
    if salary <= SECONDARY_THRESHOLD {
        Decimal::ZERO
    } else {
        (salary - SECONDARY_THRESHOLD) * EMPLOYER_NI_RATE
    }
}
