//! Pension pot growth over a fixed horizon

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Years covered by a projection
pub const PROJECTION_YEARS: u32 = 25;

/// Pot size that marks the milestone row
pub const MILESTONE_BALANCE: Decimal = dec!(1000000);

/// One year of a projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionRow {
    pub year: u32,
    pub age: u32,
    pub contribution: Decimal,
    pub start_balance: Decimal,
    pub growth: Decimal,
    pub end_balance: Decimal,
    /// First year the pot reaches the milestone balance
    pub is_milestone_row: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub rows: Vec<ProjectionRow>,
}

impl Projection {
    /// The row that first reached the milestone, if any
    pub fn milestone(&self) -> Option<&ProjectionRow> {
        self.rows.iter().find(|row| row.is_milestone_row)
    }

    pub fn final_balance(&self) -> Decimal {
        self.rows.last().map_or(Decimal::ZERO, |row| row.end_balance)
    }

    pub fn total_contributions(&self) -> Decimal {
        self.rows.iter().map(|row| row.contribution).sum()
    }

    pub fn total_growth(&self) -> Decimal {
        self.rows.iter().map(|row| row.growth).sum()
    }
}

/// Project a pension pot year by year.
///
/// Growth is earned on the opening balance, then the year's contribution is
/// added. Only the first year to end at or above the milestone is flagged.
pub fn project_pension(
    start_balance: Decimal,
    annual_contribution: Decimal,
    growth_rate_percent: Decimal,
    start_age: u32,
) -> Projection {
    let rate = growth_rate_percent / dec!(100);
    let mut balance = start_balance;
    let mut milestone_reached = false;

    let rows = (1..=PROJECTION_YEARS)
        .map(|year| {
            let start = balance;
            let growth = start.saturating_mul(rate);
            balance = start.saturating_add(growth).saturating_add(annual_contribution);

            let is_milestone_row = !milestone_reached && balance >= MILESTONE_BALANCE;
            if is_milestone_row {
                milestone_reached = true;
                log::debug!("Pension reaches {} in year {}", MILESTONE_BALANCE, year);
            }

            ProjectionRow {
                year,
                age: start_age.saturating_add(year - 1),
                contribution: annual_contribution,
                start_balance: start,
                growth,
                end_balance: balance,
                is_milestone_row,
            }
        })
        .collect();

    Projection { rows }
}
