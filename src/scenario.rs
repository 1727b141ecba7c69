//! Full take-home breakdown for one set of inputs, and the pension comparison set

use crate::input::ScenarioInput;
use crate::tax::corporation::{self, ProfitBand};
use crate::tax::{employer_ni, split_dividends, TaxYear, FIXED_SALARY};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Every figure derived from one scenario input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioResult {
    /// Tax year whose rates were applied
    pub tax_year: TaxYear,
    pub salary: Decimal,
    pub turnover: Decimal,
    pub pension: Decimal,
    pub employer_ni: Decimal,
    pub yearly_expenses: Decimal,
    pub profit: Decimal,
    pub profit_band: ProfitBand,
    pub corporation_tax: Decimal,
    pub after_tax_profit: Decimal,
    pub basic_band_dividend: Decimal,
    pub basic_band_tax: Decimal,
    pub higher_band_dividend: Decimal,
    pub higher_band_tax: Decimal,
    pub total_dividend_tax: Decimal,
    pub net_dividend: Decimal,
    pub annual_net_cash: Decimal,
    pub monthly_net_cash: Decimal,
    /// Net cash plus the pension contribution
    pub total_annual_value: Decimal,
    pub total_tax_and_ni: Decimal,
    /// Share of turnover lost to tax and NI. None for zero turnover.
    pub effective_tax_rate: Option<Decimal>,
    /// None when there is no profit
    pub corporation_tax_effective_rate: Option<Decimal>,
    pub marginal_corporation_tax_rate: Decimal,
    pub basic_dividend_rate: Decimal,
    pub higher_dividend_rate: Decimal,
}

/// Run the full calculation for one input.
///
/// Order: employer NI, profit, corporation tax, dividend split, net figures, rates.
pub fn run_scenario(input: &ScenarioInput) -> ScenarioResult {
    let rates = input.tax_year.rates();
    let salary = FIXED_SALARY;

    let employer_ni = employer_ni(salary);
    let profit = input
        .turnover
        .saturating_sub(salary)
        .saturating_sub(employer_ni)
        .saturating_sub(input.annual_pension)
        .saturating_sub(input.yearly_expenses);
    let corporation_tax = corporation::corporation_tax(profit);
    let after_tax_profit = profit.saturating_sub(corporation_tax);

    let dividends = split_dividends(after_tax_profit, salary, rates);
    let total_dividend_tax = dividends.total_tax();
    let net_dividend = after_tax_profit.saturating_sub(total_dividend_tax);

    let annual_net_cash = salary.saturating_add(net_dividend);
    let total_tax_and_ni = employer_ni
        .saturating_add(corporation_tax)
        .saturating_add(total_dividend_tax);
    // A turnover too small to divide by has no meaningful rate either
    let effective_tax_rate = if input.turnover > Decimal::ZERO {
        total_tax_and_ni.checked_div(input.turnover)
    } else {
        None
    };

    log::debug!(
        "Scenario turnover={} pension={} expenses={} ({}): profit={}, net cash={}",
        input.turnover,
        input.annual_pension,
        input.yearly_expenses,
        rates.year,
        profit,
        annual_net_cash
    );

    ScenarioResult {
        tax_year: rates.year,
        salary,
        turnover: input.turnover,
        pension: input.annual_pension,
        employer_ni,
        yearly_expenses: input.yearly_expenses,
        profit,
        profit_band: ProfitBand::for_profit(profit),
        corporation_tax,
        after_tax_profit,
        basic_band_dividend: dividends.basic_band_dividend,
        basic_band_tax: dividends.basic_band_tax,
        higher_band_dividend: dividends.higher_band_dividend,
        higher_band_tax: dividends.higher_band_tax,
        total_dividend_tax,
        net_dividend,
        annual_net_cash,
        monthly_net_cash: annual_net_cash / dec!(12),
        total_annual_value: annual_net_cash.saturating_add(input.annual_pension),
        total_tax_and_ni,
        effective_tax_rate,
        corporation_tax_effective_rate: corporation::effective_rate(profit),
        marginal_corporation_tax_rate: corporation::marginal_rate(profit),
        basic_dividend_rate: rates.basic_dividend_rate,
        higher_dividend_rate: rates.higher_dividend_rate,
    }
}

/// Columns of the pension comparison, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    NoPension,
    Pension18k,
    Pension21k,
    Pension24k,
    Custom,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 5] = [
        ScenarioKind::NoPension,
        ScenarioKind::Pension18k,
        ScenarioKind::Pension21k,
        ScenarioKind::Pension24k,
        ScenarioKind::Custom,
    ];

    /// Fixed pension for a preset. The custom column uses the caller's figure.
    pub fn preset_pension(&self) -> Option<Decimal> {
        match self {
            ScenarioKind::NoPension => Some(Decimal::ZERO),
            ScenarioKind::Pension18k => Some(dec!(18000)),
            ScenarioKind::Pension21k => Some(dec!(21000)),
            ScenarioKind::Pension24k => Some(dec!(24000)),
            ScenarioKind::Custom => None,
        }
    }

    pub fn display(&self) -> &'static str {
        match self {
            ScenarioKind::NoPension => "No Pension",
            ScenarioKind::Pension18k => "£18k Pension",
            ScenarioKind::Pension21k => "£21k Pension",
            ScenarioKind::Pension24k => "£24k Pension",
            ScenarioKind::Custom => "Custom",
        }
    }
}

/// The same turnover, expenses and tax year run at each preset pension and the custom one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioSet {
    pub no_pension: ScenarioResult,
    pub pension_18k: ScenarioResult,
    pub pension_21k: ScenarioResult,
    pub pension_24k: ScenarioResult,
    pub custom: ScenarioResult,
}

impl ScenarioSet {
    pub fn get(&self, kind: ScenarioKind) -> &ScenarioResult {
        match kind {
            ScenarioKind::NoPension => &self.no_pension,
            ScenarioKind::Pension18k => &self.pension_18k,
            ScenarioKind::Pension21k => &self.pension_21k,
            ScenarioKind::Pension24k => &self.pension_24k,
            ScenarioKind::Custom => &self.custom,
        }
    }

    /// Results in display order
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioKind, &ScenarioResult)> {
        ScenarioKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// Run the comparison set. `input.annual_pension` is the custom pension.
pub fn run_scenario_set(input: &ScenarioInput) -> ScenarioSet {
    let run = |kind: ScenarioKind| {
        let pension = kind.preset_pension().unwrap_or(input.annual_pension);
        run_scenario(&input.with_pension(pension))
    };

    ScenarioSet {
        no_pension: run(ScenarioKind::NoPension),
        pension_18k: run(ScenarioKind::Pension18k),
        pension_21k: run(ScenarioKind::Pension21k),
        pension_24k: run(ScenarioKind::Pension24k),
        custom: run(ScenarioKind::Custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PensionContribution;
    use proptest::prelude::*;

    fn input(turnover: Decimal, pension: Decimal, expenses: Decimal) -> ScenarioInput {
        ScenarioInput::from_turnover(
            turnover,
            PensionContribution::Annual(pension),
            expenses,
            TaxYear(2025),
        )
    }

    #[test]
    fn scenario_a_marginal_relief() {
        let result = run_scenario(&input(dec!(100000), Decimal::ZERO, Decimal::ZERO));

        assert_eq!(result.employer_ni, dec!(1135.5));
        assert_eq!(result.profit, dec!(86294.5));
        assert_eq!(result.profit_band, ProfitBand::MarginalRelief);
        assert_eq!(result.corporation_tax, dec!(19118.0425));
        assert_eq!(result.corporation_tax.round(), dec!(19118));
        assert_eq!(result.after_tax_profit, dec!(67176.4575));

        assert_eq!(result.basic_band_dividend, dec!(37700));
        assert_eq!(result.basic_band_tax, dec!(3255));
        assert_eq!(result.higher_band_dividend, dec!(29476.4575));
        assert_eq!(result.higher_band_tax, dec!(29476.4575) * dec!(0.3375));
        assert_eq!(
            result.total_dividend_tax,
            result.basic_band_tax + result.higher_band_tax
        );
        assert_eq!(
            result.net_dividend,
            result.after_tax_profit - result.total_dividend_tax
        );
        assert_eq!(result.annual_net_cash, FIXED_SALARY + result.net_dividend);
        assert!((result.monthly_net_cash * dec!(12) - result.annual_net_cash).abs() < dec!(0.000001));
        assert_eq!(result.total_annual_value, result.annual_net_cash);
        assert_eq!(
            result.total_tax_and_ni,
            result.employer_ni + result.corporation_tax + result.total_dividend_tax
        );
        assert_eq!(
            result.effective_tax_rate,
            Some(result.total_tax_and_ni / dec!(100000))
        );
        assert_eq!(result.marginal_corporation_tax_rate, dec!(0.265));
        assert_eq!(result.basic_dividend_rate, dec!(0.0875));
        assert_eq!(result.higher_dividend_rate, dec!(0.3375));
    }

    #[test]
    fn scenario_b_main_rate() {
        let result = run_scenario(&input(dec!(500000), Decimal::ZERO, Decimal::ZERO));
        assert!(result.profit >= dec!(250000));
        assert_eq!(result.profit_band, ProfitBand::Main);
        assert_eq!(result.corporation_tax, result.profit * dec!(0.25));
        assert_eq!(result.marginal_corporation_tax_rate, dec!(0.25));
    }

    #[test]
    fn pension_adds_to_total_value() {
        let result = run_scenario(&input(dec!(100000), dec!(24000), dec!(3000)));
        assert_eq!(result.profit, dec!(100000) - dec!(12570) - dec!(1135.5) - dec!(27000));
        assert_eq!(result.total_annual_value, result.annual_net_cash + dec!(24000));
    }

    #[test]
    fn zero_turnover_has_no_effective_rate() {
        let result = run_scenario(&ScenarioInput::default());
        assert_eq!(result.effective_tax_rate, None);
        assert_eq!(result.corporation_tax, Decimal::ZERO);
        assert_eq!(result.corporation_tax_effective_rate, None);
        assert_eq!(result.marginal_corporation_tax_rate, dec!(0.19));
    }

    #[test]
    fn loss_making_company_pays_no_tax() {
        let result = run_scenario(&input(dec!(10000), Decimal::ZERO, dec!(5000)));
        assert!(result.profit < Decimal::ZERO);
        assert_eq!(result.corporation_tax, Decimal::ZERO);
        assert_eq!(result.after_tax_profit, result.profit);
        assert_eq!(result.basic_band_dividend, result.profit);
        assert_eq!(result.higher_band_dividend, Decimal::ZERO);
        assert_eq!(result.total_dividend_tax, Decimal::ZERO);
        assert!(result.annual_net_cash < FIXED_SALARY);
    }

    #[test]
    fn negative_inputs_do_not_panic() {
        let result = run_scenario(&input(dec!(-50000), dec!(-1000), dec!(-20)));
        assert_eq!(result.effective_tax_rate, None);
        assert_eq!(result.corporation_tax, Decimal::ZERO);
    }

    #[test]
    fn negative_extreme_inputs_do_not_panic() {
        let result = run_scenario(&input(-Decimal::MAX, Decimal::ZERO, Decimal::ZERO));
        assert_eq!(result.profit, Decimal::MIN);
        assert_eq!(result.corporation_tax, Decimal::ZERO);
        assert_eq!(result.total_dividend_tax, Decimal::ZERO);
        assert_eq!(result.effective_tax_rate, None);

        let result = run_scenario(&input(Decimal::ZERO, Decimal::MAX, Decimal::MAX));
        assert_eq!(result.profit, Decimal::MIN);
        assert_eq!(result.total_dividend_tax, Decimal::ZERO);
    }

    #[test]
    fn positive_extreme_inputs_saturate() {
        let result = run_scenario(&input(Decimal::MAX, -Decimal::MAX, Decimal::ZERO));
        assert_eq!(result.profit, Decimal::MAX);
        assert_eq!(result.profit_band, ProfitBand::Main);
        assert!(result.corporation_tax > Decimal::ZERO);
        assert!(result.effective_tax_rate.is_some());
    }

    #[test]
    fn turnover_too_small_to_divide_by_has_no_effective_rate() {
        let result = run_scenario(&input(
            dec!(0.00000000000000000000000001),
            Decimal::ZERO,
            Decimal::ZERO,
        ));
        assert_eq!(result.effective_tax_rate, None);
    }

    #[test]
    fn unknown_tax_year_uses_default_rates() {
        let mut base = input(dec!(100000), Decimal::ZERO, Decimal::ZERO);
        base.tax_year = TaxYear(2040);
        let result = run_scenario(&base);
        assert_eq!(result.tax_year, TaxYear::DEFAULT);
        assert_eq!(result.basic_dividend_rate, dec!(0.0875));
    }

    #[test]
    fn later_tax_year_takes_more_dividend_tax() {
        let mut base = input(dec!(100000), Decimal::ZERO, Decimal::ZERO);
        let earlier = run_scenario(&base);
        base.tax_year = TaxYear(2026);
        let later = run_scenario(&base);
        assert_eq!(later.corporation_tax, earlier.corporation_tax);
        assert!(later.total_dividend_tax > earlier.total_dividend_tax);
    }

    #[test]
    fn scenario_set_varies_only_pension() {
        let set = run_scenario_set(&input(dec!(120000), dec!(9000), dec!(4000)));
        let pensions: Vec<_> = set.iter().map(|(_, r)| r.pension).collect();
        assert_eq!(
            pensions,
            vec![dec!(0), dec!(18000), dec!(21000), dec!(24000), dec!(9000)]
        );
        for (kind, result) in set.iter() {
            assert_eq!(result.turnover, dec!(120000), "{:?}", kind);
            assert_eq!(result.yearly_expenses, dec!(4000), "{:?}", kind);
        }
        assert_eq!(
            set.get(ScenarioKind::Custom),
            &run_scenario(&input(dec!(120000), dec!(9000), dec!(4000)))
        );
    }

    #[test]
    fn scenario_set_serialises_columns() {
        let set = run_scenario_set(&input(dec!(80000), Decimal::ZERO, Decimal::ZERO));
        let json = serde_json::to_value(&set).unwrap();
        for key in ["no_pension", "pension_18k", "pension_21k", "pension_24k", "custom"] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_rerun_is_identical(
            turnover in 0i64..100_000_000,
            pension in 0i64..6_000_000,
            expenses in 0i64..5_000_000,
            year in 2024i32..2028
        ) {
            let mut base = input(
                Decimal::new(turnover, 2),
                Decimal::new(pension, 2),
                Decimal::new(expenses, 2),
            );
            base.tax_year = TaxYear(year);
            let first = run_scenario(&base);
            let second = run_scenario(&base);
            prop_assert_eq!(format!("{:?}", first), format!("{:?}", second));
        }

        #[test]
        fn prop_accounting_identities_hold(
            turnover in 0i64..100_000_000,
            pension in 0i64..6_000_000
        ) {
            let r = run_scenario(&input(
                Decimal::new(turnover, 2),
                Decimal::new(pension, 2),
                Decimal::ZERO,
            ));
            prop_assert_eq!(
                r.profit,
                r.turnover - r.salary - r.employer_ni - r.pension - r.yearly_expenses
            );
            prop_assert_eq!(r.total_dividend_tax, r.basic_band_tax + r.higher_band_tax);
            prop_assert_eq!(r.net_dividend, r.after_tax_profit - r.total_dividend_tax);
            prop_assert_eq!(r.annual_net_cash, r.salary + r.net_dividend);
            if r.after_tax_profit >= Decimal::ZERO {
                prop_assert_eq!(
                    r.basic_band_dividend + r.higher_band_dividend,
                    r.after_tax_profit
                );
            }
        }
    }
}
