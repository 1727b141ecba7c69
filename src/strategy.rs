//! Tax-efficiency strategies estimated from a scenario result.
//!
//! Each strategy is a row in a table: a cost basis, the formula that turns it
//! into a saving, and when it can be applied. Every strategy is evaluated the
//! same way, so adding one means adding a row.

use crate::input::ScenarioInput;
use crate::scenario::ScenarioResult;
use crate::tax::corporation::LOWER_LIMIT;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Personal tax avoided on a benefit instead of paying it out as a higher rate
/// dividend. Illustrative, not taken from the scenario's tax year.
pub const ILLUSTRATIVE_PERSONAL_RATE: Decimal = dec!(0.3375);

/// Annual cost of an electric car leased through the company
pub const ELECTRIC_VEHICLE_COST: Decimal = dec!(7200);

/// Trivial benefits allowance for a director
pub const TRIVIAL_BENEFITS_COST: Decimal = dec!(300);

/// HMRC flat rate for working from home (£6 a week)
pub const HOME_FLAT_RATE_COST: Decimal = dec!(312);

/// Formal rental agreement for business use of home
pub const HOME_RENTAL_COST: Decimal = dec!(2400);

/// Annual function allowance for two attendees
pub const STAFF_PARTY_COST: Decimal = dec!(300); // 2 x £150

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    ProfitBanding,
    ElectricVehicle,
    TrivialBenefits,
    UseOfHome,
    AnnualParty,
}

impl StrategyId {
    pub fn title(&self) -> &'static str {
        match self {
            StrategyId::ProfitBanding => "Pension to lower profit limit",
            StrategyId::ElectricVehicle => "Electric vehicle lease",
            StrategyId::TrivialBenefits => "Trivial benefits",
            StrategyId::UseOfHome => "Use of home as office",
            StrategyId::AnnualParty => "Annual staff party",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyId::ProfitBanding => {
                "Top up the employer pension until profit falls to the small profits limit"
            }
            StrategyId::ElectricVehicle => {
                "Lease a zero-emission car through the company (low benefit-in-kind)"
            }
            StrategyId::TrivialBenefits => "Up to six £50 gifts a year, tax free",
            StrategyId::UseOfHome => "Rent part of your home to the company instead of the flat rate",
            StrategyId::AnnualParty => "£150 per head for an annual function, tax free",
        }
    }
}

/// How a strategy's saving is worked out
#[derive(Debug, Clone, Copy)]
enum SavingFormula {
    /// Pension needed to bring profit down to the lower limit, relieved at the marginal rate
    PensionToLowerLimit,
    /// A deductible company cost that would otherwise be drawn as a dividend
    DeductibleBenefit { cost: Decimal },
    /// Extra relief from replacing a baseline deduction with a larger one
    IncrementalDeduction { baseline: Decimal, alternative: Decimal },
}

/// When a strategy can be applied to the inputs directly
#[derive(Debug, Clone, Copy)]
enum Applicability {
    ProfitAboveLowerLimit,
    /// Shown as an estimate only
    Informational,
}

#[derive(Debug, Clone, Copy)]
struct StrategyDescriptor {
    id: StrategyId,
    formula: SavingFormula,
    applicability: Applicability,
}

const STRATEGIES: [StrategyDescriptor; 5] = [
    StrategyDescriptor {
        id: StrategyId::ProfitBanding,
        formula: SavingFormula::PensionToLowerLimit,
        applicability: Applicability::ProfitAboveLowerLimit,
    },
    StrategyDescriptor {
        id: StrategyId::ElectricVehicle,
        formula: SavingFormula::DeductibleBenefit {
            cost: ELECTRIC_VEHICLE_COST,
        },
        applicability: Applicability::Informational,
    },
    StrategyDescriptor {
        id: StrategyId::TrivialBenefits,
        formula: SavingFormula::DeductibleBenefit {
            cost: TRIVIAL_BENEFITS_COST,
        },
        applicability: Applicability::Informational,
    },
    StrategyDescriptor {
        id: StrategyId::UseOfHome,
        formula: SavingFormula::IncrementalDeduction {
            baseline: HOME_FLAT_RATE_COST,
            alternative: HOME_RENTAL_COST,
        },
        applicability: Applicability::Informational,
    },
    StrategyDescriptor {
        id: StrategyId::AnnualParty,
        formula: SavingFormula::DeductibleBenefit {
            cost: STAFF_PARTY_COST,
        },
        applicability: Applicability::Informational,
    },
];

/// Estimated saving from one strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strategy {
    pub id: StrategyId,
    pub estimated_annual_saving: Decimal,
    /// Whether the strategy can be applied to the current inputs
    pub applicable: bool,
    /// Total annual pension to use when the strategy is applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_pension_target: Option<Decimal>,
}

impl StrategyDescriptor {
    fn evaluate(&self, result: &ScenarioResult) -> Strategy {
        let marginal_rate = result.marginal_corporation_tax_rate;
        let applicable = match self.applicability {
            Applicability::ProfitAboveLowerLimit => result.profit > LOWER_LIMIT,
            Applicability::Informational => false,
        };

        let (estimated_annual_saving, applied_pension_target) = match self.formula {
            SavingFormula::PensionToLowerLimit if applicable => {
                let pension_needed = result.profit - LOWER_LIMIT;
                (
                    pension_needed * marginal_rate,
                    Some(pension_needed.saturating_add(result.pension)),
                )
            }
            SavingFormula::PensionToLowerLimit => (Decimal::ZERO, None),
            SavingFormula::DeductibleBenefit { cost } => (
                cost * marginal_rate + cost * ILLUSTRATIVE_PERSONAL_RATE,
                None,
            ),
            SavingFormula::IncrementalDeduction {
                baseline,
                alternative,
            } => (
                alternative * marginal_rate - baseline * marginal_rate,
                None,
            ),
        };

        Strategy {
            id: self.id,
            estimated_annual_saving,
            applicable,
            applied_pension_target,
        }
    }
}

/// Evaluate every strategy against a scenario result, in a fixed order
pub fn optimisation_strategies(result: &ScenarioResult) -> Vec<Strategy> {
    let strategies: Vec<Strategy> = STRATEGIES.iter().map(|s| s.evaluate(result)).collect();
    log::debug!(
        "{} of {} strategies applicable at marginal rate {}",
        strategies.iter().filter(|s| s.applicable).count(),
        strategies.len(),
        result.marginal_corporation_tax_rate
    );
    strategies
}

/// Inputs with an applicable strategy's pension target in place
pub fn apply_strategy(strategy: &Strategy, input: &ScenarioInput) -> Option<ScenarioInput> {
    if !strategy.applicable {
        return None;
    }
    strategy
        .applied_pension_target
        .map(|pension| input.with_pension(pension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PensionContribution;
    use crate::scenario::run_scenario;
    use crate::tax::TaxYear;

    fn input(turnover: Decimal, pension: Decimal) -> ScenarioInput {
        ScenarioInput::from_turnover(
            turnover,
            PensionContribution::Annual(pension),
            Decimal::ZERO,
            TaxYear(2025),
        )
    }

    fn find(strategies: &[Strategy], id: StrategyId) -> &Strategy {
        strategies.iter().find(|s| s.id == id).unwrap()
    }

    #[test]
    fn five_strategies_in_fixed_order() {
        let strategies = optimisation_strategies(&run_scenario(&input(dec!(100000), dec!(0))));
        let ids: Vec<_> = strategies.iter().map(|s| s.id).collect();
        assert_eq!(
            ids,
            vec![
                StrategyId::ProfitBanding,
                StrategyId::ElectricVehicle,
                StrategyId::TrivialBenefits,
                StrategyId::UseOfHome,
                StrategyId::AnnualParty,
            ]
        );
    }

    #[test]
    fn marginal_relief_band_savings() {
        let result = run_scenario(&input(dec!(100000), dec!(0)));
        let strategies = optimisation_strategies(&result);

        let banding = find(&strategies, StrategyId::ProfitBanding);
        assert!(banding.applicable);
        assert_eq!(banding.estimated_annual_saving, dec!(36294.5) * dec!(0.265));
        assert_eq!(banding.applied_pension_target, Some(dec!(36294.5)));

        let ev = find(&strategies, StrategyId::ElectricVehicle);
        assert!(!ev.applicable);
        assert_eq!(ev.estimated_annual_saving, dec!(4338)); // 1,908 + 2,430

        assert_eq!(
            find(&strategies, StrategyId::TrivialBenefits).estimated_annual_saving,
            dec!(180.75)
        );
        assert_eq!(
            find(&strategies, StrategyId::UseOfHome).estimated_annual_saving,
            dec!(553.32)
        );
        assert_eq!(
            find(&strategies, StrategyId::AnnualParty).estimated_annual_saving,
            dec!(180.75)
        );
    }

    #[test]
    fn banding_tops_up_existing_pension() {
        let result = run_scenario(&input(dec!(120000), dec!(10000)));
        let strategies = optimisation_strategies(&result);
        let banding = find(&strategies, StrategyId::ProfitBanding);
        let needed = result.profit - dec!(50000);
        assert_eq!(banding.applied_pension_target, Some(needed + dec!(10000)));
    }

    #[test]
    fn banding_not_applicable_in_small_profits_band() {
        let result = run_scenario(&input(dec!(50000), dec!(0)));
        let strategies = optimisation_strategies(&result);
        let banding = find(&strategies, StrategyId::ProfitBanding);
        assert!(!banding.applicable);
        assert_eq!(banding.estimated_annual_saving, Decimal::ZERO);
        assert_eq!(banding.applied_pension_target, None);

        // 7,200 x 19% + 7,200 x 33.75%
        assert_eq!(
            find(&strategies, StrategyId::ElectricVehicle).estimated_annual_saving,
            dec!(3798)
        );
    }

    #[test]
    fn main_rate_band_uses_main_rate() {
        let result = run_scenario(&input(dec!(400000), dec!(0)));
        let strategies = optimisation_strategies(&result);
        let banding = find(&strategies, StrategyId::ProfitBanding);
        assert_eq!(
            banding.estimated_annual_saving,
            (result.profit - dec!(50000)) * dec!(0.25)
        );
    }

    #[test]
    fn applying_banding_brings_profit_to_lower_limit() {
        let base = input(dec!(100000), dec!(5000));
        let result = run_scenario(&base);
        let strategies = optimisation_strategies(&result);

        let applied = apply_strategy(find(&strategies, StrategyId::ProfitBanding), &base).unwrap();
        let after = run_scenario(&applied);
        assert_eq!(after.profit, dec!(50000));
        assert_eq!(after.corporation_tax, dec!(9500));
        assert!(after.total_annual_value > result.total_annual_value);

        assert_eq!(
            apply_strategy(find(&strategies, StrategyId::ElectricVehicle), &base),
            None
        );
    }

    #[test]
    fn recomputed_from_scratch_each_time() {
        let result = run_scenario(&input(dec!(90000), dec!(0)));
        assert_eq!(
            optimisation_strategies(&result),
            optimisation_strategies(&result)
        );
    }
}
