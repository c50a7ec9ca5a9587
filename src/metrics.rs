//! Derived metrics over a financial profile
//!
//! Everything here is a pure function of the profile. Nothing is cached.

use crate::currency::format_amount;
use crate::models::FinancialProfile;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BudgetCategory {
    Expenses,
    #[serde(rename = "EMIs")]
    Emis,
    Savings,
    Surplus,
}

impl BudgetCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BudgetCategory::Expenses => "Expenses",
            BudgetCategory::Emis => "EMIs",
            BudgetCategory::Savings => "Savings",
            BudgetCategory::Surplus => "Surplus",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetSlice {
    pub category: BudgetCategory,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub total_savings: f64,
    pub total_outflow: f64,
    pub surplus: f64,
    pub shortfall: f64,
    pub savings_ratio: f64,
    pub health_expense_ratio: f64,
    pub monthly_insurance_premiums: f64,
    pub budget_split: Vec<BudgetSlice>,
}

impl FinancialProfile {
    pub fn total_savings(&self) -> f64 {
        self.savings.entries().iter().map(|(_, amount)| amount).sum()
    }

    pub fn total_outflow(&self) -> f64 {
        self.monthly_expenses + self.monthly_emi + self.total_savings()
    }

    /// Income left after outflow, clamped at zero.
    ///
    /// Over-budget profiles report 0 here; the gap is in [`Self::shortfall`].
    pub fn surplus(&self) -> f64 {
        (self.monthly_income - self.total_outflow()).max(0.0)
    }

    pub fn shortfall(&self) -> f64 {
        (self.total_outflow() - self.monthly_income).max(0.0)
    }

    /// Share of income going to savings; 0 without income.
    pub fn savings_ratio(&self) -> f64 {
        ratio(self.total_savings(), self.monthly_income)
    }

    pub fn health_expense_ratio(&self) -> f64 {
        ratio(self.health_expenses, self.monthly_income)
    }

    pub fn monthly_insurance_premiums(&self) -> f64 {
        self.term_insurance.monthly_premium() + self.life_insurance.monthly_premium()
    }

    /// Expenses, EMIs, savings and surplus, skipping non-positive entries.
    pub fn budget_split(&self) -> Vec<BudgetSlice> {
        [
            (BudgetCategory::Expenses, self.monthly_expenses),
            (BudgetCategory::Emis, self.monthly_emi),
            (BudgetCategory::Savings, self.total_savings()),
            (BudgetCategory::Surplus, self.surplus()),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .map(|(category, amount)| BudgetSlice { category, amount })
        .collect()
    }

    pub fn metrics(&self) -> DerivedMetrics {
        DerivedMetrics {
            total_savings: self.total_savings(),
            total_outflow: self.total_outflow(),
            surplus: self.surplus(),
            shortfall: self.shortfall(),
            savings_ratio: self.savings_ratio(),
            health_expense_ratio: self.health_expense_ratio(),
            monthly_insurance_premiums: self.monthly_insurance_premiums(),
            budget_split: self.budget_split(),
        }
    }

    /// Format an amount in this profile's currency.
    pub fn format(&self, amount: f64) -> String {
        format_amount(amount, self.currency.as_str())
    }
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole
    } else {
        0.0
    }
}
