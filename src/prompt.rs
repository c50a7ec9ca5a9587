//! Natural-language prompt for the advice provider
//!
//! Pure templating. The guidance rules at the end are hints for the
//! provider; nothing here evaluates them.

use crate::models::{FinancialProfile, InsurancePolicy};

const ADVISOR_ROLE: &str =
    "Act as a professional personal finance advisor. Analyze this data to provide a risk assessment:";

const GUIDANCE_RULES: &[&str] = &[
    "If Savings < 20% of Income, warn: \"You are not saving enough for emergencies.\"",
    "If Health Expenses > 10% of Income and hasHealthInsurance is false, warn: \"Your health expenses are high. You should consider a health insurance plan.\"",
    "If Dependents > 0 and Term Insurance hasPolicy is false, warn: \"You do not have term insurance, which is risky for a family with dependents.\"",
    "Provide exactly 3 Smart Actions.",
    "Financial Risk Level must be one of: Low, Medium, High.",
];

/// Render every profile field into the analysis prompt.
pub fn build_prompt(profile: &FinancialProfile) -> String {
    let money = |amount: f64| profile.format(amount);
    let s = &profile.savings;

    let mut out = format!(
        r#"{role}
- Currency: {currency}
- Monthly Income: {income}
- Total Monthly Savings: {total_savings}
  (General Savings: {general}, MFs: {mfs}, FDs: {fds}, Bank: {bank}, Gold: {gold})
- Monthly Expenses: {expenses}
- Monthly EMI/Loans: {emi}
- Monthly Health Expenses: {health}
- Has Health Insurance: hasHealthInsurance={has_health}
- Term Insurance: {term}
- Life Insurance: {life}
- Dependents: {dependents}

Derived figures:
- Total Monthly Outflow: {outflow}
- Monthly Surplus: {surplus}
- Monthly Shortfall: {shortfall}
- Savings Ratio: {savings_ratio:.1}% of income
- Health Expense Ratio: {health_ratio:.1}% of income
"#,
        role = ADVISOR_ROLE,
        currency = profile.currency,
        income = money(profile.monthly_income),
        total_savings = money(profile.total_savings()),
        general = money(s.general_savings),
        mfs = money(s.mutual_funds),
        fds = money(s.fixed_deposits),
        bank = money(s.bank_savings),
        gold = money(s.gold),
        expenses = money(profile.monthly_expenses),
        emi = money(profile.monthly_emi),
        health = money(profile.health_expenses),
        has_health = profile.has_health_insurance,
        term = describe_policy(profile, &profile.term_insurance),
        life = describe_policy(profile, &profile.life_insurance),
        dependents = profile.dependent_count(),
        outflow = money(profile.total_outflow()),
        surplus = money(profile.surplus()),
        shortfall = money(profile.shortfall()),
        savings_ratio = profile.savings_ratio() * 100.0,
        health_ratio = profile.health_expense_ratio() * 100.0,
    );

    if !profile.goals.is_empty() {
        out.push_str("\nFinancial goals:\n");
        for goal in &profile.goals {
            out.push_str(&format!(
                "- {}: {} in {} years\n",
                goal.name,
                money(goal.target_amount),
                goal.years
            ));
        }
    }

    out.push_str("\nSpecific logic to apply:\n");
    for (i, rule) in GUIDANCE_RULES.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, rule));
    }
    if !profile.goals.is_empty() {
        out.push_str(&format!(
            "{}. For every goal, report goalFeasibility with goalName, isFeasible and a suggestion.\n",
            GUIDANCE_RULES.len() + 1
        ));
    }

    out.push_str("\nProvide response in JSON format.");
    out
}

fn describe_policy(profile: &FinancialProfile, policy: &InsurancePolicy) -> String {
    if policy.has_policy {
        format!(
            "hasPolicy=true (Premium: {} {})",
            profile.format(policy.premium),
            policy.frequency
        )
    } else {
        "hasPolicy=false".to_string()
    }
}
