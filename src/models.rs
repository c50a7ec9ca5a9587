//! Core data models for the finance advisor

use crate::currency::CurrencyCode;
use crate::error::AdvisorError;
use crate::schema::HEALTH_SCORE_RANGE;
use crate::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyFrequency {
    #[default]
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl PolicyFrequency {
    pub fn months(&self) -> u32 {
        match self {
            PolicyFrequency::Monthly => 1,
            PolicyFrequency::Quarterly => 3,
            PolicyFrequency::HalfYearly => 6,
            PolicyFrequency::Yearly => 12,
        }
    }
}

// Forms send "none" for an unset frequency; anything unrecognised is monthly.
impl<'de> Deserialize<'de> for PolicyFrequency {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref().map(str::to_lowercase).as_deref() {
            Some("quarterly") => PolicyFrequency::Quarterly,
            Some("half-yearly") | Some("half_yearly") => PolicyFrequency::HalfYearly,
            Some("yearly") | Some("annual") => PolicyFrequency::Yearly,
            _ => PolicyFrequency::Monthly,
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthStatus {
    Good,
    Average,
    Risky,
}

//
// ================= Profile =================
//

/// Monthly contributions per savings vehicle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SavingsBreakdown {
    #[serde(deserialize_with = "lenient_amount")]
    pub mutual_funds: f64,
    #[serde(deserialize_with = "lenient_amount")]
    pub fixed_deposits: f64,
    #[serde(deserialize_with = "lenient_amount")]
    pub bank_savings: f64,
    #[serde(deserialize_with = "lenient_amount")]
    pub gold: f64,
    #[serde(deserialize_with = "lenient_amount")]
    pub general_savings: f64,
}

impl SavingsBreakdown {
    /// `(field name, amount)` pairs in a fixed order.
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("mutualFunds", self.mutual_funds),
            ("fixedDeposits", self.fixed_deposits),
            ("bankSavings", self.bank_savings),
            ("gold", self.gold),
            ("generalSavings", self.general_savings),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct InsurancePolicy {
    pub has_policy: bool,
    #[serde(deserialize_with = "lenient_amount")]
    pub premium: f64,
    /// Only meaningful when `has_policy` is set.
    pub frequency: PolicyFrequency,
}

impl InsurancePolicy {
    pub fn held(premium: f64, frequency: PolicyFrequency) -> Self {
        Self {
            has_policy: true,
            premium,
            frequency,
        }
    }

    /// Premium spread over one month, or 0 when no policy is held.
    pub fn monthly_premium(&self) -> f64 {
        if !self.has_policy {
            return 0.0;
        }
        self.premium / f64::from(self.frequency.months())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialGoal {
    pub name: String,
    #[serde(deserialize_with = "lenient_amount")]
    pub target_amount: f64,
    #[serde(deserialize_with = "lenient_count")]
    pub years: u32,
}

/// User-entered financial data for one analysis.
///
/// Every field has a default so a partially filled form still produces
/// a usable profile. Missing or unparseable numbers read as 0. Negative
/// amounts and odd dependent counts are kept as given; see
/// [`FinancialProfile::validation_issues`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialProfile {
    #[serde(deserialize_with = "lenient_amount")]
    pub monthly_income: f64,
    #[serde(deserialize_with = "lenient_amount")]
    pub monthly_expenses: f64,
    #[serde(rename = "monthlyEMI", deserialize_with = "lenient_amount")]
    pub monthly_emi: f64,
    #[serde(deserialize_with = "lenient_amount")]
    pub health_expenses: f64,
    #[serde(alias = "healthInsurance", deserialize_with = "flag_or_policy")]
    pub has_health_insurance: bool,
    /// Raw count as entered. Use [`FinancialProfile::dependent_count`].
    #[serde(deserialize_with = "lenient_amount")]
    pub dependents: f64,
    pub currency: CurrencyCode,
    pub savings: SavingsBreakdown,
    pub term_insurance: InsurancePolicy,
    pub life_insurance: InsurancePolicy,
    pub goals: Vec<FinancialGoal>,
}

impl FinancialProfile {
    /// Build a profile from partial JSON; absent fields take defaults.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(AdvisorError::Validation(
                "profile must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    /// Dependents as a whole number; negative counts read as 0.
    pub fn dependent_count(&self) -> u32 {
        if self.dependents <= 0.0 {
            return 0;
        }
        self.dependents.trunc().min(f64::from(u32::MAX)) as u32
    }

    /// Inputs that a form layer would reject. The model itself accepts them.
    pub fn validation_issues(&self) -> Vec<String> {
        let mut amounts: Vec<(String, f64)> = vec![
            ("monthlyIncome".to_string(), self.monthly_income),
            ("monthlyExpenses".to_string(), self.monthly_expenses),
            ("monthlyEMI".to_string(), self.monthly_emi),
            ("healthExpenses".to_string(), self.health_expenses),
            ("termInsurance.premium".to_string(), self.term_insurance.premium),
            ("lifeInsurance.premium".to_string(), self.life_insurance.premium),
        ];
        amounts.extend(
            self.savings
                .entries()
                .iter()
                .map(|(name, amount)| (format!("savings.{}", name), *amount)),
        );
        amounts.extend(
            self.goals
                .iter()
                .map(|g| (format!("goals[{}].targetAmount", g.name), g.target_amount)),
        );

        let mut issues: Vec<String> = amounts
            .into_iter()
            .filter(|(_, amount)| !amount.is_finite() || *amount < 0.0)
            .map(|(name, amount)| format!("{} must be a non-negative amount (got {})", name, amount))
            .collect();

        if !self.dependents.is_finite() || self.dependents < 0.0 || self.dependents.fract() != 0.0 {
            issues.push(format!(
                "dependents must be a non-negative whole number (got {})",
                self.dependents
            ));
        }

        issues
    }

    pub fn ensure_valid(&self) -> Result<()> {
        let issues = self.validation_issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(AdvisorError::Validation(issues.join("; ")))
        }
    }
}

//
// ================= Advice =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalFeasibility {
    pub goal_name: String,
    pub is_feasible: bool,
    pub suggestion: String,
}

/// Structured advice returned by the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdviceResult {
    pub risk_level: RiskLevel,
    #[serde(deserialize_with = "score_0_to_100")]
    pub health_score: u8,
    pub health_status: HealthStatus,
    pub explanation: String,
    pub advice_points: Vec<String>,
    pub smart_actions: Vec<String>,
    pub warnings: Vec<String>,
    pub savings_health_score: f64,
    pub protection_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_feasibility: Option<Vec<GoalFeasibility>>,
}

//
// ================= Lenient input =================
//

fn lenient_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let amount = match raw {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if amount.is_finite() { amount } else { 0.0 })
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = lenient_amount(deserializer)?;
    if amount <= 0.0 {
        return Ok(0);
    }
    Ok(amount.trunc().min(f64::from(u32::MAX)) as u32)
}

/// Accepts `true`/`false` or the legacy `{ "hasPolicy": bool }` object.
fn flag_or_policy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Bool(b)) => b,
        Some(Value::Object(map)) => map
            .get("hasPolicy")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        _ => false,
    })
}

fn score_0_to_100<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let (min, max) = HEALTH_SCORE_RANGE;
    let score = f64::deserialize(deserializer)?;
    if score.fract() != 0.0 || !(min as f64..=max as f64).contains(&score) {
        return Err(D::Error::custom(format!(
            "healthScore must be an integer between {} and {}, got {}",
            min, max, score
        )));
    }
    Ok(score as u8)
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthStatus::Good => "Good",
            HealthStatus::Average => "Average",
            HealthStatus::Risky => "Risky",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for PolicyFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicyFrequency::Monthly => "monthly",
            PolicyFrequency::Quarterly => "quarterly",
            PolicyFrequency::HalfYearly => "half-yearly",
            PolicyFrequency::Yearly => "yearly",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_fill_partial_input() {
        let profile = FinancialProfile::from_value(json!({
            "monthlyIncome": 50000,
            "savings": { "gold": 200 }
        }))
        .unwrap();

        assert_eq!(profile.monthly_income, 50000.0);
        assert_eq!(profile.monthly_expenses, 0.0);
        assert_eq!(profile.savings.gold, 200.0);
        assert_eq!(profile.savings.mutual_funds, 0.0);
        assert_eq!(profile.currency, CurrencyCode::Inr);
        assert!(!profile.has_health_insurance);
        assert_eq!(profile.term_insurance.frequency, PolicyFrequency::Monthly);
        assert!(profile.goals.is_empty());
    }

    #[test]
    fn test_unparseable_numbers_read_as_zero() {
        let profile = FinancialProfile::from_value(json!({
            "monthlyIncome": "abc",
            "monthlyExpenses": "1200.5",
            "monthlyEMI": null,
            "dependents": "2"
        }))
        .unwrap();

        assert_eq!(profile.monthly_income, 0.0);
        assert_eq!(profile.monthly_expenses, 1200.5);
        assert_eq!(profile.monthly_emi, 0.0);
        assert_eq!(profile.dependent_count(), 2);
    }

    #[test]
    fn test_emi_field_name_on_the_wire() {
        let profile = FinancialProfile {
            monthly_emi: 300.0,
            ..Default::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["monthlyEMI"], json!(300.0));
    }

    #[test]
    fn test_legacy_health_insurance_object() {
        let profile = FinancialProfile::from_value(json!({
            "healthInsurance": { "hasPolicy": true }
        }))
        .unwrap();
        assert!(profile.has_health_insurance);
    }

    #[test]
    fn test_non_object_profile_is_rejected() {
        let err = FinancialProfile::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, AdvisorError::Validation(_)));
    }

    #[test]
    fn test_negative_amounts_kept_but_reported() {
        let profile = FinancialProfile {
            monthly_income: -10.0,
            savings: SavingsBreakdown {
                gold: -1.0,
                ..Default::default()
            },
            ..Default::default()
        };

        // the model does not clamp
        assert_eq!(profile.monthly_income, -10.0);

        let issues = profile.validation_issues();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].starts_with("monthlyIncome"));
        assert!(issues[1].starts_with("savings.gold"));
        assert!(matches!(profile.ensure_valid(), Err(AdvisorError::Validation(_))));
        assert!(FinancialProfile::default().ensure_valid().is_ok());
    }

    #[test]
    fn test_negative_or_fractional_dependents_are_reported() {
        let negative = FinancialProfile::from_value(json!({ "dependents": -2 })).unwrap();
        assert_eq!(negative.dependent_count(), 0);
        assert_eq!(
            negative.validation_issues(),
            vec!["dependents must be a non-negative whole number (got -2)".to_string()]
        );

        let fractional = FinancialProfile::from_value(json!({ "dependents": 2.7 })).unwrap();
        assert_eq!(fractional.dependent_count(), 2);
        assert!(matches!(fractional.ensure_valid(), Err(AdvisorError::Validation(_))));

        let whole = FinancialProfile::from_value(json!({ "dependents": "3" })).unwrap();
        assert_eq!(whole.dependent_count(), 3);
        assert!(whole.validation_issues().is_empty());
    }

    #[test]
    fn test_policy_frequency_parsing_and_monthly_premium() {
        let policy: InsurancePolicy = serde_json::from_value(json!({
            "hasPolicy": true,
            "premium": 12000,
            "frequency": "yearly"
        }))
        .unwrap();
        assert_eq!(policy.frequency, PolicyFrequency::Yearly);
        assert_eq!(policy.monthly_premium(), 1000.0);

        let unset: InsurancePolicy = serde_json::from_value(json!({
            "hasPolicy": false,
            "premium": 500,
            "frequency": "none"
        }))
        .unwrap();
        assert_eq!(unset.frequency, PolicyFrequency::Monthly);
        assert_eq!(unset.monthly_premium(), 0.0);

        assert_eq!(
            serde_json::to_value(PolicyFrequency::HalfYearly).unwrap(),
            json!("half-yearly")
        );
    }

    #[test]
    fn test_health_score_must_be_whole_and_in_range() {
        let base = json!({
            "riskLevel": "Low",
            "healthScore": 72.0,
            "healthStatus": "Good",
            "explanation": "ok",
            "advicePoints": [],
            "smartActions": [],
            "warnings": [],
            "savingsHealthScore": 60,
            "protectionScore": 40
        });
        let advice: AdviceResult = serde_json::from_value(base.clone()).unwrap();
        assert_eq!(advice.health_score, 72);

        let mut too_high = base.clone();
        too_high["healthScore"] = json!(140);
        assert!(serde_json::from_value::<AdviceResult>(too_high).is_err());

        let mut fractional = base;
        fractional["healthScore"] = json!(72.5);
        assert!(serde_json::from_value::<AdviceResult>(fractional).is_err());
    }
}
