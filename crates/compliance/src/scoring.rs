//! Deterministic source trust scoring (§4.1): a weighted sum over five
//! compliance booleans, bucketed into a risk tier that drives the source
//! lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The five compliance booleans the score weighs equally.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplianceInputs {
    pub robots_txt_compliant: bool,
    pub legal_contact_verified: bool,
    pub terms_acceptable: bool,
    pub fair_use_documented: bool,
    pub data_minimization_applied: bool,
}

const WEIGHT: f64 = 0.2;

/// Risk tier derived from the compliance score. Drives whether a source may
/// stay `active` or must move to `suspended`/`under_review`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            RiskTier::Low
        } else if score >= 0.6 {
            RiskTier::Medium
        } else if score >= 0.4 {
            RiskTier::High
        } else {
            RiskTier::Critical
        }
    }
}

/// Computes the compliance score as a weighted sum of the five booleans
/// (each worth 0.2) and the corresponding risk tier. Never written by hand —
/// callers recompute this on every compliance check and persist the result.
pub fn score_source(inputs: ComplianceInputs) -> (f64, RiskTier) {
    let mut score = 0.0;
    if inputs.robots_txt_compliant {
        score += WEIGHT;
    }
    if inputs.legal_contact_verified {
        score += WEIGHT;
    }
    if inputs.terms_acceptable {
        score += WEIGHT;
    }
    if inputs.fair_use_documented {
        score += WEIGHT;
    }
    if inputs.data_minimization_applied {
        score += WEIGHT;
    }

    // Clamp against floating point drift from repeated 0.2 additions.
    let score = (score * 10.0).round() / 10.0;
    (score, RiskTier::from_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_true_scores_one_and_low_risk() {
        let inputs = ComplianceInputs {
            robots_txt_compliant: true,
            legal_contact_verified: true,
            terms_acceptable: true,
            fair_use_documented: true,
            data_minimization_applied: true,
        };
        let (score, tier) = score_source(inputs);
        assert_eq!(score, 1.0);
        assert_eq!(tier, RiskTier::Low);
    }

    #[test]
    fn all_false_scores_zero_and_critical_risk() {
        let (score, tier) = score_source(ComplianceInputs::default());
        assert_eq!(score, 0.0);
        assert_eq!(tier, RiskTier::Critical);
    }

    #[test]
    fn three_of_five_lands_in_medium_band() {
        let inputs = ComplianceInputs {
            robots_txt_compliant: true,
            legal_contact_verified: true,
            terms_acceptable: true,
            fair_use_documented: false,
            data_minimization_applied: false,
        };
        let (score, tier) = score_source(inputs);
        assert!((score - 0.6).abs() < f64::EPSILON);
        assert_eq!(tier, RiskTier::Medium);
    }

    #[test]
    fn boundary_four_of_five_reaches_low_risk() {
        let inputs = ComplianceInputs {
            robots_txt_compliant: true,
            legal_contact_verified: true,
            terms_acceptable: true,
            fair_use_documented: true,
            data_minimization_applied: false,
        };
        let (score, tier) = score_source(inputs);
        assert!((score - 0.8).abs() < f64::EPSILON);
        assert_eq!(tier, RiskTier::Low);
    }
}
