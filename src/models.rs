//! Core data models for the underwriting orchestrator
//!
//! Field names serialize in camelCase to match the wire format the frontend
//! and the agents' JSON-schema prompts expect. All records are immutable
//! value types: a Submission is never mutated after intake, and agent results
//! are owned by the coordinator until embedded in the final decision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Submission =================
//

/// A loan application as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub business_name: String,
    pub location: String,
    #[serde(default)]
    pub website: Option<String>,
    pub loan_amount: f64,
    pub credit_score: u32,
    pub annual_revenue: f64,
    #[serde(default)]
    pub monthly_revenue: f64,
    pub debt_to_income: f64,
    pub years_in_business: u32,
    pub industry: String,
    #[serde(default)]
    pub existing_debt: Option<f64>,
    #[serde(default)]
    pub employees: Option<u32>,
}

//
// ================= Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    Approve,
    Decline,
    ApproveWithConditions,
    RequestMoreInfo,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::VeryHigh => "VERY_HIGH",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Recommendation::Approve => "APPROVE",
            Recommendation::Decline => "DECLINE",
            Recommendation::ApproveWithConditions => "APPROVE_WITH_CONDITIONS",
            Recommendation::RequestMoreInfo => "REQUEST_MORE_INFO",
        };
        write!(f, "{}", s)
    }
}

//
// ================= Agent Results =================
//

/// Business verification judgment from the verifier agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusinessVerification {
    pub legitimacy_score: f64,
    pub registered: bool,
    pub online_presence: String,
    pub website_found: bool,
    pub recent_news: Vec<String>,
    pub sources: Vec<String>,
    pub summary: String,
}

impl BusinessVerification {
    /// Schema-valid substitute returned when the model's reply cannot be
    /// parsed. `website_found` still reflects the submission.
    pub fn fallback(submission: &Submission) -> Self {
        Self {
            legitimacy_score: 50.0,
            registered: true,
            online_presence: "Unknown".to_string(),
            website_found: submission.website.is_some(),
            recent_news: vec![],
            sources: vec![],
            summary: "Unable to complete verification".to_string(),
        }
    }
}

/// Financial health judgment from the analyst agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    pub assessment: String,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub industry_comparison: String,
    pub credit_assessment: String,
}

impl FinancialAnalysis {
    pub fn fallback() -> Self {
        Self {
            assessment: "Unable to complete analysis".to_string(),
            strengths: vec![],
            concerns: vec![],
            industry_comparison: "No data available".to_string(),
            credit_assessment: "Unable to assess".to_string(),
        }
    }
}

/// Risk judgment from the risk assessor agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub factors: Vec<String>,
    pub red_flags: Vec<String>,
    pub sentiment: String,
    pub industry_risks: Vec<String>,
}

impl RiskAssessment {
    pub fn fallback() -> Self {
        Self {
            risk_level: RiskLevel::Moderate,
            risk_score: 50.0,
            factors: vec!["Unable to complete risk assessment".to_string()],
            red_flags: vec![],
            sentiment: "Neutral".to_string(),
            industry_risks: vec![],
        }
    }
}

//
// ================= Decision =================
//

/// All three agent results, in the order the agents are declared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentFindings {
    pub business_verifier: BusinessVerification,
    pub financial_analyst: FinancialAnalysis,
    pub risk_assessor: RiskAssessment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalDecision {
    pub approved: bool,
    pub conditions: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMetadata {
    /// Wall-clock seconds for the whole run.
    pub analysis_time: f64,
    /// RFC-3339 completion timestamp.
    pub timestamp: DateTime<Utc>,
}

/// The terminal output of one successful underwriting run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderwritingDecision {
    pub business_name: String,
    pub risk_score: f64,
    pub recommendation: Recommendation,
    pub agent_findings: AgentFindings,
    pub final_decision: FinalDecision,
    pub metadata: DecisionMetadata,
}
