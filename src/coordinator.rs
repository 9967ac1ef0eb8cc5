//! Coordinator — fan-out/join orchestration plus synthesis
//!
//! Phase 1 runs the three agents concurrently and joins on all of them;
//! a hard model failure in any agent aborts the run (first failure wins,
//! in-flight siblings' results are discarded). Phase 2 makes one more model
//! call to merge the three findings into a final decision, with the same
//! extract-then-parse fallback policy the agents use.

use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::agents::{business_verifier, financial_analyst, risk_assessor};
use crate::agents::{format_bullets, format_money};
use crate::extract::parse_json_reply;
use crate::llm::LanguageModel;
use crate::models::{
    AgentFindings, DecisionMetadata, FinalDecision, Recommendation, Submission,
    UnderwritingDecision,
};
use crate::search::SearchProvider;
use crate::Result;

/// Orchestrates one full underwriting analysis for a single submission.
pub struct Coordinator {
    model: Arc<dyn LanguageModel>,
    search: Arc<dyn SearchProvider>,
}

/// Parsed output of the synthesis call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Synthesis {
    risk_score: f64,
    recommendation: Recommendation,
    approved: bool,
    conditions: Vec<String>,
    reasoning: String,
}

impl Synthesis {
    fn fallback() -> Self {
        Self {
            risk_score: 50.0,
            recommendation: Recommendation::RequestMoreInfo,
            approved: false,
            conditions: vec![],
            reasoning: "Unable to complete synthesis".to_string(),
        }
    }
}

impl Coordinator {
    pub fn new(model: Arc<dyn LanguageModel>, search: Arc<dyn SearchProvider>) -> Self {
        Self { model, search }
    }

    /// Phase 1: run all three agents concurrently and wait for every result.
    pub async fn run_agents(&self, submission: &Submission) -> Result<AgentFindings> {
        info!(business = %submission.business_name, "Coordinator: spawning agents");

        let (business_verifier, financial_analyst, risk_assessor) = tokio::try_join!(
            business_verifier::verify(self.model.as_ref(), self.search.as_ref(), submission),
            financial_analyst::analyze(self.model.as_ref(), self.search.as_ref(), submission),
            risk_assessor::assess(self.model.as_ref(), self.search.as_ref(), submission),
        )?;

        info!(business = %submission.business_name, "Coordinator: all agents completed");

        Ok(AgentFindings {
            business_verifier,
            financial_analyst,
            risk_assessor,
        })
    }

    /// Phase 2: one model call merging the submission and all three findings.
    async fn synthesize(
        &self,
        submission: &Submission,
        findings: &AgentFindings,
    ) -> Result<Synthesis> {
        let prompt = build_synthesis_prompt(submission, findings);
        let reply = self.model.complete(&prompt).await?;

        let synthesis = match parse_json_reply::<Synthesis>(&reply) {
            Some(mut synthesis) => {
                synthesis.risk_score = synthesis.risk_score.clamp(0.0, 100.0);
                synthesis
            }
            None => {
                warn!(
                    business = %submission.business_name,
                    "Coordinator: synthesis reply not parseable, using fallback decision"
                );
                Synthesis::fallback()
            }
        };

        Ok(synthesis)
    }

    /// Run one full analysis end to end.
    pub async fn analyze(&self, submission: &Submission) -> Result<UnderwritingDecision> {
        let start = Instant::now();

        let findings = self.run_agents(submission).await?;
        let synthesis = self.synthesize(submission, &findings).await?;

        let decision = assemble_decision(submission, findings, synthesis, start.elapsed().as_secs_f64());

        info!(
            business = %decision.business_name,
            recommendation = %decision.recommendation,
            risk_score = decision.risk_score,
            analysis_time = decision.metadata.analysis_time,
            "Coordinator: analysis complete"
        );

        Ok(decision)
    }

    /// Phase 2 plus assembly, for callers that ran Phase 1 themselves
    /// (the streaming reporter emits events between the phases).
    pub async fn finish(
        &self,
        submission: &Submission,
        findings: AgentFindings,
        started: Instant,
    ) -> Result<UnderwritingDecision> {
        let synthesis = self.synthesize(submission, &findings).await?;
        Ok(assemble_decision(
            submission,
            findings,
            synthesis,
            started.elapsed().as_secs_f64(),
        ))
    }
}

fn assemble_decision(
    submission: &Submission,
    findings: AgentFindings,
    synthesis: Synthesis,
    elapsed_secs: f64,
) -> UnderwritingDecision {
    UnderwritingDecision {
        business_name: submission.business_name.clone(),
        risk_score: synthesis.risk_score,
        recommendation: synthesis.recommendation,
        agent_findings: findings,
        final_decision: FinalDecision {
            approved: synthesis.approved,
            conditions: synthesis.conditions,
            reasoning: synthesis.reasoning,
        },
        metadata: DecisionMetadata {
            analysis_time: elapsed_secs,
            timestamp: chrono::Utc::now(),
        },
    }
}

fn build_synthesis_prompt(submission: &Submission, findings: &AgentFindings) -> String {
    let verifier = &findings.business_verifier;
    let financial = &findings.financial_analyst;
    let risk = &findings.risk_assessor;

    format!(
        r#"You are a senior underwriting officer making a final lending decision. Review the following analysis from your team:

LOAN APPLICATION:
Business: {name}
Industry: {industry}
Location: {location}
Loan Amount: {loan}
Years in Business: {years}

BUSINESS VERIFICATION (Legitimacy Score: {legitimacy}/100):
{verifier_summary}
Online Presence: {online_presence}
Registered: {registered}
Recent News: {recent_news}

FINANCIAL ANALYSIS:
Assessment: {assessment}
Strengths:
{strengths}
Concerns:
{concerns}
Industry Comparison: {industry_comparison}
Credit Assessment: {credit_assessment}

RISK ASSESSMENT (Level: {risk_level}, Score: {risk_score}/100):
Risk Factors:
{factors}
Red Flags:
{red_flags}
Industry Risks:
{industry_risks}
Sentiment: {sentiment}

Based on this comprehensive analysis, provide your final underwriting decision:

1. Calculate an overall risk score (0-100, where 100 is highest risk)
2. Make a recommendation: APPROVE, DECLINE, APPROVE_WITH_CONDITIONS, or REQUEST_MORE_INFO
3. If approved (with or without conditions), list specific conditions
4. Provide clear reasoning for your decision

Format your response as JSON:
{{
  "riskScore": <number>,
  "recommendation": "<APPROVE/DECLINE/APPROVE_WITH_CONDITIONS/REQUEST_MORE_INFO>",
  "approved": <boolean>,
  "conditions": [<array of conditions if approved with conditions, otherwise empty>],
  "reasoning": "<detailed explanation of decision>"
}}"#,
        name = submission.business_name,
        industry = submission.industry,
        location = submission.location,
        loan = format_money(submission.loan_amount),
        years = submission.years_in_business,
        legitimacy = verifier.legitimacy_score,
        verifier_summary = verifier.summary,
        online_presence = verifier.online_presence,
        registered = if verifier.registered { "Yes" } else { "No" },
        recent_news = verifier.recent_news.join("; "),
        assessment = financial.assessment,
        strengths = format_bullets(&financial.strengths, "None listed"),
        concerns = format_bullets(&financial.concerns, "None listed"),
        industry_comparison = financial.industry_comparison,
        credit_assessment = financial.credit_assessment,
        risk_level = risk.risk_level,
        risk_score = risk.risk_score,
        factors = format_bullets(&risk.factors, "None listed"),
        red_flags = format_bullets(&risk.red_flags, "None identified"),
        industry_risks = format_bullets(&risk.industry_risks, "None listed"),
        sentiment = risk.sentiment,
    )
}
