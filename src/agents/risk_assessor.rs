//! Risk assessment agent
//!
//! Looks for red flags: lawsuits, complaints, and industry-level failure
//! modes, then asks the model for a graded risk judgment.

use tracing::{info, warn};

use super::{format_hits, format_money};
use crate::extract::parse_json_reply;
use crate::llm::LanguageModel;
use crate::models::{RiskAssessment, Submission};
use crate::search::SearchProvider;
use crate::Result;

/// Assess the risk profile of a submission.
pub async fn assess(
    model: &dyn LanguageModel,
    search: &dyn SearchProvider,
    submission: &Submission,
) -> Result<RiskAssessment> {
    info!(business = %submission.business_name, "Risk assessor: starting");

    let risk_query = format!(
        "{} {} lawsuits complaints risks problems",
        submission.business_name, submission.industry
    );
    let industry_query = format!(
        "{} industry trends statistics benchmarks 2026",
        submission.industry
    );

    let risk_hits = search.search(&risk_query, 5, 500).await;
    let industry_hits = search.search(&industry_query, 3, 800).await;

    let prompt = build_prompt(submission, &format_hits(&risk_hits), &format_hits(&industry_hits));

    let reply = model.complete(&prompt).await?;

    match parse_json_reply::<RiskAssessment>(&reply) {
        Some(result) => {
            info!(
                business = %submission.business_name,
                risk_level = %result.risk_level,
                risk_score = result.risk_score,
                "Risk assessor: completed"
            );
            Ok(result)
        }
        None => {
            warn!(
                business = %submission.business_name,
                "Risk assessor: reply not parseable, using fallback"
            );
            Ok(RiskAssessment::fallback())
        }
    }
}

fn build_prompt(submission: &Submission, risk_block: &str, industry_block: &str) -> String {
    format!(
        r#"You are a risk assessment specialist for underwriting. Analyze the following business for potential risks:

Business: {name}
Industry: {industry}
Location: {location}
Years in Business: {years}

Financial Context:
- Loan Amount: {loan}
- Debt-to-Income: {dti:.1}%
- Credit Score: {credit}

Risk Information Found:
{risk_block}

Industry Risk Information:
{industry_block}

Provide a comprehensive risk assessment with:
1. Overall risk level (LOW/MODERATE/HIGH/VERY_HIGH)
2. Risk score (0-100, where 100 is highest risk)
3. Key risk factors (as an array)
4. Any red flags found (as an array, or empty if none)
5. Sentiment from news/reviews (Positive/Neutral/Negative)
6. Industry-specific risks (as an array)

Format your response as JSON with this structure:
{{
  "riskLevel": "<LOW/MODERATE/HIGH/VERY_HIGH>",
  "riskScore": <number>,
  "factors": [<array of risk factors>],
  "redFlags": [<array of red flags, or empty>],
  "sentiment": "<Positive/Neutral/Negative>",
  "industryRisks": [<array of industry-specific risks>]
}}"#,
        name = submission.business_name,
        industry = submission.industry,
        location = submission.location,
        years = submission.years_in_business,
        loan = format_money(submission.loan_amount),
        dti = submission.debt_to_income * 100.0,
        credit = submission.credit_score,
        risk_block = risk_block,
        industry_block = industry_block,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::StaticModel;
    use crate::models::RiskLevel;
    use crate::search::NullSearch;

    fn submission() -> Submission {
        Submission {
            business_name: "Joe's Pizza Restaurant".to_string(),
            location: "Brooklyn, NY".to_string(),
            website: None,
            loan_amount: 50_000.0,
            credit_score: 680,
            annual_revenue: 250_000.0,
            monthly_revenue: 20_833.0,
            debt_to_income: 0.35,
            years_in_business: 3,
            industry: "Restaurant".to_string(),
            existing_debt: None,
            employees: None,
        }
    }

    #[tokio::test]
    async fn parses_well_formed_reply() {
        let reply = r#"Assessment follows.
{
  "riskLevel": "HIGH",
  "riskScore": 72.5,
  "factors": ["young business", "competitive market"],
  "redFlags": [],
  "sentiment": "Neutral",
  "industryRisks": ["high failure rate in first five years"]
}"#;
        let model = StaticModel::new(reply);

        let result = assess(&model, &NullSearch, &submission()).await.unwrap();
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.risk_score, 72.5);
        assert!(result.red_flags.is_empty());
    }

    #[tokio::test]
    async fn non_json_reply_yields_exact_fallback() {
        let model = StaticModel::new("sorry, no structured output");

        let result = assess(&model, &NullSearch, &submission()).await.unwrap();
        assert_eq!(result, RiskAssessment::fallback());
        assert_eq!(result.risk_level, RiskLevel::Moderate);
        assert_eq!(result.risk_score, 50.0);
    }

    #[tokio::test]
    async fn unknown_risk_level_string_falls_back() {
        // "MEDIUM" is not in the enumeration, so the typed parse fails and
        // the documented fallback applies.
        let reply = r#"{
  "riskLevel": "MEDIUM",
  "riskScore": 40,
  "factors": [],
  "redFlags": [],
  "sentiment": "Neutral",
  "industryRisks": []
}"#;
        let model = StaticModel::new(reply);

        let result = assess(&model, &NullSearch, &submission()).await.unwrap();
        assert_eq!(result, RiskAssessment::fallback());
    }
}
