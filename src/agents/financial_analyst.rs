//! Financial analysis agent
//!
//! Judges the submitted financials against industry benchmarks pulled from
//! web search.

use tracing::{info, warn};

use super::{format_hits, format_money};
use crate::extract::parse_json_reply;
use crate::llm::LanguageModel;
use crate::models::{FinancialAnalysis, Submission};
use crate::search::SearchProvider;
use crate::Result;

/// Analyze the financial facts of a submission.
pub async fn analyze(
    model: &dyn LanguageModel,
    search: &dyn SearchProvider,
    submission: &Submission,
) -> Result<FinancialAnalysis> {
    info!(business = %submission.business_name, "Financial analyst: starting");

    let industry_query = format!(
        "{} industry trends statistics benchmarks 2026",
        submission.industry
    );
    let industry_hits = search.search(&industry_query, 3, 800).await;

    let prompt = build_prompt(submission, &format_hits(&industry_hits));

    let reply = model.complete(&prompt).await?;

    match parse_json_reply::<FinancialAnalysis>(&reply) {
        Some(result) => {
            info!(
                business = %submission.business_name,
                assessment = %result.assessment,
                "Financial analyst: completed"
            );
            Ok(result)
        }
        None => {
            warn!(
                business = %submission.business_name,
                "Financial analyst: reply not parseable, using fallback"
            );
            Ok(FinancialAnalysis::fallback())
        }
    }
}

fn build_prompt(submission: &Submission, industry_block: &str) -> String {
    let mut optional_lines = String::new();
    if let Some(existing_debt) = submission.existing_debt {
        optional_lines.push_str(&format!(
            "- Existing Debt: {}\n",
            format_money(existing_debt)
        ));
    }
    if let Some(employees) = submission.employees {
        optional_lines.push_str(&format!("- Number of Employees: {}\n", employees));
    }

    format!(
        r#"You are a financial analyst specializing in business underwriting. Analyze the following business financials:

Business: {name}
Industry: {industry}
Location: {location}

Financial Data:
- Loan Amount Requested: {loan}
- Credit Score: {credit}
- Annual Revenue: {annual}
- Monthly Revenue: {monthly}
- Debt-to-Income Ratio: {dti:.1}%
- Years in Business: {years}
{optional_lines}
Industry Benchmarks and Information:
{industry_block}

Provide a comprehensive financial analysis with:
1. Overall financial assessment
2. Key strengths (as an array)
3. Key concerns (as an array)
4. How the business compares to industry benchmarks
5. Credit score assessment

Format your response as JSON with this structure:
{{
  "assessment": "<overall assessment in one sentence>",
  "strengths": [<array of strength points>],
  "concerns": [<array of concern points>],
  "industryComparison": "<comparison to industry>",
  "creditAssessment": "<credit score evaluation>"
}}"#,
        name = submission.business_name,
        industry = submission.industry,
        location = submission.location,
        loan = format_money(submission.loan_amount),
        credit = submission.credit_score,
        annual = format_money(submission.annual_revenue),
        monthly = format_money(submission.monthly_revenue),
        dti = submission.debt_to_income * 100.0,
        years = submission.years_in_business,
        optional_lines = optional_lines,
        industry_block = industry_block,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::StaticModel;
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
            existing_debt: Some(12_000.0),
            employees: Some(8),
        }
    }

    #[test]
    fn prompt_includes_financials_and_optionals() {
        let prompt = build_prompt(&submission(), "No results found.");
        assert!(prompt.contains("Loan Amount Requested: $50,000"));
        assert!(prompt.contains("Debt-to-Income Ratio: 35.0%"));
        assert!(prompt.contains("Existing Debt: $12,000"));
        assert!(prompt.contains("Number of Employees: 8"));
    }

    #[test]
    fn prompt_omits_absent_optionals() {
        let mut sub = submission();
        sub.existing_debt = None;
        sub.employees = None;
        let prompt = build_prompt(&sub, "No results found.");
        assert!(!prompt.contains("Existing Debt"));
        assert!(!prompt.contains("Number of Employees"));
    }

    #[tokio::test]
    async fn parses_well_formed_reply() {
        let reply = r#"{
  "assessment": "Healthy revenue for a young restaurant",
  "strengths": ["steady revenue", "reasonable leverage"],
  "concerns": ["thin margins"],
  "industryComparison": "Above median for independents",
  "creditAssessment": "Fair credit, near prime"
}"#;
        let model = StaticModel::new(reply);

        let result = analyze(&model, &NullSearch, &submission()).await.unwrap();
        assert_eq!(result.strengths.len(), 2);
        assert_eq!(result.credit_assessment, "Fair credit, near prime");
    }

    #[tokio::test]
    async fn non_json_reply_yields_exact_fallback() {
        let model = StaticModel::new("plain prose, no object");

        let result = analyze(&model, &NullSearch, &submission()).await.unwrap();
        assert_eq!(result, FinancialAnalysis::fallback());
        assert_eq!(result.assessment, "Unable to complete analysis");
        assert!(result.strengths.is_empty());
        assert!(result.concerns.is_empty());
    }
}
