//! Business verification agent
//!
//! Checks that the applicant business exists and looks legitimate: company
//! information plus recent news and reviews, judged by the model.

use tracing::{info, warn};

use super::format_hits;
use crate::extract::parse_json_reply;
use crate::llm::LanguageModel;
use crate::models::{BusinessVerification, Submission};
use crate::search::SearchProvider;
use crate::Result;

/// Verify the business behind a submission.
pub async fn verify(
    model: &dyn LanguageModel,
    search: &dyn SearchProvider,
    submission: &Submission,
) -> Result<BusinessVerification> {
    info!(business = %submission.business_name, "Business verifier: starting");

    let company_query = format!(
        "{} {} business information",
        submission.business_name, submission.location
    );
    let news_query = format!("{} news articles reviews", submission.business_name);

    let company_hits = search.search(&company_query, 3, 1000).await;
    let news_hits = search.search(&news_query, 5, 500).await;

    let prompt = build_prompt(submission, &format_hits(&company_hits), &format_hits(&news_hits));

    let reply = model.complete(&prompt).await?;

    match parse_json_reply::<BusinessVerification>(&reply) {
        Some(result) => {
            info!(
                business = %submission.business_name,
                legitimacy_score = result.legitimacy_score,
                "Business verifier: completed"
            );
            Ok(result)
        }
        None => {
            warn!(
                business = %submission.business_name,
                "Business verifier: reply not parseable, using fallback"
            );
            Ok(BusinessVerification::fallback(submission))
        }
    }
}

fn build_prompt(submission: &Submission, company_block: &str, news_block: &str) -> String {
    format!(
        r#"You are a business verification specialist for underwriting. Analyze the following information about a business:

Business Name: {name}
Location: {location}
Website: {website}
Years in Business: {years}

Company Information from Web Search:
{company_block}

Recent News and Reviews:
{news_block}

Provide a verification analysis with:
1. Legitimacy score (0-100)
2. Whether the business appears to be registered and legitimate
3. Quality of online presence (Strong/Moderate/Weak/None)
4. Key findings from news and reviews
5. Summary assessment

Format your response as JSON with this structure:
{{
  "legitimacyScore": <number>,
  "registered": <boolean>,
  "onlinePresence": "<Strong/Moderate/Weak/None>",
  "websiteFound": <boolean>,
  "recentNews": [<array of key news points>],
  "sources": [<array of source URLs>],
  "summary": "<brief summary>"
}}"#,
        name = submission.business_name,
        location = submission.location,
        website = submission.website.as_deref().unwrap_or("Not provided"),
        years = submission.years_in_business,
        company_block = company_block,
        news_block = news_block,
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
            existing_debt: None,
            employees: None,
        }
    }

    #[tokio::test]
    async fn parses_well_formed_reply() {
        let reply = r#"Here is my verdict:
{
  "legitimacyScore": 85,
  "registered": true,
  "onlinePresence": "Strong",
  "websiteFound": true,
  "recentNews": ["Voted best slice in Brooklyn"],
  "sources": ["https://example.com"],
  "summary": "Well established local restaurant"
}"#;
        let model = StaticModel::new(reply);

        let result = verify(&model, &NullSearch, &submission()).await.unwrap();
        assert_eq!(result.legitimacy_score, 85.0);
        assert_eq!(result.online_presence, "Strong");
        assert_eq!(result.recent_news.len(), 1);
    }

    #[tokio::test]
    async fn non_json_reply_yields_exact_fallback() {
        let model = StaticModel::new("I cannot produce structured output today.");

        let result = verify(&model, &NullSearch, &submission()).await.unwrap();
        assert_eq!(result, BusinessVerification::fallback(&submission()));
        assert_eq!(result.legitimacy_score, 50.0);
        assert!(result.registered);
        assert_eq!(result.online_presence, "Unknown");
    }

    #[tokio::test]
    async fn completes_with_empty_search_results() {
        let model = StaticModel::new("no json");
        let result = verify(&model, &NullSearch, &submission()).await;
        assert!(result.is_ok());
    }
}
