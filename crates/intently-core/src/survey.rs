//! Anonymous NPS survey submission.
//!
//! Fire-and-forget: the local stats are persisted before any network
//! activity, and a failed POST is logged by the caller and discarded. The
//! payload carries only anonymous, non-personal fields.

use chrono::{DateTime, Utc};
use reqwest::Client;
use url::Url;

use crate::engagement::NpsCategory;
use crate::error::SurveyError;

/// Published survey form endpoint.
pub const DEFAULT_SURVEY_ENDPOINT: &str =
    "https://docs.google.com/forms/d/e/1FAIpQLSfeBF81ooQmiuH1cBwiXFNiiQa85zdfN3L50H7Hy9UqTIZ0gA/formResponse";

// Form entry ids of the published survey.
const FIELD_SCORE: &str = "entry.180041235";
const FIELD_CATEGORY: &str = "entry.727464252";
const FIELD_SESSIONS: &str = "entry.850259990";
const FIELD_TIMESTAMP: &str = "entry.206546176";
const FIELD_ANONYMOUS_ID: &str = "entry.1376249417";

/// One submitted rating, as sent over the wire.
#[derive(Debug, Clone)]
pub struct NpsReport {
    pub score: u8,
    pub category: NpsCategory,
    pub sessions_completed: u32,
    pub submitted_at: DateTime<Utc>,
    pub anonymous_id: String,
}

/// Posts form-encoded NPS reports to the survey endpoint.
pub struct SurveyClient {
    endpoint: Url,
    client: Client,
}

impl SurveyClient {
    /// Build a client for the given endpoint.
    ///
    /// # Errors
    /// Returns an error if the endpoint is not a valid URL.
    pub fn new(endpoint: &str) -> Result<Self, SurveyError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| SurveyError::InvalidEndpoint(e.to_string()))?;
        Ok(Self {
            endpoint,
            client: Client::new(),
        })
    }

    /// Submit a report. The response body is ignored.
    ///
    /// # Errors
    /// Returns an error on transport failure or a non-success status. The
    /// caller logs and drops it; local state is already persisted.
    pub async fn submit(&self, report: &NpsReport) -> Result<(), SurveyError> {
        let form = [
            (FIELD_SCORE, report.score.to_string()),
            (FIELD_CATEGORY, report.category.as_str().to_string()),
            (FIELD_SESSIONS, report.sessions_completed.to_string()),
            (FIELD_TIMESTAMP, report.submitted_at.to_rfc3339()),
            (FIELD_ANONYMOUS_ID, report.anonymous_id.clone()),
        ];

        let resp = self
            .client
            .post(self.endpoint.clone())
            .form(&form)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SurveyError::Status(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> NpsReport {
        NpsReport {
            score: 9,
            category: NpsCategory::Promoter,
            sessions_completed: 12,
            submitted_at: Utc::now(),
            anonymous_id: "user-test".into(),
        }
    }

    #[test]
    fn invalid_endpoint_rejected() {
        assert!(matches!(
            SurveyClient::new("not a url"),
            Err(SurveyError::InvalidEndpoint(_))
        ));
    }

    #[tokio::test]
    async fn submit_posts_form_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/formResponse")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("entry.180041235".into(), "9".into()),
                mockito::Matcher::UrlEncoded("entry.727464252".into(), "promoter".into()),
                mockito::Matcher::UrlEncoded("entry.850259990".into(), "12".into()),
                mockito::Matcher::UrlEncoded("entry.1376249417".into(), "user-test".into()),
            ]))
            .with_status(200)
            .create_async()
            .await;

        let client = SurveyClient::new(&format!("{}/formResponse", server.url())).unwrap();
        client.submit(&sample_report()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/formResponse")
            .with_status(500)
            .create_async()
            .await;

        let client = SurveyClient::new(&format!("{}/formResponse", server.url())).unwrap();
        assert!(matches!(
            client.submit(&sample_report()).await,
            Err(SurveyError::Status(500))
        ));
    }
}
