//! Hosted checkout link.
//!
//! The provider hosts a payment page that takes the product and the buyer's
//! email as query parameters and echoes `metadata[...]` entries back in its
//! webhook. No API call is needed to start a session.

use async_trait::async_trait;
use reqwest::Url;

use crate::ports::{CheckoutError, CheckoutProvider, CheckoutRequest, CheckoutSession};

#[derive(Debug, Clone)]
pub struct HostedCheckoutLink {
    base_url: Url,
    return_url: Option<Url>,
}

impl HostedCheckoutLink {
    pub fn new(base_url: Url, return_url: Option<Url>) -> Self {
        Self {
            base_url,
            return_url,
        }
    }

    fn build_url(&self, request: &CheckoutRequest) -> Result<Url, CheckoutError> {
        if self.base_url.cannot_be_a_base() {
            return Err(CheckoutError::Misconfigured(format!(
                "checkout base url '{}' cannot carry query parameters",
                self.base_url
            )));
        }

        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("product_id", &request.product_id)
                .append_pair("customer_email", request.email.as_str())
                .append_pair("metadata[principal_id]", request.principal_id.as_str())
                .append_pair("metadata[plan]", request.plan.as_str());
            if let Some(return_url) = &self.return_url {
                query.append_pair("return_url", return_url.as_str());
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl CheckoutProvider for HostedCheckoutLink {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutError> {
        let url = self.build_url(request)?;
        Ok(CheckoutSession {
            checkout_url: url.into(),
            plan: request.plan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::PaidPlan;
    use crate::domain::foundation::{Email, PrincipalId};

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            principal_id: PrincipalId::new("p-7").unwrap(),
            email: Email::parse("a+b@x.com").unwrap(),
            plan: PaidPlan::Periodic,
            product_id: "prod_yearly".to_string(),
        }
    }

    fn query(url: &str) -> Vec<(String, String)> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[tokio::test]
    async fn link_embeds_metadata_and_email() {
        let link = HostedCheckoutLink::new(Url::parse("https://pay.example.com/c").unwrap(), None);
        let session = link.create_session(&request()).await.unwrap();

        let pairs = query(&session.checkout_url);
        assert_eq!(
            pairs,
            vec![
                ("product_id".to_string(), "prod_yearly".to_string()),
                ("customer_email".to_string(), "a+b@x.com".to_string()),
                ("metadata[principal_id]".to_string(), "p-7".to_string()),
                ("metadata[plan]".to_string(), "periodic".to_string()),
            ]
        );
        assert!(session.checkout_url.starts_with("https://pay.example.com/c?"));
    }

    #[tokio::test]
    async fn return_url_is_appended_when_configured() {
        let link = HostedCheckoutLink::new(
            Url::parse("https://pay.example.com/c").unwrap(),
            Some(Url::parse("https://app.example.com/billing/done").unwrap()),
        );
        let session = link.create_session(&request()).await.unwrap();
        assert!(query(&session.checkout_url)
            .contains(&("return_url".to_string(), "https://app.example.com/billing/done".to_string())));
    }

    #[tokio::test]
    async fn non_base_url_is_misconfigured() {
        let link = HostedCheckoutLink::new(Url::parse("mailto:billing@example.com").unwrap(), None);
        assert!(matches!(
            link.create_session(&request()).await,
            Err(CheckoutError::Misconfigured(_))
        ));
    }
}
