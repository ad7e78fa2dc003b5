//! Subscription plans

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::client::{ApiTransport, Method};
use crate::error::Result;

/// Subscription plan of a restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Trial,
    Basic,
    Premium,
    Enterprise,
}

impl Plan {
    pub const ALL: [Plan; 4] = [Plan::Trial, Plan::Basic, Plan::Premium, Plan::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Trial => "trial",
            Plan::Basic => "basic",
            Plan::Premium => "premium",
            Plan::Enterprise => "enterprise",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Plan::Trial => "Trial",
            Plan::Basic => "Basic",
            Plan::Premium => "Premium",
            Plan::Enterprise => "Enterprise",
        }
    }

    /// Monthly price in US dollars
    pub fn monthly_price(&self) -> u32 {
        match self {
            Plan::Trial => 0,
            Plan::Basic => 29,
            Plan::Premium => 79,
            Plan::Enterprise => 199,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|plan| plan.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown plan '{}' (expected trial, basic, premium or enterprise)",
                    s
                )
            })
    }
}

/// Billing operations handler
pub struct BillingHandler<'a> {
    client: &'a dyn ApiTransport,
}

impl<'a> BillingHandler<'a> {
    /// Create a new handler
    pub fn new(client: &'a dyn ApiTransport) -> Self {
        Self { client }
    }

    /// Move a restaurant to another plan
    pub async fn change_plan(&self, restaurant_id: &str, plan: Plan) -> Result<()> {
        let path = format!("/api/subscriptions/restaurant/{}/plan", restaurant_id);
        self.client
            .request(Method::PUT, &path, Some(json!({ "plan": plan })))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::MockApiTransport;
    use serde_json::Value;

    #[test]
    fn test_plan_prices() {
        let prices: Vec<u32> = Plan::ALL.iter().map(Plan::monthly_price).collect();
        assert_eq!(prices, vec![0, 29, 79, 199]);
    }

    #[tokio::test]
    async fn test_change_plan_payload() {
        let mut mock = MockApiTransport::new();
        mock.expect_request()
            .withf(|method, path, body| {
                *method == Method::PUT
                    && path == "/api/subscriptions/restaurant/r1/plan"
                    && *body == Some(json!({"plan": "premium"}))
            })
            .times(1)
            .returning(|_, _, _| Ok(Value::Null));

        BillingHandler::new(&mock)
            .change_plan("r1", Plan::Premium)
            .await
            .unwrap();
    }
}
