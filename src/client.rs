//! Thin async client for the property backend.
//!
//! The backend owns property storage; this client only lists a user's
//! properties, fetches the aggregated portfolio and submits new properties.

use crate::error::{ApiError, Result};
use crate::portfolio::{self, Portfolio};
use crate::property::{self, NewProperty, Property};
use crate::session::Session;
use futures::future::join;
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;

pub struct PropertyApi {
    base_url: String,
    client: Client,
}

/// Result of loading the dashboard. Either half may be missing.
#[derive(Debug, Default)]
pub struct Dashboard {
    pub properties: Option<Vec<Property>>,
    pub portfolio: Option<Portfolio>,
    pub errors: Vec<ApiError>,
}

impl PropertyApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<PropertyApi> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(PropertyApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn properties_url(&self, session: &Session) -> String {
        format!("{}/client/user/property/{}/", self.base_url, session.user_id())
    }

    pub fn portfolio_url(&self, session: &Session) -> String {
        format!(
            "{}/client/user/property/portfolio/{}",
            self.base_url,
            session.user_id()
        )
    }

    // The backend reads either header depending on the route.
    fn authorized(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder
            .header("authToken", session.token())
            .header("Authorization", format!("Bearer {}", session.token()))
    }

    pub async fn list_properties(&self, session: &Session) -> Result<Vec<Property>> {
        let request = self.authorized(self.client.get(self.properties_url(session)), session);
        let body = read_body(request.send().await?).await?;
        Ok(property::from_string(&body)?)
    }

    pub async fn portfolio(&self, session: &Session) -> Result<Portfolio> {
        let request = self.authorized(self.client.get(self.portfolio_url(session)), session);
        let body = read_body(request.send().await?).await?;
        Ok(portfolio::from_string(&body)?)
    }

    /// Validates and submits a new property, returning the backend's response body.
    pub async fn add_property(
        &self,
        session: &Session,
        new_property: &NewProperty,
    ) -> Result<serde_json::Value> {
        new_property.validate()?;
        let request = self
            .authorized(self.client.post(self.properties_url(session)), session)
            .json(&new_property.payload());
        let body = read_body(request.send().await?).await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetches properties and portfolio concurrently. A failure of one does
    /// not discard the other.
    pub async fn dashboard(&self, session: &Session) -> Dashboard {
        let (properties, portfolio) =
            join(self.list_properties(session), self.portfolio(session)).await;

        let mut dashboard = Dashboard::default();
        match properties {
            Ok(p) => dashboard.properties = Some(p),
            Err(e) => dashboard.errors.push(e),
        }
        match portfolio {
            Ok(p) => dashboard.portfolio = Some(p),
            Err(e) => dashboard.errors.push(e),
        }
        dashboard
    }
}

async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{AreaType, Coordinates, LandType};

    fn api() -> PropertyApi {
        PropertyApi::new("https://api.example.com/", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_urls() {
        let session = Session::new("tok", "user-42").unwrap();
        let api = api();
        assert_eq!(
            api.properties_url(&session),
            "https://api.example.com/client/user/property/user-42/"
        );
        assert_eq!(
            api.portfolio_url(&session),
            "https://api.example.com/client/user/property/portfolio/user-42"
        );
    }

    #[test]
    fn test_requests_carry_both_auth_headers() {
        let session = Session::new("tok", "user-42").unwrap();
        let api = api();
        let request = api
            .authorized(api.client.get(api.properties_url(&session)), &session)
            .build()
            .unwrap();
        assert_eq!(request.headers()["authToken"], "tok");
        assert_eq!(request.headers()["Authorization"], "Bearer tok");
    }

    #[tokio::test]
    async fn test_add_property_validates_before_sending() {
        let session = Session::new("tok", "user-42").unwrap();
        let invalid = NewProperty {
            size: 0.0,
            area_type: AreaType::Urban,
            land_type: LandType::Residential,
            coordinates: Coordinates {
                latitude: 0.0,
                longitude: 0.0,
            },
        };
        let result = api().add_property(&session, &invalid).await;
        assert!(matches!(result, Err(ApiError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_dashboard_tolerates_unreachable_backend() {
        let session = Session::new("tok", "user-42").unwrap();
        let api = PropertyApi::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        let dashboard = api.dashboard(&session).await;
        assert!(dashboard.properties.is_none());
        assert!(dashboard.portfolio.is_none());
        assert_eq!(dashboard.errors.len(), 2);
    }
}
