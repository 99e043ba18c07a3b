//! Customer endpoints.

use serde::{Deserialize, Serialize};

use crate::http::{ApiClient, ApiError, Query};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub organization_id: String,
    pub created_at: String,
}

/// Optional list filters; `None` values are omitted from the query string
/// entirely, so the struct can be passed unconditionally.
#[derive(Debug, Clone, Default)]
pub struct CustomerListFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl CustomerListFilter {
    fn to_query(&self) -> Query {
        Query::new()
            .set_opt("search", self.search.clone())
            .set_opt("status", self.status.clone())
            .set_opt("page", self.page)
            .set_opt("per_page", self.per_page)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Partial update; only the provided fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Wrapper over the customer endpoints.
#[derive(Clone)]
pub struct CustomerApi {
    client: ApiClient,
}

impl CustomerApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self, filter))]
    pub async fn list(&self, filter: &CustomerListFilter) -> Result<Vec<Customer>, ApiError> {
        Ok(self
            .client
            .get_with("/customers", filter.to_query())
            .await?
            .data)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Customer, ApiError> {
        Ok(self.client.get(&format!("/customers/{id}")).await?.data)
    }

    #[tracing::instrument(skip(self, customer))]
    pub async fn create(&self, customer: &NewCustomer) -> Result<Customer, ApiError> {
        Ok(self.client.post("/customers", customer).await?.data)
    }

    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, id: &str, update: &CustomerUpdate) -> Result<Customer, ApiError> {
        Ok(self
            .client
            .patch(&format!("/customers/{id}"), update)
            .await?
            .data)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .delete::<serde_json::Value>(&format!("/customers/{id}"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn api_for(url: &str) -> CustomerApi {
        CustomerApi::new(ApiClient::new(ClientConfig::new(url)).unwrap())
    }

    #[tokio::test]
    async fn test_list_with_partial_filters() {
        let mut server = mockito::Server::new_async().await;
        // `status` and `per_page` are None and must not appear in the URL.
        let mock = server
            .mock("GET", "/customers?search=stage&page=2")
            .with_status(200)
            .with_body(
                r#"{
                    "status": "success",
                    "data": [{
                        "id": "cus_1",
                        "name": "Stage One AB",
                        "email": "info@stageone.se",
                        "phone": null,
                        "organization_id": "org_1",
                        "created_at": "2026-01-15T09:00:00Z"
                    }]
                }"#,
            )
            .create_async()
            .await;

        let api = api_for(&server.url());
        let customers = api
            .list(&CustomerListFilter {
                search: Some("stage".to_string()),
                page: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].name, "Stage One AB");
        assert_eq!(customers[0].phone, None);
    }

    #[tokio::test]
    async fn test_create_validation_error_carries_details() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/customers")
            .with_status(422)
            .with_body(
                r#"{
                    "status": "error",
                    "message": "Validation failed",
                    "code": "VALIDATION_ERROR",
                    "details": {"email": "is not a valid address"}
                }"#,
            )
            .create_async()
            .await;

        let api = api_for(&server.url());
        let err = api
            .create(&NewCustomer {
                name: "Bad Email Inc".to_string(),
                email: "not-an-email".to_string(),
                phone: None,
            })
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.status, 422);
        assert_eq!(err.code.as_deref(), Some("VALIDATION_ERROR"));
        assert_eq!(
            err.details.unwrap().get("email").unwrap(),
            "is not a valid address"
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/customers/cus_1")
            .with_status(200)
            .with_body(r#"{"status": "success", "data": null}"#)
            .create_async()
            .await;

        let api = api_for(&server.url());
        api.delete("cus_1").await.unwrap();

        mock.assert_async().await;
    }
}
