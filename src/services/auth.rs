//! Authentication endpoints.
//!
//! Every path here is auth-prefixed, so a 401 from these calls is a real
//! authentication failure and never triggers the refresh coordinator.

use serde::{Deserialize, Serialize};

use crate::http::{ApiClient, ApiError, RequestOptions};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_name: Option<String>,
}

/// The authenticated account, as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub organization_id: Option<String>,
}

/// Wrapper over the auth endpoints.
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Logs in with email and password. On success the backend sets the
    /// two session cookies; no token is handled client-side.
    #[tracing::instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &LoginRequest) -> Result<User, ApiError> {
        Ok(self.client.post("/auth/login", credentials).await?.data)
    }

    /// Registers a new account, optionally creating an organization.
    #[tracing::instrument(skip(self, details))]
    pub async fn register(&self, details: &RegisterRequest) -> Result<User, ApiError> {
        Ok(self.client.post("/auth/register", details).await?.data)
    }

    /// Ends the session server-side.
    #[tracing::instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client
            .request::<serde_json::Value>("/auth/logout", RequestOptions::post())
            .await?;
        Ok(())
    }

    /// Fetches the currently authenticated user.
    #[tracing::instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User, ApiError> {
        Ok(self.client.get("/auth/me").await?.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn api_for(url: &str) -> AuthApi {
        AuthApi::new(ApiClient::new(ClientConfig::new(url)).unwrap())
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "status": "success",
                    "data": {
                        "id": "usr_1",
                        "email": "owner@stageone.se",
                        "name": "Stage One",
                        "role": "org_admin",
                        "organization_id": "org_1"
                    }
                }"#,
            )
            .create_async()
            .await;

        let api = api_for(&server.url());
        let user = api
            .login(&LoginRequest {
                email: "owner@stageone.se".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(user.id, "usr_1");
        assert_eq!(user.role, "org_admin");
        assert_eq!(user.organization_id.as_deref(), Some("org_1"));
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/login")
            .with_status(401)
            .with_body(
                r#"{"status": "error", "message": "Invalid email or password", "code": "INVALID_CREDENTIALS"}"#,
            )
            .create_async()
            .await;

        let api = api_for(&server.url());
        let err = api
            .login(&LoginRequest {
                email: "fail@test.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.status, 401);
        assert_eq!(err.code.as_deref(), Some("INVALID_CREDENTIALS"));
    }

    #[tokio::test]
    async fn test_logout_discards_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/logout")
            .with_status(200)
            .with_body(r#"{"status": "success", "data": null, "message": "Logged out"}"#)
            .create_async()
            .await;

        let api = api_for(&server.url());
        api.logout().await.unwrap();

        mock.assert_async().await;
    }
}
