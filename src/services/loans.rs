//! Loan endpoints.

use serde::{Deserialize, Serialize};

use crate::http::{ApiClient, ApiError, Query, RequestOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Reserved,
    Active,
    Returned,
    Overdue,
}

impl LoanStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Reserved => "reserved",
            LoanStatus::Active => "active",
            LoanStatus::Returned => "returned",
            LoanStatus::Overdue => "overdue",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Loan {
    pub id: String,
    pub customer_id: String,
    pub item_ids: Vec<String>,
    pub status: LoanStatus,
    pub starts_at: String,
    pub due_at: String,
    pub returned_at: Option<String>,
}

/// Optional list filters; `None` values are omitted from the query string.
#[derive(Debug, Clone, Default)]
pub struct LoanListFilter {
    pub status: Option<LoanStatus>,
    pub customer_id: Option<String>,
    pub page: Option<u32>,
}

impl LoanListFilter {
    fn to_query(&self) -> Query {
        Query::new()
            .set_opt("status", self.status.map(LoanStatus::as_str))
            .set_opt("customer_id", self.customer_id.clone())
            .set_opt("page", self.page)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewLoan {
    pub customer_id: String,
    pub item_ids: Vec<String>,
    pub starts_at: String,
    pub due_at: String,
}

/// Wrapper over the loan endpoints.
#[derive(Clone)]
pub struct LoanApi {
    client: ApiClient,
}

impl LoanApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    #[tracing::instrument(skip(self, filter))]
    pub async fn list(&self, filter: &LoanListFilter) -> Result<Vec<Loan>, ApiError> {
        Ok(self.client.get_with("/loans", filter.to_query()).await?.data)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Loan, ApiError> {
        Ok(self.client.get(&format!("/loans/{id}")).await?.data)
    }

    #[tracing::instrument(skip(self, loan))]
    pub async fn create(&self, loan: &NewLoan) -> Result<Loan, ApiError> {
        Ok(self.client.post("/loans", loan).await?.data)
    }

    /// Marks the loan returned; the backend stamps the return time.
    #[tracing::instrument(skip(self))]
    pub async fn return_loan(&self, id: &str) -> Result<Loan, ApiError> {
        Ok(self
            .client
            .request(&format!("/loans/{id}/return"), RequestOptions::patch())
            .await?
            .data)
    }
}
