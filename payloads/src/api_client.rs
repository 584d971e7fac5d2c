use crate::{
    Department, DepartmentId, LeaveApplication, LeaveApplicationId, ListQuery,
    Payment, PaymentId, PurchaseOrder, PurchaseOrderId, ResourceAction, Session,
    requests,
    responses::{self, ErrorBody, ListEnvelope, ListPage},
};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Display;
use std::time::Duration;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An API client for interfacing with the backend.
pub struct APIClient {
    pub address: String,
    /// Path prefix of every endpoint, `/api` or `/api/v1`.
    pub prefix: String,
    pub inner_client: reqwest::Client,
    pub session: Session,
}

impl APIClient {
    /// Build a client whose requests time out after `timeout` overall.
    pub fn new(
        address: impl Into<String>,
        prefix: impl Into<String>,
        timeout: Duration,
        session: Session,
    ) -> Result<Self, ClientError> {
        let inner_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            address: address.into().trim_end_matches('/').to_string(),
            prefix: prefix.into().trim_end_matches('/').to_string(),
            inner_client,
            session,
        })
    }
}

/// Helper methods for http actions
impl APIClient {
    fn format_url(&self, path: &str) -> String {
        format!("{}{}/{path}", &self.address, &self.prefix)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// GETs carry a `_t` timestamp so intermediaries never serve a cached
    /// list after a mutation.
    async fn get(&self, path: &str, query: &[(String, String)]) -> ReqwestResult {
        let cache_buster = jiff::Timestamp::now().as_millisecond().to_string();
        let request = self
            .inner_client
            .get(self.format_url(path))
            .query(query)
            .query(&[("_t", cache_buster)]);
        self.authorize(request).send().await
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request = self.inner_client.post(self.format_url(path)).json(body);
        self.authorize(request).send().await
    }

    async fn empty_post(&self, path: &str) -> ReqwestResult {
        let request = self.inner_client.post(self.format_url(path));
        self.authorize(request).send().await
    }

    async fn put(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request = self.inner_client.put(self.format_url(path)).json(body);
        self.authorize(request).send().await
    }

    async fn patch(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request = self.inner_client.patch(self.format_url(path)).json(body);
        self.authorize(request).send().await
    }

    async fn delete(&self, path: &str) -> ReqwestResult {
        let request = self.inner_client.delete(self.format_url(path));
        self.authorize(request).send().await
    }

    /// Runs before any response is decoded. A 401 ends the session.
    fn intercept(&self, response: &reqwest::Response) {
        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(url = %response.url(), "request was unauthorized");
            self.session.expire();
        }
    }

    async fn intercepted_body<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        self.intercept(&response);
        ok_body(response).await
    }

    async fn intercepted_empty(
        &self,
        response: reqwest::Response,
    ) -> Result<(), ClientError> {
        self.intercept(&response);
        ok_empty(response).await
    }
}

/// Generic resource endpoints: `{path}`, `{path}/{id}`, `{path}/{id}/{action}`
impl APIClient {
    pub async fn list_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &ListQuery,
    ) -> Result<ListPage<T>, ClientError> {
        let response = self.get(path, &query.to_pairs()).await?;
        let envelope: ListEnvelope<T> =
            self.intercepted_body(response).await?;
        Ok(envelope.into())
    }

    pub async fn create_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let response = self.post(path, body).await?;
        self.intercepted_body(response).await
    }

    pub async fn update_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        id: impl Display,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let response = self.put(&format!("{path}/{id}"), body).await?;
        self.intercepted_body(response).await
    }

    pub async fn patch_resource<T: DeserializeOwned>(
        &self,
        path: &str,
        id: impl Display,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let response = self.patch(&format!("{path}/{id}"), body).await?;
        self.intercepted_body(response).await
    }

    pub async fn delete_resource(
        &self,
        path: &str,
        id: impl Display,
    ) -> Result<(), ClientError> {
        let response = self.delete(&format!("{path}/{id}")).await?;
        self.intercepted_empty(response).await
    }

    pub async fn resource_action(
        &self,
        path: &str,
        id: impl Display,
        action: ResourceAction,
    ) -> Result<(), ClientError> {
        let response = self.empty_post(&format!("{path}/{id}/{action}")).await?;
        self.intercepted_empty(response).await
    }
}

pub const PAYMENTS: &str = "payments";
pub const DEPARTMENTS: &str = "departments";
pub const PURCHASE_ORDERS: &str = "purchase-orders";
pub const LEAVE_APPLICATIONS: &str = "leave-applications";

/// Methods on the backend API
impl APIClient {
    /// Log in and keep the returned token in the session.
    pub async fn login(
        &self,
        details: &requests::LoginCredentials,
    ) -> Result<responses::UserInfo, ClientError> {
        let response = self.post("auth/login", details).await?;
        // bad credentials are not a session expiry
        let token: responses::LoginToken = ok_body(response).await?;
        self.session.login(token.access_token);
        let user = self.user_info().await?;
        self.session.set_user(user.clone());
        Ok(user)
    }

    /// Always ends the local session, even if the backend call fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = match self.empty_post("auth/logout").await {
            Ok(response) => ok_empty(response).await,
            Err(e) => Err(e.into()),
        };
        self.session.logout();
        result
    }

    pub async fn user_info(&self) -> Result<responses::UserInfo, ClientError> {
        let response = self.get("auth/userinfo", &[]).await?;
        self.intercepted_body(response).await
    }

    pub async fn list_payments(
        &self,
        query: &ListQuery,
    ) -> Result<ListPage<Payment>, ClientError> {
        self.list_resource(PAYMENTS, query).await
    }

    pub async fn create_payment(
        &self,
        details: &requests::CreatePayment,
    ) -> Result<Payment, ClientError> {
        self.create_resource(PAYMENTS, details).await
    }

    pub async fn update_payment(
        &self,
        id: PaymentId,
        details: &requests::UpdatePayment,
    ) -> Result<Payment, ClientError> {
        self.update_resource(PAYMENTS, id, details).await
    }

    pub async fn delete_payment(&self, id: PaymentId) -> Result<(), ClientError> {
        self.delete_resource(PAYMENTS, id).await
    }

    pub async fn list_departments(
        &self,
        query: &ListQuery,
    ) -> Result<ListPage<Department>, ClientError> {
        self.list_resource(DEPARTMENTS, query).await
    }

    pub async fn create_department(
        &self,
        details: &requests::CreateDepartment,
    ) -> Result<Department, ClientError> {
        self.create_resource(DEPARTMENTS, details).await
    }

    pub async fn update_department(
        &self,
        id: DepartmentId,
        details: &requests::UpdateDepartment,
    ) -> Result<Department, ClientError> {
        self.update_resource(DEPARTMENTS, id, details).await
    }

    pub async fn delete_department(
        &self,
        id: DepartmentId,
    ) -> Result<(), ClientError> {
        self.delete_resource(DEPARTMENTS, id).await
    }

    pub async fn list_purchase_orders(
        &self,
        query: &ListQuery,
    ) -> Result<ListPage<PurchaseOrder>, ClientError> {
        self.list_resource(PURCHASE_ORDERS, query).await
    }

    pub async fn create_purchase_order(
        &self,
        details: &requests::CreatePurchaseOrder,
    ) -> Result<PurchaseOrder, ClientError> {
        self.create_resource(PURCHASE_ORDERS, details).await
    }

    pub async fn update_purchase_order(
        &self,
        id: PurchaseOrderId,
        details: &requests::UpdatePurchaseOrder,
    ) -> Result<PurchaseOrder, ClientError> {
        self.update_resource(PURCHASE_ORDERS, id, details).await
    }

    pub async fn delete_purchase_order(
        &self,
        id: PurchaseOrderId,
    ) -> Result<(), ClientError> {
        self.delete_resource(PURCHASE_ORDERS, id).await
    }

    pub async fn list_leave_applications(
        &self,
        query: &ListQuery,
    ) -> Result<ListPage<LeaveApplication>, ClientError> {
        self.list_resource(LEAVE_APPLICATIONS, query).await
    }

    pub async fn create_leave_application(
        &self,
        details: &requests::CreateLeaveApplication,
    ) -> Result<LeaveApplication, ClientError> {
        self.create_resource(LEAVE_APPLICATIONS, details).await
    }

    pub async fn update_leave_application(
        &self,
        id: LeaveApplicationId,
        details: &requests::UpdateLeaveApplication,
    ) -> Result<LeaveApplication, ClientError> {
        self.update_resource(LEAVE_APPLICATIONS, id, details).await
    }

    pub async fn delete_leave_application(
        &self,
        id: LeaveApplicationId,
    ) -> Result<(), ClientError> {
        self.delete_resource(LEAVE_APPLICATIONS, id).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing the resolved message.
    #[error("{1}")]
    APIError(StatusCode, String),
    /// A successful response that carried a business-rule rejection.
    #[error("{0}")]
    Rejected(String),
    #[error("Unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::APIError(status, _) => Some(*status),
            _ => None,
        }
    }
}

/// Default user-facing message for an HTTP error status.
pub fn status_message(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "Invalid request parameters".to_string(),
        401 => "Session expired, please log in again".to_string(),
        403 => "You do not have permission to perform this action".to_string(),
        404 => "The requested resource was not found".to_string(),
        500 => "Internal server error".to_string(),
        502 => "Bad gateway".to_string(),
        503 => "Service temporarily unavailable".to_string(),
        504 => "Gateway timeout".to_string(),
        code => format!("Request failed with status {code}"),
    }
}

async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| status_message(status));
    ClientError::APIError(status, message)
}

/// Deserialize a successful request into the desired type, or return an
/// appropriate error.
pub async fn ok_body<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    // only a failure to read the body is a network error
    let text = response.text().await?;
    let body: serde_json::Value = serde_json::from_str(&text)?;
    if let Some(message) = responses::rejection_message(&body) {
        return Err(ClientError::Rejected(message));
    }
    Ok(serde_json::from_value(body)?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    let text = response.text().await?;
    if let Ok(body) = serde_json::from_str::<serde_json::Value>(&text)
        && let Some(message) = responses::rejection_message(&body)
    {
        return Err(ClientError::Rejected(message));
    }
    Ok(())
}
