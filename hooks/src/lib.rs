//! List hooks for the management console: paginated, filterable resource
//! lists that reload after every successful mutation.

use payloads::{APIClient, ClientError, Session};

pub mod api;
pub mod config;
pub mod contexts;
pub mod hooks;
pub mod state;
pub mod telemetry;
#[cfg(test)]
mod testing;

pub use api::{
    DepartmentApi, LeaveApplicationApi, PaymentApi, PurchaseOrderApi,
    ResourceApi,
};
pub use config::{Config, ConfigError};
pub use contexts::{Toast, ToastHandle, ToastVariant};
pub use hooks::{
    DepartmentManagement, LeaveApplications, MutationResult, PaymentData,
    Poller, PurchaseOrders, ResourceList, use_configured_polling,
    use_department_management, use_leave_applications, use_payment_data,
    use_polling, use_purchase_orders, use_resource_list,
};
pub use state::{FetchState, ListState};

/// The shared API client for `config`, authenticating through `session`.
pub fn get_api_client(
    config: &Config,
    session: Session,
) -> Result<APIClient, ClientError> {
    APIClient::new(
        config.backend_url.as_str(),
        config.api_prefix.as_str(),
        config.request_timeout,
        session,
    )
}
