//! Per-resource API clients consumed by the list hooks.

use async_trait::async_trait;
use payloads::api_client::{
    DEPARTMENTS, LEAVE_APPLICATIONS, PAYMENTS, PURCHASE_ORDERS,
};
use payloads::responses::ListPage;
use payloads::{
    APIClient, ClientError, Department, DepartmentId, LeaveApplication,
    LeaveApplicationId, ListQuery, Payment, PaymentId, PurchaseOrder,
    PurchaseOrderId, ResourceAction, requests,
};
use std::fmt::{Debug, Display};
use std::sync::Arc;

/// The CRUD surface of one backend resource. The hooks only see this
/// trait, never the transport.
#[async_trait]
pub trait ResourceApi: Send + Sync + 'static {
    type Item: Clone + Debug + Send + Sync + 'static;
    type Id: Copy + Display + Debug + Send + Sync + 'static;
    type Create: Debug + Send + Sync;
    type Update: Debug + Send + Sync;

    /// Singular, human-readable name used in notifications.
    const NAME: &'static str;

    async fn list(
        &self,
        query: &ListQuery,
    ) -> Result<ListPage<Self::Item>, ClientError>;

    async fn create(
        &self,
        data: &Self::Create,
    ) -> Result<Self::Item, ClientError>;

    async fn update(
        &self,
        id: Self::Id,
        data: &Self::Update,
    ) -> Result<Self::Item, ClientError>;

    async fn delete(&self, id: Self::Id) -> Result<(), ClientError>;

    /// Resources without domain actions reject every action.
    async fn action(
        &self,
        id: Self::Id,
        action: ResourceAction,
    ) -> Result<(), ClientError> {
        Err(ClientError::Rejected(format!(
            "Cannot {action} {} {id}",
            Self::NAME
        )))
    }
}

/// Names a [`ResourceApi`] by its record type so domain hooks can bound on
/// it, and implements it for every matching API.
macro_rules! resource_alias {
    ($alias:ident, $item:ty, $id:ty, $create:ty, $update:ty) => {
        pub trait $alias:
            ResourceApi<Item = $item, Id = $id, Create = $create, Update = $update>
        {
        }

        impl<T> $alias for T where
            T: ResourceApi<Item = $item, Id = $id, Create = $create, Update = $update>
        {
        }
    };
}

resource_alias!(
    PaymentResource, Payment, PaymentId,
    requests::CreatePayment, requests::UpdatePayment
);
resource_alias!(
    DepartmentResource, Department, DepartmentId,
    requests::CreateDepartment, requests::UpdateDepartment
);
resource_alias!(
    PurchaseOrderResource, PurchaseOrder, PurchaseOrderId,
    requests::CreatePurchaseOrder, requests::UpdatePurchaseOrder
);
resource_alias!(
    LeaveApplicationResource, LeaveApplication, LeaveApplicationId,
    requests::CreateLeaveApplication, requests::UpdateLeaveApplication
);

/// Implements [`ResourceApi`] for a thin wrapper over the shared client.
macro_rules! rest_resource {
    (
        $(#[$meta:meta])*
        $api:ident, $name:literal, $path:expr,
        $item:ty, $id:ty, $create:ty, $update:ty,
        actions: [$($action:ident),*]
    ) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $api {
            client: Arc<APIClient>,
        }

        impl $api {
            pub fn new(client: Arc<APIClient>) -> Self {
                Self { client }
            }
        }

        #[async_trait]
        impl ResourceApi for $api {
            type Item = $item;
            type Id = $id;
            type Create = $create;
            type Update = $update;

            const NAME: &'static str = $name;

            async fn list(
                &self,
                query: &ListQuery,
            ) -> Result<ListPage<$item>, ClientError> {
                self.client.list_resource($path, query).await
            }

            async fn create(&self, data: &$create) -> Result<$item, ClientError> {
                self.client.create_resource($path, data).await
            }

            async fn update(
                &self,
                id: $id,
                data: &$update,
            ) -> Result<$item, ClientError> {
                self.client.update_resource($path, id, data).await
            }

            async fn delete(&self, id: $id) -> Result<(), ClientError> {
                self.client.delete_resource($path, id).await
            }

            async fn action(
                &self,
                id: $id,
                action: ResourceAction,
            ) -> Result<(), ClientError> {
                match action {
                    $(ResourceAction::$action)|* => {
                        self.client.resource_action($path, id, action).await
                    }
                    #[allow(unreachable_patterns)]
                    other => Err(ClientError::Rejected(format!(
                        "Cannot {other} {} {id}",
                        $name
                    ))),
                }
            }
        }
    };
}

rest_resource!(
    /// `/payments`: approve and cancel.
    PaymentApi, "payment", PAYMENTS,
    Payment, PaymentId, requests::CreatePayment, requests::UpdatePayment,
    actions: [Approve, Cancel]
);

rest_resource!(
    /// `/departments`: toggle switches a department active/inactive.
    DepartmentApi, "department", DEPARTMENTS,
    Department, DepartmentId,
    requests::CreateDepartment, requests::UpdateDepartment,
    actions: [Toggle]
);

rest_resource!(
    PurchaseOrderApi, "purchase order", PURCHASE_ORDERS,
    PurchaseOrder, PurchaseOrderId,
    requests::CreatePurchaseOrder, requests::UpdatePurchaseOrder,
    actions: [Submit, Approve, Cancel]
);

rest_resource!(
    LeaveApplicationApi, "leave application", LEAVE_APPLICATIONS,
    LeaveApplication, LeaveApplicationId,
    requests::CreateLeaveApplication, requests::UpdateLeaveApplication,
    actions: [Submit, Approve, Cancel]
);
