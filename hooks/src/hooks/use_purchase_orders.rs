use payloads::requests::{CreatePurchaseOrder, UpdatePurchaseOrder};
use payloads::{
    Filters, Pagination, PurchaseOrder, PurchaseOrderId, PurchaseOrderStatus,
    SupplierId,
};
use std::ops::Deref;

use super::{MutationResult, ResourceList};
use crate::api::{PurchaseOrderApi, PurchaseOrderResource};

/// Purchase orders move draft -> submitted -> approved; any order that is
/// not completed can be cancelled.
pub struct PurchaseOrders<A: PurchaseOrderResource = PurchaseOrderApi> {
    list: ResourceList<A>,
}

pub async fn use_purchase_orders<A: PurchaseOrderResource>(
    api: A,
    filters: Filters,
    pagination: Pagination,
) -> PurchaseOrders<A> {
    let list = ResourceList::new(api, filters, pagination);
    list.load().await;
    PurchaseOrders { list }
}

impl<A: PurchaseOrderResource> PurchaseOrders<A> {
    pub fn from_list(list: ResourceList<A>) -> Self {
        Self { list }
    }

    pub fn orders(&self) -> Vec<PurchaseOrder> {
        self.list.items()
    }

    /// Orders on the current page waiting for approval.
    pub fn awaiting_approval(&self) -> Vec<PurchaseOrder> {
        self.list
            .items()
            .into_iter()
            .filter(|o| o.status == PurchaseOrderStatus::Submitted)
            .collect()
    }

    pub async fn search(&self, keyword: &str) {
        self.list.set_filter("keyword", keyword.trim()).await;
    }

    pub async fn filter_by_status(&self, status: Option<PurchaseOrderStatus>) {
        match status {
            Some(status) => self.list.set_filter("status", status).await,
            None => self.list.set_filter("status", Filters::ALL).await,
        }
    }

    pub async fn filter_by_supplier(&self, supplier: Option<SupplierId>) {
        match supplier {
            Some(supplier) => self.list.set_filter("supplier_id", supplier).await,
            None => self.list.set_filter("supplier_id", "").await,
        }
    }

    pub async fn create_order(
        &self,
        data: &CreatePurchaseOrder,
    ) -> MutationResult<PurchaseOrder> {
        self.list.create(data).await
    }

    pub async fn update_order(
        &self,
        id: PurchaseOrderId,
        data: &UpdatePurchaseOrder,
    ) -> MutationResult<PurchaseOrder> {
        self.list.update(id, data).await
    }

    pub async fn delete_order(&self, id: PurchaseOrderId) -> MutationResult {
        self.list.delete(id).await
    }

    pub async fn submit_order(&self, id: PurchaseOrderId) -> MutationResult {
        self.list.submit(id).await
    }

    pub async fn approve_order(&self, id: PurchaseOrderId) -> MutationResult {
        self.list.approve(id).await
    }

    pub async fn cancel_order(&self, id: PurchaseOrderId) -> MutationResult {
        self.list.cancel(id).await
    }
}

impl<A: PurchaseOrderResource> Deref for PurchaseOrders<A> {
    type Target = ResourceList<A>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}
