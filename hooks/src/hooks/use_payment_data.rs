use jiff::civil::Date;
use payloads::requests::{CreatePayment, UpdatePayment};
use payloads::{
    Filters, Pagination, Payment, PaymentId, PaymentStatus, SupplierId,
};
use rust_decimal::Decimal;
use std::ops::Deref;

use super::{MutationResult, ResourceList};
use crate::api::{PaymentApi, PaymentResource};

/// Supplier payments: list state plus approve/cancel.
pub struct PaymentData<A: PaymentResource = PaymentApi> {
    list: ResourceList<A>,
}

pub async fn use_payment_data<A: PaymentResource>(
    api: A,
    filters: Filters,
) -> PaymentData<A> {
    let list = ResourceList::new(api, filters, Pagination::default());
    list.load().await;
    PaymentData { list }
}

impl<A: PaymentResource> PaymentData<A> {
    pub fn from_list(list: ResourceList<A>) -> Self {
        Self { list }
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.list.items()
    }

    /// Sum of the amounts on the current page, cancelled payments excluded.
    pub fn total_amount(&self) -> Decimal {
        self.list
            .items()
            .iter()
            .filter(|p| p.status != PaymentStatus::Cancelled)
            .map(|p| p.amount)
            .sum()
    }

    pub async fn search(&self, keyword: &str) {
        self.list.set_filter("keyword", keyword.trim()).await;
    }

    /// `None` shows every status.
    pub async fn filter_by_status(&self, status: Option<PaymentStatus>) {
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

    pub async fn filter_by_date_range(&self, start: Date, end: Date) {
        let filters = self.list.filters();
        let mut filters = filters.date_range(start, end);
        if start > end {
            filters.remove("start_date");
            filters.remove("end_date");
        }
        self.list.set_filters(filters).await;
    }

    pub async fn create_payment(
        &self,
        data: &CreatePayment,
    ) -> MutationResult<Payment> {
        self.list.create(data).await
    }

    pub async fn update_payment(
        &self,
        id: PaymentId,
        data: &UpdatePayment,
    ) -> MutationResult<Payment> {
        self.list.update(id, data).await
    }

    pub async fn delete_payment(&self, id: PaymentId) -> MutationResult {
        self.list.delete(id).await
    }

    pub async fn approve_payment(&self, id: PaymentId) -> MutationResult {
        self.list.approve(id).await
    }

    pub async fn cancel_payment(&self, id: PaymentId) -> MutationResult {
        self.list.cancel(id).await
    }
}

impl<A: PaymentResource> Deref for PaymentData<A> {
    type Target = ResourceList<A>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}
