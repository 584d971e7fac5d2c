//! Scripted in-process [`ResourceApi`] for hook unit tests.

use async_trait::async_trait;
use jiff::Timestamp;
use jiff::civil::date;
use payloads::responses::ListPage;
use payloads::{
    ClientError, Department, DepartmentId, EmployeeId, LeaveApplication,
    LeaveApplicationId, LeaveStatus, LeaveType, ListQuery, Payment, PaymentId,
    PaymentStatus, PurchaseOrder, PurchaseOrderId, PurchaseOrderStatus,
    ResourceAction, SupplierId,
};
use reqwest::StatusCode;
use rust_decimal::dec;
use std::collections::VecDeque;
use std::fmt::{Debug, Display};
use std::sync::Mutex;
use std::time::Duration;

use crate::api::ResourceApi;

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: i64,
}

pub fn server_error(message: &str) -> ClientError {
    ClientError::APIError(StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
}

type ListScript<T> = (Duration, Result<ListPage<T>, ClientError>);

pub struct FakeApi<T, Id = i64, C = T, U = T> {
    lists: Mutex<VecDeque<ListScript<T>>>,
    default_list: Mutex<Option<ListPage<T>>>,
    queries: Mutex<Vec<ListQuery>>,
    actions: Mutex<Vec<(Id, ResourceAction)>>,
    mutation_error: Mutex<Option<(StatusCode, String)>>,
    on_create: Box<dyn Fn(&C) -> T + Send + Sync>,
    on_update: Box<dyn Fn(Id, &U) -> T + Send + Sync>,
}

impl FakeApi<Row> {
    pub fn new() -> Self {
        Self::with(|row: &Row| row.clone(), |_, row: &Row| row.clone())
    }
}

impl<T, Id, C, U> FakeApi<T, Id, C, U> {
    pub fn with(
        on_create: impl Fn(&C) -> T + Send + Sync + 'static,
        on_update: impl Fn(Id, &U) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            lists: Mutex::new(VecDeque::new()),
            default_list: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
            actions: Mutex::new(Vec::new()),
            mutation_error: Mutex::new(None),
            on_create: Box::new(on_create),
            on_update: Box::new(on_update),
        }
    }

    pub fn push_list(&self, result: Result<ListPage<T>, ClientError>) {
        self.push_delayed_list(Duration::ZERO, result);
    }

    pub fn push_delayed_list(
        &self,
        delay: Duration,
        result: Result<ListPage<T>, ClientError>,
    ) {
        self.lists.lock().unwrap().push_back((delay, result));
    }

    /// Answer used once the scripted answers run out.
    pub fn set_default_list(&self, page: ListPage<T>) {
        *self.default_list.lock().unwrap() = Some(page);
    }

    /// Every later mutation fails with this error.
    pub fn fail_mutations_with(&self, error: ClientError) {
        let failure = match error {
            ClientError::APIError(status, message) => (status, message),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };
        *self.mutation_error.lock().unwrap() = Some(failure);
    }

    pub fn list_calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Option<ListQuery> {
        self.queries.lock().unwrap().last().cloned()
    }

    fn check_mutation(&self) -> Result<(), ClientError> {
        match &*self.mutation_error.lock().unwrap() {
            Some((status, message)) => {
                Err(ClientError::APIError(*status, message.clone()))
            }
            None => Ok(()),
        }
    }
}

impl<T, Id: Clone, C, U> FakeApi<T, Id, C, U> {
    pub fn actions(&self) -> Vec<(Id, ResourceAction)> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl<T, Id, C, U> ResourceApi for FakeApi<T, Id, C, U>
where
    T: Clone + Debug + Send + Sync + 'static,
    Id: Copy + Display + Debug + Send + Sync + 'static,
    C: Debug + Send + Sync + 'static,
    U: Debug + Send + Sync + 'static,
{
    type Item = T;
    type Id = Id;
    type Create = C;
    type Update = U;

    const NAME: &'static str = "row";

    async fn list(&self, query: &ListQuery) -> Result<ListPage<T>, ClientError> {
        self.queries.lock().unwrap().push(query.clone());
        let scripted = self.lists.lock().unwrap().pop_front();
        let (delay, result) = match scripted {
            Some(script) => script,
            None => {
                let page = self.default_list.lock().unwrap().clone();
                let page = page.unwrap_or(ListPage {
                    items: Vec::new(),
                    total: None,
                });
                (Duration::ZERO, Ok(page))
            }
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        result
    }

    async fn create(&self, data: &C) -> Result<T, ClientError> {
        self.check_mutation()?;
        Ok((self.on_create)(data))
    }

    async fn update(&self, id: Id, data: &U) -> Result<T, ClientError> {
        self.check_mutation()?;
        Ok((self.on_update)(id, data))
    }

    async fn delete(&self, _id: Id) -> Result<(), ClientError> {
        self.check_mutation()
    }

    async fn action(
        &self,
        id: Id,
        action: ResourceAction,
    ) -> Result<(), ClientError> {
        self.check_mutation()?;
        self.actions.lock().unwrap().push((id, action));
        Ok(())
    }
}

pub fn payment(id: i64) -> Payment {
    Payment {
        id: PaymentId(id),
        payment_no: format!("PAY-{id:04}"),
        supplier_id: SupplierId(7),
        supplier_name: "Acme Supplies".into(),
        amount: dec!(100.00),
        payment_date: date(2024, 3, 1),
        status: PaymentStatus::Pending,
        remark: None,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub fn department(id: i64, name: &str) -> Department {
    Department {
        id: DepartmentId(id),
        name: name.into(),
        dept_code: None,
        manager: None,
        parent_id: None,
        is_active: true,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub fn purchase_order(id: i64) -> PurchaseOrder {
    PurchaseOrder {
        id: PurchaseOrderId(id),
        order_no: format!("PO-{id:04}"),
        supplier_id: SupplierId(7),
        supplier_name: "Acme Supplies".into(),
        total_amount: dec!(1250.50),
        order_date: date(2024, 3, 1),
        expected_date: None,
        status: PurchaseOrderStatus::Draft,
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub fn leave_application(id: i64) -> LeaveApplication {
    LeaveApplication {
        id: LeaveApplicationId(id),
        employee_id: EmployeeId(3),
        employee_name: "Bob".into(),
        leave_type: LeaveType::Annual,
        start_date: date(2024, 7, 1),
        end_date: date(2024, 7, 5),
        reason: None,
        status: LeaveStatus::Draft,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
