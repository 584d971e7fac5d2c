//! How each resource is stored, validated, filtered and shaped on the wire.

use jiff::Timestamp;
use jiff::civil::Date;
use payloads::api_client::{
    DEPARTMENTS, LEAVE_APPLICATIONS, PAYMENTS, PURCHASE_ORDERS,
};
use payloads::requests::{self, DEPARTMENT_NAME_MAX_LEN, REMARK_MAX_LEN};
use payloads::{
    Department, LeaveApplication, LeaveStatus, Payment, PaymentStatus,
    PurchaseOrder, PurchaseOrderStatus, ResourceAction,
};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::BackendError;
use super::store::{Table, Tables};

pub trait Record: Serialize + Clone + Send + 'static {
    type Create: DeserializeOwned + 'static;
    type Update: DeserializeOwned + 'static;

    /// Path segment under `/api`.
    const PATH: &'static str;
    /// Singular name used in messages.
    const NAME: &'static str;

    fn table(tables: &mut Tables) -> &mut Table<Self>;

    fn create(id: i64, data: Self::Create) -> Self;

    fn update(&mut self, data: Self::Update);

    /// Checked after every create and update against the other rows.
    fn validate<'a>(
        &self,
        _others: impl Iterator<Item = &'a Self>,
    ) -> Result<(), BackendError> {
        Ok(())
    }

    /// On `Err` the record is unchanged and the message says why the
    /// transition is not allowed.
    fn act(&mut self, action: ResourceAction) -> Result<(), String> {
        Err(format!("Cannot {action} a {}", Self::NAME))
    }

    /// Lowercased text searched by the `keyword` filter.
    fn keywords(&self) -> Vec<String>;

    /// The date compared against `start_date`/`end_date`.
    fn date(&self) -> Option<Date>;

    /// Value of an exact-match filter field; unknown fields are ignored.
    fn field(&self, key: &str) -> Option<String>;

    /// The list body. Each resource answers in its own shape.
    fn envelope(items: Vec<Self>, total: u64) -> Value;
}

fn invalid(message: impl Into<String>) -> BackendError {
    BackendError::Validation(vec![message.into()])
}

fn positive(amount: Decimal, what: &str) -> Result<(), BackendError> {
    if amount <= Decimal::ZERO {
        return Err(invalid(format!("{what} must be positive")));
    }
    Ok(())
}

impl Record for Payment {
    type Create = requests::CreatePayment;
    type Update = requests::UpdatePayment;

    const PATH: &'static str = PAYMENTS;
    const NAME: &'static str = "payment";

    fn table(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.payments
    }

    fn create(id: i64, data: Self::Create) -> Self {
        Payment {
            id: id.into(),
            payment_no: format!("PAY-{id:05}"),
            supplier_id: data.supplier_id,
            supplier_name: data.supplier_name,
            amount: data.amount,
            payment_date: data.payment_date,
            status: PaymentStatus::Pending,
            remark: data.remark,
            created_at: Timestamp::now(),
        }
    }

    fn update(&mut self, data: Self::Update) {
        if let Some(amount) = data.amount {
            self.amount = amount;
        }
        if let Some(payment_date) = data.payment_date {
            self.payment_date = payment_date;
        }
        if data.remark.is_some() {
            self.remark = data.remark;
        }
    }

    fn validate<'a>(
        &self,
        _others: impl Iterator<Item = &'a Self>,
    ) -> Result<(), BackendError> {
        positive(self.amount, "Amount")?;
        if self
            .remark
            .as_ref()
            .is_some_and(|r| r.chars().count() > REMARK_MAX_LEN)
        {
            return Err(invalid(format!(
                "Remark must be at most {REMARK_MAX_LEN} characters"
            )));
        }
        Ok(())
    }

    fn act(&mut self, action: ResourceAction) -> Result<(), String> {
        use PaymentStatus::*;
        self.status = match (action, self.status) {
            (ResourceAction::Approve, Pending) => Approved,
            (ResourceAction::Approve, _) => {
                return Err("Only pending payments can be approved".into());
            }
            (ResourceAction::Cancel, Pending | Approved) => Cancelled,
            (ResourceAction::Cancel, _) => {
                return Err("Payment can no longer be cancelled".into());
            }
            (other, _) => return Err(format!("Cannot {other} a payment")),
        };
        Ok(())
    }

    fn keywords(&self) -> Vec<String> {
        let mut words = vec![self.payment_no.clone(), self.supplier_name.clone()];
        words.extend(self.remark.clone());
        words.into_iter().map(|w| w.to_lowercase()).collect()
    }

    fn date(&self) -> Option<Date> {
        Some(self.payment_date)
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.to_string()),
            "supplier_id" => Some(self.supplier_id.to_string()),
            _ => None,
        }
    }

    fn envelope(items: Vec<Self>, total: u64) -> Value {
        json!({ "data": { "items": items, "total": total } })
    }
}

impl Record for Department {
    type Create = requests::CreateDepartment;
    type Update = requests::UpdateDepartment;

    const PATH: &'static str = DEPARTMENTS;
    const NAME: &'static str = "department";

    fn table(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.departments
    }

    fn create(id: i64, data: Self::Create) -> Self {
        Department {
            id: id.into(),
            name: data.name.trim().to_string(),
            dept_code: data.dept_code,
            manager: data.manager,
            parent_id: data.parent_id,
            is_active: true,
            created_at: Timestamp::now(),
        }
    }

    fn update(&mut self, data: Self::Update) {
        if let Some(name) = data.name {
            self.name = name.trim().to_string();
        }
        if data.dept_code.is_some() {
            self.dept_code = data.dept_code;
        }
        if data.manager.is_some() {
            self.manager = data.manager;
        }
    }

    fn validate<'a>(
        &self,
        mut others: impl Iterator<Item = &'a Self>,
    ) -> Result<(), BackendError> {
        if self.name.is_empty() {
            return Err(BackendError::BadRequest(
                "Department name is required".into(),
            ));
        }
        if self.name.chars().count() > DEPARTMENT_NAME_MAX_LEN {
            return Err(invalid(format!(
                "Department name must be at most {DEPARTMENT_NAME_MAX_LEN} \
                 characters"
            )));
        }
        if others.any(|d| d.name.eq_ignore_ascii_case(&self.name)) {
            return Err(invalid("Department name already exists"));
        }
        Ok(())
    }

    fn act(&mut self, action: ResourceAction) -> Result<(), String> {
        match action {
            ResourceAction::Toggle => {
                self.is_active = !self.is_active;
                Ok(())
            }
            other => Err(format!("Cannot {other} a department")),
        }
    }

    fn keywords(&self) -> Vec<String> {
        let mut words = vec![self.name.clone()];
        words.extend(self.dept_code.clone());
        words.extend(self.manager.clone());
        words.into_iter().map(|w| w.to_lowercase()).collect()
    }

    fn date(&self) -> Option<Date> {
        None
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "is_active" => Some(self.is_active.to_string()),
            "parent_id" => self.parent_id.map(|id| id.to_string()),
            _ => None,
        }
    }

    fn envelope(items: Vec<Self>, total: u64) -> Value {
        json!({ "items": items, "total": total })
    }
}

impl Record for PurchaseOrder {
    type Create = requests::CreatePurchaseOrder;
    type Update = requests::UpdatePurchaseOrder;

    const PATH: &'static str = PURCHASE_ORDERS;
    const NAME: &'static str = "purchase order";

    fn table(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.purchase_orders
    }

    fn create(id: i64, data: Self::Create) -> Self {
        PurchaseOrder {
            id: id.into(),
            order_no: format!("PO-{id:05}"),
            supplier_id: data.supplier_id,
            supplier_name: data.supplier_name,
            total_amount: data.total_amount,
            order_date: data.order_date,
            expected_date: data.expected_date,
            status: PurchaseOrderStatus::Draft,
            created_at: Timestamp::now(),
        }
    }

    fn update(&mut self, data: Self::Update) {
        if let Some(total_amount) = data.total_amount {
            self.total_amount = total_amount;
        }
        if data.expected_date.is_some() {
            self.expected_date = data.expected_date;
        }
    }

    fn validate<'a>(
        &self,
        _others: impl Iterator<Item = &'a Self>,
    ) -> Result<(), BackendError> {
        positive(self.total_amount, "Total amount")?;
        if self.expected_date.is_some_and(|d| d < self.order_date) {
            return Err(invalid("Expected date must not be before order date"));
        }
        Ok(())
    }

    fn act(&mut self, action: ResourceAction) -> Result<(), String> {
        use PurchaseOrderStatus::*;
        self.status = match (action, self.status) {
            (ResourceAction::Submit, Draft) => Submitted,
            (ResourceAction::Submit, _) => {
                return Err("Only draft orders can be submitted".into());
            }
            (ResourceAction::Approve, Submitted) => Approved,
            (ResourceAction::Approve, _) => {
                return Err("Only submitted orders can be approved".into());
            }
            (ResourceAction::Cancel, Draft | Submitted | Approved) => Cancelled,
            (ResourceAction::Cancel, _) => {
                return Err("Order can no longer be cancelled".into());
            }
            (other, _) => {
                return Err(format!("Cannot {other} a purchase order"));
            }
        };
        Ok(())
    }

    fn keywords(&self) -> Vec<String> {
        vec![self.order_no.to_lowercase(), self.supplier_name.to_lowercase()]
    }

    fn date(&self) -> Option<Date> {
        Some(self.order_date)
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.to_string()),
            "supplier_id" => Some(self.supplier_id.to_string()),
            _ => None,
        }
    }

    fn envelope(items: Vec<Self>, total: u64) -> Value {
        json!({ "data": items, "total": total })
    }
}

impl Record for LeaveApplication {
    type Create = requests::CreateLeaveApplication;
    type Update = requests::UpdateLeaveApplication;

    const PATH: &'static str = LEAVE_APPLICATIONS;
    const NAME: &'static str = "leave application";

    fn table(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.leave_applications
    }

    fn create(id: i64, data: Self::Create) -> Self {
        LeaveApplication {
            id: id.into(),
            employee_id: data.employee_id,
            employee_name: data.employee_name,
            leave_type: data.leave_type,
            start_date: data.start_date,
            end_date: data.end_date,
            reason: data.reason,
            status: LeaveStatus::Draft,
            created_at: Timestamp::now(),
        }
    }

    fn update(&mut self, data: Self::Update) {
        if let Some(leave_type) = data.leave_type {
            self.leave_type = leave_type;
        }
        if let Some(start_date) = data.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = data.end_date {
            self.end_date = end_date;
        }
        if data.reason.is_some() {
            self.reason = data.reason;
        }
    }

    fn validate<'a>(
        &self,
        _others: impl Iterator<Item = &'a Self>,
    ) -> Result<(), BackendError> {
        if self.end_date < self.start_date {
            return Err(invalid("End date must not be before start date"));
        }
        Ok(())
    }

    fn act(&mut self, action: ResourceAction) -> Result<(), String> {
        use LeaveStatus::*;
        self.status = match (action, self.status) {
            (ResourceAction::Submit, Draft) => Pending,
            (ResourceAction::Submit, _) => {
                return Err("Only draft applications can be submitted".into());
            }
            (ResourceAction::Approve, Pending) => Approved,
            (ResourceAction::Approve, _) => {
                return Err("Only pending applications can be approved".into());
            }
            (ResourceAction::Cancel, Draft | Pending | Approved) => Cancelled,
            (ResourceAction::Cancel, _) => {
                return Err("Application can no longer be cancelled".into());
            }
            (other, _) => {
                return Err(format!("Cannot {other} a leave application"));
            }
        };
        Ok(())
    }

    fn keywords(&self) -> Vec<String> {
        let mut words = vec![self.employee_name.clone()];
        words.extend(self.reason.clone());
        words.into_iter().map(|w| w.to_lowercase()).collect()
    }

    fn date(&self) -> Option<Date> {
        Some(self.start_date)
    }

    fn field(&self, key: &str) -> Option<String> {
        match key {
            "status" => Some(self.status.to_string()),
            "employee_id" => Some(self.employee_id.to_string()),
            "leave_type" => Some(self.leave_type.to_string()),
            _ => None,
        }
    }

    /// Bare array; this endpoint never reports a total.
    fn envelope(items: Vec<Self>, _total: u64) -> Value {
        json!(items)
    }
}
