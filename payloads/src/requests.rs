use crate::{DepartmentId, EmployeeId, LeaveType, SupplierId};
use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub const DEPARTMENT_NAME_MAX_LEN: usize = 100;
pub const REMARK_MAX_LEN: usize = 500;

#[derive(Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePayment {
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub amount: Decimal,
    pub payment_date: Date,
    pub remark: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePayment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDepartment {
    pub name: String,
    pub dept_code: Option<String>,
    pub manager: Option<String>,
    pub parent_id: Option<DepartmentId>,
}

impl CreateDepartment {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateDepartment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePurchaseOrder {
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub total_amount: Decimal,
    pub order_date: Date,
    pub expected_date: Option<Date>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePurchaseOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<Date>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeaveApplication {
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub leave_type: LeaveType,
    pub start_date: Date,
    pub end_date: Date,
    pub reason: Option<String>,
}

impl CreateLeaveApplication {
    /// Number of calendar days covered, counting both ends. `None` if the
    /// range is reversed.
    pub fn days(&self) -> Option<i32> {
        if self.end_date < self.start_date {
            return None;
        }
        let span = self.start_date.until(self.end_date).ok()?;
        Some(span.get_days() + 1)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLeaveApplication {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_type: Option<LeaveType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
