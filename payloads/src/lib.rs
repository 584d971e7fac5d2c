pub mod api_client;
pub mod requests;
pub mod responses;
pub mod session;

pub use api_client::{APIClient, ClientError, status_message};
pub use session::{AuthState, NavigationHistory, Navigator, Route, Session};

use derive_more::{Display, From};
use jiff::Timestamp;
use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct PaymentId(pub i64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct DepartmentId(pub i64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct PurchaseOrderId(pub i64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct LeaveApplicationId(pub i64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct SupplierId(pub i64);

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    From,
)]
#[serde(transparent)]
pub struct EmployeeId(pub i64);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[display("pending")]
    Pending,
    #[display("approved")]
    Approved,
    #[display("paid")]
    Paid,
    #[display("cancelled")]
    Cancelled,
}

/// A payment to a supplier, approved before it is paid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub payment_no: String,
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub amount: Decimal,
    pub payment_date: Date,
    pub status: PaymentStatus,
    pub remark: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub dept_code: Option<String>,
    pub manager: Option<String>,
    pub parent_id: Option<DepartmentId>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    #[display("draft")]
    Draft,
    #[display("submitted")]
    Submitted,
    #[display("approved")]
    Approved,
    #[display("completed")]
    Completed,
    #[display("cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: PurchaseOrderId,
    pub order_no: String,
    pub supplier_id: SupplierId,
    pub supplier_name: String,
    pub total_amount: Decimal,
    pub order_date: Date,
    pub expected_date: Option<Date>,
    pub status: PurchaseOrderStatus,
    pub created_at: Timestamp,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    #[display("annual")]
    Annual,
    #[display("sick")]
    Sick,
    #[display("personal")]
    Personal,
    #[display("other")]
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    #[display("draft")]
    Draft,
    #[display("pending")]
    Pending,
    #[display("approved")]
    Approved,
    #[display("rejected")]
    Rejected,
    #[display("cancelled")]
    Cancelled,
}

/// An employee's request for time off. Both dates are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveApplication {
    pub id: LeaveApplicationId,
    pub employee_id: EmployeeId,
    pub employee_name: String,
    pub leave_type: LeaveType,
    pub start_date: Date,
    pub end_date: Date,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub created_at: Timestamp,
}

/// Domain actions beyond plain CRUD. Each maps to
/// `POST /{resource}/{id}/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ResourceAction {
    #[display("approve")]
    Approve,
    #[display("submit")]
    Submit,
    #[display("cancel")]
    Cancel,
    #[display("toggle")]
    Toggle,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for ResourceAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "submit" => Ok(Self::Submit),
            "cancel" => Ok(Self::Cancel),
            "toggle" => Ok(Self::Toggle),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// Filter values keyed by query parameter name.
///
/// Empty values and the `"all"` sentinel used by select boxes are kept in
/// the state but never sent to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters(BTreeMap<String, String>);

impl Filters {
    pub const ALL: &'static str = "all";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.0.insert(key.into(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn keyword(self, keyword: impl ToString) -> Self {
        self.with("keyword", keyword)
    }

    pub fn status(self, status: impl ToString) -> Self {
        self.with("status", status)
    }

    pub fn supplier(self, supplier_id: SupplierId) -> Self {
        self.with("supplier_id", supplier_id)
    }

    pub fn date_range(self, start: Date, end: Date) -> Self {
        self.with("start_date", start).with("end_date", end)
    }

    /// Filters that take part in the request, in key order.
    pub fn active(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .filter(|(_, v)| !v.is_empty() && *v != Self::ALL)
    }

    /// True when both would send the same filter parameters.
    pub fn same_active(&self, other: &Filters) -> bool {
        self.active().eq(other.active())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    /// Reported by the backend; overwritten on every load that carries it.
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl Pagination {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Request parameters derived from pagination and filters. Two equal
/// queries fetch the same page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new(pagination: &Pagination, filters: &Filters) -> Self {
        Self {
            page: pagination.page.max(1),
            page_size: pagination.page_size,
            filters: filters
                .active()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Parse query parameters as received by a server. Unknown or malformed
    /// pagination values fall back to the defaults; reserved keys like the
    /// cache-busting `_t` are dropped.
    pub fn from_params(
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut query = Self::new(&Pagination::default(), &Filters::new());
        for (key, value) in params {
            match key.as_str() {
                "page" => {
                    query.page = value.parse().unwrap_or(1).max(1);
                }
                "page_size" => {
                    query.page_size =
                        value.parse().unwrap_or(DEFAULT_PAGE_SIZE);
                }
                k if k.starts_with('_') => {}
                other => {
                    let value = value.trim();
                    if !value.is_empty() && value != Filters::ALL {
                        query
                            .filters
                            .insert(other.to_string(), value.to_string());
                    }
                }
            }
        }
        query
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("page_size".to_string(), self.page_size.to_string()),
        ];
        pairs.extend(
            self.filters.iter().map(|(k, v)| (k.clone(), v.clone())),
        );
        pairs
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Zero-based offset of the first row on this page.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.page_size as usize
    }
}
