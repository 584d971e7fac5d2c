pub mod use_department_management;
pub mod use_leave_applications;
pub mod use_payment_data;
pub mod use_polling;
pub mod use_purchase_orders;
pub mod use_resource_list;

pub use use_department_management::{
    DepartmentManagement, use_department_management,
};
pub use use_leave_applications::{LeaveApplications, use_leave_applications};
pub use use_payment_data::{PaymentData, use_payment_data};
pub use use_polling::{Poller, use_configured_polling, use_polling};
pub use use_purchase_orders::{PurchaseOrders, use_purchase_orders};
pub use use_resource_list::{MutationResult, ResourceList, use_resource_list};
