//! Seed data for the development server and for tests that need a populated
//! backend.
//!
//! Everything is created through the API client as Alice, so the data takes
//! the same path real input would:
//! - four departments, one of them switched inactive
//! - payments to three suppliers, some approved or cancelled
//! - purchase orders at each workflow step
//! - leave applications for two employees

use crate::{
    TestApp, leave_details, payment_details, purchase_order_details,
};
use anyhow::Result;
use jiff::civil::date;
use payloads::api_client::{
    DEPARTMENTS, LEAVE_APPLICATIONS, PAYMENTS, PURCHASE_ORDERS,
};
use payloads::requests::CreateDepartment;
use payloads::{
    Department, DepartmentId, Filters, LeaveApplication, ListQuery, Pagination,
    Payment, PaymentId, PurchaseOrder, PurchaseOrderId, ResourceAction,
};
use rust_decimal::dec;

pub struct DevDataset {
    pub departments: Vec<Department>,
    pub payments: Vec<Payment>,
    pub purchase_orders: Vec<PurchaseOrder>,
    pub leave_applications: Vec<LeaveApplication>,
}

impl DevDataset {
    pub async fn create(app: &TestApp) -> Result<Self> {
        app.login_alice().await?;
        let client = &app.client;

        tracing::info!("🏢 Creating departments");
        let finance = client
            .create_department(&CreateDepartment {
                dept_code: Some("FIN".into()),
                manager: Some("Alice Admin".into()),
                ..CreateDepartment::named("Finance")
            })
            .await?;
        for (name, code) in [("Sales", "SAL"), ("Operations", "OPS")] {
            client
                .create_department(&CreateDepartment {
                    dept_code: Some(code.into()),
                    parent_id: Some(finance.id),
                    ..CreateDepartment::named(name)
                })
                .await?;
        }
        let legacy = client
            .create_department(&CreateDepartment::named("Legacy Imports"))
            .await?;
        act(app, DEPARTMENTS, legacy.id, ResourceAction::Toggle).await?;

        tracing::info!("💸 Creating payments");
        let mut payments = Vec::new();
        for (i, (supplier, amount)) in [
            ("Acme Supplies", dec!(1200.00)),
            ("Acme Supplies", dec!(89.90)),
            ("Globex", dec!(15000.00)),
            ("Globex", dec!(420.50)),
            ("Initech", dec!(3300.00)),
            ("Initech", dec!(75.25)),
        ]
        .into_iter()
        .enumerate()
        {
            let day = i as i8 + 1;
            payments.push(
                client
                    .create_payment(&payment_details(
                        supplier,
                        amount,
                        date(2025, 1, day),
                    ))
                    .await?,
            );
        }
        let approved: PaymentId = payments[0].id;
        act(app, PAYMENTS, approved, ResourceAction::Approve).await?;
        act(app, PAYMENTS, payments[3].id, ResourceAction::Cancel).await?;

        tracing::info!("📦 Creating purchase orders");
        let mut purchase_orders = Vec::new();
        for (supplier, amount) in [
            ("Acme Supplies", dec!(5400.00)),
            ("Globex", dec!(980.00)),
            ("Initech", dec!(12500.00)),
        ] {
            purchase_orders.push(
                client
                    .create_purchase_order(&purchase_order_details(
                        supplier, amount,
                    ))
                    .await?,
            );
        }
        let submitted: PurchaseOrderId = purchase_orders[1].id;
        act(app, PURCHASE_ORDERS, submitted, ResourceAction::Submit).await?;
        let approved = purchase_orders[2].id;
        act(app, PURCHASE_ORDERS, approved, ResourceAction::Submit).await?;
        act(app, PURCHASE_ORDERS, approved, ResourceAction::Approve).await?;

        tracing::info!("🌴 Creating leave applications");
        let mut pending = None;
        for (employee, start, end) in [
            ("Bob", date(2025, 7, 1), date(2025, 7, 5)),
            ("Charlie", date(2025, 8, 11), date(2025, 8, 12)),
        ] {
            let details = leave_details(employee, start, end);
            let application = client.create_leave_application(&details).await?;
            pending.get_or_insert(application.id);
        }
        if let Some(pending) = pending {
            act(app, LEAVE_APPLICATIONS, pending, ResourceAction::Submit)
                .await?;
        }

        // read back so statuses reflect the actions above
        let everything = ListQuery::new(
            &Pagination {
                page: 1,
                page_size: 100,
                total: 0,
            },
            &Filters::new(),
        );
        Ok(Self {
            departments: client.list_departments(&everything).await?.items,
            payments: client.list_payments(&everything).await?.items,
            purchase_orders: client
                .list_purchase_orders(&everything)
                .await?
                .items,
            leave_applications: client
                .list_leave_applications(&everything)
                .await?
                .items,
        })
    }

    pub fn print_summary(&self) {
        tracing::info!("📋 Available test data (log in as alice/password):");
        tracing::info!("   🏢 {} departments", self.departments.len());
        for department in &self.departments {
            let active = if department.is_active { "" } else { " (inactive)" };
            tracing::info!(
                "      - {} ({}){active}",
                department.name,
                department.id
            );
        }
        tracing::info!("   💸 {} payments", self.payments.len());
        tracing::info!("   📦 {} purchase orders", self.purchase_orders.len());
        tracing::info!(
            "   🌴 {} leave applications",
            self.leave_applications.len()
        );
    }

    pub fn department(&self, name: &str) -> Option<DepartmentId> {
        self.departments.iter().find(|d| d.name == name).map(|d| d.id)
    }
}

async fn act(
    app: &TestApp,
    path: &str,
    id: impl std::fmt::Display,
    action: ResourceAction,
) -> Result<()> {
    app.client.resource_action(path, id, action).await?;
    Ok(())
}
