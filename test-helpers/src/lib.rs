pub mod backend;
pub mod mock;

use actix_web::web;
use backend::{BackendConfig, RecordedRequest, Store};
use hooks::{
    Config, DepartmentApi, LeaveApplicationApi, PaymentApi, PurchaseOrderApi,
    telemetry,
};
use jiff::civil::{Date, date};
use payloads::requests::{self, LoginCredentials};
use payloads::responses::UserInfo;
use payloads::{
    APIClient, EmployeeId, LeaveType, NavigationHistory, Session, SupplierId,
};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tracing_log::LogTracer;
use tracing_subscriber::util::SubscriberInitExt;

pub struct TestApp {
    pub port: u16,
    pub address: String,
    pub backend: web::Data<Store>,
    pub client: Arc<APIClient>,
    pub session: Session,
    /// Every navigation the client asked for.
    pub navigator: Arc<NavigationHistory>,
}

impl TestApp {
    pub async fn login_alice(&self) -> anyhow::Result<UserInfo> {
        Ok(self.client.login(&alice_credentials()).await?)
    }

    pub async fn login_bob(&self) -> anyhow::Result<UserInfo> {
        Ok(self.client.login(&bob_credentials()).await?)
    }

    pub fn payment_api(&self) -> PaymentApi {
        PaymentApi::new(self.client.clone())
    }

    pub fn department_api(&self) -> DepartmentApi {
        DepartmentApi::new(self.client.clone())
    }

    pub fn purchase_order_api(&self) -> PurchaseOrderApi {
        PurchaseOrderApi::new(self.client.clone())
    }

    pub fn leave_application_api(&self) -> LeaveApplicationApi {
        LeaveApplicationApi::new(self.client.clone())
    }

    /// The list requests the backend received for a resource path such as
    /// `payments`.
    pub fn list_requests(&self, path: &str) -> Vec<RecordedRequest> {
        self.backend.requests_to("GET", &format!("/api/{path}"))
    }
}

pub async fn spawn_app_on_port(port: u16) -> TestApp {
    let subscriber = telemetry::get_subscriber("error".into());
    let _ = LogTracer::init();
    let _ = subscriber.try_init();

    spawn_app_with(BackendConfig {
        ip: "127.0.0.1".into(),
        port,
    })
    .await
}

/// Serve a fresh backend as configured and point a logged-out client at
/// it. Logging is left to the caller.
pub async fn spawn_app_with(mut backend_config: BackendConfig) -> TestApp {
    let backend = web::Data::new(Store::new());
    let server = backend::build(&mut backend_config, backend.clone()).unwrap();
    tokio::spawn(server);

    let host = match backend_config.ip.as_str() {
        "0.0.0.0" => "127.0.0.1",
        ip => ip,
    };
    let address = format!("http://{host}:{}", backend_config.port);
    let config = Config {
        backend_url: address.clone(),
        request_timeout: Duration::from_secs(5),
        ..Config::default()
    };
    let navigator = Arc::new(NavigationHistory::new());
    let session = Session::new(navigator.clone());
    let client = hooks::get_api_client(&config, session.clone()).unwrap();

    TestApp {
        port: backend_config.port,
        address,
        backend,
        client: Arc::new(client),
        session,
        navigator,
    }
}

/// Use OS-assigned port for parallel testing.
pub async fn spawn_app() -> TestApp {
    spawn_app_on_port(0).await
}

/// Assert that the result of an API action results in a specific status code.
pub fn assert_status_code<T>(
    result: Result<T, payloads::ClientError>,
    expected: StatusCode,
) {
    match result {
        Err(payloads::ClientError::APIError(code, _)) => {
            assert_eq!(code, expected)
        }
        _ => panic!("Expected APIError"),
    };
}

pub fn alice_credentials() -> LoginCredentials {
    LoginCredentials {
        username: "alice".into(),
        password: "password".into(),
    }
}

pub fn bob_credentials() -> LoginCredentials {
    LoginCredentials {
        username: "bob".into(),
        password: "password".into(),
    }
}

pub fn payment_details(
    supplier: &str,
    amount: Decimal,
    payment_date: Date,
) -> requests::CreatePayment {
    requests::CreatePayment {
        supplier_id: supplier_id(supplier),
        supplier_name: supplier.into(),
        amount,
        payment_date,
        remark: None,
    }
}

pub fn purchase_order_details(
    supplier: &str,
    total_amount: Decimal,
) -> requests::CreatePurchaseOrder {
    requests::CreatePurchaseOrder {
        supplier_id: supplier_id(supplier),
        supplier_name: supplier.into(),
        total_amount,
        order_date: date(2025, 1, 15),
        expected_date: Some(date(2025, 2, 1)),
    }
}

pub fn leave_details(
    employee: &str,
    start_date: Date,
    end_date: Date,
) -> requests::CreateLeaveApplication {
    requests::CreateLeaveApplication {
        employee_id: EmployeeId(employee.len() as i64),
        employee_name: employee.into(),
        leave_type: LeaveType::Annual,
        start_date,
        end_date,
        reason: None,
    }
}

/// Stable supplier ids for the fixture suppliers.
pub fn supplier_id(supplier: &str) -> SupplierId {
    match supplier {
        "Acme Supplies" => SupplierId(1),
        "Globex" => SupplierId(2),
        "Initech" => SupplierId(3),
        _ => SupplierId(99),
    }
}
