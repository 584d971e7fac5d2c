use hooks::{Config, get_api_client};
use payloads::api_client::DEPARTMENTS;
use payloads::{
    ClientError, Filters, ListQuery, NavigationHistory, Pagination, Session,
};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;

use test_helpers::{assert_status_code, spawn_app};

fn first_page() -> ListQuery {
    ListQuery::new(&Pagination::default(), &Filters::new())
}

#[tokio::test]
async fn gets_carry_a_cache_buster() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    app.client.list_payments(&first_page()).await?;
    app.client.list_payments(&first_page()).await?;

    let requests = app.list_requests("payments");
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert!(request.authorized);
        let stamp: i64 = request.param("_t").unwrap().parse()?;
        assert!(stamp > 0);
        assert_eq!(request.param("page"), Some("1"));
    }

    Ok(())
}

#[tokio::test]
async fn status_table_applies_without_a_body() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    for (code, message) in [
        (400, "Invalid request parameters"),
        (403, "You do not have permission to perform this action"),
        (404, "The requested resource was not found"),
        (500, "Internal server error"),
        (502, "Bad gateway"),
        (503, "Service temporarily unavailable"),
        (504, "Gateway timeout"),
        (418, "Request failed with status 418"),
    ] {
        app.backend.fail_next(code, None);
        let error = app.client.list_payments(&first_page()).await.unwrap_err();
        assert_eq!(error.status().map(|s| s.as_u16()), Some(code));
        assert_eq!(error.to_string(), message);
    }
    // none of those touch the session
    assert!(app.session.is_authenticated());
    assert!(app.navigator.entries().is_empty());

    Ok(())
}

#[tokio::test]
async fn server_detail_wins_over_status_table() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    app.backend.fail_next(500, Some("Ledger is locked for closing"));
    let error = app.client.list_payments(&first_page()).await.unwrap_err();
    assert_eq!(error.to_string(), "Ledger is locked for closing");

    // validation errors arrive as a list of messages
    let details = payloads::requests::CreatePayment {
        amount: rust_decimal::Decimal::ZERO,
        ..test_helpers::payment_details(
            "Globex",
            rust_decimal::Decimal::ONE,
            jiff::civil::date(2025, 3, 1),
        )
    };
    let result = app.client.create_payment(&details).await;
    match result {
        Err(ClientError::APIError(code, text)) => {
            assert_eq!(code, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(text, "Amount must be positive");
        }
        _ => panic!("Expected APIError"),
    }

    Ok(())
}

#[tokio::test]
async fn success_false_is_an_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    app.backend.reject_next("Supplier is on hold");
    let result = app.client.list_payments(&first_page()).await;

    match result {
        Err(ClientError::Rejected(message)) => {
            assert_eq!(message, "Supplier is on hold")
        }
        _ => panic!("Expected Rejected"),
    }

    Ok(())
}

#[tokio::test]
async fn non_json_success_is_a_decode_error() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    app.backend.garble_next("<html>maintenance</html>");
    let error = app.client.list_payments(&first_page()).await.unwrap_err();

    assert!(matches!(error, ClientError::Decode(_)));
    assert!(
        error
            .to_string()
            .starts_with("Unexpected response from server")
    );
    assert!(app.session.is_authenticated());

    Ok(())
}

#[tokio::test]
async fn missing_resource_is_not_found() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;

    let result = app.client.delete_payment(payloads::PaymentId(404)).await;
    assert_status_code(result, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() -> anyhow::Result<()> {
    // nothing listens on the discard port
    let config = Config {
        backend_url: "http://127.0.0.1:9".into(),
        request_timeout: Duration::from_secs(2),
        ..Config::default()
    };
    let navigator = Arc::new(NavigationHistory::new());
    let client = get_api_client(&config, Session::new(navigator.clone()))?;

    let error = client.list_payments(&first_page()).await.unwrap_err();
    assert!(matches!(error, ClientError::Network(_)));
    assert_eq!(
        error.to_string(),
        "Network error. Please check your connection."
    );
    assert!(navigator.entries().is_empty());

    Ok(())
}

#[tokio::test]
async fn patch_sends_a_partial_update() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let created = app
        .client
        .create_department(&payloads::requests::CreateDepartment::named("Legal"))
        .await?;

    let change = payloads::requests::UpdateDepartment {
        manager: Some("Grace".into()),
        ..Default::default()
    };
    let patched: payloads::Department = app
        .client
        .patch_resource(DEPARTMENTS, created.id, &change)
        .await?;

    assert_eq!(patched.name, "Legal");
    assert_eq!(patched.manager.as_deref(), Some("Grace"));
    assert_eq!(
        app.backend
            .requests_to("PATCH", &format!("/api/departments/{}", created.id))
            .len(),
        1
    );

    Ok(())
}
