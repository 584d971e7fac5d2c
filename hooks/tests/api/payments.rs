use hooks::{ToastHandle, ToastVariant, use_payment_data, use_polling};
use hooks::{PaymentData, ResourceList};
use jiff::civil::date;
use payloads::{Filters, Pagination, PaymentStatus, requests::UpdatePayment};
use rust_decimal::dec;
use std::sync::Arc;
use std::time::Duration;

use test_helpers::mock::DevDataset;
use test_helpers::{payment_details, spawn_app, supplier_id};

#[tokio::test]
async fn mount_loads_first_page_of_nested_envelope() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let dataset = DevDataset::create(&app).await?;

    let payments = use_payment_data(app.payment_api(), Filters::new()).await;

    assert!(!payments.is_loading());
    assert_eq!(payments.error(), None);
    assert_eq!(payments.payments(), dataset.payments);
    assert_eq!(payments.pagination().total, 6);

    let request = app.list_requests("payments").pop().unwrap();
    assert_eq!(request.param("page"), Some("1"));
    assert_eq!(request.param("page_size"), Some("20"));

    Ok(())
}

#[tokio::test]
async fn filters_reach_the_backend() -> anyhow::Result<()> {
    let app = spawn_app().await;
    DevDataset::create(&app).await?;
    let payments = use_payment_data(app.payment_api(), Filters::new()).await;

    payments.search("  acme ").await;
    assert_eq!(payments.payments().len(), 2);
    let request = app.list_requests("payments").pop().unwrap();
    assert_eq!(request.param("keyword"), Some("acme"));

    payments.filter_by_status(Some(PaymentStatus::Approved)).await;
    let approved = payments.payments();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].status, PaymentStatus::Approved);

    // "all" stays in the filter state but is not sent
    payments.filter_by_status(None).await;
    assert_eq!(payments.filters().get("status"), Some(Filters::ALL));
    let request = app.list_requests("payments").pop().unwrap();
    assert_eq!(request.param("status"), None);
    assert_eq!(payments.payments().len(), 2);

    payments.clear_filters().await;
    payments.filter_by_supplier(Some(supplier_id("Initech"))).await;
    assert_eq!(payments.payments().len(), 2);

    payments.filter_by_supplier(None).await;
    payments
        .filter_by_date_range(date(2025, 1, 2), date(2025, 1, 4))
        .await;
    assert_eq!(payments.payments().len(), 3);

    Ok(())
}

#[tokio::test]
async fn paging_walks_the_whole_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    DevDataset::create(&app).await?;
    let list = hooks::use_resource_list(
        app.payment_api(),
        Filters::new(),
        Pagination {
            page_size: 4,
            ..Pagination::default()
        },
    )
    .await;
    let payments = PaymentData::from_list(list);

    assert_eq!(payments.pagination().total_pages(), 2);
    assert_eq!(payments.payments().len(), 4);

    payments.next_page().await;
    assert_eq!(payments.pagination().page, 2);
    assert_eq!(payments.payments().len(), 2);
    assert!(!payments.pagination().has_next());

    // no page three, so no request either
    let before = app.list_requests("payments").len();
    payments.next_page().await;
    assert_eq!(app.list_requests("payments").len(), before);

    // a filter change goes back to page one
    payments.search("globex").await;
    assert_eq!(payments.pagination().page, 1);

    payments.clear_filters().await;
    payments
        .set_pagination(Pagination {
            page: 2,
            page_size: 5,
            total: 0,
        })
        .await;
    assert_eq!(payments.payments().len(), 1);
    assert_eq!(payments.pagination().total, 6);
    payments.prev_page().await;
    assert_eq!(payments.payments().len(), 5);

    Ok(())
}

#[tokio::test]
async fn workflow_actions_reload_the_list() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let toasts = ToastHandle::default();
    let list = ResourceList::new(
        app.payment_api(),
        Filters::new(),
        Pagination::default(),
    )
    .with_toasts(toasts.clone());
    let payments = PaymentData::from_list(list);

    let created = payments
        .create_payment(&payment_details(
            "Globex",
            dec!(250.00),
            date(2025, 4, 1),
        ))
        .await
        .into_result()
        .map_err(anyhow::Error::msg)?;
    assert_eq!(created.status, PaymentStatus::Pending);
    assert_eq!(payments.payments(), vec![created.clone()]);

    let requests = app.list_requests("payments").len();
    assert!(payments.approve_payment(created.id).await.is_success());
    assert_eq!(app.list_requests("payments").len(), requests + 1);
    assert_eq!(payments.payments()[0].status, PaymentStatus::Approved);

    // approving twice is a business-rule refusal, and does not reload
    let result = payments.approve_payment(created.id).await;
    assert_eq!(result.error(), Some("Only pending payments can be approved"));
    assert_eq!(app.list_requests("payments").len(), requests + 1);

    let edit = UpdatePayment {
        remark: Some("Net 30".into()),
        ..UpdatePayment::default()
    };
    let updated = payments.update_payment(created.id, &edit).await;
    assert!(updated.is_success());
    assert_eq!(payments.payments()[0].remark.as_deref(), Some("Net 30"));

    assert!(payments.cancel_payment(created.id).await.is_success());
    assert_eq!(payments.total_amount(), dec!(0));

    assert!(payments.delete_payment(created.id).await.is_success());
    assert!(payments.payments().is_empty());

    let titles: Vec<_> = toasts
        .current()
        .into_iter()
        .map(|t| (t.title, t.variant))
        .collect();
    assert!(titles.contains(&(
        "Could not approve payment".to_string(),
        ToastVariant::Destructive
    )));
    assert!(titles.contains(&(
        "Payment deleted".to_string(),
        ToastVariant::Default
    )));

    Ok(())
}

#[tokio::test]
async fn polling_picks_up_changes_made_elsewhere() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let payments = Arc::new(
        hooks::use_resource_list(
            app.payment_api(),
            Filters::new(),
            Pagination::default(),
        )
        .await,
    );
    assert!(payments.items().is_empty());

    let mut receiver = payments.subscribe();
    let poller = use_polling(payments.clone(), Some(Duration::from_millis(50)));
    assert!(poller.is_some());

    app.client
        .create_payment(&payment_details("Initech", dec!(10), date(2025, 5, 2)))
        .await?;

    tokio::time::timeout(
        Duration::from_secs(5),
        receiver.wait_for(|state| state.items().len() == 1),
    )
    .await??;

    drop(poller);
    Ok(())
}
