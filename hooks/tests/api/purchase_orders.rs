use hooks::{ToastHandle, ToastVariant, use_purchase_orders};
use payloads::requests::UpdatePurchaseOrder;
use payloads::{Filters, Pagination, PurchaseOrderStatus};
use rust_decimal::dec;

use test_helpers::mock::DevDataset;
use test_helpers::{purchase_order_details, spawn_app, supplier_id};

#[tokio::test]
async fn lists_the_data_array_envelope() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let dataset = DevDataset::create(&app).await?;

    let orders = use_purchase_orders(
        app.purchase_order_api(),
        Filters::new(),
        Pagination::default(),
    )
    .await;

    assert_eq!(orders.orders(), dataset.purchase_orders);
    assert_eq!(orders.pagination().total, 3);
    let waiting = orders.awaiting_approval();
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].supplier_name, "Globex");

    orders
        .filter_by_status(Some(PurchaseOrderStatus::Approved))
        .await;
    assert_eq!(orders.orders().len(), 1);
    assert_eq!(orders.orders()[0].supplier_id, supplier_id("Initech"));

    orders.filter_by_status(None).await;
    orders.filter_by_supplier(Some(supplier_id("Acme Supplies"))).await;
    assert_eq!(orders.orders().len(), 1);

    orders.filter_by_supplier(None).await;
    orders.search("po-0000").await;
    assert_eq!(orders.orders().len(), 3);

    Ok(())
}

#[tokio::test]
async fn order_workflow() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let orders = use_purchase_orders(
        app.purchase_order_api(),
        Filters::new(),
        Pagination::default(),
    )
    .await;
    assert!(orders.orders().is_empty());

    let order = orders
        .create_order(&purchase_order_details("Globex", dec!(1999.99)))
        .await
        .into_result()
        .map_err(anyhow::Error::msg)?;
    assert_eq!(order.status, PurchaseOrderStatus::Draft);

    // drafts cannot be approved yet
    let result = orders.approve_order(order.id).await;
    assert_eq!(result.error(), Some("Only submitted orders can be approved"));

    assert!(orders.submit_order(order.id).await.is_success());
    assert_eq!(orders.awaiting_approval().len(), 1);
    assert!(orders.approve_order(order.id).await.is_success());
    assert_eq!(orders.orders()[0].status, PurchaseOrderStatus::Approved);

    let raise = UpdatePurchaseOrder {
        total_amount: Some(dec!(2100.00)),
        ..UpdatePurchaseOrder::default()
    };
    assert!(orders.update_order(order.id, &raise).await.is_success());
    assert_eq!(orders.orders()[0].total_amount, dec!(2100.00));

    assert!(orders.cancel_order(order.id).await.is_success());
    let result = orders.cancel_order(order.id).await;
    assert_eq!(result.error(), Some("Order can no longer be cancelled"));

    assert!(orders.delete_order(order.id).await.is_success());
    assert!(orders.orders().is_empty());

    Ok(())
}

#[tokio::test]
async fn invalid_dates_are_reported_and_toasted() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let toasts = ToastHandle::default();
    let list = hooks::ResourceList::new(
        app.purchase_order_api(),
        Filters::new(),
        Pagination::default(),
    )
    .with_toasts(toasts.clone());
    let orders = hooks::PurchaseOrders::from_list(list);

    let mut details = purchase_order_details("Initech", dec!(40));
    details.expected_date = Some(jiff::civil::date(2025, 1, 1));
    let result = orders.create_order(&details).await;

    assert_eq!(
        result.error(),
        Some("Expected date must not be before order date")
    );
    assert!(app.list_requests("purchase-orders").is_empty());

    let shown = toasts.current();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].title, "Could not create purchase order");
    assert_eq!(shown[0].variant, ToastVariant::Destructive);
    assert_eq!(
        shown[0].description.as_deref(),
        Some("Expected date must not be before order date")
    );

    Ok(())
}

#[tokio::test]
async fn unsupported_action_never_leaves_the_client() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let order = app
        .client
        .create_purchase_order(&purchase_order_details("Globex", dec!(5)))
        .await?;
    let orders = use_purchase_orders(
        app.purchase_order_api(),
        Filters::new(),
        Pagination::default(),
    )
    .await;
    app.backend.clear_requests();

    let result = orders.toggle(order.id).await;

    assert_eq!(
        result.error(),
        Some(format!("Cannot toggle purchase order {}", order.id).as_str())
    );
    assert!(app.backend.requests().is_empty());

    Ok(())
}
