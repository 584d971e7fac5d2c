use hooks::use_leave_applications;
use jiff::civil::date;
use payloads::requests::UpdateLeaveApplication;
use payloads::{EmployeeId, Filters, LeaveStatus, LeaveType};

use test_helpers::mock::DevDataset;
use test_helpers::{leave_details, spawn_app};

#[tokio::test]
async fn bare_array_keeps_previous_total() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let dataset = DevDataset::create(&app).await?;

    let applications =
        use_leave_applications(app.leave_application_api(), Filters::new())
            .await;

    assert_eq!(applications.applications(), dataset.leave_applications);
    // this endpoint does not report a total
    assert_eq!(applications.pagination().total, 0);
    let pending = applications.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].employee_name, "Bob");

    Ok(())
}

#[tokio::test]
async fn filters_by_employee_type_and_status() -> anyhow::Result<()> {
    let app = spawn_app().await;
    DevDataset::create(&app).await?;
    let applications =
        use_leave_applications(app.leave_application_api(), Filters::new())
            .await;

    applications.filter_by_employee(Some(EmployeeId(7))).await;
    let charlie = applications.applications();
    assert_eq!(charlie.len(), 1);
    assert_eq!(charlie[0].employee_name, "Charlie");

    applications.filter_by_employee(None).await;
    applications.filter_by_type(Some(LeaveType::Sick)).await;
    assert!(applications.applications().is_empty());
    let request = app.list_requests("leave-applications").pop().unwrap();
    assert_eq!(request.param("leave_type"), Some("sick"));

    applications.filter_by_type(None).await;
    applications.filter_by_status(Some(LeaveStatus::Draft)).await;
    assert_eq!(applications.applications().len(), 1);

    Ok(())
}

#[tokio::test]
async fn application_lifecycle() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_bob().await?;
    let applications =
        use_leave_applications(app.leave_application_api(), Filters::new())
            .await;

    // reversed ranges never reach the backend
    let reversed = leave_details("Dana", date(2025, 9, 10), date(2025, 9, 1));
    let result = applications.apply(&reversed).await;
    assert_eq!(result.error(), Some("End date must not be before start date"));
    assert!(app.backend.requests_to("POST", "/api/leave-applications").is_empty());

    let details = leave_details("Dana", date(2025, 9, 1), date(2025, 9, 3));
    let created = applications
        .apply(&details)
        .await
        .into_result()
        .map_err(anyhow::Error::msg)?;
    assert_eq!(created.status, LeaveStatus::Draft);

    let sick = UpdateLeaveApplication {
        leave_type: Some(LeaveType::Sick),
        ..UpdateLeaveApplication::default()
    };
    assert!(
        applications
            .update_application(created.id, &sick)
            .await
            .is_success()
    );
    assert_eq!(applications.applications()[0].leave_type, LeaveType::Sick);

    assert!(applications.submit_application(created.id).await.is_success());
    assert_eq!(applications.pending().len(), 1);
    assert!(applications.approve_application(created.id).await.is_success());
    let result = applications.approve_application(created.id).await;
    assert_eq!(
        result.error(),
        Some("Only pending applications can be approved")
    );

    assert!(applications.cancel_application(created.id).await.is_success());
    assert_eq!(
        applications.applications()[0].status,
        LeaveStatus::Cancelled
    );

    assert!(applications.delete_application(created.id).await.is_success());
    assert!(applications.applications().is_empty());

    Ok(())
}

#[tokio::test]
async fn backend_refusal_is_returned_not_raised() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_alice().await?;
    let applications =
        use_leave_applications(app.leave_application_api(), Filters::new())
            .await;
    let loads = app.list_requests("leave-applications").len();

    app.backend.reject_next("Leave balance exhausted");
    let details = leave_details("Eve", date(2025, 12, 22), date(2025, 12, 31));
    let result = applications.apply(&details).await;

    assert!(!result.is_success());
    assert_eq!(result.error(), Some("Leave balance exhausted"));
    assert_eq!(app.list_requests("leave-applications").len(), loads);

    Ok(())
}
