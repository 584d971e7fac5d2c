use hooks::use_department_management;
use payloads::requests::{CreateDepartment, UpdateDepartment};

use test_helpers::mock::DevDataset;
use test_helpers::spawn_app;

#[tokio::test]
async fn lists_the_direct_envelope() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let dataset = DevDataset::create(&app).await?;

    let departments = use_department_management(app.department_api()).await;

    assert_eq!(departments.departments(), dataset.departments);
    assert_eq!(departments.pagination().total, 4);
    // the inactive department is not offered as a parent
    let names: Vec<_> =
        departments.options().into_iter().map(|(_, name)| name).collect();
    assert_eq!(names, vec!["Finance", "Sales", "Operations"]);

    Ok(())
}

#[tokio::test]
async fn duplicate_name_fails_without_reload() -> anyhow::Result<()> {
    let app = spawn_app().await;
    DevDataset::create(&app).await?;
    let departments = use_department_management(app.department_api()).await;
    let loads = app.list_requests("departments").len();

    let result = departments
        .create_department(&CreateDepartment::named("sales"))
        .await;
    assert_eq!(result.error(), Some("Department name already exists"));

    let result = departments
        .create_department(&CreateDepartment::named("   "))
        .await;
    assert_eq!(result.error(), Some("Department name is required"));

    assert_eq!(app.list_requests("departments").len(), loads);
    assert_eq!(departments.departments().len(), 4);

    Ok(())
}

#[tokio::test]
async fn create_rename_toggle_delete() -> anyhow::Result<()> {
    let app = spawn_app().await;
    let dataset = DevDataset::create(&app).await?;
    let departments = use_department_management(app.department_api()).await;

    let created = departments
        .create_department(&CreateDepartment {
            parent_id: dataset.department("Finance"),
            ..CreateDepartment::named("Treasury")
        })
        .await
        .into_result()
        .map_err(anyhow::Error::msg)?;
    assert!(created.is_active);
    assert_eq!(departments.departments().len(), 5);

    let rename = UpdateDepartment {
        name: Some("Treasury & Risk".into()),
        ..UpdateDepartment::default()
    };
    assert!(
        departments
            .update_department(created.id, &rename)
            .await
            .is_success()
    );
    // renaming onto an existing department is refused
    let clash = UpdateDepartment {
        name: Some("Finance".into()),
        ..UpdateDepartment::default()
    };
    let result = departments.update_department(created.id, &clash).await;
    assert_eq!(result.error(), Some("Department name already exists"));

    assert!(departments.toggle_department(created.id).await.is_success());
    let treasury = departments
        .departments()
        .into_iter()
        .find(|d| d.id == created.id)
        .unwrap();
    assert_eq!(treasury.name, "Treasury & Risk");
    assert!(!treasury.is_active);

    assert!(departments.delete_department(created.id).await.is_success());
    assert_eq!(departments.departments().len(), 4);

    // deleting again is a 404 with the server's detail
    let result = departments.delete_department(created.id).await;
    assert_eq!(
        result.error(),
        Some(format!("department {} not found", created.id).as_str())
    );

    Ok(())
}

#[tokio::test]
async fn active_filter() -> anyhow::Result<()> {
    let app = spawn_app().await;
    DevDataset::create(&app).await?;
    let departments = use_department_management(app.department_api()).await;

    departments.filter_by_active(Some(false)).await;
    let inactive = departments.departments();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].name, "Legacy Imports");
    let request = app.list_requests("departments").pop().unwrap();
    assert_eq!(request.param("is_active"), Some("false"));

    departments.filter_by_active(None).await;
    assert_eq!(departments.departments().len(), 4);

    departments.search("ops").await;
    let found = departments.departments();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Operations");

    Ok(())
}
