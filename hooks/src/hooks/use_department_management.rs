use payloads::requests::{CreateDepartment, UpdateDepartment};
use payloads::{Department, DepartmentId, Filters, Pagination};
use std::ops::Deref;

use super::{MutationResult, ResourceList};
use crate::api::{DepartmentApi, DepartmentResource};

pub struct DepartmentManagement<A: DepartmentResource = DepartmentApi> {
    list: ResourceList<A>,
}

pub async fn use_department_management<A: DepartmentResource>(
    api: A,
) -> DepartmentManagement<A> {
    let list = ResourceList::new(api, Filters::new(), Pagination::default());
    list.load().await;
    DepartmentManagement { list }
}

impl<A: DepartmentResource> DepartmentManagement<A> {
    pub fn from_list(list: ResourceList<A>) -> Self {
        Self { list }
    }

    pub fn departments(&self) -> Vec<Department> {
        self.list.items()
    }

    /// `(id, name)` of the active departments on the current page, for
    /// parent pickers.
    pub fn options(&self) -> Vec<(DepartmentId, String)> {
        self.list
            .items()
            .into_iter()
            .filter(|d| d.is_active)
            .map(|d| (d.id, d.name))
            .collect()
    }

    pub async fn search(&self, keyword: &str) {
        self.list.set_filter("keyword", keyword.trim()).await;
    }

    /// `None` shows active and inactive departments.
    pub async fn filter_by_active(&self, active: Option<bool>) {
        match active {
            Some(active) => self.list.set_filter("is_active", active).await,
            None => self.list.set_filter("is_active", Filters::ALL).await,
        }
    }

    pub async fn create_department(
        &self,
        data: &CreateDepartment,
    ) -> MutationResult<Department> {
        self.list.create(data).await
    }

    pub async fn update_department(
        &self,
        id: DepartmentId,
        data: &UpdateDepartment,
    ) -> MutationResult<Department> {
        self.list.update(id, data).await
    }

    pub async fn delete_department(&self, id: DepartmentId) -> MutationResult {
        self.list.delete(id).await
    }

    /// Flip a department between active and inactive.
    pub async fn toggle_department(&self, id: DepartmentId) -> MutationResult {
        self.list.toggle(id).await
    }
}

impl<A: DepartmentResource> Deref for DepartmentManagement<A> {
    type Target = ResourceList<A>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}
