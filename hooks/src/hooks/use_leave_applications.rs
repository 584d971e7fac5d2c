use payloads::requests::{CreateLeaveApplication, UpdateLeaveApplication};
use payloads::{
    EmployeeId, Filters, LeaveApplication, LeaveApplicationId, LeaveStatus,
    LeaveType, Pagination,
};
use std::ops::Deref;

use super::{MutationResult, ResourceList};
use crate::api::{LeaveApplicationApi, LeaveApplicationResource};

pub struct LeaveApplications<A: LeaveApplicationResource = LeaveApplicationApi>
{
    list: ResourceList<A>,
}

pub async fn use_leave_applications<A: LeaveApplicationResource>(
    api: A,
    filters: Filters,
) -> LeaveApplications<A> {
    let list = ResourceList::new(api, filters, Pagination::default());
    list.load().await;
    LeaveApplications { list }
}

impl<A: LeaveApplicationResource> LeaveApplications<A> {
    pub fn from_list(list: ResourceList<A>) -> Self {
        Self { list }
    }

    pub fn applications(&self) -> Vec<LeaveApplication> {
        self.list.items()
    }

    pub fn pending(&self) -> Vec<LeaveApplication> {
        self.list
            .items()
            .into_iter()
            .filter(|a| a.status == LeaveStatus::Pending)
            .collect()
    }

    pub async fn filter_by_employee(&self, employee: Option<EmployeeId>) {
        match employee {
            Some(employee) => self.list.set_filter("employee_id", employee).await,
            None => self.list.set_filter("employee_id", "").await,
        }
    }

    pub async fn filter_by_type(&self, leave_type: Option<LeaveType>) {
        match leave_type {
            Some(leave_type) => {
                self.list.set_filter("leave_type", leave_type).await
            }
            None => self.list.set_filter("leave_type", Filters::ALL).await,
        }
    }

    pub async fn filter_by_status(&self, status: Option<LeaveStatus>) {
        match status {
            Some(status) => self.list.set_filter("status", status).await,
            None => self.list.set_filter("status", Filters::ALL).await,
        }
    }

    /// Reversed date ranges are refused before reaching the backend.
    pub async fn apply(
        &self,
        data: &CreateLeaveApplication,
    ) -> MutationResult<LeaveApplication> {
        if data.days().is_none() {
            return MutationResult::Failure(
                "End date must not be before start date".to_string(),
            );
        }
        self.list.create(data).await
    }

    pub async fn update_application(
        &self,
        id: LeaveApplicationId,
        data: &UpdateLeaveApplication,
    ) -> MutationResult<LeaveApplication> {
        self.list.update(id, data).await
    }

    pub async fn delete_application(
        &self,
        id: LeaveApplicationId,
    ) -> MutationResult {
        self.list.delete(id).await
    }

    pub async fn submit_application(
        &self,
        id: LeaveApplicationId,
    ) -> MutationResult {
        self.list.submit(id).await
    }

    pub async fn approve_application(
        &self,
        id: LeaveApplicationId,
    ) -> MutationResult {
        self.list.approve(id).await
    }

    pub async fn cancel_application(
        &self,
        id: LeaveApplicationId,
    ) -> MutationResult {
        self.list.cancel(id).await
    }
}

impl<A: LeaveApplicationResource> Deref for LeaveApplications<A> {
    type Target = ResourceList<A>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}
