use payloads::{ClientError, Filters, ListQuery, Pagination, ResourceAction};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use crate::api::ResourceApi;
use crate::contexts::toast::ToastHandle;
use crate::state::ListState;

/// Outcome of a mutation. Mutations never panic or return `Err`; the
/// failure message is carried here and must be checked by the caller.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum MutationResult<T = ()> {
    Success(T),
    Failure(String),
}

impl<T> MutationResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, MutationResult::Success(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MutationResult::Success(_) => None,
            MutationResult::Failure(e) => Some(e.as_str()),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            MutationResult::Success(value) => Ok(value),
            MutationResult::Failure(e) => Err(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MutationResult<U> {
        match self {
            MutationResult::Success(value) => MutationResult::Success(f(value)),
            MutationResult::Failure(e) => MutationResult::Failure(e),
        }
    }
}

/// Keeps `loading` set while at least one load is running.
struct LoadGuard<'a, T> {
    state: &'a watch::Sender<ListState<T>>,
}

impl<'a, T> LoadGuard<'a, T> {
    fn enter(state: &'a watch::Sender<ListState<T>>) -> Self {
        state.send_modify(|s| {
            s.in_flight += 1;
            s.loading = true;
            s.error = None;
        });
        Self { state }
    }
}

impl<T> Drop for LoadGuard<'_, T> {
    fn drop(&mut self) {
        self.state.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            s.loading = s.in_flight > 0;
        });
    }
}

/// List state for one resource: items, loading/error, pagination and
/// filters, with reload-after-mutation.
///
/// Loads are not serialized. Every load takes a generation number and only
/// the response of the most recently issued load is applied, so a slow
/// earlier response can never overwrite a newer one.
pub struct ResourceList<A: ResourceApi> {
    api: A,
    state: watch::Sender<ListState<A::Item>>,
    generation: AtomicU64,
    toasts: Option<ToastHandle>,
}

/// Create the list and perform the initial (mount) load.
pub async fn use_resource_list<A: ResourceApi>(
    api: A,
    filters: Filters,
    pagination: Pagination,
) -> ResourceList<A> {
    let list = ResourceList::new(api, filters, pagination);
    list.load().await;
    list
}

impl<A: ResourceApi> ResourceList<A> {
    /// Create the list without loading anything.
    pub fn new(api: A, filters: Filters, pagination: Pagination) -> Self {
        Self {
            api,
            state: watch::Sender::new(ListState::new(filters, pagination)),
            generation: AtomicU64::new(0),
            toasts: None,
        }
    }

    /// Report mutation outcomes as toasts.
    pub fn with_toasts(mut self, toasts: ToastHandle) -> Self {
        self.toasts = Some(toasts);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetch the current page with the current filters.
    #[tracing::instrument(skip(self), fields(resource = A::NAME))]
    pub async fn load(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.state.borrow().query();
        let _guard = LoadGuard::enter(&self.state);

        let result = self.api.list(&query).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "discarding superseded response");
            return;
        }
        match result {
            Ok(page) => {
                tracing::debug!(
                    items = page.items.len(),
                    total = ?page.total,
                    "loaded"
                );
                self.state.send_modify(|s| s.apply_page(page));
            }
            Err(e) => {
                tracing::warn!("load failed: {e}");
                self.state.send_modify(|s| s.error = Some(e.to_string()));
            }
        }
    }

    /// Apply `change` to the state and reload if the request parameters
    /// changed as a result.
    async fn update_deps(&self, change: impl FnOnce(&mut ListState<A::Item>)) {
        let mut before: Option<ListQuery> = None;
        let mut after: Option<ListQuery> = None;
        self.state.send_modify(|s| {
            before = Some(s.query());
            change(s);
            after = Some(s.query());
        });
        if before != after {
            self.load().await;
        }
    }

    /// Replace all filters. Goes back to the first page when the filters
    /// sent to the backend change.
    pub async fn set_filters(&self, filters: Filters) {
        self.update_deps(|s| {
            if !s.filters.same_active(&filters) {
                s.pagination.page = 1;
            }
            s.filters = filters;
        })
        .await;
    }

    /// Set one filter; an empty value or `"all"` clears it from the request.
    pub async fn set_filter(&self, key: &str, value: impl ToString) {
        let mut filters = self.filters();
        filters.set(key, value);
        self.set_filters(filters).await;
    }

    pub async fn clear_filters(&self) {
        self.set_filters(Filters::new()).await;
    }

    pub async fn set_page(&self, page: u32) {
        self.update_deps(|s| s.pagination.page = page.max(1)).await;
    }

    /// Changing the page size goes back to the first page.
    pub async fn set_page_size(&self, page_size: u32) {
        self.update_deps(|s| {
            if s.pagination.page_size != page_size {
                s.pagination.page_size = page_size;
                s.pagination.page = 1;
            }
        })
        .await;
    }

    /// Set page and page size together; `total` is ignored since only the
    /// backend reports it.
    pub async fn set_pagination(&self, pagination: Pagination) {
        self.update_deps(|s| {
            s.pagination.page = pagination.page.max(1);
            s.pagination.page_size = pagination.page_size;
        })
        .await;
    }

    pub async fn next_page(&self) {
        let pagination = self.pagination();
        if pagination.has_next() {
            self.set_page(pagination.page + 1).await;
        }
    }

    pub async fn prev_page(&self) {
        let pagination = self.pagination();
        if pagination.has_prev() {
            self.set_page(pagination.page - 1).await;
        }
    }

    /// Run a remote mutation; reload once on success.
    async fn mutate<T>(
        &self,
        kind: Mutation,
        call: impl Future<Output = Result<T, ClientError>>,
    ) -> MutationResult<T> {
        match call.await {
            Ok(value) => {
                tracing::info!(resource = A::NAME, %kind, "mutation succeeded");
                self.load().await;
                if let Some(toasts) = &self.toasts {
                    toasts.success(format!(
                        "{} {}",
                        capitalize(A::NAME),
                        kind.past_tense()
                    ));
                }
                MutationResult::Success(value)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(resource = A::NAME, %kind, "mutation failed: {message}");
                if let Some(toasts) = &self.toasts {
                    toasts.error(
                        format!("Could not {kind} {}", A::NAME),
                        message.clone(),
                    );
                }
                MutationResult::Failure(message)
            }
        }
    }

    pub async fn create(&self, data: &A::Create) -> MutationResult<A::Item> {
        self.mutate(Mutation::Create, self.api.create(data)).await
    }

    pub async fn update(
        &self,
        id: A::Id,
        data: &A::Update,
    ) -> MutationResult<A::Item> {
        self.mutate(Mutation::Update, self.api.update(id, data)).await
    }

    pub async fn delete(&self, id: A::Id) -> MutationResult {
        self.mutate(Mutation::Delete, self.api.delete(id)).await
    }

    pub async fn action(
        &self,
        id: A::Id,
        action: ResourceAction,
    ) -> MutationResult {
        self.mutate(Mutation::Action(action), self.api.action(id, action))
            .await
    }

    pub async fn approve(&self, id: A::Id) -> MutationResult {
        self.action(id, ResourceAction::Approve).await
    }

    pub async fn submit(&self, id: A::Id) -> MutationResult {
        self.action(id, ResourceAction::Submit).await
    }

    pub async fn cancel(&self, id: A::Id) -> MutationResult {
        self.action(id, ResourceAction::Cancel).await
    }

    pub async fn toggle(&self, id: A::Id) -> MutationResult {
        self.action(id, ResourceAction::Toggle).await
    }

    pub fn items(&self) -> Vec<A::Item> {
        self.state.borrow().items().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.state.borrow().pagination
    }

    pub fn filters(&self) -> Filters {
        self.state.borrow().filters.clone()
    }

    pub fn snapshot(&self) -> ListState<A::Item> {
        self.state.borrow().clone()
    }

    /// Receives every state change; the rendering layer re-renders on it.
    pub fn subscribe(&self) -> watch::Receiver<ListState<A::Item>> {
        self.state.subscribe()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// What a mutation does; displays as the verb, e.g. "approve".
#[derive(Debug, Clone, Copy, derive_more::Display)]
enum Mutation {
    #[display("create")]
    Create,
    #[display("update")]
    Update,
    #[display("delete")]
    Delete,
    #[display("{_0}")]
    Action(ResourceAction),
}

impl Mutation {
    fn past_tense(self) -> &'static str {
        match self {
            Mutation::Create => "created",
            Mutation::Update => "updated",
            Mutation::Delete => "deleted",
            Mutation::Action(ResourceAction::Approve) => "approved",
            Mutation::Action(ResourceAction::Submit) => "submitted",
            Mutation::Action(ResourceAction::Cancel) => "cancelled",
            Mutation::Action(ResourceAction::Toggle) => "toggled",
        }
    }
}
