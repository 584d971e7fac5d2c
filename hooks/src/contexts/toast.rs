use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

use crate::config::Config;

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    /// Informational.
    #[default]
    Default,
    /// Alerting; used for failures.
    Destructive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub variant: ToastVariant,
    pub duration: Option<Duration>, // None for no auto-dismiss
}

impl Toast {
    pub fn new(title: impl Into<String>, variant: ToastVariant) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            variant,
            duration: Some(DEFAULT_TOAST_DURATION),
        }
    }

    pub fn info(title: impl Into<String>) -> Self {
        Self::new(title, ToastVariant::Default)
    }

    pub fn destructive(title: impl Into<String>) -> Self {
        Self::new(title, ToastVariant::Destructive)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn no_auto_dismiss(mut self) -> Self {
        self.duration = None;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToastState {
    pub toasts: HashMap<Uuid, Toast>,
}

pub enum ToastAction {
    Add(Toast),
    Remove(Uuid),
    Clear,
}

impl ToastState {
    fn reduce(&mut self, action: ToastAction) {
        match action {
            ToastAction::Add(toast) => {
                self.toasts.insert(toast.id, toast);
            }
            ToastAction::Remove(id) => {
                self.toasts.remove(&id);
            }
            ToastAction::Clear => {
                self.toasts.clear();
            }
        }
    }
}

/// Handle to the toast stack. Clones share the same stack; renderers
/// subscribe to it.
#[derive(Clone)]
pub struct ToastHandle {
    context: Arc<watch::Sender<ToastState>>,
    default_duration: Duration,
}

impl Default for ToastHandle {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl ToastHandle {
    /// `default_duration` replaces the built-in delay for toasts that keep
    /// the default.
    pub fn new(default_duration: Duration) -> Self {
        Self {
            context: Arc::new(watch::Sender::new(ToastState::default())),
            default_duration,
        }
    }

    /// Toasts dismiss after `TOAST_DURATION_MS` unless given their own delay.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.toast_duration)
    }

    fn dispatch(&self, action: ToastAction) {
        self.context.send_modify(|state| state.reduce(action));
    }

    pub fn toast(&self, mut toast: Toast) -> Uuid {
        if toast.duration == Some(DEFAULT_TOAST_DURATION) {
            toast.duration = Some(self.default_duration);
        }
        let toast_id = toast.id;
        let duration = toast.duration;

        self.dispatch(ToastAction::Add(toast));

        // Set up auto-dismiss if duration is specified
        if let Some(duration) = duration {
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    let context = self.context.clone();
                    runtime.spawn(async move {
                        tokio::time::sleep(duration).await;
                        context.send_modify(|state| {
                            state.reduce(ToastAction::Remove(toast_id))
                        });
                    });
                }
                Err(_) => {
                    tracing::warn!("no runtime; toast will not auto-dismiss")
                }
            }
        }

        toast_id
    }

    pub fn error(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Uuid {
        self.toast(Toast::destructive(title).description(description))
    }

    pub fn success(&self, title: impl Into<String>) -> Uuid {
        self.toast(Toast::info(title))
    }

    pub fn remove(&self, id: Uuid) {
        self.dispatch(ToastAction::Remove(id));
    }

    pub fn clear(&self) {
        self.dispatch(ToastAction::Clear);
    }

    pub fn current(&self) -> Vec<Toast> {
        self.context.borrow().toasts.values().cloned().collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<ToastState> {
        self.context.subscribe()
    }
}
