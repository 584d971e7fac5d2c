pub mod toast;

pub use toast::{Toast, ToastHandle, ToastVariant};
