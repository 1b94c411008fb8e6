//! User-visible notifications.

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    Success,
    Error,
}

impl ToastVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One display request for the notification collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Success".to_string(),
            message: message.into(),
            variant: ToastVariant::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            variant: ToastVariant::Error,
        }
    }
}

/// Fire-and-forget notification sink.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, toast: Toast) {
        (**self).notify(toast)
    }
}

/// Notifier that only records toasts in the core log.
///
/// Used by headless surfaces (FFI, CLI) that render outcomes themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, toast: Toast) {
        match toast.variant {
            ToastVariant::Success => info!(
                "event=toast module=service status=ok variant={} title={}",
                toast.variant.as_str(),
                toast.title
            ),
            ToastVariant::Error => warn!(
                "event=toast module=service status=error variant={} title={}",
                toast.variant.as_str(),
                toast.title
            ),
        }
    }
}
