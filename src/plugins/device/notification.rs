/// Fire-and-forget local notifications.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, title: &str, body: &str);
}

/// Emits notifications on the `notifications` tracing target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        tracing::info!(target: "notifications", title, body, "Notification");
    }
}

/// Used when notifications are disabled in settings.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, _title: &str, _body: &str) {}
}

/// Either of the built-in notifiers, picked from settings at startup.
#[derive(Debug, Clone, Copy)]
pub enum DefaultNotifier {
    Log(LogNotifier),
    Silent(SilentNotifier),
}

impl DefaultNotifier {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            DefaultNotifier::Log(LogNotifier)
        } else {
            DefaultNotifier::Silent(SilentNotifier)
        }
    }
}

impl Notifier for DefaultNotifier {
    fn notify(&self, title: &str, body: &str) {
        match self {
            DefaultNotifier::Log(n) => n.notify(title, body),
            DefaultNotifier::Silent(n) => n.notify(title, body),
        }
    }
}

/// Title and body shown after a task is created.
pub fn task_created(text: &str) -> (&'static str, String) {
    ("New task added!", format!("You added the task: \"{}\"", text))
}
