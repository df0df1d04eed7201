use std::{
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use serde::Serialize;

use crate::utils::escape;

#[derive(strum_macros::Display, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Danger,
}

impl Severity {
    fn icon(&self) -> &'static str {
        match self {
            Severity::Danger => "exclamation-triangle",
            _ => "info-circle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NoticeId(u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub id: NoticeId,
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="alert alert-{severity} alert-dismissible fade show" role="alert" data-notice="{id}"><i class="fas fa-{icon} me-2"></i>{message}<button type="button" class="btn-close" data-bs-dismiss="alert"></button></div>"#,
            severity = self.severity,
            id = self.id.0,
            icon = self.severity.icon(),
            message = escape(&self.message),
        )
    }
}

/// Where user visible notices end up.
///
/// Removing a notice has to be idempotent: the auto dismiss timer and the
/// user may both try to remove the same notice.
pub trait NotificationSink: Send + Sync {
    /// Inserts a notice at the top of the content region.
    fn show(&self, message: &str, severity: Severity) -> NoticeId;

    /// Removes a notice, returns `false` if it was already gone.
    fn dismiss(&self, id: NoticeId) -> bool;
}

/// In memory notice region, newest notice first.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    next_id: AtomicU64,
    notices: Mutex<Vec<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Notice>> {
        self.notices.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn to_html(&self) -> String {
        self.lock().iter().map(Notice::to_html).collect()
    }
}

impl NotificationSink for NoticeBoard {
    fn show(&self, message: &str, severity: Severity) -> NoticeId {
        let id = NoticeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().insert(
            0,
            Notice {
                id,
                message: message.to_string(),
                severity,
            },
        );
        id
    }

    fn dismiss(&self, id: NoticeId) -> bool {
        let mut notices = self.lock();
        let before = notices.len();
        notices.retain(|notice| notice.id != id);
        before != notices.len()
    }
}

/// Shows a dismissible notice that removes itself after `auto_dismiss`.
///
/// Outside of a tokio runtime the notice stays until dismissed manually.
pub fn show_alert<S>(
    sink: &Arc<S>,
    message: &str,
    severity: Severity,
    auto_dismiss: Duration,
) -> NoticeId
where
    S: NotificationSink + ?Sized + 'static,
{
    let id = sink.show(message, severity);
    log::info!("Notice {:?} [{}]: {}", id, severity, message);

    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            let sink = Arc::clone(sink);
            handle.spawn(async move {
                tokio::time::sleep(auto_dismiss).await;
                if sink.dismiss(id) {
                    log::debug!("Notice {:?} dismissed automatically", id);
                }
            });
        }
        Err(_) => log::warn!("No runtime available, notice {:?} will not auto dismiss", id),
    }

    id
}

/// A sink paired with the auto dismiss delay from the config.
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    auto_dismiss: Duration,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, auto_dismiss: Duration) -> Self {
        Self { sink, auto_dismiss }
    }

    pub fn alert(&self, message: &str, severity: Severity) -> NoticeId {
        show_alert(&self.sink, message, severity, self.auto_dismiss)
    }

    pub fn dismiss(&self, id: NoticeId) -> bool {
        self.sink.dismiss(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let board = NoticeBoard::new();
        board.show("first", Severity::Info);
        board.show("second", Severity::Danger);

        let messages: Vec<String> = board.notices().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn test_dismiss_is_idempotent() {
        let board = NoticeBoard::new();
        let id = board.show("bye", Severity::Info);

        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
        assert!(board.is_empty());
    }

    #[test]
    fn test_html_is_escaped() {
        let board = NoticeBoard::new();
        board.show("<script>", Severity::Danger);

        let html = board.to_html();
        assert!(html.contains("alert-danger"));
        assert!(html.contains("fa-exclamation-triangle"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_without_runtime_notice_stays() {
        let board = Arc::new(NoticeBoard::new());
        show_alert(&board, "stays", Severity::Info, Duration::from_secs(5));
        assert_eq!(board.notices().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_dismiss() {
        let board = Arc::new(NoticeBoard::new());
        show_alert(&board, "soon gone", Severity::Success, Duration::from_secs(5));

        tokio::time::sleep(Duration::from_millis(4900)).await;
        assert_eq!(board.notices().len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(board.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismiss_before_timer() {
        let board = Arc::new(NoticeBoard::new());
        let id = show_alert(&board, "closed early", Severity::Info, Duration::from_secs(5));
        let other = board.show("unrelated", Severity::Warning);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(board.dismiss(id));

        tokio::time::sleep(Duration::from_secs(10)).await;
        let remaining = board.notices();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, other);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dyn_sink() {
        let sink: Arc<dyn NotificationSink> = Arc::new(NoticeBoard::new());
        let id = show_alert(&sink, "dyn", Severity::Info, Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(!sink.dismiss(id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_notifier_uses_delay() {
        let board = Arc::new(NoticeBoard::new());
        let notifier = Notifier::new(board.clone(), Duration::from_secs(2));
        let id = notifier.alert("two seconds", Severity::Info);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(board.is_empty());
        assert!(!notifier.dismiss(id));
    }
}
