use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;

use crate::config::BoardConfig;
use crate::error::ApiError;
use crate::page::{DeleteControl, MessageKind, Page};
use crate::ports;

pub const SIGNUP_REJECTED_FALLBACK: &str = "An error occurred";
pub const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";
pub const REMOVAL_REJECTED_FALLBACK: &str = "Failed to remove participant";
pub const REMOVAL_FAILED: &str = "Failed to remove participant. See console for details.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered { activities: usize },
    Failed,
    /// A newer render was issued before this one's response arrived.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    Skipped,
    Declined,
    Removed,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupOutcome {
    Accepted,
    Rejected,
    Failed,
}

/// The activity sign-up view: renders the catalog and handles the signup
/// form and the participant delete buttons.
///
/// Clones share the same page.
#[derive(Clone)]
pub struct ActivityBoard<A, D, T> {
    api: A,
    dialogs: D,
    time: T,
    config: BoardConfig,
    page: Arc<Mutex<Page>>,
    render_ticket: Arc<AtomicU64>,
    message_timers: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl<A, D, T> ActivityBoard<A, D, T>
where
    A: ports::ActivitiesApi,
    D: ports::Dialogs,
    T: ports::TimeProvider,
{
    pub fn new(api: A, dialogs: D, time: T, config: BoardConfig) -> Self {
        Self {
            api,
            dialogs,
            time,
            config,
            page: Arc::new(Mutex::new(Page::default())),
            render_ticket: Arc::new(AtomicU64::new(0)),
            message_timers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Initial draw.
    pub async fn load(&self) -> RenderOutcome {
        self.render_activities().await
    }

    /// Snapshot of the current page.
    pub fn page(&self) -> Page {
        self.lock_page().clone()
    }

    /// Apply a user edit to the page, e.g. typing into the signup form.
    pub fn edit_page<R>(&self, edit: impl FnOnce(&mut Page) -> R) -> R {
        let mut page = self.lock_page();
        edit(&mut *page)
    }

    pub async fn render_activities(&self) -> RenderOutcome {
        let ticket = self.render_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.api.list_activities().await;

        let mut page = self.lock_page();
        if self.render_ticket.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "discarding stale activities response");
            return RenderOutcome::Superseded;
        }
        match result {
            Ok(catalog) => {
                page.draw_catalog(&catalog);
                page.bind_delete_controls();
                RenderOutcome::Rendered {
                    activities: catalog.iter().count(),
                }
            }
            Err(err) => {
                page.draw_load_failure();
                tracing::error!(error = %err, "error fetching activities");
                RenderOutcome::Failed
            }
        }
    }

    /// Handler behind a participant's delete button.
    pub async fn remove_participant(&self, control: &DeleteControl) -> RemovalOutcome {
        if control.email.is_empty() || control.activity.is_empty() {
            return RemovalOutcome::Skipped;
        }
        let question = format!("Remove {} from {}?", control.email, control.activity);
        if !self.dialogs.confirm(&question) {
            return RemovalOutcome::Declined;
        }

        match self
            .api
            .remove_participant(&control.activity, &control.email)
            .await
        {
            Ok(()) => {
                self.render_activities().await;
                RemovalOutcome::Removed
            }
            Err(err) => {
                let message = match err.rejection() {
                    Some(body) => {
                        tracing::error!(error = %err, "failed to remove participant");
                        body.detail()
                            .or_else(|| body.message())
                            .unwrap_or_else(|| REMOVAL_REJECTED_FALLBACK.to_string())
                    }
                    None => {
                        tracing::error!(error = %err, "error removing participant");
                        REMOVAL_FAILED.to_string()
                    }
                };
                self.dialogs.alert(&message);
                RemovalOutcome::Failed { message }
            }
        }
    }

    /// Handler behind the signup form's submit.
    pub async fn submit_signup(&self) -> SignupOutcome {
        let form = self.lock_page().signup_form.clone();
        let result = self.api.sign_up(&form.activity, &form.email).await;

        let outcome = match result {
            Ok(receipt) => {
                let mut page = self.lock_page();
                page.show_message(receipt.message, MessageKind::Success);
                page.reset_signup_form();
                SignupOutcome::Accepted
            }
            Err(ApiError::Api { body, .. }) => {
                let text = body
                    .detail()
                    .unwrap_or_else(|| SIGNUP_REJECTED_FALLBACK.to_string());
                self.lock_page().show_message(text, MessageKind::Error);
                SignupOutcome::Rejected
            }
            Err(err) => {
                self.lock_page()
                    .show_message(SIGNUP_FAILED, MessageKind::Error);
                tracing::error!(error = %err, "error signing up");
                SignupOutcome::Failed
            }
        };
        self.schedule_message_hide();
        if outcome == SignupOutcome::Accepted {
            self.render_activities().await;
        }
        outcome
    }

    // Timers are independent: an older one may hide a newer message early.
    fn schedule_message_hide(&self) {
        let time = self.time.clone();
        let page = Arc::clone(&self.page);
        let delay = self.config.message_timeout;
        let handle = tokio::spawn(async move {
            time.sleep(delay).await;
            lock(&page).hide_message();
        });
        let mut timers = lock(&self.message_timers);
        timers.retain(|timer| !timer.is_finished());
        timers.push(handle);
    }

    fn lock_page(&self) -> MutexGuard<'_, Page> {
        lock(&self.page)
    }

    #[cfg(test)]
    pub(crate) async fn join_message_timers(&self) {
        let timers: Vec<_> = lock(&self.message_timers).drain(..).collect();
        for timer in timers {
            timer.await.expect("message timer");
        }
    }
}

// A panic while holding the page leaves it in a drawable state, so poisoning
// is ignored.
fn lock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
