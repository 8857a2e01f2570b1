use std::time::Duration;

use crate::catalog::Catalog;
use crate::error::ApiError;

pub trait TimeProvider: Clone + Send + Sync + 'static {
    type Sleep<'a>: Future<Output = ()> + Send + 'a
    where
        Self: 'a;

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a>;
}

/// Server reply to a successful signup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SignupReceipt {
    #[serde(default)]
    pub message: String,
}

/// The activities HTTP contract. Non-2xx replies surface as `ApiError::Api`.
pub trait ActivitiesApi: Clone + Send + Sync + 'static {
    type Fut<'a, T>: Future<Output = Result<T, ApiError>> + Send + 'a
    where
        Self: 'a,
        T: 'a;

    fn list_activities<'a>(&'a self) -> Self::Fut<'a, Catalog>;

    fn sign_up<'a>(&'a self, activity: &'a str, email: &'a str) -> Self::Fut<'a, SignupReceipt>;

    fn remove_participant<'a>(&'a self, activity: &'a str, email: &'a str) -> Self::Fut<'a, ()>;
}

/// Blocking prompts shown to the person using the board.
pub trait Dialogs: Clone + Send + Sync + 'static {
    fn confirm(&self, question: &str) -> bool;
    fn alert(&self, message: &str);
}
