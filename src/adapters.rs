use std::io::{BufRead, Write};
use std::pin::Pin;
use std::time::Duration;

use serde::de::{DeserializeOwned, IgnoredAny};
use url::Url;

use crate::catalog::Catalog;
use crate::error::{ApiError, ErrorBody, Result};
use crate::ports;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimeProvider;

impl ports::TimeProvider for TokioTimeProvider {
    type Sleep<'a>
        = tokio::time::Sleep
    where
        Self: 'a;

    fn sleep<'a>(&'a self, duration: Duration) -> Self::Sleep<'a> {
        tokio::time::sleep(duration)
    }
}

/// `ActivitiesApi` over HTTP. Requests carry no timeout.
#[derive(Debug, Clone)]
pub struct HttpActivitiesApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpActivitiesApi {
    pub fn new(base_url: Url) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(format!("{base_url} cannot be a base")));
        }
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str], email: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| ApiError::Url(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if let Some(email) = email {
            url.query_pairs_mut().append_pair("email", email);
        }
        Ok(url)
    }

    fn participant_endpoint(&self, activity: &str, action: &str, email: &str) -> Result<Url> {
        self.endpoint(&["activities", activity, action], Some(email))
    }
}

async fn send_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        // Any JSON counts as an application error; only the known fields are read.
        let value: serde_json::Value = serde_json::from_slice(&bytes)?;
        let body = serde_json::from_value::<ErrorBody>(value).unwrap_or_default();
        return Err(ApiError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(serde_json::from_slice(&bytes)?)
}

impl ports::ActivitiesApi for HttpActivitiesApi {
    type Fut<'a, T>
        = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>
    where
        Self: 'a,
        T: 'a;

    fn list_activities<'a>(&'a self) -> Self::Fut<'a, Catalog> {
        Box::pin(async move {
            let url = self.endpoint(&["activities"], None)?;
            tracing::debug!(%url, "fetching activities");
            send_json(self.client.get(url)).await
        })
    }

    fn sign_up<'a>(
        &'a self,
        activity: &'a str,
        email: &'a str,
    ) -> Self::Fut<'a, ports::SignupReceipt> {
        Box::pin(async move {
            let url = self.participant_endpoint(activity, "signup", email)?;
            tracing::debug!(%url, "submitting signup");
            send_json(self.client.post(url)).await
        })
    }

    fn remove_participant<'a>(&'a self, activity: &'a str, email: &'a str) -> Self::Fut<'a, ()> {
        Box::pin(async move {
            let url = self.participant_endpoint(activity, "participants", email)?;
            tracing::debug!(%url, "removing participant");
            send_json::<IgnoredAny>(self.client.delete(url)).await?;
            Ok(())
        })
    }
}

/// Prompts on stderr, answers from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalDialogs {
    pub assume_yes: bool,
}

impl ports::Dialogs for TerminalDialogs {
    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let mut stderr = std::io::stderr();
        if write!(stderr, "{question} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_affirmative(&answer)
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::ports::ActivitiesApi as _;

    use axum::Router;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::{delete, get, post};
    use std::collections::HashMap;

    async fn list() -> Response {
        (
            [("content-type", "application/json")],
            r#"{"Chess Club":{"description":"Strategy","schedule":"Fridays","max_participants":12,"participants":["ada@example.com"]},"Art Studio":{"description":"Paint","schedule":"Wednesdays","max_participants":8,"participants":[]}}"#,
        )
            .into_response()
    }

    async fn signup(
        Path(activity): Path<String>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Response {
        let email = query.get("email").cloned().unwrap_or_default();
        if activity != "Chess Club" {
            return (
                StatusCode::NOT_FOUND,
                axum::Json(serde_json::json!({ "detail": "Activity not found" })),
            )
                .into_response();
        }
        axum::Json(serde_json::json!({
            "message": format!("Signed up {email} for {activity}")
        }))
        .into_response()
    }

    async fn remove(
        Path(activity): Path<String>,
        Query(query): Query<HashMap<String, String>>,
    ) -> Response {
        match query.get("email").map(String::as_str) {
            Some("ada@example.com") if activity == "Chess Club" => {
                axum::Json(serde_json::json!({ "message": "removed" })).into_response()
            }
            Some("html@example.com") => {
                (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").into_response()
            }
            _ => (
                StatusCode::BAD_REQUEST,
                axum::Json(serde_json::json!({ "detail": "Already removed" })),
            )
                .into_response(),
        }
    }

    async fn spawn_backend(prefix: &str) -> Url {
        let routes = Router::new()
            .route("/activities", get(list))
            .route("/activities/{activity}/signup", post(signup))
            .route("/activities/{activity}/participants", delete(remove));
        let app = if prefix.is_empty() {
            routes
        } else {
            Router::new().nest(prefix, routes)
        };
        serve_backend(app, prefix).await
    }

    async fn serve_backend(app: Router, prefix: &str) -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub backend");
        });
        Url::parse(&format!("http://{addr}{prefix}/")).expect("base url")
    }

    async fn list_backend(status: StatusCode, body: serde_json::Value) -> Url {
        let app = Router::new().route(
            "/activities",
            get(move || {
                let body = body.clone();
                async move { (status, axum::Json(body)).into_response() }
            }),
        );
        serve_backend(app, "").await
    }

    #[test]
    fn endpoint__should_percent_encode_path_and_query() {
        // Given
        let api = HttpActivitiesApi::new(Url::parse("http://localhost:8000/").expect("url"))
            .expect("api");

        // When
        let url = api
            .participant_endpoint("Chess Club/Advanced", "signup", "a+b@example.com")
            .expect("endpoint");

        // Then
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/activities/Chess%20Club%2FAdvanced/signup?email=a%2Bb%40example.com"
        );
    }

    #[test]
    fn endpoint__should_keep_base_path_prefix() {
        // Given
        let api = HttpActivitiesApi::new(Url::parse("http://localhost/school?x=1").expect("url"))
            .expect("api");

        // When
        let url = api.endpoint(&["activities"], None).expect("endpoint");

        // Then
        assert_eq!(url.as_str(), "http://localhost/school/activities");
    }

    #[test]
    fn new__should_reject_non_hierarchical_base() {
        // Then
        assert!(HttpActivitiesApi::new(Url::parse("mailto:a@example.com").expect("url")).is_err());
    }

    #[tokio::test]
    async fn list_activities__should_decode_catalog_in_order() {
        // Given
        let api = HttpActivitiesApi::new(spawn_backend("").await).expect("api");

        // When
        let catalog = api.list_activities().await.expect("list activities");

        // Then
        let names: Vec<&str> = catalog.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Chess Club", "Art Studio"]);
        assert_eq!(catalog.get("Chess Club").expect("chess").spots_left(), 11);
    }

    #[tokio::test]
    async fn list_activities__should_reject_non_success_status() {
        // Given
        let base_url = list_backend(
            StatusCode::INTERNAL_SERVER_ERROR,
            serde_json::json!({ "detail": "boom" }),
        )
        .await;
        let api = HttpActivitiesApi::new(base_url).expect("api");

        // When
        let err = api.list_activities().await.expect_err("server error");

        // Then
        match err {
            ApiError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.detail().as_deref(), Some("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn list_activities__should_report_parse_error_for_non_catalog_body() {
        // Given
        let base_url = list_backend(StatusCode::OK, serde_json::json!({ "detail": "x" })).await;
        let api = HttpActivitiesApi::new(base_url).expect("api");

        // When
        let err = api.list_activities().await.expect_err("not a catalog");

        // Then
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn sign_up__should_decode_message() {
        // Given
        let api = HttpActivitiesApi::new(spawn_backend("/school").await).expect("api");

        // When
        let receipt = api
            .sign_up("Chess Club", "bob smith@example.com")
            .await
            .expect("sign up");

        // Then
        assert_eq!(receipt.message, "Signed up bob smith@example.com for Chess Club");
    }

    #[tokio::test]
    async fn sign_up__should_surface_detail_on_rejection() {
        // Given
        let api = HttpActivitiesApi::new(spawn_backend("").await).expect("api");

        // When
        let err = api
            .sign_up("Underwater Basket Weaving", "bob@example.com")
            .await
            .expect_err("rejected");

        // Then
        match err {
            ApiError::Api { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body.detail().as_deref(), Some("Activity not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn remove_participant__should_succeed_and_reject() {
        // Given
        let api = HttpActivitiesApi::new(spawn_backend("").await).expect("api");

        // When
        let removed = api.remove_participant("Chess Club", "ada@example.com").await;
        let rejected = api.remove_participant("Chess Club", "bob@example.com").await;

        // Then
        assert!(removed.is_ok());
        let body = rejected
            .expect_err("rejected")
            .rejection()
            .cloned()
            .expect("error body");
        assert_eq!(body.detail().as_deref(), Some("Already removed"));
    }

    #[tokio::test]
    async fn remove_participant__should_report_parse_error_for_non_json_body() {
        // Given
        let api = HttpActivitiesApi::new(spawn_backend("").await).expect("api");

        // When
        let err = api
            .remove_participant("Chess Club", "html@example.com")
            .await
            .expect_err("non-json body");

        // Then
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn list_activities__should_report_network_error_when_unreachable() {
        // Given
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        let api = HttpActivitiesApi::new(Url::parse(&format!("http://{addr}/")).expect("url"))
            .expect("api");

        // When
        let err = api.list_activities().await.expect_err("unreachable");

        // Then
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn is_affirmative__should_accept_yes_only() {
        // Then
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative(" YES "));
        assert!(!is_affirmative("\n"));
        assert!(!is_affirmative("nope"));
    }
}
