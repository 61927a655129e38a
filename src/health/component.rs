//! Health check components.

use futures_util::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::transport::BoxError;

type CheckFn = Arc<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// A named dependency whose health contributes to `/healthz`.
#[derive(Clone)]
pub struct Component {
    name: String,
    check: CheckFn,
}

/// Outcome of one component check.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ComponentReport {
    pub name: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Component {
    pub fn new<F, Fut, E>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Self {
            name: name.into(),
            check: Arc::new(move || check().map(|res| res.map_err(Into::<BoxError>::into)).boxed()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the check, treating a timeout as a failure.
    pub async fn probe(&self, timeout: Duration) -> ComponentReport {
        let outcome = tokio::time::timeout(timeout, (self.check)()).await;
        let error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some(format!("check timed out after {:?}", timeout)),
        };

        if let Some(error) = &error {
            tracing::warn!(component = %self.name, error = %error, "Health check failed");
        }

        ComponentReport {
            name: self.name.clone(),
            healthy: error.is_none(),
            error,
        }
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component").field("name", &self.name).finish()
    }
}
