//! Correlation id for one HTTP request.
//!
//! `Trace` middleware opens a [`TraceId::scope`] around each request.
//! [`Error`](crate::domain::Error) reads [`TraceId::current`] when it is
//! built, and the same id goes out in the `trace-id` response header and on
//! the request's log span. Spawned tasks start outside the scope.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Response header echoing the request's [`TraceId`].
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Random v4 UUID naming a request in logs and error bodies.
///
/// ```
/// use blog_backend::TraceId;
///
/// let id: TraceId = "6f1c2a4e-8d0b-4a53-9c1e-2b7d5e9f0a11".parse().expect("uuid");
/// assert_eq!(id.to_string(), "6f1c2a4e-8d0b-4a53-9c1e-2b7d5e9f0a11");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    pub async fn scope<Fut: Future>(trace_id: TraceId, fut: Fut) -> Fut::Output {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
