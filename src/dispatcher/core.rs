use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::ids::RequestId;
use crate::registry::MatchResult;
use crate::template::ParamVec;

/// Maximum inline response headers before heap allocation.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Stack-allocated header storage. Header names are `Arc<str>` because the
/// common ones (content-type and friends) repeat across responses and clone
/// in O(1).
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed to a handler.
///
/// Carries the resolved route's identity and the parameters extracted from
/// the URL; negotiation has already happened by the time a handler runs.
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique id for log correlation.
    pub request_id: RequestId,
    /// HTTP method of the matched route.
    pub method: Method,
    /// The matched path pattern (not the concrete request path).
    pub path: String,
    /// Application root the matched route was declared under.
    pub root: String,
    /// Handler identifier the dispatcher resolved.
    pub handler_name: String,
    /// Path parameters extracted from the URL.
    pub path_params: ParamVec,
    /// True when other routes also matched this request.
    pub ambiguous: bool,
    /// Request body parsed as JSON, if present.
    pub body: Option<Value>,
}

impl HandlerRequest {
    /// Get a path parameter by name ("last write wins" for duplicates).
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Response data returned by a handler.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON.
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A JSON response with the content-type header set.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// A plain-text response.
    #[must_use]
    pub fn text(status: u16, body: &str) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "text/plain".to_string()));
        Self {
            status,
            headers,
            body: Value::String(body.to_string()),
        }
    }

    /// An error response with a JSON `{"error": ...}` body.
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Get a header by name (case-insensitive).
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Error returned by [`Dispatcher::dispatch`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    /// The resolved route names a handler nobody registered.
    #[error("no handler registered for '{0}'")]
    HandlerNotFound(String),
}

type HandlerFn = Arc<dyn Fn(HandlerRequest) -> HandlerResponse + Send + Sync>;

/// Maps handler identifiers to handler functions and invokes them.
///
/// Handlers are registered during startup; `dispatch()` takes `&self` and
/// is safe for concurrent callers. Handler panics are caught and converted
/// to 500 responses so one bad handler cannot take the process down.
#[derive(Default, Clone)]
pub struct Dispatcher {
    handlers: HashMap<String, HandlerFn>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler function under the given name.
    ///
    /// Registering the same name twice replaces the previous handler.
    pub fn register_handler<F>(&mut self, name: &str, handler: F)
    where
        F: Fn(HandlerRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        if self.handlers.contains_key(name) {
            tracing::warn!(handler = %name, "replacing existing handler");
        }
        info!(
            handler = %name,
            total_handlers = self.handlers.len() + 1,
            "handler registered"
        );
        self.handlers.insert(name.to_string(), Arc::new(handler));
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// True when a handler is registered under `name`.
    #[must_use]
    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Dispatch a resolved request to its handler.
    ///
    /// Fails only when the route's handler id is unknown. A panicking
    /// handler yields a 500 response, not an error.
    pub fn dispatch(
        &self,
        route_match: MatchResult,
        body: Option<Value>,
    ) -> Result<HandlerResponse, DispatchError> {
        let handler_name = route_match.route.handler_name.clone();

        debug!(
            handler = %handler_name,
            available_handlers = self.handlers.len(),
            "handler lookup"
        );

        let handler = self.handlers.get(&handler_name).ok_or_else(|| {
            error!(handler = %handler_name, "handler not found");
            DispatchError::HandlerNotFound(handler_name.clone())
        })?;

        let request_id = RequestId::new();
        let request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path: route_match.route.path().to_string(),
            root: route_match.route.root.clone(),
            handler_name: handler_name.clone(),
            path_params: route_match.path_params,
            ambiguous: route_match.ambiguous,
            body,
        };

        info!(
            request_id = %request_id,
            handler = %handler_name,
            method = %request.method,
            path = %request.path,
            ambiguous = request.ambiguous,
            "request dispatched to handler"
        );

        let start = Instant::now();
        match catch_unwind(AssertUnwindSafe(|| handler(request))) {
            Ok(response) => {
                info!(
                    request_id = %request_id,
                    handler = %handler_name,
                    status = response.status,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "handler response received"
                );
                Ok(response)
            }
            Err(panic) => {
                let panic_message = panic_payload_message(panic.as_ref());
                error!(
                    request_id = %request_id,
                    handler = %handler_name,
                    panic_message = %panic_message,
                    "handler panicked"
                );
                Ok(HandlerResponse::error(
                    500,
                    &format!("handler panicked: {panic_message}"),
                ))
            }
        }
    }
}

fn panic_payload_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
