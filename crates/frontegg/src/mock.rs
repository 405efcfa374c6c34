//! Recording transport for tests.
//!
//! Responses are scripted per method and path; the query string is ignored
//! when matching. Clones share state, so a test can keep a handle after
//! moving a clone into a [`crate::Client`].

use crate::error::{Error, Result};
use crate::transport::{Method, Transport};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// One recorded request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug)]
struct Scripted {
    method: Method,
    path: String,
    outcome: Result<Option<Value>>,
    once: bool,
}

#[derive(Debug, Default)]
struct State {
    requests: Vec<Request>,
    scripted: Vec<Scripted>,
}

#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<State>>,
}

fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(p, _)| p)
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn script(self, method: Method, path: &str, outcome: Result<Option<Value>>, once: bool) -> Self {
        self.state.borrow_mut().scripted.push(Scripted {
            method,
            path: path.to_string(),
            outcome,
            once,
        });
        self
    }

    /// Answer every `method path` request with `body`.
    #[must_use]
    pub fn respond(self, method: Method, path: &str, body: Value) -> Self {
        self.script(method, path, Ok(Some(body)), false)
    }

    /// Answer the next `method path` request with `body`, then fall through.
    #[must_use]
    pub fn respond_once(self, method: Method, path: &str, body: Value) -> Self {
        self.script(method, path, Ok(Some(body)), true)
    }

    /// Fail every `method path` request.
    #[must_use]
    pub fn fail(self, method: Method, path: &str, error: Error) -> Self {
        self.script(method, path, Err(error), false)
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.borrow().requests.clone()
    }

    /// Requests rendered as `METHOD path`.
    pub fn calls(&self) -> Vec<String> {
        self.state
            .borrow()
            .requests
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().requests.clear();
    }
}

impl Transport for MockTransport {
    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Option<Value>> {
        let mut state = self.state.borrow_mut();
        state.requests.push(Request {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });

        let bare = strip_query(path);
        let position = state
            .scripted
            .iter()
            .position(|s| s.method == method && s.path == bare);

        match position {
            Some(index) if state.scripted[index].once => state.scripted.remove(index).outcome,
            Some(index) => state.scripted[index].outcome.clone(),
            None if method == Method::Get => Err(Error::NotFound(path.to_string())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_and_answers() {
        let mock = MockTransport::new().respond(Method::Get, "/a", json!({"id": "1"}));
        let handle = mock.clone();

        let value = mock.send(Method::Get, "/a?x=1", None).unwrap();
        assert_eq!(value, Some(json!({"id": "1"})));
        assert_eq!(handle.calls(), vec!["GET /a?x=1"]);
    }

    #[test]
    fn test_unmatched_requests() {
        let mock = MockTransport::new();
        assert!(mock.send(Method::Get, "/missing", None).unwrap_err().is_not_found());
        assert_eq!(mock.send(Method::Delete, "/x", None).unwrap(), None);
    }

    #[test]
    fn test_respond_once_falls_through() {
        let mock = MockTransport::new()
            .respond_once(Method::Get, "/a", json!(1))
            .respond(Method::Get, "/a", json!(2));
        assert_eq!(mock.send(Method::Get, "/a", None).unwrap(), Some(json!(1)));
        assert_eq!(mock.send(Method::Get, "/a", None).unwrap(), Some(json!(2)));
    }

    #[test]
    fn test_failures_are_recorded() {
        let mock = MockTransport::new().fail(
            Method::Post,
            "/b",
            Error::Http {
                status: 400,
                message: "bad".into(),
            },
        );
        let body = json!({"k": "v"});
        assert!(mock.send(Method::Post, "/b", Some(&body)).is_err());
        assert_eq!(mock.requests()[0].body, Some(body));
    }
}
