//! Recording executor for tests.
//!
//! `MockExecutor` records every statement and query it receives, answers
//! queries from scripted responses and fails statements on demand. It is
//! public so that crates driving the builders can assert the exact
//! statement sequence without a database.

use crate::error::{Error, Result};
use crate::executor::{Executor, Row};
use std::cell::RefCell;
use std::rc::Rc;

/// One call observed by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Execute(String),
    Query(String),
}

impl Call {
    pub fn sql(&self) -> &str {
        match self {
            Self::Execute(sql) | Self::Query(sql) => sql,
        }
    }
}

#[derive(Debug, Clone)]
struct Response {
    pattern: String,
    rows: Vec<Row>,
    once: bool,
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    responses: Vec<Response>,
    failures: Vec<(String, String)>,
}

/// Scripted, recording [`Executor`].
///
/// Responses are matched by substring against the query text; the first
/// matching response wins and unmatched queries return no rows. Clones
/// share state, so a test can keep a handle after boxing a clone.
#[derive(Debug, Clone, Default)]
pub struct MockExecutor {
    state: Rc<RefCell<State>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn respond(self, pattern: String, rows: Vec<Row>, once: bool) -> Self {
        self.state.borrow_mut().responses.push(Response {
            pattern,
            rows,
            once,
        });
        self
    }

    /// Answer every query containing `pattern` with `rows`.
    pub fn on_query(self, pattern: impl Into<String>, rows: Vec<Row>) -> Self {
        self.respond(pattern.into(), rows, false)
    }

    /// Answer the next query containing `pattern` with `rows`, then forget it.
    pub fn on_query_once(self, pattern: impl Into<String>, rows: Vec<Row>) -> Self {
        self.respond(pattern.into(), rows, true)
    }

    /// Fail any statement or query containing `pattern`.
    pub fn fail_on(self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.state
            .borrow_mut()
            .failures
            .push((pattern.into(), message.into()));
        self
    }

    /// Every call, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    /// Executed statements only, in order.
    pub fn statements(&self) -> Vec<String> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Execute(sql) => Some(sql.clone()),
                Call::Query(_) => None,
            })
            .collect()
    }

    /// Queries only, in order.
    pub fn queries(&self) -> Vec<String> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Query(sql) => Some(sql.clone()),
                Call::Execute(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let sql = call.sql().to_string();
        state.calls.push(call);
        match state.failures.iter().find(|(pattern, _)| sql.contains(pattern)) {
            Some((_, message)) => Err(Error::execution(sql.as_str(), message)),
            None => Ok(()),
        }
    }
}

impl Executor for MockExecutor {
    fn execute(&self, statement: &str) -> Result<u64> {
        self.record(Call::Execute(statement.to_string()))?;
        Ok(0)
    }

    fn query(&self, statement: &str) -> Result<Vec<Row>> {
        self.record(Call::Query(statement.to_string()))?;

        let mut state = self.state.borrow_mut();
        let Some(index) = state
            .responses
            .iter()
            .position(|response| statement.contains(&response.pattern))
        else {
            return Ok(Vec::new());
        };

        if state.responses[index].once {
            Ok(state.responses.remove(index).rows)
        } else {
            Ok(state.responses[index].rows.clone())
        }
    }
}
