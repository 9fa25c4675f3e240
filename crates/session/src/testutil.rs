//! In-memory driver for exercising the executor without a ledger.
//!
//! [`MockDriver`] hands out sessions that replay scripted outcomes and
//! record everything done to them. Clones share state, so a test keeps one
//! handle for assertions and gives another to the [`Ledger`](crate::Ledger).
//!
//! ```
//! use ledger_ion::Value;
//! use ledger_ion_session::testutil::MockDriver;
//! use ledger_ion_session::{Ledger, LedgerConfig};
//!
//! let driver = MockDriver::new();
//! driver.push_rows(&[Value::structure([("id", Value::Str("a1".into()))])]);
//! let ledger = Ledger::new(driver.clone(), "vehicles", LedgerConfig::new());
//! assert_eq!(ledger.name(), "vehicles");
//! assert_eq!(driver.sessions_opened(), 0);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use ledger_ion::{BinaryReader, Value};

use crate::config::LedgerConfig;
use crate::driver::{Driver, IonParameter, Session};
use crate::error::DriverError;
use crate::result::ResultSet;

/// A statement as a mock session received it, parameters decoded back into
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedStatement {
    pub ledger: String,
    pub statement: String,
    pub parameters: Vec<Value>,
}

enum Scripted {
    Rows(ResultSet),
    Failure(String),
    Pending,
}

#[derive(Default)]
struct State {
    results: VecDeque<Scripted>,
    tables: Vec<String>,
    statements: Vec<RecordedStatement>,
    configs: Vec<LedgerConfig>,
    opened: usize,
    closed: usize,
    abandoned: usize,
    fail_open: Option<String>,
    fail_close: Option<String>,
}

/// Scriptable [`Driver`] that records sessions and statements.
#[derive(Clone, Default)]
pub struct MockDriver {
    state: Arc<Mutex<State>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // A panicking test thread must not hide the state from the others.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queues the result set for the next executed statement.
    pub fn push_result(&self, results: ResultSet) {
        self.state().results.push_back(Scripted::Rows(results));
    }

    /// Queues one encoded record per value as the next result set.
    ///
    /// # Panics
    ///
    /// Panics if a value cannot be encoded.
    pub fn push_rows(&self, rows: &[Value]) {
        let results = ResultSet::from_values(rows).expect("rows must encode");
        self.push_result(results);
    }

    /// Makes the next executed statement fail with `message`.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.state().results.push_back(Scripted::Failure(message.into()));
    }

    /// Makes the next executed statement wait forever, so its caller can be
    /// cancelled mid-flight.
    pub fn push_pending(&self) {
        self.state().results.push_back(Scripted::Pending);
    }

    pub fn set_tables<I, S>(&self, tables: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state().tables = tables.into_iter().map(Into::into).collect();
    }

    /// Makes every later `open_session` fail.
    pub fn fail_open(&self, message: impl Into<String>) {
        self.state().fail_open = Some(message.into());
    }

    /// Makes every later `close` fail (the close is still counted).
    pub fn fail_close(&self, message: impl Into<String>) {
        self.state().fail_close = Some(message.into());
    }

    pub fn sessions_opened(&self) -> usize {
        self.state().opened
    }

    pub fn sessions_closed(&self) -> usize {
        self.state().closed
    }

    /// Sessions dropped without ever being closed.
    pub fn sessions_abandoned(&self) -> usize {
        self.state().abandoned
    }

    pub fn statements(&self) -> Vec<RecordedStatement> {
        self.state().statements.clone()
    }

    /// Configs passed to `open_session`, in order.
    pub fn configs(&self) -> Vec<LedgerConfig> {
        self.state().configs.clone()
    }
}

#[async_trait]
impl Driver for MockDriver {
    async fn open_session(
        &self,
        ledger: &str,
        config: &LedgerConfig,
    ) -> Result<Box<dyn Session>, DriverError> {
        let mut state = self.state();
        state.configs.push(config.clone());
        if let Some(message) = &state.fail_open {
            return Err(DriverError::new(message.clone()));
        }
        state.opened += 1;
        Ok(Box::new(MockSession {
            ledger: ledger.to_owned(),
            state: Arc::clone(&self.state),
            closed: false,
        }))
    }
}

struct MockSession {
    ledger: String,
    state: Arc<Mutex<State>>,
    closed: bool,
}

impl MockSession {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.closed {
            Err(DriverError::new("session is closed"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Session for MockSession {
    async fn execute_statement(
        &mut self,
        statement: &str,
        parameters: Vec<IonParameter>,
    ) -> Result<ResultSet, DriverError> {
        self.ensure_open()?;
        let decoded = parameters
            .iter()
            .map(|p| BinaryReader::read_all(p.as_bytes()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DriverError::with_source("parameter is not valid Ion", e))?;
        let next = {
            let mut state = self.state();
            state.statements.push(RecordedStatement {
                ledger: self.ledger.clone(),
                statement: statement.to_owned(),
                parameters: decoded.into_iter().flatten().collect(),
            });
            state.results.pop_front()
        };
        match next {
            Some(Scripted::Rows(results)) => Ok(results),
            Some(Scripted::Failure(message)) => Err(DriverError::new(message)),
            Some(Scripted::Pending) => std::future::pending().await,
            None => Ok(ResultSet::default()),
        }
    }

    async fn table_names(&mut self) -> Result<Vec<String>, DriverError> {
        self.ensure_open()?;
        Ok(self.state().tables.clone())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.closed = true;
        let mut state = self.state();
        state.closed += 1;
        match &state.fail_close {
            Some(message) => Err(DriverError::new(message.clone())),
            None => Ok(()),
        }
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        if !self.closed {
            self.state().abandoned += 1;
        }
    }
}
