//! The query executor: one session per call, released on every path.

use std::sync::OnceLock;

use ledger_ion::Value;
use regex::Regex;
use serde_json::Value as JsonValue;

use crate::config::LedgerConfig;
use crate::driver::{Driver, IonParameter, Session};
use crate::error::{Error, Result};

/// Runs statements against one named ledger.
///
/// Every public operation opens its own session through the driver, does
/// its work and closes the session before returning, whether the work
/// succeeded or not. Nothing is retried. If an operation's future is dropped
/// before it completes, the session is dropped without a close and a
/// warning is logged.
pub struct Ledger<D> {
    driver: D,
    name: String,
    config: LedgerConfig,
}

impl<D: Driver> Ledger<D> {
    pub fn new(driver: D, name: impl Into<String>, config: LedgerConfig) -> Self {
        Self {
            driver,
            name: name.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Executes `statement` and decodes its rows into JSON.
    ///
    /// When the statement has a `?` placeholder, `parameters` is bound
    /// positionally: a list supplies one parameter per element, any other
    /// value is the single parameter. Without a placeholder `parameters` is
    /// ignored.
    ///
    /// Returns `None` when the statement produced no rows, the row itself
    /// for one row and an array for several.
    #[tracing::instrument(skip(self, parameters), fields(ledger = %self.name))]
    pub async fn execute(
        &self,
        statement: &str,
        parameters: impl Into<Value>,
    ) -> Result<Option<JsonValue>> {
        let parameters = parameters.into();
        let mut session = self.open().await?;
        let outcome = run_statement(session.inner.as_mut(), statement, parameters).await;
        self.release(session).await;
        outcome.inspect_err(|e| tracing::error!(error = %e, "statement failed"))
    }

    /// Lists the ledger's table names.
    #[tracing::instrument(skip(self), fields(ledger = %self.name))]
    pub async fn table_names(&self) -> Result<Vec<String>> {
        let mut session = self.open().await?;
        let outcome = session.inner.table_names().await.map_err(Error::from);
        self.release(session).await;
        outcome.inspect_err(|e| tracing::error!(error = %e, "listing tables failed"))
    }

    /// Looks up the id of the document in `table` whose `field` equals `value`.
    ///
    /// When several documents match, the first row's id is returned.
    #[tracing::instrument(skip(self, value), fields(ledger = %self.name))]
    pub async fn document_id(
        &self,
        table: &str,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<String> {
        check_identifier(table)?;
        check_identifier(field)?;
        let statement = format!("SELECT id FROM {table} AS t BY id WHERE t.{field} = ?");
        let not_found = || Error::NotFound {
            table: table.to_owned(),
            field: field.to_owned(),
        };

        let rows = self.execute(&statement, value).await?.ok_or_else(not_found)?;
        let first = match &rows {
            JsonValue::Array(rows) => rows.first(),
            row => Some(row),
        };
        first
            .and_then(|row| row.get("id"))
            .and_then(JsonValue::as_str)
            .map(str::to_owned)
            .ok_or_else(not_found)
    }

    /// Returns every committed revision of a document, each as
    /// `{data, version}`.
    #[tracing::instrument(skip(self, document_id), fields(ledger = %self.name))]
    pub async fn document_history(
        &self,
        table: &str,
        document_id: &str,
    ) -> Result<Option<JsonValue>> {
        check_identifier(table)?;
        let statement = format!(
            "SELECT data, metadata.version AS version FROM history({table}) AS h WHERE h.metadata.id = ?"
        );
        self.execute(&statement, document_id).await
    }

    async fn open(&self) -> Result<OpenSession> {
        let inner = self
            .driver
            .open_session(&self.name, &self.config)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to open session"))?;
        tracing::debug!("session opened");
        Ok(OpenSession {
            inner,
            released: false,
        })
    }

    /// Closes the session. A close failure is logged, never returned, so it
    /// cannot mask the outcome of the operation.
    async fn release(&self, mut session: OpenSession) {
        let closed = session.inner.close().await;
        session.released = true;
        match closed {
            Ok(()) => tracing::debug!("session closed"),
            Err(e) => tracing::warn!(error = %e, "failed to close session"),
        }
    }
}

/// A session owned by one operation. Dropping it unreleased means the
/// operation was cancelled mid-flight.
struct OpenSession {
    inner: Box<dyn Session>,
    released: bool,
}

impl Drop for OpenSession {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!("operation cancelled, session dropped without close");
        }
    }
}

async fn run_statement(
    session: &mut dyn Session,
    statement: &str,
    parameters: Value,
) -> Result<Option<JsonValue>> {
    let bound = if statement.contains('?') {
        normalize_parameters(parameters)
            .iter()
            .map(IonParameter::from_value)
            .collect::<std::result::Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };
    tracing::debug!(parameters = bound.len(), "executing statement");
    let results = session.execute_statement(statement, bound).await?;
    tracing::debug!(rows = results.len(), "statement executed");
    Ok(results.into_json()?)
}

/// Spreads a list into positional parameters; any other value is the only one.
pub fn normalize_parameters(parameters: Value) -> Vec<Value> {
    match parameters {
        Value::List(items) => items,
        single => vec![single],
    }
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid"))
}

fn check_identifier(name: &str) -> Result<()> {
    if identifier_regex().is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(name.to_owned()))
    }
}
