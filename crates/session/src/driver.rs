//! The ledger driver seam: sessions and statement execution.

use async_trait::async_trait;
use ledger_ion::{encode, Value, WriteError};

use crate::config::LedgerConfig;
use crate::error::DriverError;
use crate::result::ResultSet;

/// One statement parameter, already encoded as an Ion binary stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IonParameter(Vec<u8>);

impl IonParameter {
    /// Encodes `value` into a parameter.
    pub fn from_value(value: &Value) -> Result<Self, WriteError> {
        encode(value).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Opens sessions against a named ledger.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn open_session(
        &self,
        ledger: &str,
        config: &LedgerConfig,
    ) -> Result<Box<dyn Session>, DriverError>;
}

/// A live session. Owned by exactly one executor call and closed before that
/// call returns.
///
/// When the call is cancelled (its future dropped while a statement is in
/// flight) the session is dropped without `close`, so implementations must
/// give back whatever they hold on drop.
#[async_trait]
pub trait Session: Send {
    /// Runs one statement with positional `?` parameters.
    async fn execute_statement(
        &mut self,
        statement: &str,
        parameters: Vec<IonParameter>,
    ) -> Result<ResultSet, DriverError>;

    /// Names of the ledger's active tables.
    async fn table_names(&mut self) -> Result<Vec<String>, DriverError>;

    async fn close(&mut self) -> Result<(), DriverError>;
}
