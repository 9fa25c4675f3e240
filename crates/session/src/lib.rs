//! Statement execution against a ledger.
//!
//! [`Ledger`] opens a session through a [`Driver`] for every call, binds
//! parameters as Ion, decodes the rows into JSON and always closes the
//! session before returning.
//!
//! ```no_run
//! use ledger_ion_session::{Ledger, LedgerConfig};
//! use ledger_ion_session::testutil::MockDriver;
//!
//! # async fn run() -> ledger_ion_session::Result<()> {
//! let ledger = Ledger::new(MockDriver::new(), "vehicles", LedgerConfig::from_env());
//! let rows = ledger
//!     .execute("SELECT * FROM Vehicle WHERE VIN = ?", "1N4AL11D75C109151")
//!     .await?;
//! println!("{rows:?}");
//! # Ok(())
//! # }
//! ```

mod config;
mod driver;
mod error;
mod ledger;
mod result;

pub mod testutil;

pub use config::{LedgerConfig, REGION_VAR, SECRET_ACCESS_KEY_VAR};
pub use driver::{Driver, IonParameter, Session};
pub use error::{DriverError, Error, Result};
pub use ledger::{normalize_parameters, Ledger};
pub use result::ResultSet;
