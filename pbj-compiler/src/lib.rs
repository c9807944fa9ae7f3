//! Library half of the `pbjc` binary, split out so the driver can be
//! exercised from integration tests without shelling out to the CLI.

pub mod driver;
pub mod error;
