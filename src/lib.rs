//! Scripts for moving assets between a Stacks chain and a subnet: build, sign and broadcast
//! contract calls, and run read-only queries against either layer.

pub mod address;
pub mod cli;
pub mod client;
pub mod commands;
pub mod decoder;
pub mod defaults;
pub mod encoding;
pub mod error;
pub mod key;
pub mod process;
pub mod signing;
pub mod transaction;
pub mod types;
pub mod util;

pub use error::{Error, ErrorKind, Result};
