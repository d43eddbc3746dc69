//! Command Handlers module
//!
//! Handlers orchestrate business operations over the storage, gate, and
//! notification seams. Each one takes a command and drives it to completion.

mod commands;
mod transfer_handler;
mod user_handler;


pub use commands::*;
pub use transfer_handler::{TransferError, TransferHandler};
pub use user_handler::{UserError, UserHandler};
