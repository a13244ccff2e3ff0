pub mod apply_command;
pub mod balances_command;

pub use self::{apply_command::*, balances_command::*};
