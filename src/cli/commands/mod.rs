pub mod sso;

pub use sso::{SsoCommands, sso_command};
