pub mod display;
pub mod prompts;

pub use display::{print_success, print_warning};
pub use prompts::{Prompter, ScriptedPrompter, TerminalPrompter, prompt_confirmation};
