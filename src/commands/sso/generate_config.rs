use super::SsoContext;
use super::interrupt::{Interrupt, interruptible};
use super::login::login_and_cache;
use crate::provision::{MergeResult, ProfileProvisioner, write_profiles};
use crate::ui::{Prompter, TerminalPrompter, print_success};
use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;

/// Answers supplied on the command line instead of at the prompt
#[derive(Debug, Clone, Default)]
pub struct GenerateConfigOptions {
    pub accounts: Option<String>,
    pub roles: Option<String>,
}

/// Answers the account question with `--accounts` and every role question with
/// `--roles`, asking on the terminal for whichever flag is missing
pub struct SelectionPrompter {
    options: GenerateConfigOptions,
    accounts_answered: bool,
    terminal: TerminalPrompter,
}

impl SelectionPrompter {
    pub fn new(options: GenerateConfigOptions) -> Self {
        Self {
            options,
            accounts_answered: false,
            terminal: TerminalPrompter,
        }
    }
}

impl Prompter for SelectionPrompter {
    fn prompt(&mut self, question: &str) -> Result<String> {
        let preset = if self.accounts_answered {
            self.options.roles.clone()
        } else {
            self.accounts_answered = true;
            self.options.accounts.clone()
        };

        if let Some(answer) = preset {
            println!("{}: {}", question, answer);
            return Ok(answer);
        }

        if !std::io::stdin().is_terminal() {
            anyhow::bail!("No terminal to ask '{}'; pass --accounts and --roles", question);
        }
        self.terminal.prompt(question)
    }
}

/// Log in, then add a profile for every selected account and role to `~/.aws/config`
pub async fn generate_config_command(
    ctx: &SsoContext,
    options: GenerateConfigOptions,
) -> Result<MergeResult> {
    let mut prompter = SelectionPrompter::new(options);
    generate_config_with(ctx, &mut prompter).await
}

pub async fn generate_config_with(
    ctx: &SsoContext,
    prompter: &mut dyn Prompter,
) -> Result<MergeResult> {
    let interrupt = Interrupt::watch();
    let entry = login_and_cache(ctx, interrupt.token()).await?;

    let mut provisioner =
        ProfileProvisioner::new(&ctx.directory, prompter, &ctx.start_url, &ctx.region);
    let profiles = interruptible(
        interrupt.token(),
        provisioner.select_profiles(&entry.access_token),
    )
    .await?;

    println!("\nFound {} role configurations to add", profiles.len());

    let merged = write_profiles(&ctx.aws_config_file, &profiles).context("write AWS config")?;
    for name in &merged.skipped {
        println!("  Profile '{}' already exists, skipped", name);
    }
    info!("Profiles added: {:?}", merged.added);

    print_success(&format!(
        "Successfully updated AWS config file at {}",
        ctx.aws_config_file.display()
    ));
    Ok(merged)
}
