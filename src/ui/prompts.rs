use anyhow::{Context, Result};
use dialoguer::{Input, Select};
use std::collections::VecDeque;

/// Source of answers for interactive questions
pub trait Prompter {
    fn prompt(&mut self, question: &str) -> Result<String>;
}

/// Reads answers from the terminal
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, question: &str) -> Result<String> {
        let answer = Input::<String>::new()
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read selection from terminal")?;
        Ok(answer)
    }
}

/// Answers given up front, e.g. from command-line flags or a test script
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    fallback: Option<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            fallback: None,
        }
    }

    /// Give `answer` once the scripted answers run out
    pub fn with_fallback(mut self, answer: impl Into<String>) -> Self {
        self.fallback = Some(answer.into());
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn prompt(&mut self, question: &str) -> Result<String> {
        match self.answers.pop_front().or_else(|| self.fallback.clone()) {
            Some(answer) => {
                println!("{}: {}", question, answer);
                Ok(answer)
            }
            None => anyhow::bail!("No answer available for '{}'", question),
        }
    }
}

/// Interactive confirmation prompt using arrow-key navigable selection
///
/// # Arguments
/// * `prompt` - The question to ask the user
/// * `default_yes` - Whether "Yes" should be the default selection (index 0)
pub fn prompt_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let items = vec!["Yes", "No"];
    let default_index = if default_yes { 0 } else { 1 };

    let selection = Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(default_index)
        .interact()?;

    Ok(selection == 0)
}
