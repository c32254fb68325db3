//! Terminal output shared by the SSO commands

use colored::*;

/// Print the verification URL and user code, as `aws sso login` does
pub fn print_login_instructions(start_url: &str, user_code: &str) {
    println!("Attempting to automatically open the SSO authorization page in your default browser.");
    println!(
        "If the browser does not open or you wish to use a different device to authorize this request, open the following URL:"
    );
    println!();
    println!("{}", device_url(start_url).bright_cyan());
    println!();
    println!("Then enter the code:");
    println!();
    println!("{}", user_code.bright_yellow().bold());
}

/// The portal's device page for a start URL
pub fn device_url(start_url: &str) -> String {
    format!("{}#/device", start_url)
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".bright_green().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".bright_yellow().bold(), message);
}
