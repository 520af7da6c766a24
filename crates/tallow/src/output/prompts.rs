//! User prompts and input

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};

fn io_err(err: dialoguer::Error) -> io::Error {
    match err {
        dialoguer::Error::IO(e) => e,
    }
}

/// Prompt for yes/no confirmation, defaulting to no.
pub fn confirm(message: &str) -> io::Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(io_err)
}

/// Prompt for a room code or other short line of text.
pub fn text_prompt(message: &str) -> io::Result<String> {
    Input::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .interact_text()
        .map_err(io_err)
}

/// Prompt for a room password, with input hidden from the terminal.
pub fn password_prompt(message: &str) -> io::Result<String> {
    Password::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .allow_empty_password(true)
        .interact()
        .map_err(io_err)
}

/// Select one option from a list, returning its index.
pub fn select<T: ToString>(message: &str, options: &[T]) -> io::Result<usize> {
    let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .items(&items)
        .default(0)
        .interact()
        .map_err(io_err)
}
