//! Interactive prompts for CLI handlers

use std::io::{self, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use crate::error::{RestoError, Result};

/// Read one trimmed line after printing `label`
pub fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Read a line without echoing it (passwords)
///
/// Falls back to a plain read when stdin is not a terminal.
pub fn prompt_secret(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    if terminal::enable_raw_mode().is_err() {
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        return Ok(input.trim_end_matches(['\r', '\n']).to_string());
    }

    let result = read_hidden_line();
    let _ = terminal::disable_raw_mode();
    println!();
    result
}

fn read_hidden_line() -> Result<String> {
    let mut line = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(line),
            KeyCode::Esc => return Err(RestoError::Cancelled),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(RestoError::Cancelled)
            }
            KeyCode::Backspace => {
                line.pop();
            }
            KeyCode::Char(c) => line.push(c),
            _ => {}
        }
    }
}

/// Ask a yes/no question; anything but `y` is a no
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}

/// Confirm a destructive action unless `yes` was passed
pub fn confirm_or_cancel(question: &str, yes: bool) -> Result<()> {
    if yes || confirm(question)? {
        Ok(())
    } else {
        Err(RestoError::Cancelled)
    }
}
