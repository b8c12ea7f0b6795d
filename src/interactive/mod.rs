//
//  crm-client
//  interactive/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Interactive terminal prompts.
//!
//! Prompts are only shown when stdin is a terminal; commands offer a
//! `--yes` flag and a global `--no-prompt` for scripted use.

use anyhow::Result;
use console::Term;
use dialoguer::{Confirm, Input};

/// Returns `true` when prompting is possible on this terminal.
pub fn can_prompt() -> bool {
    Term::stdout().is_term() && Term::stderr().is_term()
}

/// Asks a yes/no question, returning `default` on a bare Enter.
pub fn prompt_confirm_with_default(message: &str, default: bool) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(message)
        .default(default)
        .interact()?;
    Ok(confirmed)
}

/// Asks for a non-empty line of text.
pub fn prompt_input(message: &str) -> Result<String> {
    let input: String = Input::new().with_prompt(message).interact_text()?;
    Ok(input)
}
