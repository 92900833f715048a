// Copyright (c) 2024 Mike Tsao

use crate::error::ScpError;

/// Splits an SCP line into tokens. Whitespace separates tokens except inside
/// double quotes; quotes are stripped, and a quoted empty string still yields
/// an (empty) token. Quoted and bare runs that touch join into one token.
pub fn tokenize(line: &str) -> Result<Vec<String>, ScpError> {
    let mut tokens = Vec::default();
    let mut current = String::default();
    let mut in_token = false;
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                in_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if in_quotes {
        return Err(ScpError::UnterminatedQuote(line.to_string()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
