//! Interactive entry of the authorization code.

use std::io::{BufRead, Write};

use crate::error::BootstrapError;

pub const CODE_PROMPT: &str = "Enter the code here: ";

/// Ask for the code and block until a line arrives. There is no timeout.
pub fn ask_for_code<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
) -> Result<String, BootstrapError> {
    write!(output, "{}", CODE_PROMPT).map_err(BootstrapError::Terminal)?;
    output.flush().map_err(BootstrapError::Terminal)?;

    let mut line = String::new();
    let read = input.read_line(&mut line).map_err(BootstrapError::Terminal)?;
    if read == 0 {
        return Err(BootstrapError::MissingAuthorizationCode);
    }
    extract_code(&line)
}

/// Accept either the bare code or the whole redirected URL (or its query).
pub fn extract_code(pasted: &str) -> Result<String, BootstrapError> {
    let pasted = pasted.trim();
    if pasted.is_empty() {
        return Err(BootstrapError::MissingAuthorizationCode);
    }

    let query = match pasted.split_once('?') {
        Some((_, query)) => query,
        None if pasted.starts_with("code=") || pasted.contains("&code=") => pasted,
        None => return Ok(pasted.to_string()),
    };
    code_from_query(query)
}

/// Pull `code` (or the provider's `error`) out of a redirect query string.
pub fn code_from_query(query: &str) -> Result<String, BootstrapError> {
    let query = query.split('#').next().unwrap_or_default();
    let mut code = None;
    let mut error = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }
    if let Some(error) = error {
        return Err(BootstrapError::AuthorizationDenied(error));
    }
    code.filter(|c| !c.is_empty())
        .ok_or(BootstrapError::MissingAuthorizationCode)
}
