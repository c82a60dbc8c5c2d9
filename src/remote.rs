//! Repository naming and remote URLs.
//!
//! Repositories are addressed as `{base_url}/{user}/{base_repo_name}-{index}.git`.
//! When a token is configured it is embedded in the URL as
//! `{token}:x-oauth-basic@`, which GitHub-style hosts accept for HTTPS pushes.

use url::Url;

use crate::error::{Error, Result};

/// Password half of the basic-auth pair used with token authentication.
const TOKEN_PASSWORD: &str = "x-oauth-basic";

/// Name of the repository at `index`.
pub fn repo_name(base_repo_name: &str, index: u32) -> String {
    format!("{}-{}", base_repo_name, index)
}

/// Clone URL for `repo` owned by `user`, with `token` embedded when present.
///
/// URLs whose scheme cannot carry credentials (such as `file://`) are only
/// accepted without a token.
pub fn clone_url(base_url: &str, user: &str, token: Option<&str>, repo: &str) -> Result<String> {
    let mut base = Url::parse(base_url)?;

    if let Some(token) = token {
        let rejected = |_: ()| Error::Credentials {
            url: redact(base_url),
            message: "this URL cannot carry a username and password".to_string(),
        };
        base.set_username(token).map_err(rejected)?;
        base.set_password(Some(TOKEN_PASSWORD)).map_err(rejected)?;
    }

    Ok(format!(
        "{}/{}/{}.git",
        base.as_str().trim_end_matches('/'),
        user,
        repo
    ))
}

/// Replace any credentials in `url` with `***`.
///
/// Strings that do not parse as URLs are returned unchanged.
pub fn redact(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) if !parsed.username().is_empty() || parsed.password().is_some() => {
            let _ = parsed.set_password(None);
            let _ = parsed.set_username("***");
            parsed.to_string()
        }
        _ => url.to_string(),
    }
}

/// Redact every credential-bearing URL that appears in free text, such as
/// git's stderr.
pub fn redact_text(text: &str) -> String {
    let mut redacted = text.to_string();
    for word in text.split(|c: char| c.is_whitespace() || c == '\'' || c == '"') {
        if word.contains("://") && word.contains('@') {
            let shown = redact(word);
            if shown != word {
                redacted = redacted.replace(word, &shown);
            }
        }
    }
    redacted
}
