//! Admin account command handler

use anyhow::Context;
use std::io::{BufRead, Write};

use crate::config::Config;
use crate::db::Store;

fn prompt(input: &mut impl BufRead, label: &str) -> anyhow::Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {label}"))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Ask for anything not given on the command line. The password is read through
/// `read_secret` twice.
fn collect_credentials(
    input: &mut impl BufRead,
    mut read_secret: impl FnMut(&str) -> std::io::Result<String>,
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<(String, String)> {
    let username = match username {
        Some(username) => username,
        None => prompt(input, "Username")?,
    };

    let password = match password {
        Some(password) => password,
        None => {
            let first = read_secret("Password: ").context("Failed to read password")?;
            let second =
                read_secret("Repeat for confirmation: ").context("Failed to read password")?;
            if first != second {
                anyhow::bail!("The two entered values do not match");
            }
            first
        }
    };

    if username.trim().is_empty() {
        anyhow::bail!("Username cannot be empty");
    }
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    Ok((username, password))
}

pub async fn cmd_admin(
    config: &Config,
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let (username, password) = {
        let stdin = std::io::stdin();
        collect_credentials(
            &mut stdin.lock(),
            |label| rpassword::prompt_password(label),
            username,
            password,
        )?
    };

    let store = Store::new(&config.general.database_path).await?;

    if store.first_user().await?.is_some() {
        println!("Updating user...");
    } else {
        println!("Creating user...");
    }

    store
        .upsert_admin(&username, &password, &config.security)
        .await?;

    println!("Done.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out canned secrets in order, recording the prompts it was shown.
    fn secrets<'a>(
        values: &'a [&'a str],
        prompts: &'a mut Vec<String>,
    ) -> impl FnMut(&str) -> std::io::Result<String> + 'a {
        let mut values = values.iter();
        move |label| {
            prompts.push(label.to_string());
            values
                .next()
                .map(|v| v.to_string())
                .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::UnexpectedEof))
        }
    }

    #[test]
    fn flags_skip_prompts() {
        let mut input = Cursor::new("");
        let mut prompts = Vec::new();
        let creds = collect_credentials(
            &mut input,
            secrets(&[], &mut prompts),
            Some("admin".into()),
            Some("pw".into()),
        )
        .unwrap();
        assert_eq!(creds, ("admin".to_string(), "pw".to_string()));
        assert!(prompts.is_empty());
    }

    #[test]
    fn password_is_read_as_secret_with_confirmation() {
        let mut input = Cursor::new("admin\n");
        let mut prompts = Vec::new();
        let creds = collect_credentials(
            &mut input,
            secrets(&["hunter2", "hunter2"], &mut prompts),
            None,
            None,
        )
        .unwrap();
        assert_eq!(creds, ("admin".to_string(), "hunter2".to_string()));
        assert_eq!(prompts, ["Password: ", "Repeat for confirmation: "]);
    }

    #[test]
    fn password_never_comes_from_plain_input() {
        // A password typed into the echoed stream must not be picked up
        let mut input = Cursor::new("admin\nleaked\nleaked\n");
        let mut prompts = Vec::new();
        let creds = collect_credentials(
            &mut input,
            secrets(&["hidden", "hidden"], &mut prompts),
            None,
            None,
        )
        .unwrap();
        assert_eq!(creds.1, "hidden");
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let mut input = Cursor::new("");
        let mut prompts = Vec::new();
        assert!(
            collect_credentials(
                &mut input,
                secrets(&["hunter2", "hunter3"], &mut prompts),
                Some("admin".into()),
                None,
            )
            .is_err()
        );
    }

    #[test]
    fn empty_values_are_rejected() {
        let mut prompts = Vec::new();
        let mut input = Cursor::new("\n");
        assert!(
            collect_credentials(
                &mut input,
                secrets(&[], &mut prompts),
                None,
                Some("pw".into())
            )
            .is_err()
        );

        let mut input = Cursor::new("");
        assert!(
            collect_credentials(
                &mut input,
                secrets(&["", ""], &mut prompts),
                Some("admin".into()),
                None
            )
            .is_err()
        );
    }
}
