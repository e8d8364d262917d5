//! Config subcommand handlers.

use dialoguer::{Input, Select};

use noip_config::{Config, save_config_to};
use noip_core::{Credentials, HostnameSet, MonitorConfig, NoIpClient};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util::{self, prompt_err};

// ── Helpers ─────────────────────────────────────────────────────────

/// Prompt for username and password, validating neither is empty.
fn prompt_credentials(default_user: Option<&str>) -> Result<(String, String), CliError> {
    let mut input = Input::<String>::new().with_prompt("Username or email");
    if let Some(user) = default_user {
        input = input.default(user.to_owned());
    }
    let user = input.interact_text().map_err(prompt_err)?;

    let pass = rpassword::prompt_password("Password or DDNS key: ").map_err(prompt_err)?;

    if user.trim().is_empty() || pass.is_empty() {
        return Err(CliError::Validation {
            field: "credentials".into(),
            reason: "username and password cannot be empty".into(),
        });
    }

    Ok((user.trim().to_owned(), pass))
}

/// Offer to store the password in the system keyring or return it for
/// plaintext config.
///
/// Returns `Some(password)` if the user chose plaintext, `None` if stored in
/// keyring.
fn prompt_password_storage(username: &str, password: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        noip_config::store_password(username, password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password.to_owned()))
    }
}

/// Ask No-IP whether the credentials work, before anything is saved.
async fn check_credentials(monitor: &MonitorConfig, quiet: bool) -> Result<(), CliError> {
    let client = NoIpClient::new(monitor.credentials.clone(), monitor.transport());
    let spinner = util::spinner("Validating credentials...", quiet);
    let valid = client.validate_credentials().await;
    spinner.finish_and_clear();
    client.shutdown().await;

    if valid {
        Ok(())
    } else {
        Err(CliError::AuthFailed {
            username: monitor.credentials.username.clone(),
        })
    }
}

fn describe_hostnames(hostnames: &HostnameSet) -> String {
    if hostnames.is_empty() {
        "none (hosts will be listed from the account, if possible)".into()
    } else {
        hostnames.to_string()
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_file(global);

    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            // The file alone: env and flag overrides must not be saved.
            let existing = noip_config::load_file_from(&path).unwrap_or_default();
            eprintln!("No-IP monitor configuration");
            eprintln!("   Config path: {}\n", path.display());

            // 1. Credentials, checked against No-IP before saving
            let (username, password) = prompt_credentials(existing.username.as_deref())?;
            let mut cfg = Config {
                username: Some(username.clone()),
                password: Some(password.clone()),
                password_env: None,
                ..existing
            };
            let mut monitor = noip_config::to_monitor_config(&cfg)?;
            monitor.credentials = Credentials::new(&username, &password);
            check_credentials(&monitor, global.quiet).await?;
            eprintln!("   ✓ Credentials accepted");

            // 2. Password storage
            cfg.password = prompt_password_storage(&username, &password)?;

            // 3. Hostnames (optional)
            let hostnames: String = Input::new()
                .with_prompt("Hostnames to monitor (comma-separated, optional)")
                .default(cfg.hostnames.as_slice().join(","))
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            cfg.hostnames = HostnameSet::parse(&hostnames);

            // 4. Write config
            save_config_to(&cfg, &path)?;

            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Hostnames: {}", describe_hostnames(&cfg.hostnames));
            eprintln!("\n  Test it: noip-monitor check");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?.redacted();
            let format = config::output_format(global, &cfg);
            let out = output::render_single(format, &cfg, |c| {
                toml::to_string_pretty(c).unwrap_or_else(|e| format!("# unrenderable: {e}"))
            })?;
            if !global.quiet {
                eprintln!("# {}", path.display());
            }
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword => {
            let cfg = config::load(global)?;
            let username = match noip_config::resolve_username(&cfg) {
                Ok(user) => user,
                Err(_) => Input::<String>::new()
                    .with_prompt("Username or email")
                    .interact_text()
                    .map_err(prompt_err)?,
            };

            let password =
                rpassword::prompt_password("Password or DDNS key: ").map_err(prompt_err)?;
            if password.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            noip_config::store_password(&username, &password)?;
            eprintln!("✓ Password stored in system keyring for '{username}'");
            Ok(())
        }

        // ── SetHostnames ────────────────────────────────────────────
        ConfigCommand::SetHostnames { hostnames } => {
            let mut cfg = noip_config::load_file_from(&path)?;
            cfg.hostnames = HostnameSet::parse(&hostnames);
            save_config_to(&cfg, &path)?;

            if !global.quiet {
                eprintln!("✓ Hostnames: {}", describe_hostnames(&cfg.hostnames));
            }
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
