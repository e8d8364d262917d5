//! Credential validation.

use serde::Serialize;

use noip_core::NoIpClient;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct Validation<'a> {
    username: &'a str,
    valid: bool,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let monitor = config::monitor_config(global, &cfg)?;
    let format = config::output_format(global, &cfg);

    let client = NoIpClient::new(monitor.credentials.clone(), monitor.transport());
    let spinner = util::spinner("Validating credentials...", global.quiet);
    let valid = client.validate_credentials().await;
    spinner.finish_and_clear();
    client.shutdown().await;

    let username = monitor.credentials.username.as_str();
    if !valid {
        return Err(CliError::AuthFailed {
            username: username.to_owned(),
        });
    }

    let out = output::render_single(format, &Validation { username, valid }, |v| {
        format!("Credentials accepted for {}", v.username)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
