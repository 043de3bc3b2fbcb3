mod cli;
mod commands;
mod config;
mod error;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use envsec_core::{values, Key};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Command;
use crate::error::CliError;

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    Ok(match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("envsec: {err}");
            ExitCode::from(err.exit_code())
        }
    })
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn run(command: Command) -> Result<(), CliError> {
    let config = config::load()?;
    let key_var = config.key_var();

    match command {
        Command::GenKey => println!("{}", Key::generate().encode()),
        Command::Encrypt { input, output, key } => {
            let key = commands::resolve_key(key.as_deref(), key_var)?;
            commands::encrypt_file(&input, &output, &key)?;
            println!("Encrypted {} -> {}", input.display(), output.display());
        }
        Command::Decrypt { input, output, key } => {
            let key = commands::resolve_key(key.as_deref(), key_var)?;
            let plaintext = commands::decrypt_file(&input, output.as_deref(), &key)?;
            match output {
                Some(path) => println!("Decrypted {} -> {}", input.display(), path.display()),
                None => std::io::stdout().write_all(&plaintext)?,
            }
        }
        Command::EncryptValue { value, key } => {
            let key = commands::resolve_key(key.as_deref(), key_var)?;
            println!("{}", values::encrypt_value(&value, &key)?);
        }
        Command::DecryptValue { value, key } => {
            let key = commands::resolve_key(key.as_deref(), key_var)?;
            println!("{}", values::decrypt_value(&value, &key)?);
        }
    }

    Ok(())
}
