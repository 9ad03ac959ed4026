//! release-mailer - Release vote, result and announcement emails over SMTP.

use std::io;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{error, info};

use release_mailer::cli::{Cli, Command, LogFormat};
use release_mailer::commands::{ReleaseEmail, TEMPLATE_NAMES, check_templates, run_command};
use release_mailer::config::Config;
use release_mailer::{
    ReleaseMailError, SessionParams, SmtpMailer, TemplateEngine, TerminalPrompter,
};

/// Initialize the tracing subscriber with the specified log format.
///
/// Logs go to stderr; stdout carries the preview and prompts. The default
/// level is `warn` so an interactive run stays readable; `RUST_LOG`
/// overrides it.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    match format {
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .with_env_filter(filter)
                .init();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    let config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    // Fail fast on a broken deployment before asking the operator anything.
    if let Err(errors) = config.validate() {
        for e in &errors {
            error!(error = %e, "Configuration validation error");
            eprintln!("{}", e);
        }
        std::process::exit(1);
    }

    let templates_dir = cli
        .templates_dir
        .clone()
        .unwrap_or_else(|| config.templates_dir().to_path_buf());
    let engine = TemplateEngine::new(templates_dir);

    if cli.validate {
        return validate(&config, &engine);
    }

    let Some(command) = cli.command.clone() else {
        Cli::command()
            .error(
                ErrorKind::MissingSubcommand,
                "a subcommand is required: vote_pmc, result_pmc or announce",
            )
            .exit();
    };

    match run(&cli, command, &config, &engine) {
        Ok(()) => Ok(()),
        Err(e) => {
            match &e {
                ReleaseMailError::Aborted => info!("Aborted by operator"),
                other => error!(error = %other, "Release email not sent"),
            }
            eprintln!("{}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Collect parameters, then render, confirm and send one email.
fn run(
    cli: &Cli,
    command: Command,
    config: &Config,
    engine: &TemplateEngine,
) -> Result<(), ReleaseMailError> {
    let mut prompter = TerminalPrompter::new();

    let mut session = SessionParams::collect(cli.session_input(), &config.project, &mut prompter)?;
    let email = ReleaseEmail::from_command(command, config.default_receiver(), &mut prompter)?;

    let transport = SmtpMailer::new(&config.smtp, &session.username, session.password.clone());
    let mut stdout = io::stdout();

    run_command(
        &mut session,
        &email,
        engine,
        &mut prompter,
        &mut stdout,
        &transport,
    )
}

/// `--validate`: check configuration and templates without prompting or sending.
fn validate(config: &Config, engine: &TemplateEngine) -> Result<()> {
    info!(templates_dir = %engine.dir().display(), "Validating templates");

    if let Err(errors) = check_templates(engine, &config.project, config.default_receiver()) {
        for e in &errors {
            error!(error = %e, "Template validation error");
            eprintln!("{}", e);
        }
        error!(error_count = errors.len(), "Template validation failed");
        std::process::exit(1);
    }

    println!("Configuration is valid");
    println!("  SMTP relay: {}:{}", config.smtp.host, config.smtp.port);
    println!("  Project: {} ({})", config.project.name, config.project.module);
    println!("  Default receiver: {}", config.default_receiver());
    println!(
        "  Templates: {} in {}",
        TEMPLATE_NAMES.join(", "),
        engine.dir().display()
    );
    Ok(())
}
