mod api;
mod calendar;
mod cli;
mod commands;
mod config;
mod handshake;
mod models;
mod notice;
mod output;
mod platform;
mod scheduling;
mod viewer;

use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone, Utc};
use clap::Parser;

use api::ApiClient;
use cli::args::{CalendarAction, Cli, Commands};
use cli::context::RunContext;
use config::{AppConfig, FlagOverrides, Settings};
use output::format::OutputMode;
use scheduling::ScheduleForm;

fn main() -> Result<()> {
    setup_broken_pipe_handling();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.utc {
        run(&cli, RunContext::from_args(cli.json, cli.no_color, Utc))
    } else {
        run(&cli, RunContext::from_args(cli.json, cli.no_color, Local))
    }
}

fn run<Tz: TimeZone>(cli: &Cli, ctx: RunContext<Tz>) -> Result<()> {
    let config = AppConfig::load()?;
    let settings = Settings::resolve(
        &FlagOverrides {
            api_url: cli.api_url.as_deref(),
            token: cli.token.as_deref(),
        },
        &config,
    )?;
    let client = ApiClient::new(&settings.api_url, settings.token.clone())?;

    match &cli.command {
        Commands::Week { date, offset } => {
            commands::agenda::week(&client, date.as_deref(), *offset, &ctx)?;
        }

        Commands::Month { month, offset } => {
            commands::agenda::month(&client, *month, *offset, &ctx)?;
        }

        Commands::Show { id, scope } => {
            commands::detail::show(&client, id, *scope, &ctx)?;
        }

        Commands::Desk => {
            if ctx.output_mode == OutputMode::Json {
                bail!("The desk is interactive and has no JSON output");
            }
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            commands::desk::Desk::new(&client, Box::new(|| ctx.today()), ctx.tz.clone())
                .run(stdin.lock(), &mut stdout)
                .context("Desk session failed")?;
        }

        Commands::Schedule {
            name,
            email,
            job,
            date,
            time,
            duration,
            interview_type,
            notes,
        } => {
            let form = ScheduleForm {
                candidate_name: name.clone(),
                candidate_email: email.clone(),
                job_id: job.clone(),
                date: date.clone(),
                time: time.clone(),
                duration: *duration,
                interview_type: Some(*interview_type),
                notes: notes.clone(),
            };
            commands::schedule::schedule(&client, &form, &ctx)?;
        }

        Commands::Cancel { id } => {
            commands::schedule::cancel(&client, id, &ctx)?;
        }

        Commands::Feedback { id, rating, text } => {
            commands::schedule::feedback(&client, id, *rating, text, &ctx)?;
        }

        Commands::Jobs => {
            commands::jobs::list(&client, ctx.output_mode)?;
        }

        Commands::Calendar { action } => match action {
            CalendarAction::Status => {
                commands::calendar::status(&client, &ctx)?;
            }
            CalendarAction::Connect {
                timeout,
                no_browser,
            } => {
                commands::calendar::connect(&client, &settings, *timeout, *no_browser, &ctx)?;
            }
        },
    }

    Ok(())
}

/// Initialize logging based on the `--verbose` flag or `HIRECAL_LOG` env var.
///
/// - `HIRECAL_LOG` env var: full filter control (e.g. `HIRECAL_LOG=hirecal::handshake=trace`)
/// - `--verbose`: sets `hirecal` crate to `Debug` level
/// - Otherwise: `Warn` level only (effectively silent)
fn init_logging(verbose: bool) {
    let env_var = std::env::var("HIRECAL_LOG").ok();

    let mut builder = env_logger::Builder::new();
    builder.format_target(true);
    builder.format_module_path(false);

    if let Some(ref filter) = env_var {
        builder.parse_filters(filter);
    } else if verbose {
        builder.filter_module("hirecal", log::LevelFilter::Debug);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }

    builder.init();
}

/// Handle broken pipe gracefully instead of panicking.
///
/// When output is piped to a process that exits early (e.g., `hirecal week --json | head -1`),
/// Rust's `println!` panics because the runtime sets SIGPIPE to SIG_IGN. This function:
/// - On Unix: resets SIGPIPE to default behavior so the OS terminates the process cleanly
/// - On all platforms: installs a panic hook that exits silently on stdout pipe failures,
///   as a fallback (and the primary handler on Windows where there's no SIGPIPE)
fn setup_broken_pipe_handling() {
    #[cfg(unix)]
    unsafe {
        // SIGPIPE = 13, SIG_DFL = 0 (POSIX constants, stable across all Unix platforms)
        unsafe extern "C" {
            fn signal(sig: i32, handler: usize) -> usize;
        }
        signal(13, 0);
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info
            .payload()
            .downcast_ref::<String>()
            .map(|s| s.as_str())
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("");

        if msg.contains("failed printing to stdout") {
            std::process::exit(0);
        }

        default_hook(info);
    }));
}
