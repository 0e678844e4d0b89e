use anyhow::{Context, Result};

use crate::api::InterviewService;
use crate::output::format::OutputMode;

pub fn list<S: InterviewService + ?Sized>(service: &S, mode: OutputMode) -> Result<()> {
    let jobs = service.list_open_jobs().context("Failed to load open jobs")?;

    match mode {
        OutputMode::Json => {
            println!("{}", crate::output::json::to_json(&jobs));
        }
        OutputMode::Tty => {
            if jobs.is_empty() {
                println!("No open jobs found.");
                return Ok(());
            }
            for job in &jobs {
                println!("{}", crate::output::table::format_job_row(job));
            }
        }
    }

    Ok(())
}
