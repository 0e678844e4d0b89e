use clap::{Parser, Subcommand};

use crate::calendar::cursor::ViewMode;
use crate::models::{InterviewType, YearMonth};

fn parse_year_month(s: &str) -> Result<YearMonth, String> {
    s.parse()
}

#[derive(Parser, Debug)]
#[command(name = "hirecal", version = env!("HIRECAL_VERSION"), about = "Browse and schedule candidate interviews")]
pub struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output (uses human-readable format without ANSI codes)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Bucket and display times in UTC instead of local time
    #[arg(long, global = true)]
    pub utc: bool,

    /// Base URL of the interview service (overrides HIRECAL_API_URL and config.toml)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// API token (overrides HIRECAL_TOKEN and config.toml)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Enable verbose output for debugging API calls and the calendar handshake
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show one week of interviews, Monday to Sunday
    #[command(visible_alias = "w")]
    Week {
        /// Any date in the week to show [e.g., 2026-02-18] (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Weeks to move from that date (negative goes back)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },

    /// Show one month of interviews as a calendar grid
    #[command(visible_alias = "m")]
    Month {
        /// Month to show [e.g., 2026-02] (default: this month)
        #[arg(long, value_parser = parse_year_month)]
        month: Option<YearMonth>,

        /// Months to move from that month (negative goes back)
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i32,
    },

    /// Show interview details
    Show {
        /// Interview ID
        id: String,

        /// Which view's interviews to step through from here
        #[arg(long, value_enum, default_value = "week")]
        scope: ViewMode,
    },

    /// Interactive calendar session (reads commands from stdin)
    Desk,

    /// Schedule a new interview
    Schedule {
        /// Candidate full name
        #[arg(long)]
        name: String,

        /// Candidate email address
        #[arg(long)]
        email: String,

        /// Job ID (see `hirecal jobs`)
        #[arg(long)]
        job: String,

        /// Interview date [e.g., 2026-02-20]
        #[arg(long)]
        date: String,

        /// Start time, 24-hour [e.g., 14:30]
        #[arg(long)]
        time: String,

        /// Length in minutes: 15, 30, 45, 60, 90 or 120
        #[arg(long, default_value_t = 60)]
        duration: u32,

        /// Interview type
        #[arg(long = "type", value_enum)]
        interview_type: InterviewType,

        /// Notes for the interviewers
        #[arg(long)]
        notes: Option<String>,
    },

    /// Cancel a scheduled interview
    Cancel {
        /// Interview ID
        id: String,
    },

    /// Submit feedback for a completed interview
    Feedback {
        /// Interview ID
        id: String,

        /// Rating from 1 to 5
        #[arg(long)]
        rating: u8,

        /// Written feedback
        #[arg(long)]
        text: String,
    },

    /// List open jobs
    Jobs,

    /// External calendar connection
    Calendar {
        #[command(subcommand)]
        action: CalendarAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum CalendarAction {
    /// Show whether a calendar is connected
    Status,
    /// Connect a calendar through the provider's consent page
    Connect {
        /// Seconds to wait for the consent page to report back (default: from config, 300)
        #[arg(long)]
        timeout: Option<u64>,

        /// Don't try to open a browser; print the consent URL instead
        #[arg(long)]
        no_browser: bool,
    },
}
