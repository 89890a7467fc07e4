use clap::{Parser, Subcommand, ValueEnum};
use eyre::Result;
use jiff::civil::Date;
use medsurvey_core::models::appointment::Recurrence;
use medsurvey_core::models::question::QuestionType;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod commands;
mod config;
mod prompt;
mod take;

#[derive(Parser)]
#[command(name = "medsurvey")]
#[command(version)]
#[command(about = "Answer, author and review medical surveys", long_about = None)]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, env = config::API_URL_ENV, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(short, long)]
        email: String,
        /// Prompted for without echo when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Reset a forgotten password via an emailed code
    ResetPassword {
        #[arg(short, long)]
        email: String,
    },
    /// Assigned surveys (patients) or authored surveys (doctors)
    Surveys,
    /// Answer a survey step by step
    Take { survey_id: Uuid },
    /// Show submitted attempts for a survey
    Review { survey_id: Uuid },
    /// Author surveys and questions
    Author {
        #[command(subcommand)]
        action: AuthorAction,
    },
    /// Manage the doctors you are associated with
    Doctors {
        #[command(subcommand)]
        action: DoctorAction,
    },
    /// Schedule recurring survey appointments
    Appointments {
        #[command(subcommand)]
        action: AppointmentAction,
    },
}

impl Command {
    /// Commands that save a fresh session state and so must work even when
    /// the existing file cannot be read.
    fn rewrites_config(&self) -> bool {
        matches!(self, Command::Login { .. } | Command::Logout)
    }
}

#[derive(Subcommand)]
enum AuthorAction {
    /// Create an empty survey
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Append a question to a survey
    AddQuestion {
        survey_id: Uuid,
        #[arg(short, long)]
        prompt: String,
        #[arg(short = 't', long = "type", value_enum, default_value = "free-text")]
        question_type: QuestionKind,
        /// Option label; repeat for each option
        #[arg(short, long = "option")]
        options: Vec<String>,
    },
    /// List a survey's questions
    Questions { survey_id: Uuid },
    DeleteQuestion { question_id: Uuid },
    DeleteSurvey { survey_id: Uuid },
}

#[derive(Subcommand)]
enum DoctorAction {
    /// The whole directory
    List,
    /// Your care team
    Mine,
    Add { doctor_id: Uuid },
    Remove { doctor_id: Uuid },
}

#[derive(Subcommand)]
enum AppointmentAction {
    List,
    Schedule {
        #[arg(long)]
        survey: Uuid,
        #[arg(long)]
        patient: Uuid,
        /// First due date, YYYY-MM-DD
        #[arg(long)]
        starts_on: Date,
        #[arg(long, value_enum, default_value = "once")]
        recurrence: RecurrenceKind,
        #[arg(long, default_value_t = 1)]
        occurrences: u32,
    },
    Cancel { appointment_id: Uuid },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum QuestionKind {
    FreeText,
    Rating,
    Options,
}

impl From<QuestionKind> for QuestionType {
    fn from(kind: QuestionKind) -> Self {
        match kind {
            QuestionKind::FreeText => QuestionType::FreeText,
            QuestionKind::Rating => QuestionType::Rating,
            QuestionKind::Options => QuestionType::OptionSelection,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RecurrenceKind {
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl From<RecurrenceKind> for Recurrence {
    fn from(kind: RecurrenceKind) -> Self {
        match kind {
            RecurrenceKind::Once => Recurrence::Once,
            RecurrenceKind::Daily => Recurrence::Daily,
            RecurrenceKind::Weekly => Recurrence::Weekly,
            RecurrenceKind::Monthly => Recurrence::Monthly,
        }
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // stdout belongs to the interactive prompts
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("MEDSURVEY_LOG_FORMAT").is_ok_and(|v| v == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = Cli::parse();
    let config = if cli.command.rewrites_config() {
        config::load_config_or_default()?
    } else {
        config::load_config()?
    };

    commands::dispatch(cli.command, config, cli.api_url).await
}
