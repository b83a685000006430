//! `protein-cli`: command-line client for the proteInternet API.
//!
//! Uses the same session, token store, and gateway as the web client. The
//! session persists to a JSON state file instead of `localStorage`, so a
//! `login` in one invocation authenticates later `reviews post` calls.

#[cfg(test)]
#[path = "main_test.rs"]
mod main_test;

use clap::{Args, Parser, Subcommand};
use client::config::{ClientConfig, ConfigError, DEFAULT_API_BASE_URL};
use client::net::api;
use client::net::error::ApiError;
use client::services::ClientServices;
use client::util::validation::{self, FieldErrors, RegistrationForm, ReviewDraft};
use serde_json::{Value, json};

const STATE_FILE_ENV: &str = "PROTEIN_STATE_FILE";
const DEFAULT_STATE_FILE: &str = ".proteinternet-session.json";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("invalid input: {}", format_field_errors(.0))]
    Invalid(FieldErrors),
    #[error("not logged in; run `protein-cli login` first")]
    NotLoggedIn,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "protein-cli", about = "proteInternet API command-line client")]
struct Cli {
    #[arg(long, env = "PROTEIN_API_URL", default_value = DEFAULT_API_BASE_URL)]
    base_url: String,

    #[arg(long, env = STATE_FILE_ENV, default_value = DEFAULT_STATE_FILE)]
    state_file: String,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session.
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account.
    Register(RegisterArgs),
    /// Forget the persisted session.
    Logout,
    /// Show the logged-in user.
    Whoami,
    Reviews(ReviewsCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    email: String,
    #[arg(long)]
    password: String,
    /// Defaults to `--password`.
    #[arg(long)]
    confirm: Option<String>,
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args, Debug)]
struct ReviewsCommand {
    #[command(subcommand)]
    command: ReviewsSubcommand,
}

#[derive(Subcommand, Debug)]
enum ReviewsSubcommand {
    List {
        #[arg(long, default_value_t = api::DEFAULT_PAGE_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    Get {
        id: i64,
    },
    /// List one user's reviews.
    User {
        user_id: i64,
        #[arg(long, default_value_t = api::DEFAULT_PAGE_LIMIT)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Post a review as the logged-in user.
    Post(PostReviewArgs),
}

#[derive(Args, Debug)]
struct PostReviewArgs {
    #[arg(long)]
    protein: String,
    #[arg(long)]
    price: String,
    #[arg(long)]
    comment: String,
    /// Image URL; repeat for several.
    #[arg(long = "image")]
    images: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ClientConfig::new(&cli.base_url)?;
    tracing::debug!(base_url = %config.api_base_url, state_file = %cli.state_file, "starting");
    let services = ClientServices::native(config, &cli.state_file);

    match cli.command {
        Command::Login { email, password } => run_login(&services, &email, &password).await,
        Command::Register(args) => run_register(&services, args).await,
        Command::Logout => {
            services.session.logout();
            eprintln!("logged out");
            Ok(())
        }
        Command::Whoami => {
            let user = services.session.user().ok_or(CliError::NotLoggedIn)?;
            print_json(&serde_json::to_value(user)?)
        }
        Command::Reviews(reviews) => run_reviews(&services, reviews.command).await,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).init();
}

async fn run_login(services: &ClientServices, email: &str, password: &str) -> Result<(), CliError> {
    let request = validation::validate_login(email, password).map_err(CliError::Invalid)?;
    let resp = api::sign_in(&services.gateway, &services.session, &request).await?;
    eprintln!("logged in as {}", resp.user.display_name());
    print_json(&serde_json::to_value(&resp.user)?)
}

async fn run_register(services: &ClientServices, args: RegisterArgs) -> Result<(), CliError> {
    let form = RegistrationForm {
        email: args.email,
        confirm_password: args.confirm.unwrap_or_else(|| args.password.clone()),
        password: args.password,
        name: args.name.unwrap_or_default(),
    };
    let request = validation::validate_registration(&form).map_err(CliError::Invalid)?;
    let resp = api::register(&services.gateway, &request).await?;
    print_json(&json!({ "id": resp.id, "email": resp.email, "name": resp.name, "message": resp.message }))
}

async fn run_reviews(services: &ClientServices, command: ReviewsSubcommand) -> Result<(), CliError> {
    match command {
        ReviewsSubcommand::List { limit, offset } => {
            let reviews = api::list_reviews(&services.gateway, limit, offset).await?;
            print_json(&serde_json::to_value(reviews)?)
        }
        ReviewsSubcommand::Get { id } => {
            let review = api::get_review(&services.gateway, id).await?;
            print_json(&serde_json::to_value(review)?)
        }
        ReviewsSubcommand::User { user_id, limit, offset } => {
            let reviews = api::user_reviews(&services.gateway, user_id, limit, offset).await?;
            print_json(&serde_json::to_value(reviews)?)
        }
        ReviewsSubcommand::Post(args) => {
            if !services.session.is_authenticated() {
                return Err(CliError::NotLoggedIn);
            }
            let draft = ReviewDraft {
                protein_per_serving: args.protein,
                price_per_serving: args.price,
                comment: args.comment,
                images: args.images,
            };
            let request = validation::validate_review(&draft).map_err(CliError::Invalid)?;
            let created = api::create_review(&services.gateway, &request).await?;
            print_json(&json!({ "id": created.id, "message": created.message }))
        }
    }
}

fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
