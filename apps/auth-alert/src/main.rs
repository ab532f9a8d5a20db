//! Auth Alert
//!
//! Operator tool for the authentication alert path. `send` dispatches one
//! alert through the configured email API with the usual retries; `preview`
//! renders it locally without any network access.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{AlertEmailConfig, Environment, FromEnv};
use domain_auth_alerts::{
    AlertRenderer, AuthAlertDispatcher, AuthEvent, AuthEventType, DispatchOutcome,
};
use eyre::{Result, WrapErr};
use tracing::info;

#[derive(Parser)]
#[command(name = "auth-alert", version)]
#[command(about = "Send or preview authentication alert emails")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch an alert through the configured email API
    Send {
        #[command(flatten)]
        event: EventArgs,

        /// Override ALERT_MAX_ATTEMPTS for this call
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Print Prometheus metrics after dispatching
        #[arg(long)]
        print_metrics: bool,
    },

    /// Render the alert and print both bodies without sending
    Preview {
        #[command(flatten)]
        event: EventArgs,
    },
}

#[derive(Args)]
struct EventArgs {
    /// Event type: login or signup
    #[arg(long, default_value = "login", value_parser = parse_event_type)]
    event: AuthEventType,

    /// Display name of the user
    #[arg(long)]
    name: String,

    /// Email address of the user
    #[arg(long)]
    email: String,

    /// User identifier
    #[arg(long)]
    user_id: String,

    /// When the event happened (RFC 3339). Defaults to now.
    #[arg(long)]
    occurred_at: Option<DateTime<Utc>>,

    /// Client IP address
    #[arg(long)]
    ip: Option<String>,

    /// Client user agent
    #[arg(long)]
    user_agent: Option<String>,
}

fn parse_event_type(raw: &str) -> Result<AuthEventType, String> {
    raw.parse().map_err(|e: domain_auth_alerts::NotificationError| e.to_string())
}

impl EventArgs {
    fn into_event(self) -> AuthEvent {
        let mut event = AuthEvent::new(self.event, self.name, self.email, self.user_id);
        if let Some(occurred_at) = self.occurred_at {
            event = event.with_occurred_at(occurred_at);
        }
        event.ip_address = self.ip;
        event.user_agent = self.user_agent;
        event
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let environment = Environment::from_env();
    init_tracing(&environment);

    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            event,
            max_attempts,
            print_metrics,
        } => {
            if print_metrics {
                observability::init_metrics();
            }

            let config = AlertEmailConfig::from_env().wrap_err("Invalid alert configuration")?;
            info!(config = ?config, "Loaded alert configuration");

            let dispatcher = AuthAlertDispatcher::from_config(&config)?;
            let event = event.into_event();

            match dispatcher.dispatch_with_attempts(&event, max_attempts).await? {
                DispatchOutcome::Delivered {
                    attempts,
                    message_id,
                } => {
                    println!(
                        "delivered after {} attempt(s), message id: {}",
                        attempts,
                        message_id.as_deref().unwrap_or("-")
                    );
                }
                DispatchOutcome::Skipped => {
                    println!("skipped: RESEND_API_KEY is not set");
                }
            }

            if print_metrics {
                print!("{}", observability::render_metrics());
            }
        }

        Commands::Preview { event } => {
            let rendered = AlertRenderer::new()?.render(&event.into_event())?;
            println!("Subject: {}\n", rendered.subject);
            println!("{}", rendered.text);
            println!("{}", rendered.html);
        }
    }

    Ok(())
}
