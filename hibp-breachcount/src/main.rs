use std::time::Duration;

use clap::{Parser, Subcommand};
use hibp_breachcount::{
    BreachChecker, Config, Error, FieldKind, Form, FormField, FormOptions, HIBP_LOG_ENV,
    RangeClient, augment,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hibp-breachcount")]
#[command(about = "Check passwords against Pwned Passwords using only a 5-character hash prefix")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Range API base URL (overrides HIBP_RANGE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Ask the service to pad responses
    #[arg(long, global = true)]
    add_padding: bool,

    /// Request timeout in seconds (default: none)
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the breach count of each password, one per line (-1 on failure).
    /// Reads passwords from stdin, one per line, when none are given.
    Check { passwords: Vec<String> },

    /// Build a form submission with breach counts attached
    Submit {
        /// Regular form field
        #[arg(short, long = "field", value_name = "NAME=VALUE")]
        fields: Vec<String>,

        /// Password form field
        #[arg(short, long = "password", value_name = "NAME=VALUE")]
        passwords: Vec<String>,

        /// Submit password fields unchanged instead of blanking them
        #[arg(long)]
        keep_passwords: bool,

        /// Do not attach password lengths
        #[arg(long)]
        no_length: bool,

        /// Print the resulting fields as JSON instead of urlencoded
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(HIBP_LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    init_tracing();

    let mut config = Config::from_env()?;
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url)?;
    }
    config.add_padding |= args.add_padding;
    config.timeout = args.timeout_secs.map(Duration::from_secs);

    let checker = BreachChecker::from_config(&config)?;

    match args.command {
        Command::Check { passwords } => check(&checker, passwords).await,
        Command::Submit { fields, passwords, keep_passwords, no_length, json } => {
            let mut form = Form::default();
            for arg in &fields {
                form.push(FormField::from_assignment(FieldKind::Text, arg)?);
            }
            for arg in &passwords {
                form.push(FormField::from_assignment(FieldKind::Password, arg)?);
            }

            let options = FormOptions {
                clear_password_fields: !keep_passwords,
                include_password_length: !no_length,
            };
            let form = augment(&checker, form, &options).await;

            if json {
                println!("{}", serde_json::to_string_pretty(&form)?);
            } else {
                println!("{}", form.to_urlencoded());
            }
            Ok(())
        }
    }
}

async fn check(checker: &BreachChecker<RangeClient>, passwords: Vec<String>) -> Result<(), Error> {
    if !passwords.is_empty() {
        for password in &passwords {
            println!("{}", checker.lookup(password).await);
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(password) = lines.next_line().await? {
        println!("{}", checker.lookup(&password).await);
    }

    Ok(())
}
