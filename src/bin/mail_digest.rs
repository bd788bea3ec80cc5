use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};

use mail_digest::config::load_config;
use mail_digest::domain::email::{MAX_RESULTS_LIMIT, SummaryResult};
use mail_digest::llm::openai::OpenAiBackend;
use mail_digest::llm::summarizer::Summarizer;
use mail_digest::mail::imap_client::ImapClient;
use mail_digest::pipeline::Pipeline;
use mail_digest::secrets::{self, SecretName};

#[derive(Parser)]
#[command(name = "mail_digest")]
#[command(about = "Summarize recent emails matching a subject keyword", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch matching emails and print a short summary of each
    Summarize {
        /// Subject keyword to search for (e.g. school, teacher)
        #[arg(long, default_value = "school")]
        keyword: String,

        /// Number of emails to summarize
        #[arg(
            long,
            default_value_t = 5,
            value_parser = clap::value_parser!(u8).range(1..=MAX_RESULTS_LIMIT as i64)
        )]
        count: u8,
    },

    /// Store a secret (email-address, app-password or api-key) in the keyring
    SetSecret {
        #[arg(long)]
        name: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::SetSecret { name } => {
            let name = SecretName::parse(&name)?;
            eprintln!("Paste secret (end with Ctrl-D):");
            let mut secret = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut secret)?;
            let secret = secret.trim();
            secrets::save_secret(name, secret)?;
            println!("Saved {} in keyring", name.keyring_user());
            Ok(())
        }

        Command::Summarize { keyword, count } => {
            let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let raw = secrets::load_raw_credentials();

            let imap = ImapClient::new(cfg.imap_server(), cfg.imap_port());
            let summarizer = Summarizer::new(OpenAiBackend::new(cfg.api_base())?);

            let results = Pipeline::new(&imap, &summarizer).run(&raw, &keyword, count as usize)?;
            if results.is_empty() {
                println!("No emails found matching query.");
            }
            for r in &results {
                print_result(r);
            }
            Ok(())
        }
    }
}

fn print_result(r: &SummaryResult) {
    println!("{} — {}", r.subject, r.date);
    match &r.outcome {
        Ok(summary) => println!("{summary}"),
        Err(e) => println!("error: {e}"),
    }
    println!("{}", "-".repeat(40));
}
