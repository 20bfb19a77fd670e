use anyhow::Context;
use clap::Parser;
use mutumwa::prelude::*;
use std::io::{self, Write};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "mutumwa", version, about = "Chat with a domain webhook from the terminal")]
struct Cli {
    /// Message to send; reads one message per line from stdin when omitted
    message: Vec<String>,

    /// Domain to ask (general, zesa, praz)
    #[arg(short = 'd', long, env = "MUTUMWA_DOMAIN", default_value = "general")]
    domain: String,

    /// Language to reply in (defaults to MUTUMWA_LANGUAGE, then english)
    #[arg(short = 'l', long)]
    language: Option<String>,

    /// Continue an existing session
    #[arg(short = 's', long)]
    session: Option<String>,

    /// User ID sent with each turn
    #[arg(short = 'u', long, env = "MUTUMWA_USER_ID")]
    user: Option<String>,

    /// Base URL the domain webhooks hang off
    #[arg(long)]
    webhook_base: Option<String>,

    /// Request timeout in seconds
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// List the available domains and exit
    #[arg(long)]
    list_domains: bool,
}

impl Cli {
    fn config(&self) -> anyhow::Result<WebhookConfig> {
        let mut config = WebhookConfig::from_env().context("invalid environment configuration")?;
        if let Some(base) = &self.webhook_base {
            config = config.with_webhook_base(base)?;
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(language) = &self.language {
            config = config.with_language(Language::new(language.as_str()));
        }
        config.validate()?;
        Ok(config)
    }
}

async fn run_turn<R: ReplySource>(
    turn: &ChatTurn<R>,
    conversation: &mut Conversation,
    threads: &mut ThreadList,
    text: &str,
) -> bool {
    let mut printer = ReplyPrinter::new();
    let mut stdout = io::stdout();

    let outcome = turn
        .send(conversation, threads, text, |update, _| {
            if let Err(e) = printer.write(update, &mut stdout) {
                tracing::warn!(error = %e, "failed to write reply");
            }
        })
        .await;

    match outcome.status {
        TurnStatus::Skipped => true,
        TurnStatus::Completed => {
            println!();
            true
        }
        TurnStatus::Failed(ref e) => {
            if outcome.reply.is_some() {
                println!();
            }
            println!("{FALLBACK_REPLY}");
            eprintln!("error: {e}");
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let config = cli.config()?;

    if cli.list_domains {
        for domain in config.domains.iter() {
            println!("{:<10} {:<10} {}", domain.value, domain.label, domain.webhook_url);
        }
        return Ok(());
    }

    let domain = config
        .domains
        .get(&cli.domain)
        .with_context(|| format!("unknown domain '{}'", cli.domain))?
        .clone();
    let language = config.default_language.clone();
    let user_id = cli.user.as_deref().map_or_else(UserId::new, UserId::from);
    let session_id = cli.session.as_deref().map_or_else(SessionId::new, SessionId::from);

    tracing::info!(
        domain = %domain.value,
        language = %language,
        session_id = %session_id,
        "starting chat"
    );

    let client = WebhookClient::new(config)?;
    let turn = ChatTurn::new(client, domain, user_id).with_language(language);
    let mut conversation = Conversation::new(session_id);
    let mut threads = ThreadList::new();

    if !cli.message.is_empty() {
        let text = cli.message.join(" ");
        if !run_turn(&turn, &mut conversation, &mut threads, &text).await {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        run_turn(&turn, &mut conversation, &mut threads, &line).await;
    }

    if let Some(thread) = threads.threads().first() {
        tracing::info!(
            title = %thread.title,
            messages = thread.message_count,
            "chat ended"
        );
    }
    Ok(())
}
