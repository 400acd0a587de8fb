//! A small program demonstrating how to use `hf-adaptor` as a library.
//!
//! Without arguments it runs an interactive chat. Lines starting with
//! `/system ` are sent as steering messages instead of user turns. With
//! `qna <context-file>` it answers every input line as a question about the
//! given file.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::pin::pin;
use std::time::Duration;

use hf_adaptor::model::{Message, Role};
use hf_adaptor::{
    AdaptorConfig, AdaptorConfigBuilder, ChatAdaptor, ChatReply, Extractor,
    QnAAdaptor, QnaExtractor,
};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::select;
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";
const SYSTEM_PREFIX: &str = "/system ";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Some(config) = config_from_env() else {
        return;
    };

    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        None => run_chat(config).await,
        Some("qna") => {
            let Some(path) = args.next() else {
                eprintln!("usage: hf-chat qna <context-file>");
                return;
            };
            let context = match std::fs::read_to_string(&path) {
                Ok(context) => context,
                Err(err) => {
                    eprintln!("cannot read {path}: {err}");
                    return;
                }
            };
            run_qna(config, context).await
        }
        Some(other) => eprintln!("unknown command `{other}`"),
    }
}

fn config_from_env() -> Option<AdaptorConfig> {
    let Ok(api_key) = env::var("HF_API_KEY") else {
        eprintln!("HF_API_KEY environment variable is not set");
        return None;
    };

    let mut builder = AdaptorConfigBuilder::with_api_key(api_key);
    if let Ok(url) = env::var("HF_API_URL") {
        builder = builder.with_url(url);
    }
    if let Ok(model) = env::var("HF_MODEL") {
        builder = builder.with_model(model);
    }
    if let Ok(instruction) = env::var("HF_INSTRUCTION") {
        builder = builder.with_instruction(instruction);
    }
    if let Ok(max_retries) = env::var("HF_MAX_RETRIES") {
        let Ok(max_retries) = max_retries.parse() else {
            eprintln!("HF_MAX_RETRIES must be a non-negative number");
            return None;
        };
        builder = builder.with_max_retries(max_retries);
    }

    let config = builder.build();
    debug!("using {config:?}");
    Some(config)
}

async fn run_chat(config: AdaptorConfig) {
    let adaptor = ChatAdaptor::new(config, Extractor::Chat);
    let mut history: Vec<Message> = Vec::new();
    let mut stdin = BufReader::new(io::stdin());

    loop {
        prompt("> ");
        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (role, message) = match line.strip_prefix(SYSTEM_PREFIX) {
            Some(message) => (Role::System, message),
            None => (Role::User, line),
        };
        let result = with_spinner(async {
            match role {
                Role::System => {
                    adaptor
                        .send_system_request_with_history(
                            message,
                            &history,
                            &[],
                        )
                        .await
                }
                _ => {
                    adaptor
                        .send_request_with_history(message, &history, &[])
                        .await
                }
            }
        })
        .await;

        let reply = match result {
            Ok(reply) => reply,
            Err(err) => {
                println!("{}{}", BAR_CHAR.bright_red(), err.bright_red());
                continue;
            }
        };
        print_reply(&reply);

        history.push(Message::new(role, message));
        history.push(Message::assistant_with_calls(
            reply.content,
            reply.function_calls,
        ));
    }
}

async fn run_qna(config: AdaptorConfig, context: String) {
    let adaptor = QnAAdaptor::new(config, QnaExtractor::Json);
    let mut stdin = BufReader::new(io::stdin());

    loop {
        prompt("? ");
        let Some(line) = read_line(&mut stdin).await else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        let result =
            with_spinner(adaptor.send_question(&context, question, None)).await;
        let answers = match result {
            Ok(answers) => answers,
            Err(err) => {
                println!("{}{}", BAR_CHAR.bright_red(), err.bright_red());
                continue;
            }
        };
        if answers.is_empty() {
            println!("{}no answer found", BAR_CHAR.bright_yellow());
        }
        for answer in answers {
            println!(
                "{}{} {}",
                BAR_CHAR.bright_cyan(),
                answer.answer.bright_white(),
                format!(
                    "(score {:.3}, chars {}..{})",
                    answer.score, answer.start, answer.end
                )
                .dimmed()
            );
        }
    }
}

fn print_reply(reply: &ChatReply) {
    if !reply.content.is_empty() {
        println!("{}🤖 {}", BAR_CHAR.bright_cyan(), reply.content.bright_white());
    }
    for call in &reply.function_calls {
        let bar = BAR_CHAR.bright_yellow();
        println!("{bar}🔧 {}", call.name.bright_white().bold());
        println!("{bar}{}", call.arguments.dimmed());
    }
}

/// Drives `fut` to completion while a spinner runs.
async fn with_spinner<F: Future>(fut: F) -> F::Output {
    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(progress_style);
    progress_bar.set_message("🤔 Thinking...");

    let mut fut = pin!(fut);
    loop {
        progress_bar.inc(1);
        let sleep = sleep(Duration::from_millis(100));
        select! {
            output = &mut fut => {
                // Finish the progress bar before printing anything else.
                progress_bar.finish_and_clear();
                return output;
            }
            _ = sleep => {}
        }
    }
}

fn prompt(text: &str) {
    print!("{text}");
    std::io::stdout().flush().ok();
}

/// Reads one line from `input`.
///
/// The reader must live across calls, as it may have buffered the lines that
/// follow.
async fn read_line<R: AsyncBufRead + Unpin>(input: &mut R) -> Option<String> {
    let mut line = String::new();

    match input.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
