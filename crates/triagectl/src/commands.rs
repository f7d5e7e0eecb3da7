//! Command implementations for triagectl.

use crate::client::DaemonClient;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use triage_common::{AnswerResponse, RiskLevel};

/// Interactive diagnostic loop: start a session, answer questions until
/// the daemon commits to a diagnosis.
pub async fn ask(server: &str, message: &str) -> Result<()> {
    let client = DaemonClient::new(server)?;

    let start = client
        .start(message)
        .await
        .context("Could not start a session (is triaged running?)")?;

    println!();
    println!("{} {}", "Issue:".bold(), start.issue_summary);
    print_risk(start.risk_level);
    println!();

    let mut question = start.question;
    let mut options = start.options;
    let mut why = start.why_asking;
    let mut number = start.question_number;

    let stdin = io::stdin();

    loop {
        let selection = prompt_selection(&stdin, number, &question, &options, &why)?;

        match client.answer(&start.session_id, &selection).await? {
            AnswerResponse::Continue {
                confidence,
                question: next_question,
                options: next_options,
                why_asking,
                question_number,
                top_hypothesis,
            } => {
                println!(
                    "  {} {} ({:.0}% confidence)",
                    "Leaning toward:".dimmed(),
                    top_hypothesis.yellow(),
                    confidence * 100.0
                );
                println!();
                question = next_question;
                options = next_options;
                why = why_asking;
                number = question_number;
            }
            AnswerResponse::Completed {
                confidence,
                final_response,
            } => {
                println!();
                println!("{}", "Diagnosis".bold().green());
                println!("  {}", final_response);
                println!("  {} {:.0}%", "Confidence:".dimmed(), confidence * 100.0);
                return Ok(());
            }
        }
    }
}

fn print_risk(risk: RiskLevel) {
    let label = "Risk:".bold();
    match risk {
        RiskLevel::Low => println!("{} {}", label, "low".green()),
        RiskLevel::Moderate => println!("{} {}", label, "moderate".yellow()),
        RiskLevel::High => println!("{} {}", label, "high".red()),
    }
}

/// Show the question with numbered options; accept a number or free
/// text. Free text is sent verbatim as the selected option.
fn prompt_selection(
    stdin: &io::Stdin,
    number: u32,
    question: &str,
    options: &[String],
    why: &str,
) -> Result<String> {
    println!("{} {}", format!("Q{number}:").bold().cyan(), question);
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }
    if !why.is_empty() {
        println!("  {}", format!("(why: {why})").dimmed());
    }
    print!("> ");
    io::stdout().flush()?;

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let input = line.trim();

    if let Ok(choice) = input.parse::<usize>() {
        if choice >= 1 && choice <= options.len() {
            return Ok(options[choice - 1].clone());
        }
    }

    Ok(input.to_string())
}

/// Ping the daemon.
pub async fn health(server: &str) -> Result<()> {
    let client = DaemonClient::new(server)?;
    let health = client
        .health()
        .await
        .context("Daemon not reachable")?;

    println!("{} {}", "Status:".bold(), health.status.green());
    println!("{} {}", "Version:".bold(), health.version);
    println!("{} {}s", "Uptime:".bold(), health.uptime_seconds);
    println!("{} {}", "Active sessions:".bold(), health.active_sessions);
    Ok(())
}
