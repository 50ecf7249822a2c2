//! Command-line entry point.
//!
//! Prompts for the API key, fetches and classifies every patient, prints the
//! report, and submits it.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::Level;
use vitals::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let api_key = prompt_api_key().await?;

    match run_and_submit(api_key).await {
        Ok(()) => println!("\n✅ Assessment submitted"),
        Err(e) => eprintln!("\n❌ {e:#}"),
    }

    Ok(())
}

async fn prompt_api_key() -> anyhow::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"API key: ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

async fn run_and_submit(api_key: String) -> anyhow::Result<()> {
    let client = PatientClient::new(ClientConfig::with_api_key(api_key))?;
    let outcome = run(&client).await?;

    if let Some((declared, actual)) = outcome.count_mismatch() {
        println!("⚠️  Server declared {declared} patients but {actual} were retrieved");
    }

    print_list("High risk", outcome.report.high_risk_patients.iter());
    print_list("Fever", outcome.report.fever_patients.iter());
    print_list("Data quality issues", outcome.report.data_quality_issues.iter());
    println!("\n📊 {}", outcome.summary);

    let reply = client.submit_assessment(&outcome.report).await?;
    println!("\n{}", serde_json::to_string_pretty(&reply)?);

    Ok(())
}

fn print_list<'a>(title: &str, ids: impl ExactSizeIterator<Item = &'a String>) {
    println!("\n{title} ({}):", ids.len());
    for id in ids {
        println!("  {id}");
    }
}
