use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "monitor-cli")]
#[command(about = "Management CLI for the instance monitor daemon", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Arm a shutdown timer
    Add {
        /// Seconds until termination; negative skips scheduling
        #[arg(short, long, default_value_t = -1, allow_hyphen_values = true)]
        timeout: i64,
    },
    /// Cancel all pending shutdown timers
    CancelAll,
    /// List pending shutdown timers
    List,
    /// Set an instance metadata entry
    SetMetadata {
        #[arg(short, long)]
        name: String,
        #[arg(short, long, default_value = "")]
        value: String,
    },
    /// Check daemon status
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Add { timeout } => {
            let res = client
                .post(format!("{}/shutdown/add", cli.url))
                .query(&[("timeout", timeout)])
                .send()
                .await?;
            print_text_response(res).await?;
        }
        Commands::CancelAll => {
            let res = client
                .post(format!("{}/shutdown/cancelAll", cli.url))
                .send()
                .await?;
            print_text_response(res).await?;
        }
        Commands::List => {
            let res = client
                .get(format!("{}/shutdown/list", cli.url))
                .send()
                .await?;
            print_text_response(res).await?;
        }
        Commands::SetMetadata { name, value } => {
            let res = client
                .post(format!("{}/metadata/set", cli.url))
                .query(&[("name", name), ("value", value)])
                .send()
                .await?;
            print_text_response(res).await?;
        }
        Commands::Status => {
            let res = client.get(format!("{}/status", cli.url)).send().await?;
            print_json_response(res).await?;
        }
    }

    Ok(())
}

async fn print_text_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: daemon returned status {}", status);
        if !body.is_empty() {
            eprintln!("Response: {}", body);
        }
        return Ok(());
    }
    if body.is_empty() {
        println!("OK");
    } else {
        print!("{}", body);
    }
    Ok(())
}

async fn print_json_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: daemon returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
