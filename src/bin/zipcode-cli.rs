use clap::Parser;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "zipcode-cli")]
#[command(about = "Look up the current temperature for a postal code", long_about = None)]
struct Cli {
    /// Base URL of the entry service
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Eight-digit postal code
    cep: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/zipcode", cli.url.trim_end_matches('/')))
        .json(&json!({ "cep": cli.cep }))
        .send()
        .await?;
    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: entry service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
