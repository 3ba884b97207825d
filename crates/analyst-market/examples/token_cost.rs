//! Estimate the token cost of a saved transcript
//!
//! ```bash
//! export GEMINI_API_KEY=your_key_here
//! cargo run -p analyst-market --example token_cost -- "Fundamental Analysis_20261016_101500.txt"
//! ```

use analyst_market::{AppConfig, Assistant};
use std::env;

#[tokio::main(flavor = "current_thread")]
async fn main() -> analyst_market::Result<()> {
    analyst_utils::load_dotenv();
    analyst_utils::init_tracing("info");

    let Some(file_name) = env::args().nth(1) else {
        eprintln!("usage: token_cost <transcript file>");
        return Ok(());
    };

    let assistant = Assistant::new(AppConfig::from_env()?)?;
    let cost = assistant.estimate_token_cost(&file_name).await?;

    println!("Input tokens:  {}", cost.input_tokens);
    println!("Output tokens: {}", cost.output_tokens);
    println!("Total cost:    ${:.6} USD", cost.total_cost());
    Ok(())
}
