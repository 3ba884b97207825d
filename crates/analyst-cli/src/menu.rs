//! Interactive menu loop

use analyst_market::flows::token_cost::{INPUT_PRICE_PER_MILLION, OUTPUT_PRICE_PER_MILLION};
use analyst_market::report::IMAGE_ERROR_LOG;
use analyst_market::{AnalysisReport, Assistant, ImageOutcome, TokenCost};
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use std::io::{self, BufRead, Write};
use tracing::error;

/// An entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Fundamental,
    Sentiment,
    Macro,
    Image,
    TokenCost,
    Exit,
}

impl MenuChoice {
    /// Menu order
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::Fundamental,
        MenuChoice::Sentiment,
        MenuChoice::Macro,
        MenuChoice::Image,
        MenuChoice::TokenCost,
        MenuChoice::Exit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MenuChoice::Fundamental => "1",
            MenuChoice::Sentiment => "2",
            MenuChoice::Macro => "3",
            MenuChoice::Image => "4",
            MenuChoice::TokenCost => "5",
            MenuChoice::Exit => "0",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MenuChoice::Fundamental => "Fundamental and comparative analysis (Microsoft, Apple, Google)",
            MenuChoice::Sentiment => "News sentiment analysis for a tech company",
            MenuChoice::Macro => "Macroeconomic and risk analysis",
            MenuChoice::Image => "AI image generation (Freepik)",
            MenuChoice::TokenCost => "Token cost estimate for a saved transcript",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        Self::ALL.into_iter().find(|c| c.key() == input)
    }
}

pub fn menu_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Option", "Description"]);
    for choice in MenuChoice::ALL {
        table.add_row(vec![choice.key(), choice.description()]);
    }
    table
}

/// Print `prompt` and read one trimmed line; `None` on end of input
fn read_line<R: BufRead>(input: &mut R, prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Show the menu until the user exits or input ends
pub async fn run<R: BufRead>(assistant: &Assistant, input: &mut R) -> anyhow::Result<()> {
    println!("\nWelcome to the analyst assistant");

    loop {
        println!("{}", menu_table());
        let Some(line) = read_line(input, "Enter your choice: ")? else {
            println!("\nGoodbye!");
            return Ok(());
        };

        match MenuChoice::parse(&line) {
            Some(MenuChoice::Exit) => {
                println!("\nThanks for using the assistant. Goodbye!");
                return Ok(());
            }
            Some(choice) => {
                if !run_choice(assistant, choice, input).await? {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            }
            None => println!("\nInvalid option. Please choose an option from the menu."),
        }
    }
}

/// Run one flow; `false` when input ended while reading its arguments
async fn run_choice<R: BufRead>(
    assistant: &Assistant,
    choice: MenuChoice,
    input: &mut R,
) -> anyhow::Result<bool> {
    match choice {
        MenuChoice::Fundamental => {
            println!("\nStarting fundamental analysis...");
            match assistant.fundamental_analysis().await {
                Ok(report) => print_report("FINANCIAL ANALYSIS REPORT", &report),
                Err(e) => report_error(choice, &e),
            }
        }
        MenuChoice::Sentiment => {
            let Some(company) = read_line(input, "Enter the tech company name (e.g. Apple, Microsoft): ")?
            else {
                return Ok(false);
            };
            println!("\nStarting sentiment analysis...");
            match assistant.sentiment_analysis(&company).await {
                Ok(Some(report)) => print_report("SENTIMENT ANALYSIS", &report),
                Ok(None) => eprintln!("No news found for the specified company."),
                Err(e) => report_error(choice, &e),
            }
        }
        MenuChoice::Macro => {
            println!("\nStarting macroeconomic analysis...");
            match assistant.macro_analysis().await {
                Ok(report) => print_report("MACROECONOMIC ANALYSIS", &report),
                Err(e) => report_error(choice, &e),
            }
        }
        MenuChoice::Image => {
            let Some(prompt) = read_line(input, "Enter a description for the image: ")? else {
                return Ok(false);
            };
            if prompt.is_empty() {
                eprintln!("The image description must not be empty.");
                return Ok(true);
            }
            println!("\nGenerating image for the prompt: '{prompt}'...");
            match assistant.generate_image(&prompt).await {
                Ok(outcome) => print_image_outcome(assistant, &outcome),
                Err(e) => report_error(choice, &e),
            }
        }
        MenuChoice::TokenCost => {
            let Some(file_name) = read_line(input, "Enter the name of the .txt file to analyze: ")?
            else {
                return Ok(false);
            };
            match assistant.estimate_token_cost(&file_name).await {
                Ok(cost) => print_token_cost(&file_name, &cost),
                Err(e) => report_error(choice, &e),
            }
        }
        MenuChoice::Exit => {}
    }

    Ok(true)
}

fn print_report(heading: &str, report: &AnalysisReport) {
    println!("\n--- {heading} ---");
    println!("{}", report.text);
    if let Some(path) = &report.saved_to {
        println!("\nConversation saved to: {}", path.display());
    }
}

fn print_image_outcome(assistant: &Assistant, outcome: &ImageOutcome) {
    match outcome {
        ImageOutcome::Saved { path: Some(path) } => {
            println!("Response saved to {}", path.display());
        }
        ImageOutcome::Saved { path: None } => {
            eprintln!("The image was generated but the response could not be saved.");
        }
        ImageOutcome::Failed { message } => {
            eprintln!("Error: {message}");
            eprintln!(
                "Error recorded in {}",
                assistant.sink().output_dir().join(IMAGE_ERROR_LOG).display()
            );
        }
    }
}

fn print_token_cost(file_name: &str, cost: &TokenCost) {
    println!("\n--- COST SUMMARY ({file_name}) ---");
    println!("Input tokens: {}", cost.input_tokens);
    println!("Output tokens: {}", cost.output_tokens);
    println!(
        "Input cost: ${:.6} USD (at ${INPUT_PRICE_PER_MILLION:.2} / 1M)",
        cost.input_cost()
    );
    println!(
        "Output cost: ${:.6} USD (at ${OUTPUT_PRICE_PER_MILLION:.2} / 1M)",
        cost.output_cost()
    );
    println!("Total cost: ${:.6} USD", cost.total_cost());
}

fn report_error(choice: MenuChoice, err: &analyst_market::AnalystError) {
    error!("{:?} flow failed: {}", choice, err);
    eprintln!("An error occurred: {err}");
}
