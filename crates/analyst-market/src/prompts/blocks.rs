//! Data blocks interpolated into the prompt templates

use crate::financials::FinancialRecord;
use crate::flows::fundamental::CompanySnapshot;
use crate::timeseries::{INDICATORS, YearlyAverageRecord, format_indicator_value};
use analyst_prompt::{Language, PromptBuilder};

/// Words used in the fundamental data block
struct Vocabulary {
    revenue: &'static str,
    net_income: &'static str,
    assets: &'static str,
    liabilities: &'static str,
    equity: &'static str,
    revenue_growth: &'static str,
    headlines: &'static str,
    missing: &'static str,
    and: &'static str,
}

const ENGLISH: Vocabulary = Vocabulary {
    revenue: "Revenue",
    net_income: "Net Income",
    assets: "Assets",
    liabilities: "Liabilities",
    equity: "Equity",
    revenue_growth: "Revenue growth",
    headlines: "Recent headlines",
    missing: "N/A",
    and: "and",
};

const SPANISH: Vocabulary = Vocabulary {
    revenue: "Ingresos",
    net_income: "Beneficio neto",
    assets: "Activos",
    liabilities: "Pasivos",
    equity: "Patrimonio",
    revenue_growth: "Crecimiento de ingresos",
    headlines: "Titulares recientes",
    missing: "N/D",
    and: "y",
};

fn vocabulary(language: &Language) -> &'static Vocabulary {
    match language {
        Language::Spanish => &SPANISH,
        _ => &ENGLISH,
    }
}

/// `Microsoft, Apple and Google`
pub fn company_list(names: &[&str], language: &Language) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [head @ .., last] => format!("{} {} {}", head.join(", "), vocabulary(language).and, last),
    }
}

/// Per-company figures, revenue growth and headlines
pub fn fundamental_data_block(companies: &[CompanySnapshot], language: &Language) -> String {
    let words = vocabulary(language);

    PromptBuilder::new()
        .each(companies.iter().enumerate(), |builder, (i, company)| {
            let growth = company
                .fundamentals
                .revenue_growth
                .map_or_else(|| words.missing.to_string(), |g| format!("{:.2}%", g * 100.0));

            builder
                .when(i > 0, PromptBuilder::blank_line)
                .banner(format!("{} ({})", company.company, company.ticker))
                .each(&company.fundamentals.financials.records, |b, record| {
                    b.field(record.period, record_summary(record, words))
                })
                .field(words.revenue_growth, growth)
                .when(!company.headlines.is_empty(), |b| {
                    b.line(format!("{}:", words.headlines))
                        .each(&company.headlines, |b, headline| b.bullet(headline))
                })
        })
        .build()
}

fn record_summary(record: &FinancialRecord, words: &Vocabulary) -> String {
    let amount = |v: Option<f64>| v.map_or_else(|| words.missing.to_string(), |v| format!("{v:.0}"));
    let ratio = |v: Option<f64>| v.map_or_else(|| words.missing.to_string(), |v| format!("{v:.4}"));

    format!(
        "{} {}, {} {}, {} {}, {} {}, {} {}, ROE {}, Current Ratio {}",
        words.revenue,
        amount(record.revenues),
        words.net_income,
        amount(record.net_income),
        words.assets,
        amount(record.assets),
        words.liabilities,
        amount(record.liabilities),
        words.equity,
        amount(record.equity),
        ratio(record.roe),
        ratio(record.current_ratio),
    )
}

/// Yearly averages, one `--- {year} ---` section per year
///
/// Indicators missing from a year are left out of that section.
pub fn macro_data_block(
    records: &[YearlyAverageRecord],
    lookback_years: u32,
    language: &Language,
) -> String {
    let header = match language {
        Language::Spanish => {
            format!("=== DATOS PROMEDIO ANUALES (últimos {lookback_years} años) ===")
        }
        _ => format!("=== YEARLY AVERAGE DATA (last {lookback_years} years) ==="),
    };

    PromptBuilder::new()
        .title(header)
        .each(records, |builder, record| {
            builder
                .blank_line()
                .banner(record.year)
                .each(&INDICATORS, |b, indicator| match record.get(indicator.name) {
                    Some(value) => b.field(
                        indicator.label(language),
                        format_indicator_value(indicator, value),
                    ),
                    None => b,
                })
        })
        .build()
}
