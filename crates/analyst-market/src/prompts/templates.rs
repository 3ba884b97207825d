//! Prompt templates for the analysis flows

use analyst_prompt::{JinjaTemplate, Result};

/// Registry name of the fundamental comparison prompt
pub const FUNDAMENTAL: &str = "analyst.fundamental";

/// Registry name of the news sentiment prompt
pub const SENTIMENT: &str = "analyst.sentiment";

/// Registry name of the macroeconomic prompt
pub const MACRO: &str = "analyst.macro";

// ============================================================================
// Fundamental analysis
// ============================================================================

/// Variables: `companies` (display list), `data` (per-company block)
pub fn fundamental_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        FUNDAMENTAL,
        "Act as a financial analyst. Analyze the latest annual reports of {{ companies }}. \
Compare their profitability (ROE), liquidity (Current Ratio) and revenue growth. \
Also include the market perception from recent news.\n\
Available data:\n\
{{ data }}\n\
Write a report highlighting the strengths and weaknesses of each company and a 300-word summary \
of which one offers the better long-term investment opportunity, justifying your answer.",
        "Actúa como un analista financiero. Analiza los últimos informes anuales de {{ companies }}. \
Compara sus indicadores de rentabilidad (ROE), liquidez (Current Ratio) y crecimiento de ingresos. \
También incluye la percepción del mercado según noticias recientes.\n\
Datos disponibles:\n\
{{ data }}\n\
Genera un informe que destaque los puntos fuertes y débiles de cada una y un resumen de 300 palabras \
sobre cuál presenta una mejor oportunidad de inversión a largo plazo, justificando tu respuesta.",
    )
}

// ============================================================================
// News sentiment
// ============================================================================

/// Variables: `company`, `news` (list of article lines)
pub fn sentiment_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        SENTIMENT,
        "Analyze the sentiment of the following news about {{ company }}.\n\
Identify the predominant sentiment (positive, negative, neutral) and briefly explain why.\n\
Mention any potential risk or opportunity you can infer from the sentiment of the news.\n\
News:\n\
{% for item in news %}{{ item }}\n{% endfor %}",
        "Analiza el sentimiento de las siguientes noticias sobre la empresa {{ company }}.\n\
Identifica el sentimiento predominante (positivo, negativo, neutral) y explica brevemente por qué.\n\
Menciona cualquier riesgo u oportunidad potencial que puedas inferir del sentimiento de las noticias.\n\
Noticias:\n\
{% for item in news %}{{ item }}\n{% endfor %}",
    )
}

// ============================================================================
// Macroeconomic analysis
// ============================================================================

/// Variables: `current_year`, `next_year`, `data` (yearly averages block)
pub fn macro_prompt() -> Result<JinjaTemplate> {
    JinjaTemplate::bilingual(
        MACRO,
        "Act as a senior economist in financial markets and produce an analysis based ONLY on \
the yearly average data provided.\n\
\n\
**Annual Trend Analysis:**\n\
Analyze how the macroeconomic indicators evolved and how they relate to each other.\n\
\n\
**Context and Outlook:**\n\
Based on the observed trends and the current context, give a view on the likely direction of \
the market and its main risks.\n\
\n\
**Forecast:**\n\
* **{{ current_year }} forecast:** Current situation.\n\
* **{{ next_year }} forecast:** Medium-term outlook.\n\
\n\
---\n\
FED and Market Data:\n\
{{ data }}",
        "Actúa como un economista senior en mercados financieros y genera un análisis basado SÓLO \
en los datos promedio anuales proporcionados.\n\
\n\
**Análisis de Tendencias Anuales:**\n\
Analiza la evolución de los indicadores macroeconómicos y su relación.\n\
\n\
**Contexto y Futuro:**\n\
Basándote en las tendencias observadas y el contexto actual, proporciona una perspectiva sobre \
la dirección probable del mercado y riesgos principales.\n\
\n\
**Pronóstico:**\n\
* **Pronóstico {{ current_year }}:** Situación actual.\n\
* **Pronóstico {{ next_year }}:** Perspectiva de mediano plazo.\n\
\n\
---\n\
Datos de la FED y Mercados:\n\
{{ data }}",
    )
}
