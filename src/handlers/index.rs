// src/handlers/index.rs
use log::{error, info};
use std::fmt::Write;
use warp::reply::Html;
use warp::Rejection;

use crate::currency::CurrencyCode;
use crate::models::HistoryEntry;
use crate::routes::AppState;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn currency_options(selected: &str) -> String {
    let mut options = String::new();
    for code in CurrencyCode::all() {
        let marker = if code.as_str() == selected { " selected" } else { "" };
        let _ = writeln!(
            options,
            r#"<option value="{code}"{marker}>{code} - {name}</option>"#,
            code = code.as_str(),
            name = escape(code.name()),
        );
    }
    options
}

fn history_rows(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return r#"<tr><td colspan="4">No conversions yet.</td></tr>"#.to_string();
    }

    let mut rows = String::new();
    for entry in entries {
        let _ = writeln!(
            rows,
            r#"<tr><td><img src="{sflag}" class="flag" alt="{scode}"> {amount} {scode}</td><td><img src="{tflag}" class="flag" alt="{tcode}"> {result}</td><td>{rate:.6}</td><td>{ts}</td></tr>"#,
            sflag = escape(&entry.source_flag),
            scode = escape(&entry.source_code),
            amount = entry.amount,
            tflag = escape(&entry.target_flag),
            tcode = escape(&entry.target_code),
            result = escape(&entry.formatted_result),
            rate = entry.rate,
            ts = entry.timestamp.format("%Y-%m-%d %H:%M"),
        );
    }
    rows
}

pub fn render_page(entries: &[HistoryEntry]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Currency converter</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <style>
        body {{ font-family: 'Segoe UI', Arial, sans-serif; max-width: 640px; margin: 40px auto; }}
        .flag {{ width: 22px; height: 16px; vertical-align: middle; }}
        table {{ width: 100%; border-collapse: collapse; }}
        td {{ padding: 4px; border-bottom: 1px solid #dcdde1; }}
    </style>
</head>
<body>
    <h2>Currency converter</h2>
    <form id="converter" method="post" action="/convertir">
        <label>From: <select name="sourceCode">
{source_options}        </select></label>
        <label>To: <select name="targetCode">
{target_options}        </select></label>
        <label>Amount: <input type="text" name="amount" required></label>
        <button type="submit">Convert</button>
    </form>
    <p id="result"></p>
    <h3>Recent conversions</h3>
    <table>
{rows}    </table>
    <script>
        document.getElementById('converter').addEventListener('submit', async (event) => {{
            event.preventDefault();
            const result = document.getElementById('result');
            const response = await fetch('/convertir', {{
                method: 'POST',
                body: new URLSearchParams(new FormData(event.target)),
            }});
            const data = await response.json();
            if (response.ok) {{
                result.textContent = `${{data.formattedResult}} (rate ${{data.rate}})`;
                window.setTimeout(() => window.location.reload(), 1500);
            }} else {{
                result.textContent = data.error;
            }}
        }});
    </script>
</body>
</html>
"#,
        source_options = currency_options("EUR"),
        target_options = currency_options("USD"),
        rows = history_rows(entries),
    )
}

pub async fn index(state: AppState) -> Result<Html<String>, Rejection> {
    info!("Rendering index page");

    let entries = match state.db.recent_conversions(state.history_limit).await {
        Ok(records) => records.into_iter().map(HistoryEntry::from).collect(),
        Err(e) => {
            error!("Failed to read conversion history for index page: {}", e);
            Vec::new()
        }
    };

    Ok(warp::reply::html(render_page(&entries)))
}
