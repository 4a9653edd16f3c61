use std::fmt;

use axum::{extract::State, response::Html};
use biaslens_history::HistoryEntry;

use crate::api::AppState;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.history.load().await))
}

const HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>BiasLens</title>
<style>
body { font-family: system-ui, sans-serif; max-width: 52rem; margin: 2rem auto; padding: 0 1rem; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: .35rem .5rem; border-bottom: 1px solid #ddd; }
pre { background: #f6f6f6; padding: 1rem; overflow-x: auto; }
</style>
</head>
<body>
<h1>BiasLens</h1>
<form id="analyze">
  <select name="input_type">
    <option value="text">Text</option>
    <option value="url">URL</option>
    <option value="topic">Topic</option>
  </select>
  <textarea name="input_value" rows="4" cols="60" required></textarea>
  <button type="submit">Analyze</button>
</form>
<pre id="result"></pre>
<h2>History</h2>
"#;

const TAIL: &str = r#"<script>
document.getElementById("analyze").addEventListener("submit", async (ev) => {
  ev.preventDefault();
  const form = new FormData(ev.target);
  const out = document.getElementById("result");
  out.textContent = "Analyzing...";
  const res = await fetch("/analyze", {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify({ input_type: form.get("input_type"), input_value: form.get("input_value") }),
  });
  out.textContent = JSON.stringify(await res.json(), null, 2);
});
</script>
</body>
</html>
"#;

fn render_index(entries: &[HistoryEntry]) -> String {
    format!("{HEAD}{}{TAIL}", HistoryTable(entries))
}

struct HistoryTable<'a>(&'a [HistoryEntry]);

impl fmt::Display for HistoryTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<p>No analyses yet.</p>\n");
        }
        f.write_str(
            "<table>\n<tr><th>Date</th><th>Type</th><th>Input</th><th>Sentiment</th><th>Bias</th></tr>\n",
        )?;
        for entry in self.0 {
            writeln!(
                f,
                "<tr data-id=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{} ({})</td><td>{} ({})</td></tr>",
                entry.id,
                escape(&entry.date),
                entry.input_type,
                escape(&entry.input_value),
                escape(&entry.results.sentiment),
                entry.results.sentiment_value,
                escape(&entry.results.bias),
                entry.results.bias_value,
            )?;
        }
        f.write_str("</table>\n")
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
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
