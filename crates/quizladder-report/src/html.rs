//! HTML session report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;

use quizladder_core::model::Tier;
use quizladder_core::report::{AnsweredQuestion, SessionReport};
use quizladder_core::statistics::{session_stats, Tally};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page for one session.
pub fn generate_html(report: &SessionReport) -> String {
    let stats = session_stats(report);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizladder session - {}</title>\n",
        html_escape(&report.bank.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>quizladder session</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Bank: <strong>{}</strong> | user: {} | {} | {}</p>\n",
        html_escape(&report.bank.name),
        html_escape(report.user.as_deref().unwrap_or("anonymous")),
        report.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
        if report.completed {
            "completed"
        } else {
            "abandoned"
        }
    ));
    html.push_str("</header>\n");

    // Summary
    let summary = &report.summary;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Score</th><th>Correct</th><th>Incorrect</th><th>Total</th><th>Accuracy</th><th>Highest tier</th><th>Duration</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{}</td><td>{}s</td></tr></tbody>\n",
        summary.score,
        summary.correct,
        summary.incorrect,
        summary.total,
        summary.accuracy() * 100.0,
        stats
            .highest_level
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string()),
        report.duration_secs(),
    ));
    html.push_str("</table>\n");

    if !report.answers.is_empty() {
        html.push_str("<h3>Difficulty over time</h3>\n");
        html.push_str(&generate_timeline(&report.answers));
    }
    if !stats.per_tier.is_empty() {
        html.push_str("<h3>Accuracy by tier</h3>\n");
        let labelled: BTreeMap<String, Tally> = stats
            .per_tier
            .iter()
            .map(|(tier, tally)| (tier.to_string(), *tally))
            .collect();
        html.push_str(&generate_bar_chart(&labelled));
    }
    if !stats.per_category.is_empty() {
        html.push_str("<h3>Accuracy by category</h3>\n");
        html.push_str(&generate_bar_chart(&stats.per_category));
    }

    html.push_str("</section>\n");

    // Answer trace
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Answers</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Question</th><th onclick=\"sortTable(2)\">Tier</th><th onclick=\"sortTable(3)\">Level</th><th onclick=\"sortTable(4)\">Category</th><th onclick=\"sortTable(5)\">Result</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for (i, a) in report.answers.iter().enumerate() {
        let class = if a.correct { "pass" } else { "fail" };
        let text = if a.correct { "correct" } else { "incorrect" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            class,
            i + 1,
            html_escape(&a.question_id),
            a.tier,
            a.level,
            html_escape(&a.category),
            text
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &SessionReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Step chart of the controller tier, one dot per answer.
fn generate_timeline(answers: &[AnsweredQuestion]) -> String {
    let step = 32;
    let row_height = 40;
    let label_width = 80;
    let padding = 20;

    let width = label_width + answers.len() * step + padding;
    let height = Tier::ALL.len() * row_height + padding;
    let y_of = |tier: Tier| padding + (Tier::ALL.len() - 1 - tier.index()) * row_height;

    let mut svg = format!("<svg width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">\n");

    for tier in Tier::ALL {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 12,
            y_of(tier),
            tier
        ));
    }

    let points: Vec<String> = answers
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{},{}", label_width + i * step, y_of(a.level)))
        .collect();
    svg.push_str(&format!(
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"#6b7280\" stroke-width=\"2\"/>\n",
        points.join(" ")
    ));

    for (i, a) in answers.iter().enumerate() {
        let color = if a.correct { "#22c55e" } else { "#ef4444" };
        svg.push_str(&format!(
            "  <circle cx=\"{}\" cy=\"{}\" r=\"6\" fill=\"{}\"><title>{}</title></circle>\n",
            label_width + i * step,
            y_of(a.level),
            color,
            html_escape(&a.question_id)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

fn generate_bar_chart(tallies: &BTreeMap<String, Tally>) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = tallies.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 100,
        total_height
    );

    for (i, (label, tally)) in tallies.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let accuracy = tally.accuracy();
        let width = (accuracy * max_width as f64) as usize;

        let color = if accuracy >= 0.8 {
            "#22c55e"
        } else if accuracy >= 0.5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}% ({}/{})</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            accuracy * 100.0,
            tally.correct,
            tally.asked
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const na = Number(va), nb = Number(vb);
    const cmp = !isNaN(na) && !isNaN(nb) ? na - nb : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
