//! HTML assembly for the pages served by the app.
//!
//! The markup is deliberately plain: a form page and a results page. All
//! dynamic text goes through [`escape`]; the chart SVG is trusted markup
//! produced by the chart module.

use election_report::SearchResult;

pub const HOME_PROMPT: &str =
    "Enter a postcode to find local results of the 2017 General Election:";
pub const RETRY_PROMPT: &str = "That didn't work ... want to try again?";

/// Minimal HTML escaping for text nodes and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n  \
         <title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

/// The landing page, also re-used as the retry page with a different header.
pub fn form_page(header: &str) -> String {
    let body = format!(
        "  <h1>{}</h1>\n  <form action=\"/search\" method=\"post\">\n    \
         <input type=\"text\" name=\"postcode_lookup\" placeholder=\"e.g. SW1A 1AA\" required>\n    \
         <button type=\"submit\">Search</button>\n  </form>",
        escape(header)
    );
    page("2017 General Election lookup", &body)
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "  <h1>Something went wrong</h1>\n  <p>{}</p>\n  <p><a href=\"/\">Search again</a></p>",
        escape(message)
    );
    page("2017 General Election lookup", &body)
}

/// The results page: constituency heading, narrative sub-headings, the
/// candidate table, and the chart.
pub fn results_page(result: &SearchResult, chart_svg: &str) -> String {
    let winner_text = match &result.winner_profile_url {
        Some(url) if !url.is_empty() => format!(
            "<a href=\"{}\">{}</a>",
            escape(url),
            escape(&result.winner)
        ),
        _ => escape(&result.winner),
    };

    let mut body = format!("  <h1>{}</h1>\n", escape(&result.constituency));
    body.push_str(&format!(
        "  <h2>{} of eligible voters turned out</h2>\n",
        escape(&result.turnout.label)
    ));
    if let Some(phrase) = result.incumbency.phrase() {
        body.push_str(&format!(
            "  <h2>{} {} {}</h2>\n",
            winner_text,
            escape(&phrase),
            escape(&result.constituency)
        ));
    } else {
        body.push_str(&format!("  <h2>{} won the seat</h2>\n", winner_text));
    }
    body.push_str(&format!(
        "  <h2>{}</h2>\n",
        escape(&result.safety.message(&result.winner))
    ));

    body.push_str("  <table>\n    <tr><th>Candidate</th><th>Party</th><th>Vote share</th></tr>\n");
    for line in &result.candidates {
        body.push_str(&format!(
            "    <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&line.name),
            escape(&line.party),
            escape(&line.share_label)
        ));
    }
    body.push_str("  </table>\n");

    body.push_str("  <div class=\"chart\">\n");
    body.push_str(chart_svg);
    body.push_str("  </div>");

    page(&format!("{} - 2017 results", result.constituency), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use election_report::{
        CandidateLine, ChartSeries, Incumbency, SafetyVerdict, SeatSafety, TurnoutSummary,
    };

    fn sample_result(incumbency: Incumbency, url: Option<&str>) -> SearchResult {
        SearchResult {
            constituency: "Testshire".to_string(),
            winner: "Alice O'Neill".to_string(),
            winner_profile_url: url.map(|u| u.to_string()),
            turnout: TurnoutSummary {
                fraction: 0.55,
                label: "Only 55.0%".to_string(),
            },
            incumbency,
            safety: SeatSafety {
                margin_points: 25.0,
                verdict: SafetyVerdict::Safe,
            },
            candidates: vec![
                CandidateLine {
                    name: "Alice O'Neill".to_string(),
                    party: "Red".to_string(),
                    share_label: "55.0%".to_string(),
                },
                CandidateLine {
                    name: "Other".to_string(),
                    party: "Other".to_string(),
                    share_label: "0.0%".to_string(),
                },
            ],
            series: ChartSeries {
                parties: vec!["Red".to_string(), "Other".to_string()],
                values: vec![55.0, 0.0],
                colours: vec!["#DC241f".to_string(), "#000000".to_string()],
            },
        }
    }

    #[test]
    fn form_page_posts_the_lookup_field() {
        let html = form_page(HOME_PROMPT);
        assert!(html.contains("name=\"postcode_lookup\""));
        assert!(html.contains("action=\"/search\""));
        assert!(html.contains("2017 General Election"));
    }

    #[test]
    fn dynamic_text_is_escaped() {
        let html = form_page("a <b> & 'c'");
        assert!(html.contains("a &lt;b&gt; &amp; &#39;c&#39;"));
    }

    #[test]
    fn winner_with_profile_is_linked() {
        let html = results_page(
            &sample_result(Incumbency::Held, Some("https://example.org/alice")),
            "",
        );
        assert!(html.contains("<a href=\"https://example.org/alice\">Alice O&#39;Neill</a>"));
        assert!(html.contains("held Testshire"));
    }

    #[test]
    fn winner_without_profile_is_plain_text() {
        let html = results_page(&sample_result(Incumbency::Held, None), "");
        assert!(!html.contains("<a href"));
        assert!(html.contains("Alice O&#39;Neill"));
    }

    #[test]
    fn unknown_incumbency_omits_the_held_ousted_heading() {
        let html = results_page(&sample_result(Incumbency::Unknown, None), "");
        assert!(!html.contains("held Testshire"));
        assert!(!html.contains("kicked"));
        assert!(html.contains("won the seat"));
    }

    #[test]
    fn results_page_carries_turnout_and_chart() {
        let html = results_page(&sample_result(Incumbency::Held, None), "<svg></svg>");
        assert!(html.contains("Only 55.0% of eligible voters turned out"));
        assert!(html.contains("<svg></svg>"));
        assert!(html.contains("<td>55.0%</td>"));
    }
}
