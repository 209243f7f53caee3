//! Inline SVG rendering of the vote-share bar chart.
//!
//! Presentation policy only: the series to plot is produced by
//! `election_report`, this module just shapes it into markup.

use election_report::ChartSeries;

use crate::app::render::escape;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ChartLayout {
    /// Wide chart with horizontal party labels.
    Desktop,
    /// Narrow chart with vertical party labels.
    Compact,
}

/// Coarse platform sniffing from the User-Agent header. Phones and tablets
/// could not fit the wide layout, so anything that does not look like a
/// desktop browser gets the compact one.
pub fn layout_for_user_agent(user_agent: Option<&str>) -> ChartLayout {
    let ua = match user_agent {
        Some(s) => s.to_ascii_lowercase(),
        None => return ChartLayout::Compact,
    };
    // Android user agents mention Linux, so mobile markers are checked first.
    if ua.contains("android") || ua.contains("mobile") {
        return ChartLayout::Compact;
    }
    const DESKTOP_MARKERS: [&str; 4] = ["windows", "macintosh", "x11", "linux"];
    if DESKTOP_MARKERS.iter().any(|m| ua.contains(m)) {
        ChartLayout::Desktop
    } else {
        ChartLayout::Compact
    }
}

/// Renders the series as a standalone SVG bar chart. The y range is pinned to
/// the first value of the series (the winner's share), matching the report's
/// framing of every other bar against the winning one. No gridlines.
pub fn render_svg(series: &ChartSeries, layout: ChartLayout) -> String {
    let (width, height, bottom_pad) = match layout {
        ChartLayout::Desktop => (640.0_f64, 360.0_f64, 36.0_f64),
        ChartLayout::Compact => (360.0, 360.0, 90.0),
    };
    let left_pad = 44.0;
    let top_pad = 16.0;
    let plot_w = width - left_pad - 16.0;
    let plot_h = height - top_pad - bottom_pad;
    let baseline = top_pad + plot_h;

    let top_value = series.values.first().copied().unwrap_or(0.0).max(1.0);
    let n = series.parties.len();

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {:.0} {:.0}\" \
         width=\"{:.0}\" height=\"{:.0}\" role=\"img\" aria-label=\"Vote share by party\">\n",
        width, height, width, height
    );

    // Axis lines and the y-range end labels.
    svg.push_str(&format!(
        "  <line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"#444\"/>\n",
        l = left_pad,
        t = top_pad,
        b = baseline
    ));
    svg.push_str(&format!(
        "  <line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"#444\"/>\n",
        l = left_pad,
        b = baseline,
        r = left_pad + plot_w
    ));
    svg.push_str(&format!(
        "  <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\" font-size=\"11\">0%</text>\n",
        x = left_pad - 6.0,
        y = baseline + 4.0
    ));
    svg.push_str(&format!(
        "  <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\" font-size=\"11\">{v:.1}%</text>\n",
        x = left_pad - 6.0,
        y = top_pad + 4.0,
        v = top_value
    ));

    for (i, party) in series.parties.iter().enumerate() {
        let value = series.values.get(i).copied().unwrap_or(0.0);
        let colour = series
            .colours
            .get(i)
            .map(String::as_str)
            .unwrap_or(election_report::DEFAULT_COLOUR);
        let slot = plot_w / n as f64;
        // Bars take up 90% of their slot.
        let bar_w = slot * 0.9;
        let x = left_pad + slot * i as f64 + (slot - bar_w) / 2.0;
        let bar_h = (value / top_value).clamp(0.0, 1.0) * plot_h;
        let y = baseline - bar_h;
        svg.push_str(&format!(
            "  <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{w:.1}\" height=\"{h:.1}\" fill=\"{c}\"/>\n",
            x = x,
            y = y,
            w = bar_w,
            h = bar_h,
            c = escape(colour)
        ));

        let label_x = x + bar_w / 2.0;
        match layout {
            ChartLayout::Desktop => {
                svg.push_str(&format!(
                    "  <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"middle\" font-size=\"12\">{label}</text>\n",
                    x = label_x,
                    y = baseline + 16.0,
                    label = escape(party)
                ));
            }
            ChartLayout::Compact => {
                svg.push_str(&format!(
                    "  <text x=\"{x:.1}\" y=\"{y:.1}\" text-anchor=\"end\" font-size=\"12\" \
                     transform=\"rotate(-90 {x:.1} {y:.1})\">{label}</text>\n",
                    x = label_x + 4.0,
                    y = baseline + 12.0,
                    label = escape(party)
                ));
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP_UA: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/58.0";
    const ANDROID_UA: &str =
        "Mozilla/5.0 (Linux; Android 7.0; Pixel) AppleWebKit/537.36 Mobile Safari/537.36";
    const IPHONE_UA: &str =
        "Mozilla/5.0 (iPhone; CPU iPhone OS 10_3 like Mac OS X) Mobile/14E304";

    fn series() -> ChartSeries {
        ChartSeries {
            parties: vec![
                "Red".to_string(),
                "Blue".to_string(),
                "Other".to_string(),
            ],
            values: vec![45.0, 40.0, 1.0],
            colours: vec![
                "#DC241f".to_string(),
                "#0087DC".to_string(),
                "#000000".to_string(),
            ],
        }
    }

    #[test]
    fn desktop_platforms_get_the_wide_layout() {
        assert_eq!(layout_for_user_agent(Some(DESKTOP_UA)), ChartLayout::Desktop);
        assert_eq!(
            layout_for_user_agent(Some("Mozilla/5.0 (X11; Linux x86_64)")),
            ChartLayout::Desktop
        );
    }

    #[test]
    fn mobile_and_unknown_platforms_get_the_compact_layout() {
        assert_eq!(layout_for_user_agent(Some(ANDROID_UA)), ChartLayout::Compact);
        assert_eq!(layout_for_user_agent(Some(IPHONE_UA)), ChartLayout::Compact);
        assert_eq!(layout_for_user_agent(None), ChartLayout::Compact);
    }

    #[test]
    fn one_bar_per_party_with_its_colour() {
        let svg = render_svg(&series(), ChartLayout::Desktop);
        assert_eq!(svg.matches("<rect").count(), 3);
        assert!(svg.contains("fill=\"#DC241f\""));
        assert!(svg.contains("fill=\"#0087DC\""));
        assert!(svg.contains(">Other</text>"));
    }

    #[test]
    fn compact_layout_rotates_the_labels() {
        let svg = render_svg(&series(), ChartLayout::Compact);
        assert!(svg.contains("rotate(-90"));
        let wide = render_svg(&series(), ChartLayout::Desktop);
        assert!(!wide.contains("rotate(-90"));
    }

    #[test]
    fn winner_bar_spans_the_full_plot_height() {
        let svg = render_svg(&series(), ChartLayout::Desktop);
        // Top of the y range is the winner's value.
        assert!(svg.contains(">45.0%</text>"));
    }
}
