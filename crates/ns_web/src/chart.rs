use std::fmt::Write;

use crate::view::{escape_html, ChartData};

const WIDTH: f64 = 860.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 130.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 90.0;
const Y_TICKS: u32 = 5;

/// Round the axis maximum up so ticks land on whole numbers.
fn axis_step(max_total: u32) -> u32 {
    max_total.max(1).div_ceil(Y_TICKS).max(1)
}

/// Render a stacked bar chart as inline SVG. Empty data renders nothing.
pub fn render_svg(chart: &ChartData) -> String {
    if chart.is_empty() {
        return String::new();
    }

    let plot_width = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let step = axis_step(chart.max_total());
    let axis_max = step * Y_TICKS;
    let scale = plot_height / axis_max as f64;
    let band = plot_width / chart.categories.len() as f64;
    let bar_width = band * 0.6;
    let baseline = MARGIN_TOP + plot_height;
    let rotate_labels = chart.categories.len() > 6;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg class="chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" width="100%" role="img" aria-label="Sentiment over time">"#
    );

    // y axis grid and ticks
    for tick in 0..=Y_TICKS {
        let value = tick * step;
        let y = baseline - value as f64 * scale;
        let _ = write!(
            svg,
            r##"<line x1="{MARGIN_LEFT}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#444" stroke-width="0.5"/><text x="{tx:.1}" y="{ty:.1}" text-anchor="end" font-size="11" fill="#ccc">{value}</text>"##,
            x2 = MARGIN_LEFT + plot_width,
            tx = MARGIN_LEFT - 6.0,
            ty = y + 4.0,
        );
    }

    for (i, category) in chart.categories.iter().enumerate() {
        let x = MARGIN_LEFT + band * i as f64 + (band - bar_width) / 2.0;
        let mut stacked = 0u32;
        for series in &chart.series {
            let count = series.values[i];
            if count == 0 {
                continue;
            }
            let top = baseline - (stacked + count) as f64 * scale;
            let height = count as f64 * scale;
            let _ = write!(
                svg,
                r#"<rect class="bar" x="{x:.1}" y="{top:.1}" width="{bar_width:.1}" height="{height:.1}" fill="{color}"><title>{label}: {name} {count}</title></rect>"#,
                color = series.color,
                label = escape_html(category),
                name = series.name,
            );
            stacked += count;
        }

        let cx = MARGIN_LEFT + band * (i as f64 + 0.5);
        let ly = baseline + 16.0;
        let transform = if rotate_labels {
            format!(r#" transform="rotate(-40 {cx:.1} {ly:.1})""#)
        } else {
            String::new()
        };
        let anchor = if rotate_labels { "end" } else { "middle" };
        let _ = write!(
            svg,
            r##"<text x="{cx:.1}" y="{ly:.1}" text-anchor="{anchor}" font-size="11" fill="#ccc"{transform}>{label}</text>"##,
            label = escape_html(category),
        );
    }

    // axes
    let _ = write!(
        svg,
        r##"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{baseline:.1}" stroke="#ccc"/><line x1="{MARGIN_LEFT}" y1="{baseline:.1}" x2="{x2:.1}" y2="{baseline:.1}" stroke="#ccc"/>"##,
        x2 = MARGIN_LEFT + plot_width,
    );
    let _ = write!(
        svg,
        r##"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" font-size="12" fill="#eee">Date</text>"##,
        x = MARGIN_LEFT + plot_width / 2.0,
        y = HEIGHT - 8.0,
    );
    let _ = write!(
        svg,
        r##"<text x="16" y="{y:.1}" text-anchor="middle" font-size="12" fill="#eee" transform="rotate(-90 16 {y:.1})">Number of Articles</text>"##,
        y = MARGIN_TOP + plot_height / 2.0,
    );

    let legend_x = MARGIN_LEFT + plot_width + 20.0;
    let _ = write!(
        svg,
        r##"<text x="{legend_x:.1}" y="{y:.1}" font-size="12" fill="#eee">Sentiment</text>"##,
        y = MARGIN_TOP + 12.0,
    );
    for (i, series) in chart.series.iter().enumerate() {
        let y = MARGIN_TOP + 24.0 + i as f64 * 20.0;
        let _ = write!(
            svg,
            r##"<rect class="legend-swatch" x="{legend_x:.1}" y="{y:.1}" width="12" height="12" fill="{color}"/><text x="{tx:.1}" y="{ty:.1}" font-size="12" fill="#eee">{name}</text>"##,
            color = series.color,
            name = series.name,
            tx = legend_x + 18.0,
            ty = y + 10.0,
        );
    }

    svg.push_str("</svg>");
    svg
}
