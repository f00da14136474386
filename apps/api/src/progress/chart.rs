use crate::models::progress::WeightEntry;
use crate::progress::aggregator::{chart_points, chronological, weight_bounds};

pub const DEFAULT_WIDTH: f64 = 600.0;
pub const DEFAULT_HEIGHT: f64 = 250.0;
pub const DEFAULT_PADDING: f64 = 40.0;

pub const PLACEHOLDER_TEXT: &str = "Registre seu peso para ver o gráfico";

const GRID_STEPS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

#[derive(Debug, Clone, Copy)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            padding: DEFAULT_PADDING,
        }
    }
}

/// Renders the weight trend as a standalone SVG document.
///
/// With fewer than two entries the document only carries the placeholder text.
pub fn render_svg(entries: &[WeightEntry], size: ChartSize) -> String {
    let ChartSize {
        width,
        height,
        padding,
    } = size;

    let points = match chart_points(entries, width, height, padding) {
        Ok(points) => points,
        Err(_) => return placeholder_svg(width, height),
    };

    let (min, max) = weight_bounds(&chronological(entries));
    let range = max - min;
    let plot_height = height - padding * 2.0;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="{height}" viewBox="0 0 {width} {height}">"#
    );

    for pct in GRID_STEPS {
        let y = padding + (pct / 100.0) * plot_height;
        let label = max - (pct / 100.0) * range;
        svg.push_str(&format!(
            r#"<line x1="{padding}" y1="{y}" x2="{x2}" y2="{y}" stroke="rgba(255,255,255,0.1)" />"#,
            x2 = width - padding,
        ));
        svg.push_str(&format!(
            r##"<text x="{x}" y="{ty}" fill="#666" font-size="10" text-anchor="end">{label:.1}</text>"##,
            x = padding - 5.0,
            ty = y + 4.0,
        ));
    }

    let path = points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{} {} {}", if i == 0 { "M" } else { "L" }, p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    // chart_points guarantees at least two points.
    let (first_x, last_x) = (points[0].x, points[points.len() - 1].x);
    let baseline = height - padding;

    svg.push_str(&format!(
        r#"<path d="{path}" fill="none" stroke="url(#lineGradient)" stroke-width="3" />"#
    ));
    svg.push_str(&format!(
        r#"<path d="{path} L {last_x} {baseline} L {first_x} {baseline} Z" fill="url(#areaGradient)" opacity="0.3" />"#
    ));
    for p in &points {
        svg.push_str(&format!(
            r##"<circle cx="{}" cy="{}" r="6" fill="#1B5E20" stroke="#00E676" stroke-width="2"><title>{} kg ({})</title></circle>"##,
            p.x, p.y, p.weight, p.date
        ));
    }

    svg.push_str(concat!(
        "<defs>",
        r#"<linearGradient id="lineGradient" x1="0%" y1="0%" x2="100%" y2="0%">"#,
        r##"<stop offset="0%" stop-color="#1B5E20" />"##,
        r##"<stop offset="100%" stop-color="#00E676" />"##,
        "</linearGradient>",
        r#"<linearGradient id="areaGradient" x1="0%" y1="0%" x2="0%" y2="100%">"#,
        r##"<stop offset="0%" stop-color="#1B5E20" />"##,
        r#"<stop offset="100%" stop-color="transparent" />"#,
        "</linearGradient>",
        "</defs>",
        "</svg>",
    ));
    svg
}

fn placeholder_svg(width: f64, height: f64) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="{height}" viewBox="0 0 {width} {height}"><text x="{x}" y="{y}" fill="#666" font-size="14" text-anchor="middle">{PLACEHOLDER_TEXT}</text></svg>"##,
        x = width / 2.0,
        y = height / 2.0,
    )
}
