//! SVG rendering of a map version's draw plan.

use std::fmt::{self, Write};

use cartogram_core::map::draw::{DrawPlan, STROKE_WIDTH};

/// SVG rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub background: Option<String>,
    pub stroke: String,
    pub stroke_width: f64,
    /// Whether to draw abbreviation / pre-rendered labels
    pub show_labels: bool,
    /// Legend grid path to overlay, if any
    pub grid_path: Option<String>,
    /// SVG `transform` for the map group, e.g. from a gesture transformer
    pub transform: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: Some("white".to_string()),
            stroke: "#000".to_string(),
            stroke_width: STROKE_WIDTH,
            show_labels: true,
            grid_path: None,
            transform: None,
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

pub fn write_svg<W: Write>(out: &mut W, plan: &DrawPlan, config: &RenderConfig) -> fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{}">"#,
        plan.width,
        plan.height,
        plan.view_box(),
    )?;
    if let Some(background) = &config.background {
        writeln!(out, r#"  <rect width="100%" height="100%" fill="{}"/>"#, background)?;
    }
    match &config.transform {
        Some(transform) => writeln!(out, r#"  <g class="root" id="{}" transform="{}">"#, plan.sysname, transform)?,
        None => writeln!(out, r#"  <g class="root" id="{}">"#, plan.sysname)?,
    }
    for polygon in &plan.polygons {
        writeln!(
            out,
            r#"    <path id="path-{}-{}" d="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
            plan.sysname, polygon.polygon_id, polygon.path.trim_end(), polygon.fill, config.stroke, config.stroke_width,
        )?;
    }
    if config.show_labels {
        for text in &plan.labels.texts {
            writeln!(
                out,
                r#"    <text x="{}" y="{}" font-size="{}" text-anchor="middle">{}</text>"#,
                text.x, text.y, plan.font_size, escape(&text.text),
            )?;
        }
        for line in &plan.labels.lines {
            writeln!(
                out,
                r#"    <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"/>"#,
                line.x1, line.y1, line.x2, line.y2, config.stroke, config.stroke_width,
            )?;
        }
    }
    writeln!(out, "  </g>")?;
    if let Some(grid_path) = &config.grid_path {
        writeln!(
            out,
            r#"  <path class="grid" d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="0.4"/>"#,
            grid_path.trim_end(), config.stroke, config.stroke_width,
        )?;
    }
    writeln!(out, "</svg>")
}

/// Render a draw plan to an SVG string
pub fn render_svg(plan: &DrawPlan, config: &RenderConfig) -> Result<String, fmt::Error> {
    let mut svg = String::new();
    write_svg(&mut svg, plan, config)?;
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use cartogram_core::map::draw::{LabelLayout, PlacedText, PolygonDraw};
    use test_log::test;

    use super::*;

    fn plan() -> DrawPlan {
        DrawPlan {
            sysname: "0-base".to_string(),
            width: 350.,
            height: 175.,
            polygons: vec![PolygonDraw {
                region_id: "1".to_string(),
                polygon_id: "1".to_string(),
                path: "M 0,175 L 175,175 L 175,0 z ".to_string(),
                fill: "#111111".to_string(),
                na: false,
                elevated: false,
            }],
            labels: LabelLayout {
                texts: vec![PlacedText { x: 87.5, y: 87.5, text: "A&B".to_string() }],
                lines: vec![],
            },
            font_size: "9px".to_string(),
        }
    }

    #[test]
    fn render_plan() {
        let svg = render_svg(&plan(), &RenderConfig::default()).unwrap();
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="350" height="175" viewBox="0 0 350 175">"#));
        assert!(svg.contains(r##"<path id="path-0-base-1" d="M 0,175 L 175,175 L 175,0 z" fill="#111111""##));
        assert!(svg.contains(r#"font-size="9px" text-anchor="middle">A&amp;B</text>"#));
        assert!(!svg.contains("grid"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn grid_and_transform() {
        let config = RenderConfig {
            show_labels: false,
            grid_path: Some("M20 0 L20 175 ".to_string()),
            transform: Some("matrix(2 0 0 2 0 0)".to_string()),
            ..RenderConfig::default()
        };
        let svg = render_svg(&plan(), &config).unwrap();
        assert!(svg.contains(r#"<path class="grid" d="M20 0 L20 175""#));
        assert!(svg.contains(r#"transform="matrix(2 0 0 2 0 0)""#));
        assert!(!svg.contains("<text"));
    }
}
