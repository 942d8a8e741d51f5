//! What to draw for a version, how to animate between versions, and
//! highlight/tooltip state, expressed as plain data for a renderer.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::cart_map::CartMap;
use super::ids::{PolygonId, RegionId};
use super::mappack::Labels;
use super::value::RegionValue;
use super::version::MapVersion;
use crate::error::MapError;
use crate::geometry::projection::{GallPeters, WorldProjection};
use crate::geometry::r2::R2;

/// Fill of regions without a value.
pub const NA_COLOR: &str = "#CCCCCC";
pub const DEFAULT_FONT_SIZE: &str = "7px";
pub const HIGHLIGHT_STROKE_WIDTH: f64 = 2.;
pub const STROKE_WIDTH: f64 = 0.5;
/// Width, in px, of the drawing world-map labels were placed on.
pub const WORLD_LABEL_WIDTH: f64 = 750.;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct PolygonDraw {
    pub region_id: RegionId,
    pub polygon_id: PolygonId,
    pub path: String,
    pub fill: String,
    pub na: bool,
    pub elevated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct PlacedText {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct PlacedLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
pub struct LabelLayout {
    pub texts: Vec<PlacedText>,
    pub lines: Vec<PlacedLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct DrawPlan {
    pub sysname: String,
    pub width: f64,
    pub height: f64,
    /// Polygons in drawing order; elevated ones last.
    pub polygons: Vec<PolygonDraw>,
    pub labels: LabelLayout,
    pub font_size: String,
}

impl DrawPlan {
    /// `viewBox` attribute spanning the shared canvas.
    pub fn view_box(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct PolygonTransition {
    pub region_id: RegionId,
    pub polygon_id: PolygonId,
    pub from_path: String,
    /// The source path when the target version lacks this polygon.
    pub to_path: String,
    #[tsify(type = "[number, number] | null")]
    pub label_position: Option<R2<f64>>,
    pub fill: String,
    pub na: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct StrokeChange {
    pub region_id: RegionId,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
pub struct HighlightChange {
    pub changes: Vec<StrokeChange>,
    pub previous: Option<RegionId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct TooltipVersion {
    pub sysname: String,
    pub name: String,
    #[tsify(type = "number | \"NA\"")]
    pub value: RegionValue,
    pub unit: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Tsify)]
pub struct TooltipData {
    pub name: String,
    pub abbreviation: String,
    pub entries: Vec<TooltipVersion>,
}

/// Places pre-rendered labels on a version's canvas.
///
/// Labels are drawn on a copy of the map scaled by `labels.scale_x` /
/// `labels.scale_y`. World-map labels were drawn on an equirectangular map
/// instead, so they go back to longitude/latitude, through Gall–Peters, and
/// onto a [`WORLD_LABEL_WIDTH`]-wide drawing before scaling.
pub fn layout_labels(version: &MapVersion, labels: &Labels) -> LabelLayout {
    let (width, height) = (version.extrema.width(), version.extrema.height());
    let (dx, dy) = (version.dimension.x, version.dimension.y);
    let place: Box<dyn Fn(f64, f64) -> (f64, f64)> = if version.world {
        let gall = GallPeters;
        let world = gall.extrema();
        let gall_scale = WORLD_LABEL_WIDTH / world.width();
        let (sx, sy) = (dx / (width * gall_scale), dy / (height * gall_scale));
        let (scale_x, scale_y) = (labels.scale_x, labels.scale_y);
        Box::new(move |x: f64, y: f64| {
            let long_lat = R2::new(x / scale_x - 180., 90. - y / scale_y);
            let projected = gall.transform_long_lat(long_lat);
            let ink_x = (projected.x - world.min_x) * gall_scale;
            let ink_y = (world.max_y - projected.y) * gall_scale;
            (ink_x * sx, ink_y * sy)
        })
    } else {
        let sx = dx / (width * labels.scale_x);
        let sy = dy / (height * labels.scale_y);
        Box::new(move |x: f64, y: f64| (x * sx, y * sy))
    };
    let texts = labels
        .labels
        .iter()
        .map(|label| {
            let (x, y) = place(label.x, label.y);
            PlacedText { x, y, text: label.text.clone() }
        })
        .collect();
    let lines = labels
        .lines
        .iter()
        .map(|line| {
            let (x1, y1) = place(line.x1, line.y1);
            let (x2, y2) = place(line.x2, line.y2);
            PlacedLine { x1, y1, x2, y2 }
        })
        .collect();
    LabelLayout { texts, lines }
}

impl CartMap {
    fn fill(&self, region_id: &str, value: &RegionValue) -> String {
        if value.is_na() {
            return NA_COLOR.to_string();
        }
        match self.colors.get(region_id) {
            Some(color) => color.clone(),
            None => {
                warn!("{}: no color for region {}", self.name, region_id);
                NA_COLOR.to_string()
            }
        }
    }

    /// Pre-rendered labels of a version, placed on its canvas; `None` when
    /// the version has none.
    pub fn label_layout(&self, sysname: &str) -> Result<Option<LabelLayout>, MapError> {
        let version = self.version(sysname)?;
        Ok(version.labels.as_ref().map(|labels| layout_labels(version, labels)))
    }

    pub fn draw_version(&self, sysname: &str) -> Result<DrawPlan, MapError> {
        let version = self.version(sysname)?;
        let mut polygons = vec![];
        let mut abbreviations = vec![];
        for (region_id, region, rv) in self.regions_in(sysname) {
            let fill = self.fill(region_id, &rv.value);
            for polygon in &rv.polygons {
                if self.config.dont_draw.contains(&polygon.id) {
                    continue;
                }
                polygons.push(PolygonDraw {
                    region_id: region_id.clone(),
                    polygon_id: polygon.id.clone(),
                    path: polygon.path.clone(),
                    fill: fill.clone(),
                    na: rv.value.is_na(),
                    elevated: self.config.elevate.contains(&polygon.id),
                });
                if let Some(R2 { x, y }) = polygon.represent_pt {
                    abbreviations.push(PlacedText { x, y, text: region.label().to_string() });
                }
            }
        }
        // Stable: elevated polygons move to the end, keeping their order.
        polygons.sort_by_key(|p| p.elevated);

        let (labels, font_size) = match &version.labels {
            Some(labels) => (layout_labels(version, labels), DEFAULT_FONT_SIZE.to_string()),
            None => (
                LabelLayout { texts: abbreviations, lines: vec![] },
                self.config.label_size.clone().unwrap_or_else(|| DEFAULT_FONT_SIZE.to_string()),
            ),
        };
        Ok(DrawPlan {
            sysname: sysname.to_string(),
            width: self.max_width,
            height: self.max_height,
            polygons,
            labels,
            font_size,
        })
    }

    /// Per-polygon animation from version `from` to version `to`. Polygons
    /// with no counterpart in `to` keep their path; a region missing from
    /// `to` altogether is shown as NA.
    pub fn switch_version(&self, from: &str, to: &str) -> Result<Vec<PolygonTransition>, MapError> {
        self.version(from)?;
        self.version(to)?;
        let mut transitions = vec![];
        for (region_id, region, source) in self.regions_in(from) {
            let target = region.versions.get(to);
            let value = target.map_or(RegionValue::NotAvailable, |t| t.value);
            let fill = self.fill(region_id, &value);
            for polygon in &source.polygons {
                let next = target.and_then(|t| t.polygon(&polygon.id));
                if next.is_none() {
                    debug!("{} → {}: polygon {} missing in target, keeping its path", from, to, polygon.id);
                }
                transitions.push(PolygonTransition {
                    region_id: region_id.clone(),
                    polygon_id: polygon.id.clone(),
                    from_path: polygon.path.clone(),
                    to_path: next.map_or_else(|| polygon.path.clone(), |p| p.path.clone()),
                    label_position: next.and_then(|p| p.represent_pt),
                    fill: fill.clone(),
                    na: value.is_na(),
                });
            }
        }
        Ok(transitions)
    }

    /// Highlights `region_id`, unhighlighting whichever region was
    /// highlighted before.
    pub fn highlight_by_id(&mut self, region_id: &str) -> Result<HighlightChange, MapError> {
        self.region(region_id)?;
        let mut change = if self.highlighted_region.as_deref() == Some(region_id) {
            HighlightChange { changes: vec![], previous: self.highlighted_region.clone() }
        } else {
            self.unhighlight()
        };
        change.changes.push(StrokeChange {
            region_id: region_id.to_string(),
            stroke_width: HIGHLIGHT_STROKE_WIDTH,
        });
        self.highlighted_region = Some(region_id.to_string());
        Ok(change)
    }

    pub fn unhighlight(&mut self) -> HighlightChange {
        match self.highlighted_region.take() {
            Some(previous) => HighlightChange {
                changes: vec![StrokeChange { region_id: previous.clone(), stroke_width: STROKE_WIDTH }],
                previous: Some(previous),
            },
            None => HighlightChange::default(),
        }
    }

    /// Name, abbreviation and one entry per version for a region.
    pub fn tooltip(&self, region_id: &str) -> Result<TooltipData, MapError> {
        let region = self.region(region_id)?;
        let entries = region
            .versions
            .iter()
            .map(|(sysname, rv)| TooltipVersion {
                sysname: sysname.clone(),
                name: rv.name.clone(),
                value: rv.value,
                unit: rv.unit.clone(),
            })
            .collect();
        Ok(TooltipData {
            name: region.name.clone(),
            abbreviation: region.label().to_string(),
            entries,
        })
    }
}
