//! WASM bindings for the cartogram map engine.
//!
//! The bindings are stateless: a [`CartMap`] or [`Transformer`] is passed in
//! from JavaScript as a plain object, updated, and handed back. Anything that
//! mutates state returns the new state alongside its result.

use cartogram_core::{
    error::MapError,
    legend::{AreaLegend, AreaRow, LegendCheck, LegendConfig, LegendText},
    map::{draw::HighlightChange, geojson::FeatureCollection, DrawPlan, LayerData, PolygonTransition, TooltipData, VersionExtras},
    CartMap, GallPeters, LegendGrid, Mappack, StretchDirection, Transformer, WorldProjection, R2,
};
use log::{error, info};
use serde::{de::DeserializeOwned, Serialize};
use tsify::{declare, Tsify};
use wasm_bindgen::prelude::*;
use wasm_bindgen_console_logger::DEFAULT_LOGGER;

/// `[x, y]`, or `[longitude, latitude]` in degrees.
#[declare]
pub type Point = [f64; 2];

/// A row-major 3×3 matrix.
#[declare]
pub type Matrix = Vec<Vec<f64>>;

#[derive(Serialize, Tsify)]
pub struct InitResult {
    pub map: CartMap,
    /// Sysname of the last version added.
    pub sysname: String,
}

#[derive(Serialize, Tsify)]
pub struct LegendResult {
    pub map: CartMap,
    pub grid: LegendGrid,
}

#[derive(Serialize, Tsify)]
pub struct HighlightResult {
    pub map: CartMap,
    pub change: HighlightChange,
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(JsValue::from)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn map_err(e: MapError) -> JsValue {
    error!("{}", e);
    JsValue::from_str(&e.to_string())
}

/// Initializes the logging system for WASM.
///
/// Sets up console logging and panic hooks for better error reporting in the browser.
/// Should be called once at application startup.
#[wasm_bindgen]
pub fn init_logs() {
    match log::set_logger(&DEFAULT_LOGGER) {
        Ok(_) => info!("Initialized console.logger"),
        Err(e) => error!("failed to set console.logger: {}", e),
    };
    console_error_panic_hook::set_once();
}

/// Updates the log level filter.
///
/// # Arguments
/// * `level` - Log level string: "error", "warn", "info", "debug", or "trace".
///   Defaults to "info" if empty or null.
#[wasm_bindgen]
pub fn update_log_level(level: JsValue) {
    let level: Option<String> = serde_wasm_bindgen::from_value(level).unwrap_or_default();
    let level = cartogram_core::parse_log_level(level.as_deref());
    log::set_max_level(level);
}

/// Builds a map from a mappack: the first data layer becomes the base
/// version, the rest are equalized against it.
///
/// # Returns
/// An [`InitResult`] with the map and the sysname of the last version.
#[wasm_bindgen]
pub fn init_map(name: String, mappack: JsValue) -> Result<JsValue, JsValue> {
    let mappack: Mappack = from_js(mappack)?;
    let mut map = CartMap::new(name);
    let sysname = map.init(&mappack).map_err(map_err)?;
    to_js(&InitResult { map, sysname })
}

/// Adds (or replaces) one version, e.g. a cartogram returned by the
/// generator, equalizing it against `base_sysname` if that version exists.
///
/// # Returns
/// The updated map.
#[wasm_bindgen]
pub fn add_version(map: JsValue, sysname: String, layer: JsValue, base_sysname: String) -> Result<JsValue, JsValue> {
    let mut map: CartMap = from_js(map)?;
    let layer: LayerData = from_js(layer)?;
    map.add_layer(&sysname, &layer, VersionExtras::default(), &base_sysname)
        .map_err(map_err)?;
    to_js(&map)
}

/// A version's raw geometry as a GeoJSON [`FeatureCollection`].
#[wasm_bindgen]
pub fn version_geojson(map: JsValue, sysname: String) -> Result<JsValue, JsValue> {
    let map: CartMap = from_js(map)?;
    let fc: FeatureCollection = map.version_geojson(&sysname).map_err(map_err)?;
    to_js(&fc)
}

/// Computes a version's legend grid over the shared canvas.
///
/// # Returns
/// A [`LegendResult`]: the map (with the grid stored on the version) and the grid.
#[wasm_bindgen]
pub fn legend(map: JsValue, sysname: String) -> Result<JsValue, JsValue> {
    let mut map: CartMap = from_js(map)?;
    let grid = map.legend(&sysname).map_err(map_err)?;
    to_js(&LegendResult { map, grid })
}

/// Checks that grid option `option` accounts for the version's total value.
#[wasm_bindgen]
pub fn verify_legend(map: JsValue, sysname: String, option: usize) -> Result<JsValue, JsValue> {
    let mut map: CartMap = from_js(map)?;
    let check: LegendCheck = map.verify_legend(&sysname, option).map_err(map_err)?;
    to_js(&check)
}

/// Static-legend text for grid option `option`, e.g. `5 million people`.
#[wasm_bindgen]
pub fn legend_text(map: JsValue, sysname: String, option: usize) -> Result<JsValue, JsValue> {
    let mut map: CartMap = from_js(map)?;
    let text: LegendText = map.legend_text(&sysname, option).map_err(map_err)?;
    to_js(&text)
}

#[wasm_bindgen]
pub fn total_text(map: JsValue, sysname: String) -> Result<String, JsValue> {
    let map: CartMap = from_js(map)?;
    map.total_text(&sysname).map_err(map_err)
}

/// What to draw for a version: a [`DrawPlan`].
#[wasm_bindgen]
pub fn draw_version(map: JsValue, sysname: String) -> Result<JsValue, JsValue> {
    let map: CartMap = from_js(map)?;
    let plan: DrawPlan = map.draw_version(&sysname).map_err(map_err)?;
    to_js(&plan)
}

/// Per-polygon [`PolygonTransition`]s for animating from one version to another.
#[wasm_bindgen]
pub fn switch_version(map: JsValue, from: String, to: String) -> Result<JsValue, JsValue> {
    let map: CartMap = from_js(map)?;
    let transitions: Vec<PolygonTransition> = map.switch_version(&from, &to).map_err(map_err)?;
    to_js(&transitions)
}

#[wasm_bindgen]
pub fn highlight(map: JsValue, region_id: String) -> Result<JsValue, JsValue> {
    let mut map: CartMap = from_js(map)?;
    let change = map.highlight_by_id(&region_id).map_err(map_err)?;
    to_js(&HighlightResult { map, change })
}

#[wasm_bindgen]
pub fn unhighlight(map: JsValue) -> Result<JsValue, JsValue> {
    let mut map: CartMap = from_js(map)?;
    let change = map.unhighlight();
    to_js(&HighlightResult { map, change })
}

/// [`TooltipData`] for one region, across all versions.
#[wasm_bindgen]
pub fn tooltip(map: JsValue, region_id: String) -> Result<JsValue, JsValue> {
    let map: CartMap = from_js(map)?;
    let tooltip: TooltipData = map.tooltip(&region_id).map_err(map_err)?;
    to_js(&tooltip)
}

/// `[nice, power]` such that `nice · 10^power` is the nice number closest to
/// `value`, or `null` for non-positive input.
#[wasm_bindgen]
pub fn find_nearest_nice_number(value: f64) -> Result<JsValue, JsValue> {
    to_js(&cartogram_core::find_nearest_nice_number(value))
}

#[wasm_bindgen]
pub fn format_compact(value: f64) -> String {
    cartogram_core::format_compact(value)
}

/// Product of two row-major 3×3 matrices; errors on any other shape.
#[wasm_bindgen]
pub fn multiply_matrix(a: JsValue, b: JsValue) -> Result<JsValue, JsValue> {
    let a: Matrix = from_js(a)?;
    let b: Matrix = from_js(b)?;
    let product = cartogram_core::multiply_matrix(&a, &b).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&product)
}

/// Projects `[longitude, latitude]` with Gall–Peters.
#[wasm_bindgen]
pub fn gall_peters(long_lat: JsValue) -> Result<JsValue, JsValue> {
    let long_lat: Point = from_js(long_lat)?;
    let projected: Point = GallPeters.transform_long_lat(R2::from(long_lat)).into();
    to_js(&projected)
}

/// A fresh gesture [`Transformer`]: identity matrix, unit scale.
#[wasm_bindgen]
pub fn make_transformer() -> Result<JsValue, JsValue> {
    to_js(&Transformer::new())
}

/// Pointer-down at `now` (ms). A double tap resets the transform.
#[wasm_bindgen]
pub fn pointer_down(transformer: JsValue, id: i32, x: f64, y: f64, now: f64) -> Result<JsValue, JsValue> {
    let mut t: Transformer = from_js(transformer)?;
    t.pointer_down(id, R2::new(x, y), now);
    to_js(&t)
}

#[wasm_bindgen]
pub fn pointer_move(
    transformer: JsValue,
    id: i32,
    x: f64,
    y: f64,
    lock_ratio: bool,
    now: f64,
) -> Result<JsValue, JsValue> {
    let mut t: Transformer = from_js(transformer)?;
    t.pointer_move(id, R2::new(x, y), lock_ratio, now);
    to_js(&t)
}

#[wasm_bindgen]
pub fn pointer_up(transformer: JsValue, id: i32) -> Result<JsValue, JsValue> {
    let mut t: Transformer = from_js(transformer)?;
    t.pointer_up(id);
    to_js(&t)
}

/// # Arguments
/// * `direction` - `"x"` or `"y"`: the axis an unlocked wheel stretches.
#[wasm_bindgen]
pub fn wheel(transformer: JsValue, delta: f64, shift: bool, lock_ratio: bool, direction: JsValue) -> Result<JsValue, JsValue> {
    let mut t: Transformer = from_js(transformer)?;
    let direction: Option<StretchDirection> = from_js(direction)?;
    t.wheel(delta, shift, lock_ratio, direction.unwrap_or_default());
    to_js(&t)
}

#[wasm_bindgen]
pub fn reset_transform(transformer: JsValue) -> Result<JsValue, JsValue> {
    let mut t: Transformer = from_js(transformer)?;
    t.reset();
    to_js(&t)
}

#[wasm_bindgen]
pub fn set_grid_scale_nice_number(transformer: JsValue, value: f64) -> Result<JsValue, JsValue> {
    let mut t: Transformer = from_js(transformer)?;
    t.set_grid_scale_nice_number(value);
    to_js(&t)
}

#[wasm_bindgen]
pub fn snap_to_better_number(transformer: JsValue) -> Result<JsValue, JsValue> {
    let mut t: Transformer = from_js(transformer)?;
    t.snap_to_better_number();
    to_js(&t)
}

/// SVG `transform` attribute for the transformer's current matrix.
#[wasm_bindgen]
pub fn svg_transform(transformer: JsValue) -> Result<String, JsValue> {
    let t: Transformer = from_js(transformer)?;
    Ok(t.svg_transform())
}

/// A resizable legend seeded from a map version, with its grid options
/// computed.
#[wasm_bindgen]
pub fn area_legend(map: JsValue, sysname: String) -> Result<JsValue, JsValue> {
    let map: CartMap = from_js(map)?;
    to_js(&map.area_legend(&sysname).map_err(map_err)?)
}

/// An empty resizable legend; `config` may be omitted for the defaults.
#[wasm_bindgen]
pub fn make_area_legend(config: JsValue) -> Result<JsValue, JsValue> {
    let config: Option<LegendConfig> = from_js(config)?;
    to_js(&AreaLegend::new(config.unwrap_or_default()))
}

/// Totals from per-region `{ value, area }` rows, NA values imputed.
#[wasm_bindgen]
pub fn area_legend_init(legend: JsValue, rows: JsValue) -> Result<JsValue, JsValue> {
    let mut legend: AreaLegend = from_js(legend)?;
    let rows: Vec<AreaRow> = from_js(rows)?;
    legend.init(&rows);
    to_js(&legend)
}

/// Replaces the total area with the sum of the regions' current on-screen
/// areas.
#[wasm_bindgen]
pub fn area_legend_update_total_area(legend: JsValue, areas: Vec<f64>) -> Result<JsValue, JsValue> {
    let mut legend: AreaLegend = from_js(legend)?;
    legend.update_total_area(areas);
    to_js(&legend)
}

#[wasm_bindgen]
pub fn area_legend_update_grid_data(legend: JsValue) -> Result<JsValue, JsValue> {
    let mut legend: AreaLegend = from_js(legend)?;
    legend.update_grid_data();
    to_js(&legend)
}

/// Sets `value_text` for grid option `grid_index` under the transformer's
/// accumulated zoom.
#[wasm_bindgen]
pub fn area_legend_update_value(legend: JsValue, grid_index: usize, transformer: JsValue) -> Result<JsValue, JsValue> {
    let mut legend: AreaLegend = from_js(legend)?;
    let t: Transformer = from_js(transformer)?;
    let scale = t.affine_scale();
    legend.update_legend_value(grid_index, (scale.x, scale.y));
    to_js(&legend)
}
