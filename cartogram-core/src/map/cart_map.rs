use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use super::equalize::size_version;
use super::geojson::FeatureCollection;
use super::ids::RegionId;
use super::mappack::{LayerData, MapConfig, Mappack};
use super::region::{MapPolygon, Region, RegionVersion};
use super::repo::Repo;
use super::version::{LegendData, MapVersion};
use super::version_data::{MapVersionData, VersionExtras};
use crate::error::MapError;
use crate::geometry::r2::R2;
use crate::legend::area::{impute_totals, AreaLegend, AreaRow};
use crate::legend::format::{format_legend_value, format_total, LegendText};
use crate::legend::grid::{LegendConfig, LegendGrid};
use crate::legend::verify::{verify_legend, LegendCheck};

pub const BASE_SYSNAME: &str = "0-base";
const COLOR_KEY_PREFIX: &str = "id_";

/// A map with several versions: one geography drawn over different datasets
/// (land area on the conventional map, population or GDP on cartograms).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Tsify)]
pub struct CartMap {
    pub name: String,
    /// Fill color per region id.
    pub colors: BTreeMap<RegionId, String>,
    pub config: MapConfig,
    #[serde(default)]
    pub legend_config: LegendConfig,
    pub regions: Repo<Region>,
    pub versions: Repo<MapVersion>,
    /// Largest canvas over all versions; every version shares this viewBox.
    pub max_width: f64,
    pub max_height: f64,
    pub highlighted_region: Option<RegionId>,
}

impl CartMap {
    pub fn new(name: impl Into<String>) -> Self {
        CartMap { name: name.into(), ..Default::default() }
    }

    /// Adds every layer named in `config.data_names`: the first as
    /// [`BASE_SYSNAME`], the rest as `"{i}-{name}"` equalized against it.
    /// Returns the last sysname added.
    pub fn init(&mut self, mappack: &Mappack) -> Result<String, MapError> {
        self.config = mappack.config.clone();
        let data_names = mappack.config.data_names();
        let mut sysname = BASE_SYSNAME.to_string();
        for (idx, data_name) in data_names.iter().enumerate() {
            let layer = mappack.layer(data_name)?;
            let extras = if idx == 0 {
                VersionExtras {
                    abbreviations: Some(&mappack.abbreviations),
                    labels: mappack.labels.as_ref(),
                }
            } else {
                VersionExtras::default()
            };
            sysname = if idx == 0 { BASE_SYSNAME.to_string() } else { format!("{}-{}", idx, data_name) };
            self.add_layer(&sysname, &layer, extras, BASE_SYSNAME)?;
        }

        self.colors = self
            .regions
            .keys()
            .filter_map(|region_id| {
                let color = mappack.colors.get(&format!("{}{}", COLOR_KEY_PREFIX, region_id));
                if color.is_none() {
                    warn!("{}: no color for region {}", self.name, region_id);
                }
                color.map(|c| (region_id.clone(), c.clone()))
            })
            .collect();
        info!(
            "{}: initialized {} regions, versions {:?}",
            self.name,
            self.regions.len(),
            self.versions.keys().collect::<Vec<_>>(),
        );
        Ok(sysname)
    }

    pub fn add_layer(
        &mut self,
        sysname: &str,
        layer: &LayerData,
        extras: VersionExtras,
        base_sysname: &str,
    ) -> Result<(), MapError> {
        let data = MapVersionData::from_layer(layer, extras)?;
        self.add_version(sysname, data, base_sysname)
    }

    /// Sizes, equalizes against `base_sysname` (if present) and stores a
    /// version, replacing any previous version under `sysname`.
    ///
    /// Re-adding the base itself sizes it by aspect ratio only. Regions that
    /// aren't in the new layer lose their entry for `sysname`, and regions
    /// left with no versions at all are dropped.
    pub fn add_version(&mut self, sysname: &str, data: MapVersionData, base_sysname: &str) -> Result<(), MapError> {
        let rows: Vec<AreaRow> = data
            .regions
            .values()
            .map(|r| AreaRow { value: r.value, area: r.area() })
            .collect();
        let (geo_area, total_value) = impute_totals(&rows);
        let base_drawn_area = if sysname == base_sysname {
            None
        } else {
            self.versions.get(base_sysname).map(|v| v.legend.drawn_area)
        };
        if base_drawn_area.is_none() {
            debug!("{}: base version {} not present, sizing by aspect ratio only", sysname, base_sysname);
        }
        let sizing = size_version(sysname, &data.extrema, geo_area, self.config.scale, base_drawn_area)?;

        let stale = self
            .regions
            .values_mut()
            .map(|region| region.versions.remove(sysname))
            .filter(Option::is_some)
            .count();
        if stale > 0 {
            debug!("{}: cleared {} previous region entries", sysname, stale);
        }

        let extrema = data.extrema;
        let project = |p: R2<f64>| sizing.project(&extrema, p);
        for (region_id, region) in data.regions {
            let polygons = region
                .polygons
                .into_iter()
                .map(|raw| MapPolygon {
                    path: raw.polygon.path(project),
                    represent_pt: raw.represent_pt.map(project),
                    id: raw.id,
                    raw: raw.polygon,
                })
                .collect();
            let name = region.name;
            let abbreviation = region.abbreviation;
            self.regions
                .entry_or_insert_with(&region_id, || Region::new(name, abbreviation))
                .versions
                .upsert(
                    sysname,
                    RegionVersion {
                        name: data.name.clone(),
                        unit: data.unit.clone(),
                        value: region.value,
                        polygons,
                    },
                );
        }

        let replaced = self.versions.upsert(
            sysname,
            MapVersion {
                name: data.name,
                unit: data.unit,
                extrema,
                dimension: sizing.dimension,
                scale: sizing.scale,
                labels: data.labels,
                world: data.world,
                legend: LegendData {
                    drawn_area: sizing.drawn_area,
                    geo_area: sizing.geo_area,
                    total_value,
                    grid: None,
                },
            },
        );
        if replaced.is_some() {
            debug!("{}: replaced existing version", sysname);
        }
        self.regions.retain(|_, region| !region.versions.is_empty());
        self.max_width = self.versions.values().map(|v| v.dimension.x).fold(0., f64::max);
        self.max_height = self.versions.values().map(|v| v.dimension.y).fold(0., f64::max);
        Ok(())
    }

    pub fn version(&self, sysname: &str) -> Result<&MapVersion, MapError> {
        self.versions
            .get(sysname)
            .ok_or_else(|| MapError::UnknownVersion(sysname.to_string()))
    }

    pub fn region(&self, region_id: &str) -> Result<&Region, MapError> {
        self.regions
            .get(region_id)
            .ok_or_else(|| MapError::UnknownRegion(region_id.to_string()))
    }

    /// Regions with data for `sysname`, in region-id order.
    pub fn regions_in<'a>(
        &'a self,
        sysname: &'a str,
    ) -> impl Iterator<Item = (&'a RegionId, &'a Region, &'a RegionVersion)> + 'a {
        self.regions
            .iter()
            .filter_map(move |(region_id, region)| region.versions.get(sysname).map(|rv| (region_id, region, rv)))
    }

    /// A version's raw geometry as a GeoJSON FeatureCollection, one
    /// MultiPolygon feature per region.
    pub fn version_geojson(&self, sysname: &str) -> Result<FeatureCollection, MapError> {
        let version = self.version(sysname)?;
        let features = self
            .regions_in(sysname)
            .map(|(region_id, region, rv)| rv.to_geojson(&region.name, region_id))
            .collect();
        Ok(FeatureCollection::new(version.extrema.bbox(), features))
    }

    /// Geographic area and total value (NA regions imputed) of a version.
    pub fn total_areas_and_values(&self, sysname: &str) -> Result<(f64, f64), MapError> {
        self.version(sysname)?;
        let rows: Vec<AreaRow> = self
            .regions_in(sysname)
            .map(|(_, _, rv)| AreaRow { value: rv.value, area: rv.area() })
            .collect();
        Ok(impute_totals(&rows))
    }

    /// Computes a version's legend grid over the shared canvas and stores it
    /// on the version.
    pub fn legend(&mut self, sysname: &str) -> Result<LegendGrid, MapError> {
        let (max_width, max_height) = (self.max_width, self.max_height);
        let config = self.legend_config.clone();
        let version = self
            .versions
            .get_mut(sysname)
            .ok_or_else(|| MapError::UnknownVersion(sysname.to_string()))?;
        let legend = &mut version.legend;
        let mut grid = LegendGrid::compute(legend.total_value, legend.drawn_area, &config)
            .ok_or_else(|| MapError::NoLegend(sysname.to_string()))?;
        grid.trace_paths(max_width, max_height, config.grid_lines);
        debug!(
            "{}: legend {} per square at {}px, options {:?}",
            sysname,
            grid.value_per_square,
            grid.base_width,
            grid.options.iter().map(|o| o.nice_number).collect::<Vec<_>>(),
        );
        legend.grid = Some(grid.clone());
        Ok(grid)
    }

    fn stored_grid(&mut self, sysname: &str) -> Result<LegendGrid, MapError> {
        match &self.version(sysname)?.legend.grid {
            Some(grid) => Ok(grid.clone()),
            None => self.legend(sysname),
        }
    }

    /// Checks grid option `option` against the version's totals.
    pub fn verify_legend(&mut self, sysname: &str, option: usize) -> Result<LegendCheck, MapError> {
        let grid = self.stored_grid(sysname)?;
        let width = grid.option(option)?.width;
        let value = grid.square_value(option)?;
        let legend = &self.version(sysname)?.legend;
        Ok(verify_legend(sysname, width, value, legend.drawn_area, legend.total_value))
    }

    /// Static-legend text for grid option `option`.
    pub fn legend_text(&mut self, sysname: &str, option: usize) -> Result<LegendText, MapError> {
        let grid = self.stored_grid(sysname)?;
        let nice = grid.option(option)?.nice_number;
        let unit = &self.version(sysname)?.unit;
        Ok(format_legend_value(nice, grid.scale_power_of_10, unit))
    }

    /// A resizable legend seeded from a version's regions, with areas in
    /// canvas px².
    pub fn area_legend(&self, sysname: &str) -> Result<AreaLegend, MapError> {
        let px_per_unit = self.version(sysname)?.scale.area();
        let rows: Vec<AreaRow> = self
            .regions_in(sysname)
            .map(|(_, _, rv)| AreaRow { value: rv.value, area: rv.area() * px_per_unit })
            .collect();
        let mut legend = AreaLegend::new(self.legend_config.clone());
        legend.init(&rows);
        legend.update_grid_data();
        Ok(legend)
    }

    pub fn total_text(&self, sysname: &str) -> Result<String, MapError> {
        let version = self.version(sysname)?;
        Ok(format_total(version.legend.total_value, &version.unit))
    }
}
