//! GeoJSON input layer loading.
//!
//! Each layer file is a GeoJSON `FeatureCollection` in geographic
//! lon/lat. Features whose geometry type does not fit the layer are
//! skipped with a log line; a missing or unparsable file is fatal.

use std::path::{Path, PathBuf};

use geo::{Centroid, Geometry, MultiPolygon};
use geojson::{Feature, FeatureCollection, GeoJson};
use skysweep_models::{BuildingFeature, SecurityNode, VegetationFeature};
use skysweep_roads::RoadSegment;
use skysweep_roads::network::DEFAULT_ROAD_CLASS;
use thiserror::Error;

/// Errors loading a GeoJSON layer file.
#[derive(Debug, Error)]
pub enum LayerError {
    /// The layer file could not be read.
    #[error("failed to read layer {path}: {source}")]
    Read {
        /// The layer file.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The layer file is not a valid GeoJSON feature collection.
    #[error("failed to parse layer {path}: {source}")]
    Parse {
        /// The layer file.
        path: PathBuf,
        /// Underlying GeoJSON error.
        source: geojson::Error,
    },
}

/// Loads the building footprint layer.
///
/// # Errors
///
/// Returns [`LayerError`] if the file cannot be read or parsed.
pub fn load_buildings(path: &Path) -> Result<Vec<BuildingFeature>, LayerError> {
    Ok(parse_buildings(&feature_collection(path)?))
}

/// Loads the vegetation/open-land layer.
///
/// # Errors
///
/// Returns [`LayerError`] if the file cannot be read or parsed.
pub fn load_vegetation(path: &Path) -> Result<Vec<VegetationFeature>, LayerError> {
    Ok(parse_vegetation(&feature_collection(path)?))
}

/// Loads the security location layer.
///
/// # Errors
///
/// Returns [`LayerError`] if the file cannot be read or parsed.
pub fn load_security(path: &Path) -> Result<Vec<SecurityNode>, LayerError> {
    Ok(parse_security(&feature_collection(path)?))
}

/// Loads the road layer.
///
/// # Errors
///
/// Returns [`LayerError`] if the file cannot be read or parsed.
pub fn load_roads(path: &Path) -> Result<Vec<RoadSegment>, LayerError> {
    Ok(parse_roads(&feature_collection(path)?))
}

fn feature_collection(path: &Path) -> Result<FeatureCollection, LayerError> {
    let contents = std::fs::read_to_string(path).map_err(|source| LayerError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson = contents.parse().map_err(|source| LayerError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    FeatureCollection::try_from(geojson).map_err(|source| LayerError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Building footprints: polygons (multi-polygons are exploded), tags
/// `building`, `amenity`, `office`, `building:levels`.
fn parse_buildings(collection: &FeatureCollection) -> Vec<BuildingFeature> {
    let mut buildings = Vec::new();
    for feature in &collection.features {
        let building_tag = string_prop(feature, "building");
        let amenity_tag = string_prop(feature, "amenity");
        let office_type = string_prop(feature, "office");
        let levels_tag = string_prop(feature, "building:levels");

        for polygon in polygons_of(feature) {
            buildings.push(BuildingFeature {
                geometry: polygon,
                building_tag: building_tag.clone(),
                amenity_tag: amenity_tag.clone(),
                office_type: office_type.clone(),
                levels_tag: levels_tag.clone(),
            });
        }
    }
    log::info!("Loaded {} building footprints", buildings.len());
    buildings
}

/// Vegetation features: polygonal geometry, tags `building`, `natural`,
/// `landuse`.
fn parse_vegetation(collection: &FeatureCollection) -> Vec<VegetationFeature> {
    let mut vegetation = Vec::new();
    for feature in &collection.features {
        let polygons = polygons_of(feature);
        if polygons.is_empty() {
            continue;
        }
        vegetation.push(VegetationFeature {
            geometry: MultiPolygon::new(polygons),
            building_tag: string_prop(feature, "building"),
            natural_tag: string_prop(feature, "natural"),
            landuse_tag: string_prop(feature, "landuse"),
        });
    }
    log::info!("Loaded {} vegetation features", vegetation.len());
    vegetation
}

/// Security locations: points directly, polygonal features by centroid.
fn parse_security(collection: &FeatureCollection) -> Vec<SecurityNode> {
    let mut nodes = Vec::new();
    for feature in &collection.features {
        let position = match geo_geometry(feature) {
            Some(Geometry::Point(point)) => Some(point),
            Some(Geometry::Polygon(polygon)) => polygon.centroid(),
            Some(Geometry::MultiPolygon(mp)) => mp.centroid(),
            Some(other) => {
                log::debug!("Skipping security feature with {other:?} geometry");
                None
            }
            None => None,
        };
        if let Some(position) = position {
            nodes.push(SecurityNode {
                position,
                category: security_category(feature),
            });
        }
    }
    log::info!("Loaded {} security locations", nodes.len());
    nodes
}

/// Road features: each line string contributes one segment per
/// consecutive coordinate pair, tagged with the `highway` property.
fn parse_roads(collection: &FeatureCollection) -> Vec<RoadSegment> {
    let mut segments = Vec::new();
    for feature in &collection.features {
        let highway =
            string_prop(feature, "highway").unwrap_or_else(|| DEFAULT_ROAD_CLASS.to_string());

        let lines = match geo_geometry(feature) {
            Some(Geometry::LineString(line)) => vec![line],
            Some(Geometry::MultiLineString(multi)) => multi.0,
            _ => continue,
        };

        for line in lines {
            for pair in line.0.windows(2) {
                segments.push(RoadSegment {
                    start: pair[0].into(),
                    end: pair[1].into(),
                    highway: highway.clone(),
                });
            }
        }
    }
    log::info!("Loaded {} road segments", segments.len());
    segments
}

/// Resolves a security feature's category tag. Security layers mix
/// sources: `amenity` (police), `military` (barracks, checkpoints),
/// `man_made` (surveillance), and government buildings.
fn security_category(feature: &Feature) -> Option<String> {
    string_prop(feature, "amenity")
        .or_else(|| string_prop(feature, "military"))
        .or_else(|| string_prop(feature, "man_made"))
        .or_else(|| string_prop(feature, "building").filter(|tag| tag == "government"))
}

/// Converts a feature's geometry to geo types, skipping features with no
/// geometry or an unconvertible one.
fn geo_geometry(feature: &Feature) -> Option<Geometry<f64>> {
    let geometry = feature.geometry.as_ref()?;
    match Geometry::try_from(geometry.value.clone()) {
        Ok(geometry) => Some(geometry),
        Err(error) => {
            log::warn!("Skipping feature with unconvertible geometry: {error}");
            None
        }
    }
}

/// Extracts the polygon parts of a feature, exploding multi-polygons.
fn polygons_of(feature: &Feature) -> Vec<geo::Polygon<f64>> {
    match geo_geometry(feature) {
        Some(Geometry::Polygon(polygon)) => vec![polygon],
        Some(Geometry::MultiPolygon(mp)) => mp.0,
        _ => Vec::new(),
    }
}

/// Reads a property as a string, stringifying numeric tags (e.g. a
/// numeric `building:levels`).
fn string_prop(feature: &Feature, key: &str) -> Option<String> {
    feature.property(key).and_then(|value| match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
