//! GeoJSON response assembly.
//!
//! Output geometry is reprojected from the local metric CRS back to
//! geographic (longitude, latitude) order, and every derived attribute
//! is flattened into the feature's properties.

use geojson::{Feature, Geometry, feature::Id};
use serde_json::{Map, json};
use skysweep_geometry::LocalProjection;
use skysweep_models::{ScoredCandidate, ThreatLevel};

/// Builds one output feature for a scored candidate.
pub(crate) fn to_feature(
    id: usize,
    site: &ScoredCandidate,
    projection: &LocalProjection,
) -> Feature {
    let geographic = projection.multi_polygon_to_geographic(&site.candidate.geometry);

    let mut properties = Map::new();
    properties.insert("id".to_string(), json!(id));
    properties.insert("type".to_string(), json!(site.candidate.site_type));
    properties.insert("area".to_string(), json!(site.candidate.area));
    properties.insert("levels".to_string(), json!(site.candidate.levels));
    properties.insert("building_tag".to_string(), json!(site.candidate.building_tag));
    properties.insert("amenity_tag".to_string(), json!(site.candidate.amenity_tag));
    properties.insert("office_type".to_string(), json!(site.candidate.office_type));
    properties.insert("natural_tag".to_string(), json!(site.candidate.natural_tag));
    properties.insert("landuse_tag".to_string(), json!(site.candidate.landuse_tag));
    properties.insert("threat_score".to_string(), json!(site.threat_score));
    properties.insert(
        "threat_level".to_string(),
        json!(ThreatLevel::from_score(site.threat_score)),
    );
    properties.insert("is_hidden".to_string(), json!(site.metrics.is_hidden));
    properties.insert("dist_to_road".to_string(), json!(site.metrics.dist_to_road));
    properties.insert("nearest_road_type".to_string(), json!(site.nearest_road_type));
    properties.insert(
        "nearest_security_dist".to_string(),
        json!(site.metrics.nearest_security_dist),
    );
    properties.insert("dist_to_center".to_string(), json!(site.metrics.dist_to_center));
    properties.insert("est_flight_time".to_string(), json!(site.metrics.est_flight_time));
    properties.insert("elevation_z".to_string(), json!(site.metrics.elevation_z));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(&geographic))),
        id: Some(Id::Number(id.into())),
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, polygon};
    use skysweep_models::{Candidate, SiteMetrics, SiteType};

    #[test]
    fn feature_carries_full_attribute_set() {
        let mut candidate = Candidate::new(
            MultiPolygon::new(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 10.0, y: 0.0),
                (x: 10.0, y: 10.0),
                (x: 0.0, y: 10.0),
            ]]),
            100.0,
            SiteType::Building,
        );
        candidate.building_tag = Some("apartments".to_string());
        candidate.levels = Some(3);

        let site = ScoredCandidate {
            candidate,
            metrics: SiteMetrics {
                dist_to_road: 42.0,
                is_hidden: true,
                nearest_security_dist: 9999.0,
                dist_to_center: 300.0,
                est_flight_time: 20.0,
                elevation_z: 12.5,
            },
            nearest_road_type: "residential".to_string(),
            threat_score: 85.0,
        };

        let projection = LocalProjection::new(28.6139, 77.209);
        let feature = to_feature(7, &site, &projection);

        let properties = feature.properties.unwrap();
        assert_eq!(properties["id"], json!(7));
        assert_eq!(properties["type"], json!("Building"));
        assert_eq!(properties["levels"], json!(3));
        assert_eq!(properties["building_tag"], json!("apartments"));
        assert_eq!(properties["natural_tag"], serde_json::Value::Null);
        assert_eq!(properties["threat_level"], json!("critical"));
        assert_eq!(properties["is_hidden"], json!(true));
        assert_eq!(properties["nearest_road_type"], json!("residential"));
        assert_eq!(feature.id, Some(Id::Number(7.into())));

        // Geometry must be back in geographic coordinates near the origin.
        let Some(geometry) = feature.geometry else {
            panic!("feature has no geometry");
        };
        let geojson::Value::MultiPolygon(rings) = geometry.value else {
            panic!("expected a MultiPolygon geometry");
        };
        let first = &rings[0][0][0];
        assert!((first[0] - 77.209).abs() < 0.01);
        assert!((first[1] - 28.6139).abs() < 0.01);
    }
}
