//! End-to-end analysis over a small synthetic scene.
//!
//! The scene is laid out in local meters around the target and
//! reprojected to geographic coordinates before being fed in, matching
//! what a real data source would provide.

use geo::{Coord, MultiPolygon, Point, Polygon};
use serde_json::json;
use skysweep_geometry::LocalProjection;
use skysweep_models::{BuildingFeature, SecurityNode, VegetationFeature};
use skysweep_pipeline::{AnalysisConfig, AnalysisInput, analyze};
use skysweep_roads::RoadSegment;
use skysweep_server_models::AnalysisRequest;

const TARGET_LAT: f64 = 28.6139;
const TARGET_LON: f64 = 77.209;

fn geographic_square(
    projection: &LocalProjection,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
) -> Polygon<f64> {
    let corners = [
        Coord { x: x0, y: y0 },
        Coord { x: x1, y: y0 },
        Coord { x: x1, y: y1 },
        Coord { x: x0, y: y1 },
    ];
    let ring: Vec<Coord<f64>> = corners
        .iter()
        .map(|&c| projection.to_geographic(c))
        .collect();
    Polygon::new(geo::LineString::from(ring), Vec::new())
}

fn geographic_point(projection: &LocalProjection, x: f64, y: f64) -> Point<f64> {
    projection.point_to_geographic(Point::new(x, y))
}

fn scene() -> (AnalysisRequest, AnalysisInput) {
    let request = AnalysisRequest {
        lat: TARGET_LAT,
        lon: TARGET_LON,
        radius_meters: 1000.0,
    };
    let projection = LocalProjection::new(TARGET_LAT, TARGET_LON);

    // One 40x40 m apartment block (1600 m², rooftop candidate) and one
    // 30x30 m scrub patch. The building doubles as the obstacle layer.
    let buildings = vec![BuildingFeature {
        geometry: geographic_square(&projection, 200.0, 200.0, 240.0, 240.0),
        building_tag: Some("apartments".to_string()),
        amenity_tag: None,
        office_type: None,
        levels_tag: Some("3".to_string()),
    }];
    let vegetation = vec![VegetationFeature {
        geometry: MultiPolygon::new(vec![geographic_square(
            &projection,
            -330.0,
            -330.0,
            -300.0,
            -300.0,
        )]),
        building_tag: None,
        natural_tag: Some("scrub".to_string()),
        landuse_tag: None,
    }];
    let security = vec![SecurityNode {
        position: geographic_point(&projection, 500.0, 500.0),
        category: Some("police".to_string()),
    }];
    let road_segments = vec![
        RoadSegment {
            start: geographic_point(&projection, 150.0, 150.0),
            end: geographic_point(&projection, 400.0, 150.0),
            highway: "residential".to_string(),
        },
        RoadSegment {
            start: geographic_point(&projection, -400.0, -280.0),
            end: geographic_point(&projection, -200.0, -280.0),
            highway: "tertiary".to_string(),
        },
    ];

    (
        request,
        AnalysisInput {
            buildings,
            vegetation,
            security,
            road_segments,
        },
    )
}

#[tokio::test]
async fn analysis_produces_scored_features() {
    let (request, input) = scene();
    // No elevation service: the stage degrades to 0.0 everywhere.
    let config = AnalysisConfig::default();

    let response = analyze(&request, input, &config).await.unwrap();

    assert_eq!(response.status, "success");
    assert_eq!(response.stats.total_candidates, response.features.len());
    assert_eq!(response.stats.building_count, 1);
    assert_eq!(response.stats.vegetation_count, 1);
    assert_eq!(
        response.stats.hidden_count + response.stats.exposed_count,
        response.stats.total_candidates
    );
    assert!(response.stats.total_candidates >= 2);
    assert!(response.stats.max_threat_score <= 100.0);
    assert!(response.stats.mean_threat_score > 0.0);
    assert!(response.stats.min_flight_time > 0.0);

    for (expected_id, feature) in response.features.iter().enumerate() {
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["id"], json!(expected_id));

        let score = properties["threat_score"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&score));

        // Output geometry must be geographic, near the target point.
        let Some(geometry) = &feature.geometry else {
            panic!("feature {expected_id} has no geometry");
        };
        let geojson::Value::MultiPolygon(polygons) = &geometry.value else {
            panic!("feature {expected_id} is not a MultiPolygon");
        };
        let first = &polygons[0][0][0];
        assert!((first[0] - TARGET_LON).abs() < 0.05);
        assert!((first[1] - TARGET_LAT).abs() < 0.05);
    }

    let building = response
        .features
        .iter()
        .find(|f| f.properties.as_ref().unwrap()["type"] == json!("Building"))
        .unwrap();
    let properties = building.properties.as_ref().unwrap();
    assert_eq!(properties["levels"], json!(3));
    assert_eq!(properties["building_tag"], json!("apartments"));
    let area = properties["area"].as_f64().unwrap();
    assert!((area - 1600.0).abs() < 5.0, "building area {area}");
    // All elevations degraded to 0.0 without a configured service.
    assert_eq!(properties["elevation_z"], json!(0.0));
}

#[tokio::test]
async fn empty_road_layer_is_fatal() {
    let (request, mut input) = scene();
    input.road_segments.clear();
    let config = AnalysisConfig::default();

    let error = analyze(&request, input, &config).await.unwrap_err();
    assert!(error.to_string().contains("road network"));
}

#[tokio::test]
async fn out_of_range_radius_is_rejected() {
    let (mut request, input) = scene();
    request.radius_meters = 50.0;
    let config = AnalysisConfig::default();

    assert!(analyze(&request, input, &config).await.is_err());
}
