//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Building and emission-point map layers with polygon filtering."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Map layers are read once from CSV. The `coordinates` column of both files
//! holds JSON: a ring list for buildings, a single `[x, y]` pair for points.
//! A building is within a query polygon when every exterior vertex passes the
//! even-odd rule (holes exclude) and no building edge properly crosses a ring
//! of that polygon. Collinear boundary overlaps count as inside.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{AnalyticsError, Result};

/// Rings of one polygon, exterior first; each ring is a list of `[x, y]`.
pub type PolygonCoordinates = Vec<Vec<[f64; 2]>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolygonKind {
    Polygon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultiPolygonKind {
    MultiPolygon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: PolygonKind,
    pub coordinates: PolygonCoordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiPolygonGeometry {
    #[serde(rename = "type")]
    pub kind: MultiPolygonKind,
    pub coordinates: Vec<PolygonCoordinates>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: PointKind,
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingProperties {
    #[serde(rename = "buildingType")]
    pub building_type: String,
    #[serde(rename = "heatType")]
    pub heat_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointProperties {
    #[serde(rename = "buildingType")]
    pub building_type: String,
    #[serde(rename = "heatType")]
    pub heat_type: String,
    #[serde(rename = "boilerEmission")]
    pub boiler_emission: String,
    #[serde(rename = "CO2")]
    pub co2: f64,
    #[serde(rename = "CO")]
    pub co: f64,
    #[serde(rename = "SOX")]
    pub sox: f64,
    #[serde(rename = "NOX")]
    pub nox: f64,
    #[serde(rename = "Benzoapiren")]
    pub benzoapiren: f64,
    #[serde(rename = "PM10")]
    pub pm10: f64,
    #[serde(rename = "PM25")]
    pub pm25: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<G, P> {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    pub id: i64,
    pub geometry: G,
    pub properties: P,
}

pub type BuildingFeature = Feature<PolygonGeometry, BuildingProperties>;
pub type PointFeature = Feature<PointGeometry, PointProperties>;

#[derive(Debug, Deserialize)]
struct BuildingRecord {
    id: i64,
    coordinates: String,
    #[serde(rename = "buildingType")]
    building_type: String,
    #[serde(rename = "heatType")]
    heat_type: String,
}

#[derive(Debug, Deserialize)]
struct PointRecord {
    id: i64,
    coordinates: String,
    #[serde(rename = "buildingType")]
    building_type: String,
    #[serde(rename = "heatType")]
    heat_type: String,
    #[serde(rename = "boilerEmission")]
    boiler_emission: String,
    #[serde(rename = "CO2")]
    co2: f64,
    #[serde(rename = "CO")]
    co: f64,
    #[serde(rename = "SOX")]
    sox: f64,
    #[serde(rename = "NOX")]
    nox: f64,
    #[serde(rename = "Benzoapiren")]
    benzoapiren: f64,
    #[serde(rename = "PM10")]
    pm10: f64,
    #[serde(rename = "PM25")]
    pm25: f64,
}

fn parse_coordinates<T: serde::de::DeserializeOwned>(path: &Path, id: i64, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|err| AnalyticsError::StaticData {
        path: path.to_path_buf(),
        reason: format!("feature {id}: bad coordinates: {err}"),
    })
}

pub fn load_buildings(path: impl AsRef<Path>) -> Result<Vec<BuildingFeature>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize::<BuildingRecord>()
        .map(|record| {
            let record = record?;
            Ok(Feature {
                kind: FeatureKind::Feature,
                id: record.id,
                geometry: PolygonGeometry {
                    kind: PolygonKind::Polygon,
                    coordinates: parse_coordinates(path, record.id, &record.coordinates)?,
                },
                properties: BuildingProperties {
                    building_type: record.building_type,
                    heat_type: record.heat_type,
                },
            })
        })
        .collect()
}

pub fn load_points(path: impl AsRef<Path>) -> Result<Vec<PointFeature>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize::<PointRecord>()
        .map(|record| {
            let record = record?;
            Ok(Feature {
                kind: FeatureKind::Feature,
                id: record.id,
                geometry: PointGeometry {
                    kind: PointKind::Point,
                    coordinates: parse_coordinates(path, record.id, &record.coordinates)?,
                },
                properties: PointProperties {
                    building_type: record.building_type,
                    heat_type: record.heat_type,
                    boiler_emission: record.boiler_emission,
                    co2: record.co2,
                    co: record.co,
                    sox: record.sox,
                    nox: record.nox,
                    benzoapiren: record.benzoapiren,
                    pm10: record.pm10,
                    pm25: record.pm25,
                },
            })
        })
        .collect()
}

fn ring_contains(ring: &[[f64; 2]], [x, y]: [f64; 2]) -> bool {
    let mut inside = false;
    let mut j = ring.len().wrapping_sub(1);
    for (i, &[xi, yi]) in ring.iter().enumerate() {
        let [xj, yj] = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Point inside the exterior ring and outside every hole.
pub fn polygon_contains(polygon: &[Vec<[f64; 2]>], point: [f64; 2]) -> bool {
    let Some((exterior, holes)) = polygon.split_first() else {
        return false;
    };
    ring_contains(exterior, point) && !holes.iter().any(|hole| ring_contains(hole, point))
}

fn orientation(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

/// Segments cross at a single interior point of both.
fn segments_cross(p1: [f64; 2], p2: [f64; 2], q1: [f64; 2], q2: [f64; 2]) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

fn edges(ring: &[[f64; 2]]) -> impl Iterator<Item = ([f64; 2], [f64; 2])> + '_ {
    ring.windows(2).map(|pair| (pair[0], pair[1]))
}

/// `ring` lies inside `polygon`: all vertices contained, no edge crossing.
pub fn polygon_covers_ring(polygon: &[Vec<[f64; 2]>], ring: &[[f64; 2]]) -> bool {
    if ring.is_empty() || !ring.iter().all(|&vertex| polygon_contains(polygon, vertex)) {
        return false;
    }
    !edges(ring).any(|(a, b)| {
        polygon
            .iter()
            .flat_map(|boundary| edges(boundary))
            .any(|(c, d)| segments_cross(a, b, c, d))
    })
}

/// Both map layers, loaded once.
#[derive(Debug, Clone, Default)]
pub struct MapLayers {
    buildings: Vec<BuildingFeature>,
    points: Vec<PointFeature>,
}

impl MapLayers {
    pub fn new(buildings: Vec<BuildingFeature>, points: Vec<PointFeature>) -> Self {
        Self { buildings, points }
    }

    /// Read both layers; a missing file leaves its layer empty.
    pub fn load(polygons: &Path, points: &Path) -> Result<Self> {
        let buildings = if polygons.is_file() {
            load_buildings(polygons)?
        } else {
            warn!(path = %polygons.display(), "building layer not found");
            Vec::new()
        };
        let points = if points.is_file() {
            load_points(points)?
        } else {
            warn!(path = %points.display(), "point layer not found");
            Vec::new()
        };
        debug!(
            buildings = buildings.len(),
            points = points.len(),
            "map layers loaded"
        );
        Ok(Self { buildings, points })
    }

    pub fn points(&self) -> &[PointFeature] {
        &self.points
    }

    /// Buildings whose exterior ring lies inside one of `polygons`.
    pub fn buildings_within(&self, polygons: &[PolygonCoordinates]) -> Vec<BuildingFeature> {
        self.buildings
            .iter()
            .filter(|building| {
                building
                    .geometry
                    .coordinates
                    .first()
                    .is_some_and(|exterior| {
                        polygons.iter().any(|p| polygon_covers_ring(p, exterior))
                    })
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, side: f64) -> Vec<[f64; 2]> {
        vec![
            [x0, y0],
            [x0 + side, y0],
            [x0 + side, y0 + side],
            [x0, y0 + side],
            [x0, y0],
        ]
    }

    fn building(id: i64, ring: Vec<[f64; 2]>) -> BuildingFeature {
        Feature {
            kind: FeatureKind::Feature,
            id,
            geometry: PolygonGeometry {
                kind: PolygonKind::Polygon,
                coordinates: vec![ring],
            },
            properties: BuildingProperties {
                building_type: "SINGLE_FAMILY".into(),
                heat_type: "GAS".into(),
            },
        }
    }

    #[test]
    fn even_odd_rule_respects_holes() {
        let with_hole = vec![square(0.0, 0.0, 10.0), square(4.0, 4.0, 2.0)];
        assert!(polygon_contains(&with_hole, [1.0, 1.0]));
        assert!(!polygon_contains(&with_hole, [5.0, 5.0]));
        assert!(!polygon_contains(&with_hole, [11.0, 1.0]));
        assert!(!polygon_contains(&[], [1.0, 1.0]));
    }

    #[test]
    fn only_fully_contained_buildings_are_returned() {
        let layers = MapLayers::new(
            vec![
                building(1, square(1.0, 1.0, 1.0)),
                building(2, square(9.0, 9.0, 3.0)),
                building(3, square(21.0, 1.0, 1.0)),
            ],
            Vec::new(),
        );
        let query = vec![vec![square(0.0, 0.0, 10.0)], vec![square(20.0, 0.0, 5.0)]];
        let ids: Vec<_> = layers.buildings_within(&query).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(layers.buildings_within(&query[..1]).iter().all(|b| b.id == 1));
    }

    #[test]
    fn edges_crossing_a_concave_boundary_are_excluded() {
        // U shape open at the top between x=4 and x=6.
        let u_shape = vec![vec![
            [0.0, 0.0],
            [10.0, 0.0],
            [10.0, 10.0],
            [6.0, 10.0],
            [6.0, 4.0],
            [4.0, 4.0],
            [4.0, 10.0],
            [0.0, 10.0],
            [0.0, 0.0],
        ]];
        let bridging = vec![[2.0, 8.0], [8.0, 8.0], [8.0, 9.0], [2.0, 9.0], [2.0, 8.0]];
        assert!(bridging.iter().all(|&v| polygon_contains(&u_shape, v)));
        assert!(!polygon_covers_ring(&u_shape, &bridging));
        assert!(polygon_covers_ring(&u_shape, &square(1.0, 1.0, 2.0)));

        let layers = MapLayers::new(
            vec![building(5, bridging), building(6, square(1.0, 1.0, 2.0))],
            Vec::new(),
        );
        let ids: Vec<_> = layers.buildings_within(&[u_shape]).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![6]);
    }

    #[test]
    fn building_spanning_two_query_polygons_is_excluded() {
        let layers = MapLayers::new(vec![building(8, square(8.0, 1.0, 4.0))], Vec::new());
        let query = vec![vec![square(0.0, 0.0, 10.0)], vec![square(10.0, 0.0, 10.0)]];
        assert!(layers.buildings_within(&query).is_empty());
    }

    #[test]
    fn features_serialise_as_geojson() {
        let json = serde_json::to_value(building(7, square(0.0, 0.0, 1.0))).unwrap();
        assert_eq!(json["type"], "Feature");
        assert_eq!(json["geometry"]["type"], "Polygon");
        assert_eq!(json["properties"]["heatType"], "GAS");
    }

    #[test]
    fn csv_layers_decode_json_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let polygons = dir.path().join("polygons.csv");
        std::fs::write(
            &polygons,
            "id,coordinates,buildingType,heatType\n\
             4,\"[[[0,0],[1,0],[1,1],[0,0]]]\",SINGLE_FAMILY,GAS\n",
        )
        .unwrap();
        let points = dir.path().join("points.csv");
        std::fs::write(
            &points,
            "id,coordinates,buildingType,heatType,boilerEmission,CO2,CO,SOX,NOX,Benzoapiren,PM10,PM25\n\
             9,\"[2.5,3.5]\",OFFICE,COAL,high,1,2,3,4,5,6,7\n",
        )
        .unwrap();
        let layers = MapLayers::load(&polygons, &points).unwrap();
        assert_eq!(layers.buildings[0].geometry.coordinates[0].len(), 4);
        assert_eq!(layers.points()[0].geometry.coordinates, [2.5, 3.5]);
        assert_eq!(layers.points()[0].properties.pm25, 7.0);

        let empty = MapLayers::load(&dir.path().join("none.csv"), &points).unwrap();
        assert!(empty.buildings.is_empty());
    }
}
