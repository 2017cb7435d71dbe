//! Leaflet HTML map rendering.
//!
//! Consumes a [`PipelineResult`] and emits a self-contained HTML page:
//! one polyline per multi-point individual in its class color, circle
//! markers colored by recency-blended color and sized by intensity, and a
//! legend with per-class individual counts plus a time gradient. The page
//! pulls Leaflet from its CDN; nothing else is external.

use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::{AnimalClass, IndividualPath, MigrationMapError, PipelineConfig, PipelineResult, Result};

/// Map view when there is no data to frame.
const FALLBACK_CENTER: (f64, f64) = (30.0, -20.0);
const FALLBACK_ZOOM: u8 = 2;

/// One circle marker, serialized into the page's `animalData` array.
#[derive(Debug, Serialize)]
struct Marker<'a> {
    lat: f64,
    lng: f64,
    color: &'a str,
    #[serde(rename = "baseColor")]
    base_color: &'a str,
    intensity: f64,
    animal: AnimalClass,
    species: &'a str,
    timestamp: String,
    individual_id: &'a str,
}

/// One migration polyline, serialized into the page's `animalPaths` array.
#[derive(Debug, Serialize)]
struct PathLine<'a> {
    individual_id: &'a str,
    species: &'a str,
    animal: AnimalClass,
    #[serde(rename = "baseColor")]
    base_color: &'a str,
    /// [lat, lng] pairs in chronological order
    coords: Vec<[f64; 2]>,
}

fn markers_json(paths: &[IndividualPath]) -> serde_json::Result<String> {
    let markers: Vec<Marker<'_>> = paths
        .iter()
        .flat_map(|p| p.records.iter())
        .map(|r| Marker {
            lat: r.latitude,
            lng: r.longitude,
            color: &r.display_color,
            base_color: &r.base_color,
            intensity: r.intensity,
            animal: r.animal_class,
            species: &r.species,
            timestamp: r.timestamp.to_rfc3339(),
            individual_id: &r.individual_id,
        })
        .collect();
    serde_json::to_string(&markers)
}

fn paths_json(paths: &[IndividualPath]) -> serde_json::Result<String> {
    let lines: Vec<PathLine<'_>> = paths
        .iter()
        .filter(|p| p.point_count > 1)
        .map(|p| PathLine {
            individual_id: &p.individual_id,
            species: &p.species,
            animal: p.animal_class,
            base_color: &p.base_color,
            coords: p.records.iter().map(|r| [r.latitude, r.longitude]).collect(),
        })
        .collect();
    serde_json::to_string(&lines)
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn legend_html(result: &PipelineResult, config: &PipelineConfig) -> String {
    let mut legend = String::new();
    for class in &AnimalClass::ALL[..6] {
        let count = result.class_counts.get(*class);
        let color = config.class_table.color_for(*class);
        let name = title_case(class.as_str());
        legend.push_str(&format!(
            r#"
            <div class="legend-item">
                <span class="color-box" style="background-color: {color};"></span>
                <span>{name}: {count}</span>
            </div>"#,
        ));
    }
    legend
}

/// Render the pipeline result as a complete Leaflet HTML page.
///
/// Serialization of the marker and path arrays cannot realistically fail
/// for these types, but any serde error surfaces as `RenderError` rather
/// than panicking.
pub fn render_map(result: &PipelineResult, config: &PipelineConfig) -> Result<String> {
    let markers = markers_json(&result.paths).map_err(|e| MigrationMapError::RenderError {
        message: format!("marker serialization: {}", e),
    })?;
    let paths = paths_json(&result.paths).map_err(|e| MigrationMapError::RenderError {
        message: format!("path serialization: {}", e),
    })?;

    let (center_lat, center_lng, zoom) = match result.bounds {
        Some(b) => {
            let (lat, lng) = b.center();
            (lat, lng, 3)
        }
        None => (FALLBACK_CENTER.0, FALLBACK_CENTER.1, FALLBACK_ZOOM),
    };

    let total_animals = result.stats.individual_count;
    let total_points = result.paths.iter().map(|p| p.point_count).sum::<u32>();
    let legend = legend_html(result, config);
    let reference_now = config.intensity.reference_now.to_rfc3339();
    let window_days = config.intensity.window_days;

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Animal Tracking World Map</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.7.1/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.7.1/dist/leaflet.js"></script>
    <style>
        body {{ margin: 0; padding: 0; font-family: Arial, sans-serif; }}
        #map {{ height: 100vh; width: 100%; }}
        .info {{
            position: absolute; top: 10px; right: 10px; z-index: 1000;
            background: white; padding: 15px; border-radius: 8px;
            box-shadow: 0 2px 15px rgba(0,0,0,0.2);
            max-width: 250px; font-size: 14px;
        }}
        .legend {{ margin-top: 15px; }}
        .legend-item {{ margin: 4px 0; display: flex; align-items: center; }}
        .color-box {{
            display: inline-block; width: 18px; height: 18px;
            margin-right: 8px; border-radius: 3px; border: 1px solid #ddd;
        }}
        .time-legend {{ margin-top: 15px; padding-top: 10px; border-top: 1px solid #eee; }}
        .time-gradient {{
            height: 20px; width: 150px; margin: 5px 0;
            background: linear-gradient(to right, rgba(0,0,0,0.8), rgba(255,255,255,1));
            border-radius: 3px; border: 1px solid #ddd;
        }}
        .time-labels {{ display: flex; justify-content: space-between; font-size: 12px; color: #666; }}
        .path-info {{ margin-top: 10px; font-size: 12px; color: #666; }}
    </style>
</head>
<body>
    <div id="map"></div>
    <div class="info">
        <h3>Animal Tracking Map</h3>
        <p><strong>Total Animals:</strong> {total_animals}</p>
        <p><strong>Total Points:</strong> {total_points}</p>
        <div class="legend">
            <h4>Animal Classes:</h4>{legend}
        </div>
        <div class="time-legend">
            <h4>Time Indicator:</h4>
            <div class="time-gradient"></div>
            <div class="time-labels">
                <span>{window_days:.0} Days Ago</span>
                <span>Recent</span>
            </div>
            <p style="font-size: 12px; margin: 5px 0; color: #666;">Lighter = More Recent</p>
        </div>
        <div class="path-info">
            <strong>Migration Paths:</strong><br>
            Lines connect individual animals' journeys
        </div>
    </div>

    <script>
        var map = L.map('map').setView([{center_lat}, {center_lng}], {zoom});

        L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
            attribution: '&copy; OpenStreetMap contributors'
        }}).addTo(map);

        var animalData = {markers};
        var animalPaths = {paths};
        var referenceNow = new Date('{reference_now}');

        function titleCase(s) {{
            return s.charAt(0).toUpperCase() + s.slice(1);
        }}

        animalPaths.forEach(function(path) {{
            L.polyline(path.coords, {{
                color: path.baseColor,
                weight: 4,
                opacity: 0.8,
                smoothFactor: 1.0
            }}).bindPopup(
                '<b>' + path.species + ' Migration Path</b><br>' +
                'Individual: ' + path.individual_id + '<br>' +
                path.coords.length + ' tracking points<br>' +
                'Class: ' + titleCase(path.animal)
            ).addTo(map);
        }});

        animalData.forEach(function(marker) {{
            var circle = L.circleMarker([marker.lat, marker.lng], {{
                color: marker.color,
                fillColor: marker.color,
                fillOpacity: 0.8,
                opacity: 1,
                radius: Math.max(4, 6 + 4 * marker.intensity),
                weight: 2
            }});

            var daysAgo = Math.round((referenceNow - new Date(marker.timestamp)) / (1000 * 60 * 60 * 24));
            var recency = marker.intensity > 0.7 ? 'Recent' : marker.intensity > 0.5 ? 'Moderate' : 'Older';

            circle.bindPopup(
                '<div style="font-family: Arial, sans-serif;">' +
                '<h4 style="margin: 0 0 5px 0; color: ' + marker.baseColor + ';">' + titleCase(marker.animal) + '</h4>' +
                '<strong>Species:</strong> ' + marker.species + '<br>' +
                '<strong>Coordinates:</strong> ' + marker.lat.toFixed(4) + ', ' + marker.lng.toFixed(4) + '<br>' +
                '<strong>Date:</strong> ' + new Date(marker.timestamp).toLocaleDateString() + '<br>' +
                '<strong>Days Ago:</strong> ' + daysAgo + '<br>' +
                '<strong>Individual ID:</strong> ' + marker.individual_id + '<br>' +
                '<strong>Recency:</strong> ' + recency +
                '</div>'
            );
            circle.addTo(map);
        }});
    </script>
</body>
</html>"#,
    );

    Ok(html)
}

/// Write a rendered map to disk.
pub fn write_map<P: AsRef<Path>>(path: P, html: &str) -> Result<()> {
    fs::write(path.as_ref(), html).map_err(|e| MigrationMapError::RenderError {
        message: format!("writing '{}': {}", path.as_ref().display(), e),
    })?;

    info!("[Render] Map saved as '{}'", path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{demo_records, run_pipeline, RawRecord};
    use chrono::{TimeZone, Utc};

    fn rendered_demo() -> String {
        let config = PipelineConfig::default();
        let result = run_pipeline(demo_records(), &config);
        render_map(&result, &config).unwrap()
    }

    #[test]
    fn test_render_contains_all_individuals() {
        let html = rendered_demo();
        for id in [
            "tern_001",
            "whale_001",
            "turtle_001",
            "tuna_001",
            "frog_001",
            "monarch_001",
        ] {
            assert!(html.contains(id), "missing individual {}", id);
        }
    }

    #[test]
    fn test_render_legend_counts() {
        let html = rendered_demo();
        assert!(html.contains("<strong>Total Animals:</strong> 6"));
        assert!(html.contains("<strong>Total Points:</strong> 30"));
        assert!(html.contains("Bird: 1"));
        assert!(html.contains("Insect: 1"));
        assert!(!html.contains("bird: 1"));
    }

    #[test]
    fn test_render_embeds_class_colors() {
        let html = rendered_demo();
        assert!(html.contains("#ff6b6b")); // bird polyline color
        assert!(html.contains("#4ecdc4")); // mammal
    }

    #[test]
    fn test_render_empty_result_uses_fallback_view() {
        let config = PipelineConfig::default();
        let result = run_pipeline(vec![], &config);
        let html = render_map(&result, &config).unwrap();

        assert!(html.contains("setView([30, -20], 2)"));
        assert!(html.contains("var animalData = []"));
        assert!(html.contains("var animalPaths = []"));
    }

    #[test]
    fn test_single_point_individual_gets_marker_but_no_polyline() {
        let config = PipelineConfig::default();
        let record = RawRecord {
            latitude: 45.0,
            longitude: -120.0,
            timestamp: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
            individual_id: "lone_wolf_001".to_string(),
            study_label: "Wolf Telemetry".to_string(),
            species_label: String::new(),
        };

        let result = run_pipeline(vec![record], &config);
        let html = render_map(&result, &config).unwrap();

        assert!(html.contains("lone_wolf_001"));
        assert!(html.contains("var animalPaths = []"));
    }

    #[test]
    fn test_write_map_to_bad_path_is_render_error() {
        let err = write_map("/nonexistent-dir/animal_map.html", "<html></html>").unwrap_err();
        assert!(matches!(err, MigrationMapError::RenderError { .. }));
    }
}
