/// Wait-time heatmap artifact.
///
/// Renders one self-contained Leaflet HTML file per evaluation pass: a
/// circle marker per site, colored on a green→yellow→orange→red gradient
/// quantized to 30 steps and scaled to the baseline pass's finite waits.
/// The same vmin/vmax is reused for the post-increment map so the two
/// artifacts are directly comparable — a site that turned green really did
/// get faster, it was not the scale moving under it.
///
/// Sites with an unbounded wait take the top-of-scale color and an
/// "unstable" label; sites with undefined rates are drawn grey. Neither is
/// allowed to distort the scale of the computed values.

use std::collections::BTreeMap;
use std::error::Error;

use crate::logging::{self, PipelineStage};
use crate::model::{EvaluationPass, QueueAssessment};

// ---------------------------------------------------------------------------
// Color scale
// ---------------------------------------------------------------------------

/// Gradient stops, low wait to high.
const GRADIENT_STOPS: [(u8, u8, u8); 4] = [
    (0, 128, 0),   // green
    (255, 255, 0), // yellow
    (255, 165, 0), // orange
    (255, 0, 0),   // red
];

/// Number of discrete color steps across the gradient.
pub const GRADIENT_STEPS: u32 = 30;

/// Marker color for sites whose rates are undefined.
const UNDEFINED_COLOR: &str = "#808080";

/// vmin/vmax over a pass's finite waits. `None` when no site has one.
pub fn wait_scale(pass: &EvaluationPass) -> Option<(f64, f64)> {
    let mut scale: Option<(f64, f64)> = None;
    for evaluation in pass.sites.values() {
        if let Some(wait) = evaluation.assessment.wait_hours() {
            scale = Some(match scale {
                Some((vmin, vmax)) => (vmin.min(wait), vmax.max(wait)),
                None => (wait, wait),
            });
        }
    }
    scale
}

/// Color for a wait value on the quantized gradient.
pub fn gradient_color(value: f64, vmin: f64, vmax: f64) -> String {
    let span = vmax - vmin;
    let position = if span > 0.0 {
        ((value - vmin) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };

    // Snap to one of GRADIENT_STEPS bins, then interpolate the stops.
    let last_step = (GRADIENT_STEPS - 1) as f64;
    let stepped = (position * GRADIENT_STEPS as f64).floor().min(last_step) / last_step;

    let segments = (GRADIENT_STOPS.len() - 1) as f64;
    let scaled = stepped * segments;
    let segment = (scaled.floor() as usize).min(GRADIENT_STOPS.len() - 2);
    let fraction = scaled - segment as f64;

    let (r0, g0, b0) = GRADIENT_STOPS[segment];
    let (r1, g1, b1) = GRADIENT_STOPS[segment + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * fraction).round() as u8;

    format!("#{:02x}{:02x}{:02x}", lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

// ---------------------------------------------------------------------------
// Markers
// ---------------------------------------------------------------------------

/// One rendered marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub color: String,
    pub label: String,
}

/// Builds the markers for one pass. Sites without usable coordinates are
/// skipped (and logged) — there is nowhere to draw them.
pub fn build_markers(
    pass: &EvaluationPass,
    coordinates: &BTreeMap<String, (f64, f64)>,
    scale: Option<(f64, f64)>,
) -> Vec<MapMarker> {
    let mut markers = Vec::new();

    for evaluation in pass.sites.values() {
        let Some(&(latitude, longitude)) = coordinates.get(&evaluation.address) else {
            logging::warn(
                PipelineStage::Report,
                Some(&evaluation.address),
                "no coordinates in dataset; site left off the map",
            );
            continue;
        };

        let (color, label) = match (&evaluation.assessment, scale) {
            (QueueAssessment::Stable(m), Some((vmin, vmax))) => (
                gradient_color(m.wait_hours, vmin, vmax),
                format!("{}: {:.2} hours", evaluation.address, m.wait_hours),
            ),
            (QueueAssessment::Stable(m), None) => (
                gradient_color(0.0, 0.0, 0.0),
                format!("{}: {:.2} hours", evaluation.address, m.wait_hours),
            ),
            (QueueAssessment::Unstable { .. }, _) => (
                gradient_color(1.0, 0.0, 1.0), // top of scale
                format!("{}: unstable (demand exceeds capacity)", evaluation.address),
            ),
            (QueueAssessment::Undefined, _) => (
                UNDEFINED_COLOR.to_string(),
                format!("{}: undefined (insufficient data)", evaluation.address),
            ),
        };

        markers.push(MapMarker {
            address: evaluation.address.clone(),
            latitude,
            longitude,
            color,
            label,
        });
    }

    markers
}

// ---------------------------------------------------------------------------
// HTML rendering
// ---------------------------------------------------------------------------

const MAP_ZOOM: u32 = 14;
const MARKER_RADIUS: u32 = 15;
const MARKER_FILL_OPACITY: f64 = 0.4;

/// Renders the full HTML document for one pass's map.
pub fn render_wait_map(title: &str, center: (f64, f64), markers: &[MapMarker]) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    html.push_str("<meta charset=\"utf-8\"/>\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str(
        "<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\"/>\n",
    );
    html.push_str("<script src=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.js\"></script>\n");
    html.push_str("<style>html, body, #map { height: 100%; margin: 0; }</style>\n");
    html.push_str("</head>\n<body>\n<div id=\"map\"></div>\n<script>\n");
    html.push_str(&format!(
        "var map = L.map('map').setView([{}, {}], {});\n",
        center.0, center.1, MAP_ZOOM
    ));
    html.push_str("L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', ");
    html.push_str("{ maxZoom: 19, attribution: '&copy; OpenStreetMap contributors' }).addTo(map);\n");

    for marker in markers {
        html.push_str(&format!(
            "L.circleMarker([{}, {}], {{ radius: {}, color: '{}', fill: true, fillColor: '{}', fillOpacity: {} }})\n  .bindPopup(\"{}\").addTo(map);\n",
            marker.latitude,
            marker.longitude,
            MARKER_RADIUS,
            marker.color,
            marker.color,
            MARKER_FILL_OPACITY,
            js_escape(&marker.label),
        ));
    }

    html.push_str("</script>\n</body>\n</html>\n");
    html
}

/// Renders and writes the artifact for one pass.
pub fn save_wait_map(
    path: &str,
    title: &str,
    center: (f64, f64),
    markers: &[MapMarker],
) -> Result<(), Box<dyn Error>> {
    let html = render_wait_map(title, center, markers);
    std::fs::write(path, html)
        .map_err(|e| format!("failed to write map artifact '{}': {}", path, e))?;
    logging::info(
        PipelineStage::Report,
        None,
        &format!("📄 Map saved to: {}", path),
    );
    Ok(())
}

/// Escapes a label for embedding in a double-quoted JS string.
fn js_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{QueueMetrics, SiteEvaluation, SiteRates};

    fn stable_site(address: &str, wait_hours: f64) -> SiteEvaluation {
        SiteEvaluation {
            address: address.to_string(),
            rates: SiteRates {
                arrival_per_hour: Some(1.0),
                service_per_hour: Some(2.0),
            },
            chargers: 3,
            assessment: QueueAssessment::Stable(QueueMetrics {
                utilization: 0.5,
                queue_length: wait_hours,
                wait_hours,
                idle_probability: Some(0.3),
            }),
        }
    }

    fn pass_of(sites: Vec<SiteEvaluation>) -> EvaluationPass {
        let mut pass = EvaluationPass::default();
        for site in sites {
            pass.sites.insert(site.address.clone(), site);
        }
        pass
    }

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(gradient_color(0.0, 0.0, 1.0), "#008000", "vmin must be green");
        assert_eq!(gradient_color(1.0, 0.0, 1.0), "#ff0000", "vmax must be red");
    }

    #[test]
    fn test_gradient_clamps_out_of_range_values() {
        assert_eq!(gradient_color(-5.0, 0.0, 1.0), "#008000");
        assert_eq!(gradient_color(7.0, 0.0, 1.0), "#ff0000");
    }

    #[test]
    fn test_gradient_degenerate_span_is_low_end() {
        assert_eq!(gradient_color(0.4, 0.4, 0.4), "#008000");
    }

    #[test]
    fn test_gradient_is_quantized() {
        // Two values inside the same 1/30th bin get the same color.
        let a = gradient_color(0.001, 0.0, 1.0);
        let b = gradient_color(0.030, 0.0, 1.0);
        assert_eq!(a, b);
        // Values a full bin apart do not.
        let c = gradient_color(0.10, 0.0, 1.0);
        assert_ne!(a, c);
    }

    #[test]
    fn test_wait_scale_ignores_unstable_and_undefined() {
        let mut unstable = stable_site("250 Hamilton Ave", 0.0);
        unstable.assessment = QueueAssessment::Unstable { utilization: 1.5 };
        let mut undefined = stable_site("528 High St", 0.0);
        undefined.assessment = QueueAssessment::Undefined;

        let pass = pass_of(vec![
            stable_site("445 Bryant St", 0.2),
            stable_site("520 Webster St", 0.6),
            unstable,
            undefined,
        ]);
        assert_eq!(wait_scale(&pass), Some((0.2, 0.6)));
    }

    #[test]
    fn test_wait_scale_empty_without_finite_waits() {
        let mut unstable = stable_site("250 Hamilton Ave", 0.0);
        unstable.assessment = QueueAssessment::Unstable { utilization: 1.5 };
        assert_eq!(wait_scale(&pass_of(vec![unstable])), None);
    }

    #[test]
    fn test_markers_color_extremes_and_specials() {
        let mut unstable = stable_site("250 Hamilton Ave", 0.0);
        unstable.assessment = QueueAssessment::Unstable { utilization: 1.5 };
        let mut undefined = stable_site("528 High St", 0.0);
        undefined.assessment = QueueAssessment::Undefined;

        let pass = pass_of(vec![
            stable_site("445 Bryant St", 0.2),
            stable_site("520 Webster St", 0.6),
            unstable,
            undefined,
        ]);
        let coordinates: BTreeMap<String, (f64, f64)> = pass
            .sites
            .keys()
            .map(|address| (address.clone(), (37.44, -122.16)))
            .collect();

        let markers = build_markers(&pass, &coordinates, wait_scale(&pass));
        assert_eq!(markers.len(), 4);

        let by_address: BTreeMap<&str, &MapMarker> =
            markers.iter().map(|m| (m.address.as_str(), m)).collect();
        assert_eq!(by_address["445 Bryant St"].color, "#008000");
        assert_eq!(by_address["520 Webster St"].color, "#ff0000");
        assert_eq!(by_address["250 Hamilton Ave"].color, "#ff0000");
        assert!(by_address["250 Hamilton Ave"].label.contains("unstable"));
        assert_eq!(by_address["528 High St"].color, UNDEFINED_COLOR);
        assert!(by_address["528 High St"].label.contains("undefined"));
    }

    #[test]
    fn test_sites_without_coordinates_are_skipped() {
        let pass = pass_of(vec![stable_site("445 Bryant St", 0.2)]);
        let markers = build_markers(&pass, &BTreeMap::new(), wait_scale(&pass));
        assert!(markers.is_empty());
    }

    #[test]
    fn test_rendered_html_contains_map_and_markers() {
        let markers = vec![MapMarker {
            address: "445 Bryant St".to_string(),
            latitude: 37.4449,
            longitude: -122.16,
            color: "#008000".to_string(),
            label: "445 Bryant St: 0.20 hours".to_string(),
        }];
        let html = render_wait_map("Average wait time", (37.4449, -122.16), &markers);

        assert!(html.contains("leaflet@1.9.4"));
        assert!(html.contains("setView([37.4449, -122.16], 14)"));
        assert!(html.contains("L.circleMarker([37.4449, -122.16]"));
        assert!(html.contains("radius: 15"));
        assert!(html.contains("fillOpacity: 0.4"));
        assert!(html.contains("445 Bryant St: 0.20 hours"));
        assert_eq!(html.matches("circleMarker").count(), 1);
    }

    #[test]
    fn test_labels_are_escaped_for_js() {
        assert_eq!(js_escape(r#"say "hi" \ bye"#), r#"say \"hi\" \\ bye"#);
    }
}
