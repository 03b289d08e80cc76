/// Visualization module: the dashboard page.
///
/// Produces a self-contained HTML fragment with inline JS that handles:
/// - A radio selector switching all charts between the three modes
/// - Two pie panels (Gender, Marital Status) and three bar panels
///   (Age, City Category, Occupation)
/// - Tooltips with the exact value of each slice / bar
///
/// All 15 (dimension, mode) results are computed up front and embedded as
/// JSON; SVG rendering is done client-side by dashboard.js, so a selector
/// change never goes back to Rust.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::aggregation::{AggregationResult, ChartKind, Dimension, Mode};
use crate::config::VisualizationConfig;
use crate::context::DataContext;
use crate::error::DashboardError;

const DASHBOARD_JS: &str = include_str!("dashboard.js");

// ── Payload ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ModeOption {
    value: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PanelSpec {
    id: &'static str,
    chart: ChartKind,
    width: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardPayload<'a> {
    default_mode: &'static str,
    chart_height: u32,
    palette: &'a [String],
    modes: Vec<ModeOption>,
    panels: Vec<PanelSpec>,
    /// selector value -> panel results in panel order
    results: BTreeMap<&'static str, Vec<AggregationResult>>,
}

/// Width share of a panel; the two lower bar charts split their row 30/67.
fn panel_width(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::CityCategory => "30%",
        Dimension::Occupation => "67%",
        _ => "33%",
    }
}

fn build_payload<'a>(
    ctx: &DataContext,
    config: &'a VisualizationConfig,
) -> Result<DashboardPayload<'a>, DashboardError> {
    let mut results = BTreeMap::new();
    for mode in Mode::ALL {
        results.insert(mode.selector_value(), ctx.panels(mode)?);
    }

    Ok(DashboardPayload {
        default_mode: config.default_mode.selector_value(),
        chart_height: config.chart_height_px,
        palette: &config.palette,
        modes: Mode::ALL
            .iter()
            .map(|m| ModeOption {
                value: m.selector_value(),
                label: m.label(),
            })
            .collect(),
        panels: Dimension::ALL
            .iter()
            .map(|&d| PanelSpec {
                id: d.binding().component_id,
                chart: d.chart(),
                width: panel_width(d),
            })
            .collect(),
        results,
    })
}

// ── HTML generation ─────────────────────────────────────────────────────────

/// Main entry point: generates a self-contained HTML string.
pub fn generate_dashboard_html(
    ctx: &DataContext,
    config: &VisualizationConfig,
) -> Result<String, DashboardError> {
    if ctx.record_count() == 0 {
        return Ok("<div>No transactions to visualize.</div>".to_string());
    }

    let payload = build_payload(ctx, config)?;
    let payload_json = script_safe(&serde_json::to_string(&payload)?);

    let radios: String = Mode::ALL
        .iter()
        .map(|m| {
            format!(
                r##"<label style="display:inline-block; margin-right:12px;"><input type="radio" name="sd-mode" value="{value}"{checked}> {label}</label>"##,
                value = m.selector_value(),
                label = m.label(),
                checked = if *m == config.default_mode { " checked" } else { "" },
            )
        })
        .collect();

    let panels: String = Dimension::ALL
        .iter()
        .map(|&d| {
            format!(
                r##"<div id="{id}" class="sd-chart" style="display:inline-block; vertical-align:top; width:{width};"></div>"##,
                id = d.binding().component_id,
                width = panel_width(d),
            )
        })
        .collect();

    let html = format!(
        r##"<div id="sd-dashboard" style="width:100%; font-family:sans-serif; background:#fff;">
  <div class="overview_header" style="padding:6px 8px; border-bottom:1px solid #dee2e6; font-size:13px; color:#495057;">
    <span style="font-weight:600; margin-right:16px;">{title}</span>
    {radios}
  </div>
  <div style="padding:8px;">
    {panels}
  </div>
</div>
<script>
{dashboard_js}
ShopperDashboard.create({payload_json});
</script>"##,
        title = escape_html(&config.title),
        radios = radios,
        panels = panels,
        dashboard_js = DASHBOARD_JS,
        payload_json = payload_json,
    );

    Ok(html)
}

/// Write the dashboard wrapped in a minimal HTML document.
pub fn write_dashboard_html(
    ctx: &DataContext,
    config: &VisualizationConfig,
    path: impl AsRef<Path>,
) -> Result<(), DashboardError> {
    let path = path.as_ref();
    let body = generate_dashboard_html(ctx, config)?;
    let document = format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(&config.title),
        body
    );
    fs::write(path, document)?;
    info!("Dashboard written to {}", path.display());
    Ok(())
}

// ── Escaping helpers ────────────────────────────────────────────────────────

/// JSON embedded in a `<script>` block must not contain `</`.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
