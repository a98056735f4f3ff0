//! Typed wrappers around JS interop via `js_sys::eval()`.
//!
//! The D3.js drawing code lives in `assets/js/*.js`, embedded at compile
//! time and evaluated as globals (no ES modules) once D3 is available.
//! Geometry arrives pre-scaled from the Rust side; the scripts only draw
//! shapes and wire tooltips, they never recompute scales.

// Embed the chart JS files at compile time
static TOOLTIP_JS: &str = include_str!("../assets/js/tooltip.js");
static BAR_CHART_JS: &str = include_str!("../assets/js/bar-chart.js");
static STATION_MAP_JS: &str = include_str!("../assets/js/station-map.js");

/// Execute arbitrary JS, wrapping in try/catch to avoid panics.
pub fn call_js(code: &str) {
    let wrapped = format!(
        "try {{ {} }} catch(e) {{ console.warn('MBS JS call failed:', e); }}",
        code
    );
    let _ = js_sys::eval(&wrapped);
}

/// Initialize chart scripts with a wait-for-D3 polling loop.
///
/// The chart JS files use `function` declarations. To make them globally
/// accessible (not block-scoped inside the polling callback), the combined
/// source is stashed on `window`, evaluated at global scope via indirect
/// `eval()` once D3 is ready, and each function is then promoted to
/// `window.*` explicitly.
pub fn init_charts() {
    let all_js = [TOOLTIP_JS, BAR_CHART_JS, STATION_MAP_JS].join("\n");

    let store_js = format!(
        "window.__mbsChartScripts = {};",
        serde_json::to_string(&all_js).unwrap_or_default()
    );
    let _ = js_sys::eval(&store_js);

    let init_js = r#"
        (function() {
            var waitForD3 = setInterval(function() {
                if (typeof d3 !== 'undefined') {
                    clearInterval(waitForD3);
                    (0, eval)(window.__mbsChartScripts);
                    delete window.__mbsChartScripts;
                    if (typeof renderBarChart !== 'undefined') window.renderBarChart = renderBarChart;
                    if (typeof renderStationMap !== 'undefined') window.renderStationMap = renderStationMap;
                    if (typeof initTooltip !== 'undefined') window.initTooltip = initTooltip;
                    if (typeof showTooltip !== 'undefined') window.showTooltip = showTooltip;
                    if (typeof hideTooltip !== 'undefined') window.hideTooltip = hideTooltip;
                    window.__mbsChartsReady = true;
                    console.log('MBS charts initialized');
                }
            }, 100);
        })();
    "#;
    let _ = js_sys::eval(init_js);
}

/// Shared polling wrapper: waits for the chart scripts to initialize and
/// the container element to exist, then calls the named render function
/// with the JSON payloads passed as JS string literals.
fn render_when_ready(function: &str, container_id: &str, data_json: &str, config_json: &str) {
    let data_literal = serde_json::to_string(data_json).unwrap_or_default();
    let config_literal = serde_json::to_string(config_json).unwrap_or_default();
    call_js(&format!(
        r#"
        (function() {{
            var poll = setInterval(function() {{
                if (window.__mbsChartsReady &&
                    typeof window.{function} !== 'undefined' &&
                    document.getElementById('{container_id}')) {{
                    clearInterval(poll);
                    try {{
                        window.{function}('{container_id}', {data_literal}, {config_literal});
                    }} catch(e) {{ console.error('[MBS] {function} error:', e); }}
                }}
            }}, 100);
        }})();
        "#,
    ));
}

/// Render the trip-volume bar chart from pre-scaled bar geometry.
pub fn render_bar_chart(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready("renderBarChart", container_id, data_json, config_json);
}

/// Render the station map from pre-scaled station geometry.
pub fn render_station_map(container_id: &str, data_json: &str, config_json: &str) {
    render_when_ready("renderStationMap", container_id, data_json, config_json);
}

/// Destroy/clean up a chart in the given container.
pub fn destroy_chart(container_id: &str) {
    call_js(&format!(
        "var el = document.getElementById('{}'); if (el) el.innerHTML = '';",
        container_id
    ));
}
