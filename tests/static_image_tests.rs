use graph_panel::api::{PanelConfig, build_static_image_request};
use graph_panel::core::{NullPointMode, ValueFormat};

fn keys(params: &[(String, String)]) -> Vec<&str> {
    params.iter().map(|(key, _)| key.as_str()).collect()
}

#[test]
fn stacked_panel_with_second_axis_bounds() {
    let mut panel = PanelConfig::default();
    panel.stack = true;
    panel.fill = 0;
    panel.linewidth = 0;
    panel.legend.show = false;
    panel.yaxes[0].show = false;
    panel.yaxes[0].format = ValueFormat::Bytes;
    panel.yaxes[1].min = Some(0.0);
    panel.yaxes[1].max = Some(10.5);
    panel.xaxis.show = false;
    panel.null_point_mode = NullPointMode::NullAsZero;
    panel.stepped_line = true;

    let request = build_static_image_request("/render?target=io", &panel, 640, 200);
    assert_eq!(
        request.to_url(),
        "/render?target=io&width=640&height=200&bgcolor=1f1f1f&fgcolor=BBBFC2\
         &areaMode=stacked&hideLegend=true&yMin=0&yMax=10.5&hideAxes=true\
         &yUnitSystem=binary&drawNullAsZero=true&lineMode=staircase"
    );
}

#[test]
fn hidden_axes_and_repeated_line_mode() {
    let mut panel = PanelConfig::default();
    panel.fill = 5;
    for axis in &mut panel.yaxes {
        axis.show = false;
    }
    panel.stepped_line = true;

    let request = build_static_image_request("/render?", &panel, 100, 50);
    assert_eq!(request.param("areaAlpha"), Some("0.5"));
    assert_eq!(request.param("hideYAxis"), Some("true"));
    let line_modes: Vec<&str> = request
        .params
        .iter()
        .filter(|(key, _)| key == "lineMode")
        .map(|(_, value)| value.as_str())
        .collect();
    assert_eq!(line_modes, vec!["connected", "staircase"]);
}

#[test]
fn null_mode_and_unknown_formats_add_nothing() {
    let mut panel = PanelConfig::default();
    panel.null_point_mode = NullPointMode::Null;
    panel.yaxes[0].format = ValueFormat::from("celsius");

    let request = build_static_image_request("/render?", &panel, 100, 50);
    let keys = keys(&request.params);
    assert!(!keys.contains(&"lineMode"));
    assert!(!keys.contains(&"yUnitSystem"));
    assert!(!keys.contains(&"drawNullAsZero"));
}
