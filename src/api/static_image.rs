use serde::{Deserialize, Serialize};

use crate::api::panel_config::PanelConfig;
use crate::core::{NullPointMode, ValueFormat};

pub const BACKGROUND_COLOR: &str = "1f1f1f";
pub const FOREGROUND_COLOR: &str = "BBBFC2";

/// Query for the image-rendering fallback, kept as ordered key/value pairs.
///
/// Keys may repeat (`lineMode` can appear twice); order matches what the image
/// service expects to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticImageRequest {
    pub base_url: String,
    pub params: Vec<(String, String)>,
}

impl StaticImageRequest {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            params: Vec::new(),
        }
    }

    pub fn push(&mut self, key: &str, value: impl ToString) {
        self.params.push((key.to_owned(), value.to_string()));
    }

    /// First value stored for `key`.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Appends every parameter as `&key=value`, percent-encoding values.
    #[must_use]
    pub fn to_url(&self) -> String {
        let mut url = self.base_url.clone();
        for (key, value) in &self.params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }
}

/// Unit-system tag the image service uses for axis labels.
#[must_use]
pub fn unit_system(format: &ValueFormat) -> Option<&'static str> {
    match format {
        ValueFormat::Bytes | ValueFormat::Bits => Some("binary"),
        ValueFormat::BitsPerSecond
        | ValueFormat::PacketsPerSecond
        | ValueFormat::BytesPerSecond
        | ValueFormat::Short
        | ValueFormat::Joule
        | ValueFormat::Watt
        | ValueFormat::ElectronVolt => Some("si"),
        ValueFormat::None => Some("none"),
        _ => None,
    }
}

/// Builds the fallback request for a pre-rendered image payload.
#[must_use]
pub fn build_static_image_request(
    base_url: &str,
    panel: &PanelConfig,
    width: u32,
    height: u32,
) -> StaticImageRequest {
    let mut request = StaticImageRequest::new(base_url);
    request.push("width", width);
    request.push("height", height);
    request.push("bgcolor", BACKGROUND_COLOR);
    request.push("fgcolor", FOREGROUND_COLOR);

    if panel.stack {
        request.push("areaMode", "stacked");
    }
    if panel.fill != 0 {
        request.push("areaAlpha", format!("{:.1}", f64::from(panel.fill) / 10.0));
    }
    if panel.linewidth != 0 {
        request.push("lineWidth", panel.linewidth);
    }
    request.push("hideLegend", !panel.legend.show);

    match panel.yaxes.iter().find(|axis| axis.show) {
        Some(axis) => {
            if let Some(min) = axis.min {
                request.push("yMin", min);
            }
            if let Some(max) = axis.max {
                request.push("yMax", max);
            }
        }
        None => request.push("hideYAxis", true),
    }

    if !panel.xaxis.show {
        request.push("hideAxes", true);
    }

    if let Some(system) = unit_system(&panel.yaxis(0).format) {
        request.push("yUnitSystem", system);
    }

    match panel.null_point_mode {
        NullPointMode::Connected => request.push("lineMode", "connected"),
        NullPointMode::Null => {}
        NullPointMode::NullAsZero => request.push("drawNullAsZero", true),
    }
    if panel.stepped_line {
        request.push("lineMode", "staircase");
    }

    request
}

#[cfg(test)]
mod tests {
    use super::{StaticImageRequest, build_static_image_request, unit_system};
    use crate::api::panel_config::PanelConfig;
    use crate::core::ValueFormat;

    #[test]
    fn default_panel_request_order() {
        let request = build_static_image_request("/render?target=a", &PanelConfig::default(), 800, 274);
        assert_eq!(
            request.to_url(),
            "/render?target=a&width=800&height=274&bgcolor=1f1f1f&fgcolor=BBBFC2\
             &areaAlpha=0.1&lineWidth=2&hideLegend=false&yUnitSystem=si&lineMode=connected"
        );
    }

    #[test]
    fn values_are_percent_encoded() {
        let mut request = StaticImageRequest::new("/r?");
        request.push("title", "a b&c");
        assert_eq!(request.to_url(), "/r?&title=a%20b%26c");
    }

    #[test]
    fn unit_systems_follow_lookup_table() {
        assert_eq!(unit_system(&ValueFormat::Bits), Some("binary"));
        assert_eq!(unit_system(&ValueFormat::BytesPerSecond), Some("si"));
        assert_eq!(unit_system(&ValueFormat::None), Some("none"));
        assert_eq!(unit_system(&ValueFormat::Percent), None);
    }
}
