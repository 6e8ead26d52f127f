use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Annotation source metadata shared by all events of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSource {
    pub name: String,
    pub icon_color: String,
}

/// A discrete event drawn on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Epoch milliseconds.
    pub time: f64,
    pub annotation: AnnotationSource,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Annotation {
    #[must_use]
    pub fn new(time: f64, type_name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            time,
            annotation: AnnotationSource {
                name: type_name.into(),
                icon_color: color.into(),
            },
            title: None,
            text: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerPosition {
    Bottom,
    Top,
}

pub const DEFAULT_MARKER_SIZE: u32 = 5;

/// Marker styling registered once per annotation type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationType {
    pub color: String,
    pub position: MarkerPosition,
    pub marker_size: u32,
}

/// Overlay layer descriptor for the renderer's event plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationOverlay {
    /// One stacking level per type plus one for unclassified events.
    pub levels: usize,
    pub data: Vec<Annotation>,
    /// Keyed by type name in first-seen order.
    pub types: IndexMap<String, AnnotationType>,
}

/// Groups annotations by type name; `None` when there is nothing to draw.
#[must_use]
pub fn build_annotation_overlay(annotations: &[Annotation]) -> Option<AnnotationOverlay> {
    if annotations.is_empty() {
        return None;
    }

    let mut types = IndexMap::new();
    for event in annotations {
        types
            .entry(event.annotation.name.clone())
            .or_insert_with(|| AnnotationType {
                color: event.annotation.icon_color.clone(),
                position: MarkerPosition::Bottom,
                marker_size: DEFAULT_MARKER_SIZE,
            });
    }

    Some(AnnotationOverlay {
        levels: types.len() + 1,
        data: annotations.to_vec(),
        types,
    })
}
