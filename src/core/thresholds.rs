use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One configured threshold level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: Option<f64>,
    pub color: String,
    /// Drawn as a single line at `value` instead of a filled band.
    pub line: bool,
}

impl Threshold {
    #[must_use]
    pub fn new(value: Option<f64>, color: impl Into<String>) -> Self {
        Self {
            value,
            color: color.into(),
            line: false,
        }
    }

    #[must_use]
    pub fn as_line(mut self, line: bool) -> Self {
        self.line = line;
        self
    }

    fn finite_value(&self) -> Option<f64> {
        self.value.filter(|value| value.is_finite())
    }
}

/// Y-range covered by a marking. `to == None` extends to the axis edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkingRange {
    pub from: f64,
    pub to: Option<f64>,
}

/// Horizontal grid marking handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMarking {
    pub yaxis: MarkingRange,
    pub color: String,
}

pub type GridMarkings = SmallVec<[GridMarking; 2]>;

/// Builds 0, 1 or 2 threshold markings.
///
/// Nothing is built unless the first threshold is a finite number. The second
/// band extends away from the first threshold: toward `-inf` when the first is
/// larger, else toward `+inf`. A second threshold of `0` still gets its own
/// marking but leaves the first band unbounded.
#[must_use]
pub fn build_threshold_markings(first: &Threshold, second: &Threshold) -> GridMarkings {
    let mut markings = GridMarkings::new();
    let Some(first_value) = first.finite_value() else {
        return markings;
    };
    let second_value = second.finite_value();

    let first_limit = if first.line {
        Some(first_value)
    } else {
        second_value.filter(|value| *value != 0.0)
    };
    markings.push(GridMarking {
        yaxis: MarkingRange {
            from: first_value,
            to: first_limit,
        },
        color: first.color.clone(),
    });

    if let Some(second_value) = second_value {
        let second_limit = if second.line {
            second_value
        } else if first_value > second_value {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        markings.push(GridMarking {
            yaxis: MarkingRange {
                from: second_value,
                to: Some(second_limit),
            },
            color: second.color.clone(),
        });
    }

    markings
}
