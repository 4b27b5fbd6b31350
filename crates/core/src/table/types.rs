//! Table inference types and settings.

use crate::geometry::{BBox, Orientation};

pub(crate) const DEFAULT_SNAP_TOLERANCE: f64 = 3.0;
pub(crate) const DEFAULT_JOIN_TOLERANCE: f64 = 3.0;
pub(crate) const DEFAULT_INTERSECTION_TOLERANCE: f64 = 3.0;
pub(crate) const DEFAULT_EDGE_MIN_LENGTH: f64 = 3.0;
pub(crate) const DEFAULT_MIN_WORDS_VERTICAL: usize = 3;
pub(crate) const DEFAULT_MIN_WORDS_HORIZONTAL: usize = 1;

pub(crate) const DEFAULT_X_TOLERANCE: f64 = 3.0;
pub(crate) const DEFAULT_Y_TOLERANCE: f64 = 3.0;

/// One extracted character with its geometry and font metadata.
///
/// Produced once per page by the extraction collaborator and read-only
/// from then on.
#[derive(Clone, Debug)]
pub struct Char {
    /// A single grapheme cluster as decoded by the collaborator.
    pub text: String,
    pub bbox: BBox,
    /// Vertical position in document coordinates, used for ordering and
    /// line grouping across pages.
    pub doctop: f64,
    pub fontname: String,
    pub size: f64,
    pub upright: bool,
    pub page: usize,
}

/// Reading direction of a word. Upright text runs left-to-right; rotated
/// text runs top-to-bottom with the gap axes swapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextDir {
    Ltr,
    Ttb,
}

/// A run of non-whitespace characters. Derived during edge synthesis and
/// discarded afterwards.
#[derive(Clone, Debug)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
    pub doctop: f64,
    pub upright: bool,
    pub direction: TextDir,
}

/// Where an edge came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeSource {
    /// Synthesized from word alignment (the `text` strategy).
    Text,
    /// Decomposed from a vector-path rectangle (the `lines` strategy).
    Path,
    /// Supplied directly through the settings.
    Explicit,
}

/// A candidate table gridline. Mutable during snap/join/filter; after
/// processing an edge has zero extent along its own orientation axis.
#[derive(Clone, Debug)]
pub struct Edge {
    pub x0: f64,
    pub x1: f64,
    pub top: f64,
    pub bottom: f64,
    pub orientation: Orientation,
    pub source: EdgeSource,
}

impl Edge {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Extent along the edge's own orientation.
    pub fn length(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.width(),
            Orientation::Vertical => self.height(),
        }
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.top, self.x1, self.bottom)
    }
}

/// Edge-source policy for one table axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Use vector-path geometry supplied by the collaborator. When a page
    /// carries no path rectangles this degrades to the `text` heuristics;
    /// the two strategies then produce identical results.
    #[default]
    Lines,
    /// Infer gridlines from word alignment.
    Text,
}

impl Strategy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lines" => Some(Strategy::Lines),
            "text" => Some(Strategy::Text),
            _ => None,
        }
    }
}

/// Table-finder configuration.
///
/// The per-axis tolerances are independently overridable; unset values fall
/// back to the corresponding general tolerance when the settings are
/// resolved.
#[derive(Clone, Debug)]
pub struct TableSettings {
    pub vertical_strategy: Strategy,
    pub horizontal_strategy: Strategy,
    /// Extra vertical gridline x-coordinates, spanning the full page.
    pub explicit_vertical_lines: Vec<f64>,
    /// Extra horizontal gridline y-coordinates, spanning the full page.
    pub explicit_horizontal_lines: Vec<f64>,
    pub snap_tolerance: f64,
    pub snap_x_tolerance: Option<f64>,
    pub snap_y_tolerance: Option<f64>,
    pub join_tolerance: f64,
    pub join_x_tolerance: Option<f64>,
    pub join_y_tolerance: Option<f64>,
    pub edge_min_length: f64,
    pub min_words_vertical: usize,
    pub min_words_horizontal: usize,
    pub intersection_tolerance: f64,
    pub intersection_x_tolerance: Option<f64>,
    pub intersection_y_tolerance: Option<f64>,
    pub text_x_tolerance: f64,
    pub text_y_tolerance: f64,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: Strategy::default(),
            horizontal_strategy: Strategy::default(),
            explicit_vertical_lines: Vec::new(),
            explicit_horizontal_lines: Vec::new(),
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            snap_x_tolerance: None,
            snap_y_tolerance: None,
            join_tolerance: DEFAULT_JOIN_TOLERANCE,
            join_x_tolerance: None,
            join_y_tolerance: None,
            edge_min_length: DEFAULT_EDGE_MIN_LENGTH,
            min_words_vertical: DEFAULT_MIN_WORDS_VERTICAL,
            min_words_horizontal: DEFAULT_MIN_WORDS_HORIZONTAL,
            intersection_tolerance: DEFAULT_INTERSECTION_TOLERANCE,
            intersection_x_tolerance: None,
            intersection_y_tolerance: None,
            text_x_tolerance: DEFAULT_X_TOLERANCE,
            text_y_tolerance: DEFAULT_Y_TOLERANCE,
        }
    }
}

/// Settings with every per-axis override applied.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedSettings {
    pub vertical_strategy: Strategy,
    pub horizontal_strategy: Strategy,
    pub explicit_vertical_lines: Vec<f64>,
    pub explicit_horizontal_lines: Vec<f64>,
    pub snap_x_tolerance: f64,
    pub snap_y_tolerance: f64,
    pub join_x_tolerance: f64,
    pub join_y_tolerance: f64,
    pub edge_min_length: f64,
    pub min_words_vertical: usize,
    pub min_words_horizontal: usize,
    pub intersection_x_tolerance: f64,
    pub intersection_y_tolerance: f64,
    pub text_x_tolerance: f64,
    pub text_y_tolerance: f64,
}

impl TableSettings {
    pub(crate) fn resolve(&self) -> ResolvedSettings {
        ResolvedSettings {
            vertical_strategy: self.vertical_strategy,
            horizontal_strategy: self.horizontal_strategy,
            explicit_vertical_lines: self.explicit_vertical_lines.clone(),
            explicit_horizontal_lines: self.explicit_horizontal_lines.clone(),
            snap_x_tolerance: self.snap_x_tolerance.unwrap_or(self.snap_tolerance),
            snap_y_tolerance: self.snap_y_tolerance.unwrap_or(self.snap_tolerance),
            join_x_tolerance: self.join_x_tolerance.unwrap_or(self.join_tolerance),
            join_y_tolerance: self.join_y_tolerance.unwrap_or(self.join_tolerance),
            edge_min_length: self.edge_min_length,
            min_words_vertical: self.min_words_vertical,
            min_words_horizontal: self.min_words_horizontal,
            intersection_x_tolerance: self
                .intersection_x_tolerance
                .unwrap_or(self.intersection_tolerance),
            intersection_y_tolerance: self
                .intersection_y_tolerance
                .unwrap_or(self.intersection_tolerance),
            text_x_tolerance: self.text_x_tolerance,
            text_y_tolerance: self.text_y_tolerance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_overrides_fall_back_to_general_tolerance() {
        let settings = TableSettings {
            snap_tolerance: 5.0,
            snap_y_tolerance: Some(1.0),
            intersection_tolerance: 2.0,
            ..TableSettings::default()
        };
        let resolved = settings.resolve();
        assert_eq!(resolved.snap_x_tolerance, 5.0);
        assert_eq!(resolved.snap_y_tolerance, 1.0);
        assert_eq!(resolved.intersection_x_tolerance, 2.0);
        assert_eq!(resolved.intersection_y_tolerance, 2.0);
    }

    #[test]
    fn strategy_parses_known_names() {
        assert_eq!(Strategy::from_str("lines"), Some(Strategy::Lines));
        assert_eq!(Strategy::from_str("text"), Some(Strategy::Text));
        assert_eq!(Strategy::from_str("curves"), None);
    }
}
