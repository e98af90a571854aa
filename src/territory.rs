//! One territory polygon as read from a marker set, before grouping.

use tracing::debug;

use crate::geometry::{polygon_area, Vertex};

#[derive(Debug, Clone, PartialEq)]
pub struct TerritoryRecord {
    /// Owning nation. Several records usually share one name.
    pub nation_name: String,
    /// Ring vertices; may be empty or degenerate.
    pub vertices: Vec<Vertex>,
    /// Mean of the raw x and z sequences, `(0, 0)` when they are empty.
    pub centroid: Vertex,
    /// The marker description contained the collapse token.
    pub collapsed: bool,
}

impl TerritoryRecord {
    /// Build a record from the parallel `x` / `z` arrays of a marker.
    ///
    /// Each centroid component is the mean of its own sequence, so a marker
    /// with uneven arrays still gets the centroid its raw data implies. The
    /// ring itself only pairs up to the shorter of the two.
    pub fn from_coords(
        nation_name: impl Into<String>,
        xs: &[f64],
        zs: &[f64],
        description: &str,
        collapse_marker: &str,
    ) -> Self {
        let collapsed = !collapse_marker.is_empty() && description.contains(collapse_marker);
        Self {
            nation_name: nation_name.into(),
            vertices: xs.iter().copied().zip(zs.iter().copied()).collect(),
            centroid: (mean(xs), mean(zs)),
            collapsed,
        }
    }

    /// Polygon area, or zero for rings with fewer than three vertices.
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            debug!(
                nation = %self.nation_name,
                vertices = self.vertices.len(),
                "degenerate polygon, counting as zero area"
            );
            return 0.0;
        }
        polygon_area(&self.vertices)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
