//! Flow-direction arrows along waterway lines.
//!
//! Waterway geometries are digitized in flow direction, so the segment
//! arriving at a vertex gives the local flow. Every interior vertex gets a
//! small triangle pointing downstream.

use map_common::{Geometry, WaterConfig};
use std::f64::consts::FRAC_PI_2;

use crate::style_spec::{Marker, StyleSpec};

/// An interior vertex with the direction of the segment arriving at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowVertex {
    pub position: [f64; 2],
    /// `atan2(dy, dx)` of the incoming segment, radians counterclockwise
    /// from the +x axis
    pub angle: f64,
}

/// Interior vertices (indices `1..N-1`) of a line with their incoming
/// direction. Lines with fewer than 3 vertices have none.
pub fn flow_vertices(line: &Geometry) -> Vec<FlowVertex> {
    let n = line.vertex_count();
    if n < 3 {
        return Vec::new();
    }

    line.flat_coordinates()
        .windows(4)
        .step_by(2)
        .take(n - 2)
        .map(|w| {
            let (x0, y0, x1, y1) = (w[0], w[1], w[2], w[3]);
            FlowVertex {
                position: [x1, y1],
                angle: (y1 - y0).atan2(x1 - x0),
            }
        })
        .collect()
}

/// Arrow marker for one flow vertex.
///
/// Screen rotation is clockwise while map angles are counterclockwise,
/// hence the negation; the quarter turn brings the triangle's tip from
/// straight up onto the +x axis.
pub fn arrow_marker(vertex: &FlowVertex, water: &WaterConfig) -> StyleSpec {
    StyleSpec::new()
        .with_marker(Marker {
            fill: water.arrow_color,
            points: water.arrow_points,
            radius: water.arrow_radius,
            rotation: -vertex.angle,
            angle: FRAC_PI_2,
        })
        .at(vertex.position)
}

/// The base line style followed by one arrow per interior vertex.
pub fn place_arrows(line: &Geometry, base: StyleSpec, water: &WaterConfig) -> Vec<StyleSpec> {
    let vertices = flow_vertices(line);
    let mut styles = Vec::with_capacity(vertices.len() + 1);
    styles.push(base);
    styles.extend(vertices.iter().map(|v| arrow_marker(v, water)));
    styles
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_flow_vertices_turning_line() {
        let line =
            Geometry::line_string(vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 2.0, 1.0]).unwrap();
        let vertices = flow_vertices(&line);
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].position, [1.0, 0.0]);
        assert!(vertices[0].angle.abs() < 1e-12);
        assert_eq!(vertices[1].position, [1.0, 1.0]);
        assert!((vertices[1].angle - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_lines_have_no_interior() {
        let two = Geometry::line_string(vec![0.0, 0.0, 5.0, 5.0]).unwrap();
        assert!(flow_vertices(&two).is_empty());
        let one = Geometry::line_string(vec![0.0, 0.0]).unwrap();
        assert!(flow_vertices(&one).is_empty());
        let none = Geometry::line_string(vec![]).unwrap();
        assert!(flow_vertices(&none).is_empty());
    }

    #[test]
    fn test_westward_flow_points_left() {
        let line = Geometry::line_string(vec![2.0, 0.0, 1.0, 0.0, 0.0, 0.0]).unwrap();
        let vertices = flow_vertices(&line);
        assert_eq!(vertices.len(), 1);
        assert!((vertices[0].angle.abs() - PI).abs() < 1e-12);
    }
}
