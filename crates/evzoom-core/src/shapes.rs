//! Path helpers for the zoom notches.
use geo::{coord, LineString, Polygon};

/// Triangle with its base from `a` to `b` and its tip at `tip`.
pub fn triangle(a: (f64, f64), b: (f64, f64), tip: (f64, f64)) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            coord! { x: a.0, y: a.1 },
            coord! { x: b.0, y: b.1 },
            coord! { x: tip.0, y: tip.1 },
        ]),
        vec![],
    )
}

/// SVG path data for a polygon, holes included.
pub fn polygon_to_path_data(polygon: &Polygon<f64>) -> String {
    let mut path_data = String::new();

    let exterior = polygon.exterior();
    if let Some(first) = exterior.points().next() {
        path_data.push_str(&format!("M {} {} ", first.x(), first.y()));

        for point in exterior.points().skip(1) {
            path_data.push_str(&format!("L {} {} ", point.x(), point.y()));
        }
    }
    path_data.push('Z');

    for interior in polygon.interiors() {
        if let Some(first) = interior.points().next() {
            path_data.push_str(&format!("M {} {} ", first.x(), first.y()));

            for point in interior.points().skip(1) {
                path_data.push_str(&format!("L {} {} ", point.x(), point.y()));
            }
            path_data.push('Z');
        }
    }

    path_data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_path() {
        let t = triangle((0.0, 0.0), (2.0, 0.0), (1.0, 3.0));
        assert_eq!(polygon_to_path_data(&t), "M 0 0 L 2 0 L 1 3 L 0 0 Z");
    }
}
