//! Shape generation for 2D primitives
//!
//! Everything on screen is triangles built CPU-side in world pixels;
//! the pipeline maps them to NDC with the camera offset.

use super::vertex::Vertex;

/// Append a filled axis-aligned rectangle (two triangles)
pub fn push_rect(out: &mut Vec<Vertex>, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
    let (x2, y2) = (x + w, y + h);
    out.push(Vertex::new(x, y, color));
    out.push(Vertex::new(x2, y, color));
    out.push(Vertex::new(x, y2, color));

    out.push(Vertex::new(x2, y, color));
    out.push(Vertex::new(x2, y2, color));
    out.push(Vertex::new(x, y2, color));
}

/// Append a filled triangle from three points
pub fn push_tri(
    out: &mut Vec<Vertex>,
    a: (f32, f32),
    b: (f32, f32),
    c: (f32, f32),
    color: [f32; 4],
) {
    out.push(Vertex::new(a.0, a.1, color));
    out.push(Vertex::new(b.0, b.1, color));
    out.push(Vertex::new(c.0, c.1, color));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_is_two_triangles() {
        let mut v = Vec::new();
        push_rect(&mut v, 10.0, 20.0, 32.0, 16.0, [1.0; 4]);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|p| p.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|p| p.position[1]).collect();
        assert!(xs.iter().all(|&x| (10.0..=42.0).contains(&x)));
        assert!(ys.iter().all(|&y| (20.0..=36.0).contains(&y)));
    }
}
