//! Shape generation for 2D primitives
//!
//! Everything is tessellated into a triangle list in field coordinates
//! (y grows downward).

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::vertex::Vertex;
use crate::sim::Rect;

fn quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
        Vertex::new(a.x, a.y, color),
    ]
}

/// Axis-aligned filled rectangle
pub fn rect(r: &Rect, color: [f32; 4]) -> Vec<Vertex> {
    if r.is_empty() {
        return Vec::new();
    }
    quad(
        Vec2::new(r.x, r.y),
        Vec2::new(r.right(), r.y),
        Vec2::new(r.right(), r.bottom()),
        Vec2::new(r.x, r.bottom()),
        color,
    )
    .to_vec()
}

/// Rectangle with vertical gradient (top color to bottom color)
pub fn gradient_rect(r: &Rect, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    if r.is_empty() {
        return Vec::new();
    }
    vec![
        Vertex::new(r.x, r.y, top),
        Vertex::new(r.right(), r.y, top),
        Vertex::new(r.right(), r.bottom(), bottom),
        Vertex::new(r.right(), r.bottom(), bottom),
        Vertex::new(r.x, r.bottom(), bottom),
        Vertex::new(r.x, r.y, top),
    ]
}

/// Rectangle rotated about its center
pub fn rotated_rect(r: &Rect, angle: f32, color: [f32; 4]) -> Vec<Vertex> {
    let c = r.center();
    let rot = Vec2::from_angle(angle);
    let (hw, hh) = (r.w / 2.0, r.h / 2.0);
    let corner = |x: f32, y: f32| c + rot.rotate(Vec2::new(x, y));
    quad(
        corner(-hw, -hh),
        corner(hw, -hh),
        corner(hw, hh),
        corner(-hw, hh),
        color,
    )
    .to_vec()
}

/// Rectangle with quarter-circle corners
pub fn rounded_rect(r: &Rect, radius: f32, color: [f32; 4]) -> Vec<Vertex> {
    let radius = radius.min(r.w / 2.0).min(r.h / 2.0).max(0.0);
    if radius <= 0.0 {
        return rect(r, color);
    }

    let mut vertices = Vec::with_capacity(18 + 4 * 6 * 3);
    // Center cross
    vertices.extend(rect(
        &Rect::new(r.x + radius, r.y, r.w - 2.0 * radius, r.h),
        color,
    ));
    vertices.extend(rect(
        &Rect::new(r.x, r.y + radius, radius, r.h - 2.0 * radius),
        color,
    ));
    vertices.extend(rect(
        &Rect::new(r.right() - radius, r.y + radius, radius, r.h - 2.0 * radius),
        color,
    ));

    let corners = [
        (Vec2::new(r.x + radius, r.y + radius), PI),
        (Vec2::new(r.right() - radius, r.y + radius), -FRAC_PI_2),
        (Vec2::new(r.right() - radius, r.bottom() - radius), 0.0),
        (Vec2::new(r.x + radius, r.bottom() - radius), FRAC_PI_2),
    ];
    for (center, start) in corners {
        vertices.extend(pie(center, radius, start, FRAC_PI_2, color, 6));
    }
    vertices
}

/// Circle sector from `start` spanning `sweep` radians
pub fn pie(
    center: Vec2,
    radius: f32,
    start: f32,
    sweep: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);
    for i in 0..segments {
        let t1 = start + sweep * i as f32 / segments as f32;
        let t2 = start + sweep * (i + 1) as f32 / segments as f32;
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * t1.cos(),
            center.y + radius * t1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * t2.cos(),
            center.y + radius * t2.sin(),
            color,
        ));
    }
    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    pie(center, radius, 0.0, 2.0 * PI, color, segments)
}

/// Filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = circle(Vec2::ZERO, 1.0, color, segments);
    for v in &mut vertices {
        v.position = [
            center.x + v.position[0] * radii.x,
            center.y + v.position[1] * radii.y,
        ];
    }
    vertices
}

/// Generate vertices for a ring (hollow circle)
pub fn ring(
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());

        vertices.extend(quad(
            center + dir1 * inner_radius,
            center + dir1 * outer_radius,
            center + dir2 * outer_radius,
            center + dir2 * inner_radius,
            color,
        ));
    }

    vertices
}

/// Filled triangle
pub fn triangle(a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    vec![
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
    ]
}

/// Thick straight line from `a` to `b`
pub fn segment(a: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return Vec::new();
    }
    let perp = dir.perp() * (width / 2.0);
    quad(a + perp, b + perp, b - perp, a - perp, color).to_vec()
}

/// Thick quadratic curve from `a` to `b` bending through `ctrl`.
/// Used for arms and legs; the width tapers slightly toward `b`.
pub fn limb(a: Vec2, ctrl: Vec2, b: Vec2, width: f32, color: [f32; 4]) -> Vec<Vertex> {
    const STEPS: usize = 6;
    let point = |t: f32| {
        let u = 1.0 - t;
        a * (u * u) + ctrl * (2.0 * u * t) + b * (t * t)
    };

    let mut vertices = Vec::with_capacity(STEPS * 6 + 2 * 3 * 8);
    for i in 0..STEPS {
        let t1 = i as f32 / STEPS as f32;
        let t2 = (i + 1) as f32 / STEPS as f32;
        let (p1, p2) = (point(t1), point(t2));
        let dir = (p2 - p1).normalize_or_zero();
        let perp = dir.perp();
        let w1 = width * (1.0 - 0.2 * t1) / 2.0;
        let w2 = width * (1.0 - 0.2 * t2) / 2.0;
        vertices.extend(quad(
            p1 + perp * w1,
            p2 + perp * w2,
            p2 - perp * w2,
            p1 - perp * w1,
            color,
        ));
    }
    // Round caps
    vertices.extend(circle(a, width / 2.0, color, 8));
    vertices.extend(circle(b, width * 0.4, color, 8));
    vertices
}

/// Five-pointed star
pub fn star(center: Vec2, outer: f32, inner: f32, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(10 * 3);
    let point = |i: usize| {
        let r = if i % 2 == 0 { outer } else { inner };
        let theta = -FRAC_PI_2 + i as f32 * PI / 5.0;
        center + Vec2::new(theta.cos(), theta.sin()) * r
    };
    for i in 0..10 {
        vertices.extend(triangle(center, point(i), point((i + 1) % 10), color));
    }
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0; 4];

    fn bounds(vertices: &[Vertex]) -> (Vec2, Vec2) {
        let mut lo = Vec2::splat(f32::MAX);
        let mut hi = Vec2::splat(f32::MIN);
        for v in vertices {
            let p = Vec2::from(v.position);
            lo = lo.min(p);
            hi = hi.max(p);
        }
        (lo, hi)
    }

    #[test]
    fn test_every_shape_is_a_triangle_list() {
        let r = Rect::new(10.0, 10.0, 40.0, 20.0);
        let shapes = [
            rect(&r, WHITE),
            rounded_rect(&r, 5.0, WHITE),
            rotated_rect(&r, 0.3, WHITE),
            circle(Vec2::ZERO, 5.0, WHITE, 12),
            ring(Vec2::ZERO, 3.0, 5.0, WHITE, 12),
            limb(Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::new(10.0, 0.0), 4.0, WHITE),
            star(Vec2::ZERO, 10.0, 4.0, WHITE),
        ];
        for s in shapes {
            assert!(!s.is_empty());
            assert_eq!(s.len() % 3, 0);
        }
    }

    #[test]
    fn test_rect_covers_its_bounds() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        let (lo, hi) = bounds(&rect(&r, WHITE));
        assert_eq!(lo, Vec2::new(10.0, 20.0));
        assert_eq!(hi, Vec2::new(40.0, 60.0));
    }

    #[test]
    fn test_rounded_rect_stays_inside() {
        let r = Rect::new(0.0, 0.0, 50.0, 30.0);
        let (lo, hi) = bounds(&rounded_rect(&r, 8.0, WHITE));
        assert!(lo.x >= -1e-4 && lo.y >= -1e-4);
        assert!(hi.x <= 50.0 + 1e-4 && hi.y <= 30.0 + 1e-4);
    }

    #[test]
    fn test_empty_inputs_produce_nothing() {
        assert!(rect(&Rect::new(0.0, 0.0, 0.0, 10.0), WHITE).is_empty());
        assert!(segment(Vec2::ONE, Vec2::ONE, 3.0, WHITE).is_empty());
    }

    #[test]
    fn test_ellipse_radii() {
        let (lo, hi) = bounds(&ellipse(Vec2::new(100.0, 50.0), Vec2::new(20.0, 5.0), WHITE, 16));
        assert!((hi.x - 120.0).abs() < 1e-3);
        assert!((lo.y - 45.0).abs() < 1e-3);
    }
}
