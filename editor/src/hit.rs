#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::{Scene, SceneObject, Shape};

/// Return the front-most visible object under `pt`, if any.
///
/// Rotation is honored by mapping the point into the object's unrotated frame
/// around its bounding-box center. Ellipses use the exact ellipse equation;
/// everything else hits on its bounding box.
#[must_use]
pub fn hit_test<'a>(pt: Point, scene: &'a Scene) -> Option<&'a SceneObject> {
    scene.objects().rev().filter(|o| o.visible).find(|o| contains(o, pt))
}

/// Whether `pt` (scene space) lies inside `obj`.
#[must_use]
pub fn contains(obj: &SceneObject, pt: Point) -> bool {
    let b = obj.bounds();
    if b.width <= 0.0 || b.height <= 0.0 {
        return false;
    }
    let local = unrotate(pt, b.center(), obj.transform.angle);
    match obj.shape {
        Shape::Ellipse { .. } => {
            let c = b.center();
            let rx = b.width / 2.0;
            let ry = b.height / 2.0;
            let dx = (local.x - c.x) / rx;
            let dy = (local.y - c.y) / ry;
            dx * dx + dy * dy <= 1.0
        }
        _ => local.x >= b.x && local.x <= b.x + b.width && local.y >= b.y && local.y <= b.y + b.height,
    }
}

/// Rotate `pt` by `-angle_deg` around `center`.
fn unrotate(pt: Point, center: Point, angle_deg: f64) -> Point {
    if angle_deg.abs() < f64::EPSILON {
        return pt;
    }
    let (sin, cos) = (-angle_deg.to_radians()).sin_cos();
    let dx = pt.x - center.x;
    let dy = pt.y - center.y;
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}
