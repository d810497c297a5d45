use nalgebra::{Vector2, Vector3};

/// Scale to apply to the unit plane so that a `model`-shaped 2D overlay keeps
/// its aspect ratio while covering as much of a `target`-shaped target as
/// possible.
///
/// Target space is normalized so the larger target dimension spans `[-1, 1]`.
/// Degenerate sizes yield the identity scale.
pub fn scale_fit_ratio(target: Vector2<f32>, model: Vector2<f32>) -> Vector3<f32> {
    let extent = target.x.max(target.y);
    if extent <= 0.0 || model.x <= 0.0 || model.y <= 0.0 {
        return Vector3::new(1.0, 1.0, 1.0);
    }
    let half = target / extent;
    let aspect = model.x / model.y;

    let sx = half.x.min(half.y * aspect);
    Vector3::new(sx, sx / aspect, 1.0)
}
