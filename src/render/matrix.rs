use nalgebra::{Matrix4, Vector3};

/// Right-multiply `pose` by a scale matrix: columns 0, 1 and 2 are scaled by
/// the x, y and z factors, the translation column is untouched.
pub fn scale_pose_matrix(pose: &Matrix4<f32>, scale: Vector3<f32>) -> Matrix4<f32> {
    let mut scaled = *pose;
    for (col, factor) in scale.iter().enumerate() {
        scaled.column_mut(col).scale_mut(*factor);
    }
    scaled
}
