use morpho_image::ImageError;

/// An error type for the morphing pipeline.
#[derive(thiserror::Error, Debug)]
pub enum MorphError {
    /// A landmark point remained outside the frame after clipping.
    ///
    /// This indicates a sanitizer bug and is treated as fatal.
    #[error("Point {index} at ({x}, {y}) lies outside the image bounds after clipping")]
    PointOutOfBounds {
        /// Index of the offending point in the input set.
        index: usize,
        /// X coordinate of the point.
        x: f32,
        /// Y coordinate of the point.
        y: f32,
    },

    /// Fewer than three unique landmark points remain after deduplication.
    #[error("Only {unique} unique points remain after deduplication, at least 3 are required")]
    DegenerateInput {
        /// Number of unique points found.
        unique: usize,
    },

    /// The two correspondence point sets differ in length.
    #[error("Correspondence sets differ in length: {lhs} != {rhs}")]
    LengthMismatch {
        /// Length of the first set.
        lhs: usize,
        /// Length of the second set.
        rhs: usize,
    },

    /// A triangle is degenerate and its homography cannot be inverted.
    #[error("Triangle {index} is degenerate and its homography is not invertible")]
    SingularTriangle {
        /// Index of the offending triangle.
        index: usize,
    },

    /// A triangle id map references a triangle that does not exist.
    #[error("Triangle id {id} is out of range for {triangles} triangles")]
    UnknownTriangleId {
        /// The offending triangle id.
        id: i32,
        /// Number of triangles available.
        triangles: usize,
    },

    /// An error from the underlying image containers.
    #[error(transparent)]
    Image(#[from] ImageError),
}
