/// Errors produced while building or combining boxes.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryError {
    #[error("invalid box geometry (width={width}, height={height})")]
    InvalidGeometry { width: i64, height: i64 },
    #[error("cannot meld an empty collection of boxes")]
    EmptyInput,
}

/// Errors from the JSON config / report helpers.
#[derive(thiserror::Error, Debug)]
pub enum MeldIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
