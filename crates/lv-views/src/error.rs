use lv_core::ViewId;
use lv_render::SurfaceError;
use thiserror::Error;

/// Errors raised by a view renderer
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("view has no drawing surface; call create first")]
    NotCreated,

    #[error("view was disposed")]
    Disposed,

    #[error("surface allocation failed: {0}")]
    SurfaceUnavailable(#[from] SurfaceError),

    #[error("invalid view configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("unknown view {0}")]
    UnknownView(ViewId),
}

pub type ViewResult<T> = Result<T, ViewError>;
