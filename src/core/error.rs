//! Error types for filterchain.
//!
//! Uses thiserror for structured errors with context. Only one kind of error
//! crosses the pipeline boundary: a filter stage that failed. Everything else
//! (bounds, pixel access, compositing, the parallel executor) cannot fail
//! under in-bounds usage.

use crate::core::geometry::Rect;
use crate::core::pixel::PixelFormat;
use thiserror::Error;

/// Errors a filter reports from [`Filter::draw`](crate::core::filter::Filter::draw).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported pixel format {0:?}")]
    UnsupportedFormat(PixelFormat),

    #[error("{0}")]
    Other(String),
}

/// Errors returned by [`Pipeline::draw`](crate::execution::pipeline::Pipeline::draw)
/// and [`Pipeline::draw_at`](crate::execution::pipeline::Pipeline::draw_at).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A filter stage returned an error; later stages did not run.
    #[error("Stage {index} ({filter}) failed: {source}")]
    Stage {
        /// Zero-based position of the stage.
        index: usize,
        /// [`Filter::name`](crate::core::filter::Filter::name) of the stage.
        filter: String,
        /// What the filter reported.
        #[source]
        source: FilterError,
    },
}

impl PipelineError {
    /// Position of the failing stage in the filter list.
    pub fn stage_index(&self) -> usize {
        match self {
            PipelineError::Stage { index, .. } => *index,
        }
    }

    /// The error the failing filter reported.
    pub fn filter_error(&self) -> &FilterError {
        match self {
            PipelineError::Stage { source, .. } => source,
        }
    }
}

/// Errors from building a raster over caller-provided bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// The pixel buffer cannot hold the requested bounds.
    #[error("Buffer of {got} bytes is too small for a {format:?} raster at {bounds} (need {expected})")]
    BufferSize {
        format: PixelFormat,
        bounds: Rect,
        expected: usize,
        got: usize,
    },

    /// Rows would overlap.
    #[error("Stride {stride} is smaller than a {format:?} row of width {width}")]
    InvalidStride {
        format: PixelFormat,
        width: usize,
        stride: usize,
    },
}

/// Result type alias for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type alias for raster construction.
pub type RasterResult<T> = Result<T, RasterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_display() {
        let error = PipelineError::Stage {
            index: 2,
            filter: "blur".to_string(),
            source: FilterError::InvalidParameter("sigma must be positive".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Stage 2 (blur) failed: Invalid parameter: sigma must be positive"
        );
        assert_eq!(error.stage_index(), 2);
        assert!(matches!(error.filter_error(), FilterError::InvalidParameter(_)));
    }

    #[test]
    fn test_stage_error_source_chain() {
        use std::error::Error as _;

        let error = PipelineError::Stage {
            index: 0,
            filter: "f".to_string(),
            source: FilterError::UnsupportedFormat(PixelFormat::Gray16),
        };
        let source = error.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Unsupported pixel format Gray16"));
    }
}
