use crate::graphics::ContextState;

/// Errors raised by a display surface or its frame loop.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("windowing platform error: {0}")]
    Platform(String),

    #[error("failed to create window: {0}")]
    WindowCreation(String),

    #[error("display surface is closed")]
    Closed,

    #[error("frame loop already ran on this surface")]
    AlreadyRan,

    #[error("graphics context is {0}, expected ready")]
    ContextNotReady(ContextState),

    /// A frame callback returned an error; the loop stopped on that frame.
    #[error("frame callback #{index} failed on frame {frame}")]
    Callback {
        index: usize,
        frame: u64,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
