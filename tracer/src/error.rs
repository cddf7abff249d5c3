use geo::pixelbuffer::OutOfBounds;

/// All the ways a render can fail, matching the error kinds catalogued for
/// this crate: bad configuration, I/O, out-of-range pixel access, and a
/// worker thread that poisoned the job by panicking or hitting a fatal
/// numerical failure mid-render.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid render configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pixel buffer access out of bounds: {0}")]
    Bounds(#[from] OutOfBounds),

    #[error("worker thread failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, Error>;
