use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to build classification thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
