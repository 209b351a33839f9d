use thiserror::Error;

/// Errors from the AI completion provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider response contained no text content")]
    EmptyResponse,
}

/// Errors from the SQLite catalog store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage connection error: {0}")]
    Connection(String),
    #[error("Storage operation failed: {0}")]
    OperationFailed(String),
}

/// Errors from a single transcript analysis attempt.
///
/// A `Provider` error is raised for non-transient provider failures;
/// throttling-shaped failures are retried internally and only surface as
/// `RetriesExhausted` once the retry budget is spent. `UnparsableResponse`
/// means the model replied but its text carried no usable JSON object, which
/// is never retried.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("AI provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Failed to parse analysis response as JSON")]
    UnparsableResponse,
    #[error("Gave up after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}
