/// Result type for game engine operations
pub type GameResult<T> = Result<T, GameError>;

/// Errors that can occur while supplying or playing game content
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Missing or rejected credential. Fatal to any fetch; never retried
    /// automatically.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The generator endpoint answered with a non-2xx status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Generator output did not match the expected shape.
    #[error("failed to parse generated content: {0}")]
    Parse(String),

    /// Motion permission denied or the sensor API is absent. Degrades the
    /// motion-controlled game only.
    #[error("motion sensor unavailable: {0}")]
    Sensor(String),
}
