use thiserror::Error;

/// Errors surfaced by the forecast core.
///
/// Only [`ForecastError::MissingApiKey`] is meant to end the program; the CLI
/// turns every other variant into a printed message.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(
        "API key not found. Please set the OPENWEATHER_API_KEY environment variable using:\n  \
         export OPENWEATHER_API_KEY=your_api_key_here   (Linux/macOS)\n  \
         set OPENWEATHER_API_KEY=your_api_key_here      (Windows, current session)\n  \
         setx OPENWEATHER_API_KEY your_api_key_here     (Windows, permanent)"
    )]
    MissingApiKey,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Invalid date '{input}', expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Unknown granularity '{0}'. Supported values: daily, hourly.")]
    UnknownGranularity(String),

    #[error("Unknown scope '{0}'. Supported values: today, all, specific.")]
    UnknownScope(String),

    #[error("Unknown unit system '{0}'. Supported values: metric, imperial, standard.")]
    UnknownUnits(String),
}

/// Anything that went wrong between sending the request and decoding the body.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send request to OpenWeather: {0}")]
    Send(#[source] reqwest::Error),

    #[error("OpenWeather forecast request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to read OpenWeather forecast response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Failed to parse OpenWeather forecast JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
