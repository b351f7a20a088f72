use dotcom_client::DotcomError;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// wraps a [`DotcomError`]
    #[error(transparent)]
    Dotcom(#[from] DotcomError),
    /// returned if a result could not be written to stdout
    #[error("could not print the result\nCaused by: {0}")]
    Output(#[from] serde_json::Error),
}
