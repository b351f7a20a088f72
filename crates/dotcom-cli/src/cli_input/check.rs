use clap::Parser;

/// Resolve the product subscription owning an access token
#[derive(Debug, Parser)]
pub(crate) struct CheckCommand {
    /// The access token to look up
    pub(crate) token: String,
}
