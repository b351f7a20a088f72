use clap::Parser;

/// List product subscriptions, one page at a time
#[derive(Debug, Parser)]
pub(crate) struct ListCommand {
    /// Cursor returned as `endCursor` by a previous page
    #[arg(long)]
    pub(crate) after: Option<String>,
    /// Keep fetching pages until the last one
    #[arg(long)]
    pub(crate) all: bool,
    /// Number of subscriptions per page, overrides the configuration file
    #[arg(long)]
    pub(crate) page_size: Option<u32>,
}
