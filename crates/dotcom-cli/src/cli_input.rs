mod check;
mod list;

pub(crate) use check::CheckCommand;
pub(crate) use list::ListCommand;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotcom_client::DotcomConfig;
use secrecy::SecretString;
use url::Url;

use crate::{
    errors::CliError,
    log::{LogLevel, LogStyle},
};

/// Query product subscriptions on Sourcegraph.com
#[derive(Debug, Parser)]
#[command(name = "dotcom", version)]
pub(crate) struct Args {
    /// The path of the client configuration file
    #[arg(short('c'), long("config"), env = "DOTCOM_CONFIG")]
    config_path: Option<PathBuf>,
    /// GraphQL endpoint, overrides the configuration file
    #[arg(long, env = "DOTCOM_URL")]
    url: Option<Url>,
    /// Service access token, overrides the configuration file
    #[arg(long, env = "DOTCOM_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
    /// Log level for the client and the command line
    #[arg(long, env = "DOTCOM_LOG", value_enum, ignore_case = true, default_value_t = LogLevel::Warn)]
    pub(crate) log_level: LogLevel,
    /// Format of the log output
    #[arg(long, value_enum, default_value_t)]
    pub(crate) log_style: LogStyle,
    #[command(subcommand)]
    pub(crate) command: SubCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum SubCommand {
    Check(CheckCommand),
    List(ListCommand),
}

impl Args {
    /// The configuration file, if any, with command line overrides applied.
    pub(crate) fn config(&self) -> Result<DotcomConfig, CliError> {
        let mut config = match &self.config_path {
            Some(path) => DotcomConfig::load(path)?,
            None => DotcomConfig::default(),
        };

        if let Some(url) = &self.url {
            config.url = url.clone();
        }

        if let Some(access_token) = &self.access_token {
            config.access_token = Some(SecretString::new(access_token.clone()));
        }

        if let SubCommand::List(ListCommand {
            page_size: Some(page_size),
            ..
        }) = &self.command
        {
            config.page_size = Some(*page_size);
        }

        Ok(config)
    }
}
