use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tf_core::Itag;

#[derive(Parser)]
#[command(name = "tubeforge")]
#[command(author, version, about = "Resolve fetched video payloads into playable streams")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a video from its fetched payload files
    Resolve {
        /// Video identifier
        #[arg(long)]
        id: String,

        /// File holding the query-string encoded info payload
        #[arg(long)]
        info: PathBuf,

        /// File holding an HLS master playlist
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// File holding a streaming-data descriptor list
        #[arg(long)]
        streaming_data: Option<PathBuf>,

        /// Direct stream URL from a DASH manifest, as ITAG=URL (repeatable)
        #[arg(long = "dash-url", value_parser = parse_dash_url)]
        dash_urls: Vec<(Itag, String)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Decode a query-string payload and print its fields
    DecodeQuery {
        /// File holding the payload
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    ValidateConfig {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

fn parse_dash_url(raw: &str) -> Result<(Itag, String), String> {
    let (itag, url) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ITAG=URL, got {raw:?}"))?;
    let itag: Itag = itag
        .parse()
        .map_err(|_| format!("invalid itag {itag:?}"))?;
    if url.is_empty() {
        return Err("URL is empty".to_string());
    }
    Ok((itag, url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dash_url() {
        assert_eq!(
            parse_dash_url("137=https://d/137?a=b").unwrap(),
            (Itag::new(137), "https://d/137?a=b".to_string())
        );
        assert!(parse_dash_url("https://d/137").is_err());
        assert!(parse_dash_url("x=https://d").is_err());
        assert!(parse_dash_url("137=").is_err());
    }
}
