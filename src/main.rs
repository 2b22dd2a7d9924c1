mod cli;

use tubeforge::config::{self, Config};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};
use tf_core::Itag;
use tf_decode::decode_query_string;
use tf_video::{resolve_with, Payloads, StreamDescriptor, ValidatedVideo};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tubeforge=debug,tf_video=debug,tf_decode=debug".to_string()
        } else {
            "tubeforge=warn,tf_video=warn,tf_decode=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve {
            id,
            info,
            manifest,
            streaming_data,
            dash_urls,
            json,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let payloads = read_payloads(&info, manifest.as_deref(), streaming_data.as_deref(), dash_urls)?;
            resolve_video(&id, &payloads, &config, json)
        }
        Commands::DecodeQuery { file, json } => decode_query(&file, json),
        Commands::ValidateConfig {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("tubeforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn read_payload(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read payload file: {:?}", path))
}

fn read_payloads(
    info: &Path,
    manifest: Option<&Path>,
    streaming_data: Option<&Path>,
    dash_urls: Vec<(Itag, String)>,
) -> Result<Payloads> {
    let mut payloads = Payloads::new(read_payload(info)?);
    if let Some(path) = manifest {
        payloads = payloads.with_manifest(read_payload(path)?);
    }
    if let Some(path) = streaming_data {
        payloads = payloads.with_streaming_data(read_payload(path)?);
    }
    for (itag, url) in dash_urls {
        payloads = payloads.with_dash_stream_url(itag, url);
    }
    Ok(payloads)
}

fn resolve_video(id: &str, payloads: &Payloads, config: &Config, json: bool) -> Result<()> {
    let video = resolve_with(id, payloads, &config.decode).map_err(|e| {
        let code = e.code();
        anyhow::Error::new(e).context(format!("Failed to resolve video {id} (error code {code})"))
    })?;

    if json || config.output.json {
        println!("{}", serde_json::to_string_pretty(&video)?);
        return Ok(());
    }

    print_video(&video, config);
    Ok(())
}

fn print_video(video: &ValidatedVideo, config: &Config) {
    let metadata = video.metadata();
    println!("Video: {}", video.id());
    if let Some(ref title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(ref author) = metadata.author {
        println!("Author: {}", author);
    }
    if let Some(duration) = metadata.duration {
        let secs = duration.as_secs();
        let mins = secs / 60;
        let hours = mins / 60;
        println!("Duration: {:02}:{:02}:{:02}", hours, mins % 60, secs % 60);
    }
    if metadata.is_live == Some(true) {
        println!("Live: yes");
    }
    match video.expiration() {
        Some(expires) => println!("Expires: {}", expires.to_rfc3339()),
        None => println!("Expires: unknown"),
    }

    let partition = video.partition();
    println!("\nUsable Streams: {}", partition.usable.len());
    for stream in &partition.usable {
        print_stream(stream);
    }

    println!("\nCipher-Pending Streams: {}", partition.cipher_pending.len());
    for stream in &partition.cipher_pending {
        print_stream(stream);
        if let Some(ref cipher) = stream.cipher {
            println!("      signature param: {}", cipher.signature_param);
        }
    }

    if !config.output.preferred_itags.is_empty() {
        match video.preferred_stream(&config.output.preferred_itags) {
            Some(stream) => println!("\nPreferred: itag {}", stream.itag),
            None => println!("\nPreferred: none of the configured itags"),
        }
    }

    if config.output.show_thumbnails {
        println!("\nThumbnails: {}", video.thumbnails().len());
        for thumb in video.thumbnails() {
            if thumb.width == 0 && thumb.height == 0 {
                println!("  {}", thumb.url);
            } else {
                println!("  {}x{} {}", thumb.width, thumb.height, thumb.url);
            }
        }
    }
}

fn print_stream(stream: &StreamDescriptor) {
    print!("  [{}]", stream.itag);
    if let Some(ref mime) = stream.mime_type {
        print!(" {}", mime);
    }
    if let Some(ref quality) = stream.quality_label {
        print!(" {}", quality);
    }
    if let Some((w, h)) = stream.resolution {
        print!(" {}x{}", w, h);
    }
    if let Some(bitrate) = stream.bitrate {
        print!(" {} kbps", bitrate / 1000);
    }
    println!();
    if let Some(ref url) = stream.url {
        println!("      {}", url);
    }
}

fn decode_query(file: &Path, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let fields = decode_query_string(read_payload(file)?.trim());

    if json {
        println!("{}", serde_json::to_string_pretty(&fields)?);
    } else {
        for (key, value) in &fields {
            println!("{} = {}", key, value);
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let (config, source): (Config, Option<PathBuf>) = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            (config::load_config(p)?, Some(p.to_path_buf()))
        }
        None => {
            println!("No config file specified, using defaults");
            (Config::default(), None)
        }
    };

    if source.is_some() {
        println!("✓ Configuration is valid");
    }
    println!("  Stream map keys: {}", config.decode.stream_map_keys.join(", "));
    println!("  Thumbnail key: {}", config.decode.thumbnail_key);
    println!("  Manifest key: {}", config.decode.manifest_key);
    println!("  Streaming data key: {}", config.decode.streaming_data_key);
    println!("  Signature param: {}", config.decode.default_signature_param);
    println!("  Preferred itags: {}", config.output.preferred_itags.len());

    Ok(())
}
