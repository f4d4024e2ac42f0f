use clap::Parser;
use tokio::io::AsyncRead;

use han_rs::han::serial;
use han_rs::{
    init_logger, log_info, DecoderOptions, DecoderPipeline, HanError, StdoutSink, VendorMap,
};

#[derive(Parser)]
#[command(name = "han-cli")]
#[command(about = "Decode DLMS/COSEM telemetry from a smart meter HAN port")]
struct Cli {
    /// Serial device connected to the meter's HAN port
    #[arg(short, long, conflicts_with = "file")]
    port: Option<String>,

    /// Read a captured byte stream from a file instead ("-" for stdin)
    #[arg(short, long)]
    file: Option<String>,

    /// Register dictionary: AIDON_V0001, Kamstrup_V0001 or KFM_001
    #[arg(short = 'm', long = "vendor-map")]
    vendor_map: String,

    /// Emit one-line JSON documents instead of pretty-printed ones
    #[arg(long)]
    compact: bool,

    /// Continue decoding frames whose checksums do not match
    #[arg(long)]
    ignore_checksum: bool,

    /// Emit diagnostic trace to stderr
    #[arg(long)]
    debug: bool,

    /// Suppress informational stderr output
    #[arg(long, conflicts_with = "debug")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), HanError> {
    let cli = Cli::parse();
    init_logger(cli.debug, cli.quiet);

    let vendor: VendorMap = cli.vendor_map.parse()?;

    let source: Box<dyn AsyncRead + Unpin> = if let Some(port) = &cli.port {
        log_info(&format!("reading from serial port {port}"));
        Box::new(serial::open_port(port)?)
    } else {
        match cli.file.as_deref() {
            None | Some("-") => Box::new(tokio::io::stdin()),
            Some(path) => Box::new(tokio::fs::File::open(path).await?),
        }
    };

    log_info(&format!("decoding with vendor map {}", vendor.name()));
    let options = DecoderOptions {
        ignore_checksum: cli.ignore_checksum,
        compact: cli.compact,
    };
    let mut pipeline = DecoderPipeline::new(source, vendor, options);
    pipeline.add_sink(Box::new(StdoutSink));

    let stats = pipeline.run().await?;
    log_info(&format!(
        "stream ended: {} frames decoded, {} dropped ({} checksum), {} noise bytes discarded",
        stats.frames_decoded, stats.frames_dropped, stats.checksum_errors, stats.bytes_discarded
    ));
    Ok(())
}
