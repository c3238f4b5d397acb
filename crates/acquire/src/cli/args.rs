use std::path::PathBuf;

use acquire::{ChecksumAlgorithm, DOWNLOAD_DIR};
use clap::Parser;

#[derive(Clone, Debug, Parser)]
#[command(name = "acquire", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct Args {
    /// URL to download (http, https or file)
    pub url: String,

    /// Directory the file is saved in
    #[arg(short, long, env = "ACQUIRE_DOWNLOAD_DIR", default_value = DOWNLOAD_DIR)]
    pub output: PathBuf,

    /// Expected digest of the downloaded file, in hex
    #[arg(short, long, value_name = "HEX")]
    pub checksum: Option<String>,

    /// Digest algorithm for --checksum
    #[arg(short, long, value_name = "NAME", default_value_t = ChecksumAlgorithm::Sha256, requires = "checksum")]
    pub algorithm: ChecksumAlgorithm,

    /// Unpack the downloaded archive into DIR
    #[arg(short = 'x', long, value_name = "DIR")]
    pub extract: Option<PathBuf>,

    /// Leading path components dropped while unpacking
    #[arg(long, value_name = "N", default_value_t = 0, requires = "extract")]
    pub strip_components: usize,

    /// Transfer the whole file before reporting progress
    #[arg(long)]
    pub blocking: bool,

    /// Hide progress bars
    #[arg(short, long)]
    pub quiet: bool,
}
