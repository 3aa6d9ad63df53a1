//! Command-line arguments

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "aistream",
    version,
    about = "Stream a byte source as text, printing it as it arrives"
)]
pub struct Cli {
    /// File to read; "-" or omitted reads stdin
    #[arg(value_name = "INPUT", conflicts_with = "url")]
    pub input: Option<PathBuf>,

    /// GET this URL and stream the response body instead
    #[arg(long)]
    pub url: Option<String>,

    /// Fail on invalid UTF-8 instead of replacing it
    #[arg(long)]
    pub strict: bool,

    /// Print each chunk on its own line as `[n] <fragment>`
    #[arg(long)]
    pub show_chunks: bool,

    /// Print a JSON summary once the stream ends
    #[arg(long)]
    pub summary: bool,

    /// Config file (default: <config dir>/aistream/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// The file to read, or `None` for stdin
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|path| path.as_os_str() != "-")
    }
}
