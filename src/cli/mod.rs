use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

use crate::utils::parse_date;

#[derive(Parser, Debug)]
#[command(
    name = "harvest",
    about = "Channel Harvest - Fetch metadata and transcripts for a YouTube channel's uploads",
    version,
    long_about = "Resolves a channel handle, lists every video published between --start and --end (both inclusive), fetches a transcript for each one and writes videos.csv plus transcripts/<video_id>.txt into the output directory. Requires YOUTUBE_API_KEY in the environment or a .env file."
)]
pub struct Cli {
    /// Channel handle (e.g. @KamFIT24)
    #[arg(long, value_name = "HANDLE")]
    pub handle: String,

    /// First publish date to include
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub start: NaiveDate,

    /// Last publish date to include
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub end: NaiveDate,

    /// Output directory (default: output)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Preferred transcript language, repeat for fallbacks (default: cs)
    #[arg(short, long = "language", value_name = "LANG")]
    pub languages: Vec<String>,

    /// Number of transcripts fetched at the same time (default: 1)
    #[arg(short = 'j', long, value_name = "COUNT")]
    pub concurrency: Option<usize>,

    /// Stop paging once a page is entirely older than --start
    #[arg(long)]
    pub assume_descending: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long)]
    pub quiet: bool,
}
