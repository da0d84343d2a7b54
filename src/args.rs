use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "linkscope")]
#[command(about = "Scoped breadth-first crawler that yields pages to URL-matched callbacks")]
#[command(version)]
pub struct Args {
    /// Seed URLs to start crawling from
    #[arg(required = true)]
    pub seeds: Vec<String>,

    /// Registrable domain to stay within (derived from the first seed when omitted)
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Exact subdomain to stay within; empty means the bare domain only
    #[arg(short, long)]
    pub subdomain: Option<String>,

    /// Maximum link-following depth (default 5)
    #[arg(long)]
    pub depth: Option<usize>,

    /// Number of concurrent requests (default 5)
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Regex patterns paths must match to be followed (repeatable)
    #[arg(short, long)]
    pub follow: Vec<String>,

    /// Print pages whose final URL matches this regex
    #[arg(short = 'm', long = "match")]
    pub match_pattern: Option<String>,

    /// JSON configuration file; explicit flags above still apply on top
    #[arg(long)]
    pub config: Option<PathBuf>,
}
