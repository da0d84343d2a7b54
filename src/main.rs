use clap::Parser;
use linkscope::config::CrawlerConfig;
use linkscope::{Crawl, filter};
use regex::Regex;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!("Starting crawler for seeds: {:?}", args.seeds);

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut crawl = Crawl::new(args.seeds.clone()).with_config(config);

    // Attach a printing callback when a match pattern was given
    if let Some(pattern) = &args.match_pattern {
        let matcher = match Regex::new(pattern) {
            Ok(matcher) => matcher,
            Err(e) => {
                ::log::error!("Invalid match pattern '{}': {}", pattern, e);
                std::process::exit(1);
            }
        };
        crawl = crawl.on(matcher, |page| {
            println!("{} ({} bytes)", page.url, page.body.len());
            Ok(())
        });
    }

    let start_time = std::time::Instant::now();
    match crawl.run().await {
        Ok(summary) => {
            ::log::info!(
                "Crawling complete - {} pages ({} failures) over {} rounds in {:.2} seconds",
                summary.pages,
                summary.failures,
                summary.rounds,
                start_time.elapsed().as_secs_f64()
            );
        }
        Err(e) => {
            ::log::error!("Crawl failed: {}", e);
            std::process::exit(1);
        }
    }
}

/// Build the run configuration from the config file (if any) plus flags
fn build_config(args: &Args) -> Result<CrawlerConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => CrawlerConfig::from_file(path)?,
        None => CrawlerConfig::default(),
    };

    if let Some(domain) = &args.domain {
        config.domain = domain.clone();
    }
    if let Some(subdomain) = &args.subdomain {
        config.subdomain = subdomain.clone();
    }

    // No explicit scope anywhere: derive it from the first seed
    if config.domain.is_empty() {
        if let Some((domain, subdomain)) = args.seeds.first().and_then(|s| filter::scope_of(s)) {
            ::log::info!("derived crawl scope {}.{} from first seed", subdomain, domain);
            config.domain = domain;
            config.subdomain = subdomain;
        }
    }

    if let Some(depth) = args.depth {
        config.max_depth = depth;
    }
    if let Some(concurrency) = args.concurrency {
        config.max_concurrency = concurrency;
    }
    if !args.follow.is_empty() {
        config.follow_patterns = args.follow.clone();
    }

    Ok(config)
}
