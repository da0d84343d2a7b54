//! Crawl a site two levels deep and print every blog page that turns up.
//!
//! Run with: cargo run --example callback_crawl

use linkscope::Crawl;
use regex::Regex;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let summary = Crawl::new(["https://www.scrapingbee.com/blog/"])
        .with_max_depth(2)
        .with_max_concurrency(5)
        .follow(vec![r"^/blog/".to_string()])
        .on(Regex::new(r"/blog/.+").unwrap(), |page| {
            println!("blog post: {} ({} bytes)", page.url, page.body.len());
            Ok(())
        })
        .run()
        .await?;

    println!(
        "done: {} pages, {} failures, {} rounds",
        summary.pages, summary.failures, summary.rounds
    );
    Ok(())
}
