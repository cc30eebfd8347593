//! One-shot arXiv paper search.

use anyhow::Result;
use paperchat_sources::ArxivClient;

pub async fn run(topic: &str, max_results: usize) -> Result<()> {
    let client = ArxivClient::new();

    match client.search(topic, max_results).await {
        Ok(papers) if papers.is_empty() => {
            println!("No papers found for \"{topic}\".");
        }
        Ok(papers) => {
            println!("Papers about \"{topic}\" (most relevant first):\n");
            for (i, paper) in papers.iter().enumerate() {
                println!("{}. {}", i + 1, paper.title);
                if !paper.authors.is_empty() {
                    println!("   {}", paper.authors);
                }
                println!("   {}", paper.abs_url);
                println!("   PDF: {}\n", paper.pdf_url);
            }
        }
        Err(err) => {
            println!("Search failed: {err}");
        }
    }

    Ok(())
}
