//! Fetch and print metadata for one arXiv paper.

use anyhow::Result;
use paperchat_sources::{ArxivClient, arxiv_pdf_url, normalize_arxiv_id};

pub async fn run(reference: &str) -> Result<()> {
    let client = ArxivClient::new();

    match client.fetch(reference).await {
        Ok(doc) => {
            println!("{}", doc.title);
            if let Some(authors) = &doc.authors {
                println!("{authors}");
            }
            println!("{}", doc.source_url);
            println!("PDF: {}", arxiv_pdf_url(&normalize_arxiv_id(reference)));
            if !doc.body_text.is_empty() {
                println!("\n{}", doc.body_text);
            }
        }
        Err(err) => {
            println!("Could not fetch paper: {err}");
        }
    }

    Ok(())
}
