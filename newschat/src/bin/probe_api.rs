use newschat::api::http::HttpNewsApi;
use newschat::api::{NewsApi, SearchRequest};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let base_url = std::env::var("NEWSCHAT_API_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());
    let query = std::env::args().nth(1).unwrap_or_else(|| "Latest Tech News".to_string());

    println!("\n{}", "=".repeat(60));
    println!("Probing news backend");
    println!("Base URL: {}", base_url);
    println!("Query: {}", query);
    println!("{}", "=".repeat(60));

    let api = match HttpNewsApi::from_base_url(&base_url) {
        Ok(api) => api,
        Err(e) => {
            println!("✗ Invalid base URL: {:#}", e);
            return;
        }
    };

    match api.health().await {
        Ok(health) => println!("\n[health] {} {:?}", health.status, health.agents),
        Err(e) => println!("\n[health] ✗ {:#}", e),
    }

    let request = SearchRequest::new(query, &common::SearchConfig::default());
    let envelope = match api.search(&request).await {
        Ok(envelope) => envelope,
        Err(e) => {
            println!("\n[search] ✗ Failed: {:#}", e);
            return;
        }
    };

    println!(
        "\n[search] success={} message={:?} articles={}",
        envelope.success,
        envelope.message,
        envelope.articles.len()
    );

    for (i, article) in envelope.articles.iter().enumerate() {
        println!("\n  {}. {:?}", i + 1, article.title);
        println!("     Source: {:?}  Published: {:?}", article.source, article.published_date);
        let Some(url) = article.url.as_deref().filter(|u| !u.is_empty()) else {
            println!("     (no url, preview skipped)");
            continue;
        };
        println!("     URL: {}", url);
        match api.preview(url).await {
            Ok(preview) => {
                let text_len = preview.preview_text.as_ref().map(|t| t.len()).unwrap_or(0);
                println!("     ✓ Preview: image={:?}, text {} chars", preview.image, text_len);
            }
            Err(e) => println!("     ✗ Preview failed: {:#}", e),
        }
    }
}
