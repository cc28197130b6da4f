use crate::articles::Article;
use crate::transcript::TitleRef;

/// Fixed text shown when the search pipeline fails.
pub fn search_error_message(base_url: &str) -> String {
    format!(
        "Sorry, I encountered an error while fetching news. Please make sure the API server is running on {}.",
        base_url
    )
}

pub fn summary_text(count: usize, query: &str) -> String {
    format!("Found {} articles about \"{}\":", count, query)
}

/// `(id, title)` pairs in panel order.
pub fn title_refs(articles: &[Article]) -> Vec<TitleRef> {
    articles
        .iter()
        .map(|a| TitleRef {
            article_id: a.id.clone(),
            title: a.title.clone(),
        })
        .collect()
}

/// Assistant answer for one successful search
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledResponse {
    pub text: String,
    pub title_refs: Vec<TitleRef>,
}

pub fn assemble(query: &str, articles: &[Article]) -> AssembledResponse {
    AssembledResponse {
        text: summary_text(articles.len(), query),
        title_refs: title_refs(articles),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RawArticle;
    use chrono::Utc;

    #[test]
    fn summary_format() {
        assert_eq!(summary_text(2, "quantum computing"), "Found 2 articles about \"quantum computing\":");
        assert_eq!(summary_text(0, "nothing"), "Found 0 articles about \"nothing\":");
    }

    #[test]
    fn refs_follow_article_order() {
        let now = Utc::now();
        let articles: Vec<Article> = ["first", "second"]
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let raw = RawArticle {
                    title: Some(t.to_string()),
                    ..RawArticle::default()
                };
                Article::from_raw(raw, format!("article-{}", i), now, "p")
            })
            .collect();

        let response = assemble("q", &articles);
        assert_eq!(response.title_refs.len(), 2);
        assert_eq!(response.title_refs[0].article_id, "article-0");
        assert_eq!(response.title_refs[1].title, "second");
    }

    #[test]
    fn error_message_names_backend() {
        assert!(search_error_message("http://localhost:8000").ends_with("running on http://localhost:8000."));
    }
}
