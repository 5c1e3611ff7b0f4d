use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub section_id: Option<i32>,
    pub foreign_id: Option<i32>,
    pub post_text: Option<String>,
    pub mentions: Option<Value>,
    pub parent_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub post_text: Option<String>,
    pub mentions: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserSearchQuery {
    pub q: Option<String>,
}

impl UserSearchQuery {
    /// Patrón de búsqueda; `None` con menos de dos caracteres
    pub fn pattern(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| q.chars().count() >= 2)
            .map(|q| format!("%{}%", q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_queries_are_ignored() {
        assert_eq!(UserSearchQuery { q: None }.pattern(), None);
        assert_eq!(UserSearchQuery { q: Some("a".into()) }.pattern(), None);
        assert_eq!(UserSearchQuery { q: Some(" a ".into()) }.pattern(), None);
        assert_eq!(UserSearchQuery { q: Some("an".into()) }.pattern(), Some("%an%".to_string()));
    }
}
