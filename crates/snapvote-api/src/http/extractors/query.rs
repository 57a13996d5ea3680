//! Query parameter extractors for list endpoints.

use serde::Deserialize;

use snapvote_types::image::{CategoryFilter, OwnerScope};

use crate::http::error::AppError;

/// `?category=` for image listings. Absent means `all`.
#[derive(Debug, Deserialize, Default)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl CategoryQuery {
    pub fn filter(&self) -> Result<CategoryFilter, AppError> {
        match self.category.as_deref() {
            None | Some("") => Ok(CategoryFilter::All),
            Some(raw) => raw
                .parse()
                .map_err(|_| AppError::Validation("Invalid category!".to_string())),
        }
    }
}

/// `?scope=` for the owner's own images. Absent means `active`.
#[derive(Debug, Deserialize, Default)]
pub struct ScopeQuery {
    pub scope: Option<String>,
}

impl ScopeQuery {
    pub fn scope(&self) -> Result<OwnerScope, AppError> {
        match self.scope.as_deref() {
            None | Some("") => Ok(OwnerScope::default()),
            Some(raw) => raw.parse().map_err(AppError::Validation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapvote_types::image::Category;

    #[test]
    fn test_category_defaults_to_all() {
        assert_eq!(CategoryQuery::default().filter().unwrap(), CategoryFilter::All);
        let q = CategoryQuery { category: Some("all".into()) };
        assert_eq!(q.filter().unwrap(), CategoryFilter::All);
    }

    #[test]
    fn test_known_category_parsed() {
        let q = CategoryQuery { category: Some("Photography".into()) };
        assert_eq!(q.filter().unwrap(), CategoryFilter::Only(Category::Photography));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let q = CategoryQuery { category: Some("Sports".into()) };
        assert!(matches!(q.filter(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_scope_parsing() {
        assert_eq!(ScopeQuery::default().scope().unwrap(), OwnerScope::Active);
        let q = ScopeQuery { scope: Some("archived".into()) };
        assert_eq!(q.scope().unwrap(), OwnerScope::Archived);
        let q = ScopeQuery { scope: Some("deleted".into()) };
        assert!(q.scope().is_err());
    }
}
