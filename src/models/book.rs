//! Book (catalog) model and related types

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Book category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Education,
    Entertainment,
    Comics,
    Biography,
    History,
    Novel,
    Science,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Education => "education",
            Category::Entertainment => "entertainment",
            Category::Comics => "comics",
            Category::Biography => "biography",
            Category::History => "history",
            Category::Novel => "novel",
            Category::Science => "science",
            Category::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "education" => Ok(Category::Education),
            "entertainment" => Ok(Category::Entertainment),
            "comics" => Ok(Category::Comics),
            "biography" => Ok(Category::Biography),
            "history" => Ok(Category::History),
            "novel" => Ok(Category::Novel),
            "science" => Ok(Category::Science),
            "other" => Ok(Category::Other),
            _ => Err(format!("Invalid book category: {}", s)),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        s.parse().unwrap_or(Category::Other)
    }
}

// SQLx conversion: categories are stored as plain text
impl sqlx::Type<Postgres> for Category {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for Category {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        Ok(Category::from(s))
    }
}

impl Encode<'_, Postgres> for Category {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        let s: String = self.as_str().to_string();
        <String as Encode<Postgres>>::encode(s, buf)
    }
}

/// Book model. `available` is always derived from the borrow ledger
/// (no open borrow references the book), never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub name: String,
    pub isbn: String,
    pub author: String,
    pub category: Category,
    pub available: bool,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 30, message = "ISBN must be 1-30 characters"))]
    pub isbn: String,
    #[validate(length(min = 1, max = 200, message = "Author must be 1-200 characters"))]
    pub author: String,
    #[serde(default = "default_category")]
    pub category: Category,
}

fn default_category() -> Category {
    Category::Other
}

/// Update book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 30, message = "ISBN must be 1-30 characters"))]
    pub isbn: String,
    #[validate(length(min = 1, max = 200, message = "Author must be 1-200 characters"))]
    pub author: String,
    pub category: Category,
}

/// Book list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    pub category: Option<Category>,
    /// When true, only books with no open borrow; when false, only borrowed books
    pub available: Option<bool>,
    /// Matches name or author (substring) or ISBN (exact)
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_and_display() {
        assert_eq!("novel".parse::<Category>().unwrap(), Category::Novel);
        assert_eq!("Science".parse::<Category>().unwrap(), Category::Science);
        assert!("poetry".parse::<Category>().is_err());
        assert_eq!(Category::Biography.to_string(), "biography");
    }

    #[test]
    fn category_from_string_falls_back_to_other() {
        assert_eq!(Category::from("poetry".to_string()), Category::Other);
        assert_eq!(Category::from("comics".to_string()), Category::Comics);
    }

    #[test]
    fn category_serde_uses_lowercase() {
        let json = serde_json::to_string(&Category::History).unwrap();
        assert_eq!(json, "\"history\"");
        let back: Category = serde_json::from_str("\"education\"").unwrap();
        assert_eq!(back, Category::Education);
    }
}
