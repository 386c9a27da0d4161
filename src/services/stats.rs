//! Statistics service

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::Repository};

#[derive(Debug, Serialize, ToSchema)]
pub struct BookStats {
    pub total: i64,
    pub available: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentStats {
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BorrowStats {
    pub active: i64,
    pub overdue: i64,
    pub returned: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub books: BookStats,
    pub students: StudentStats,
    pub borrows: BorrowStats,
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Collect library-wide counters
    pub async fn get_stats(&self) -> AppResult<StatsResponse> {
        Ok(StatsResponse {
            books: BookStats {
                total: self.repository.books.count_total().await?,
                available: self.repository.books.count_available().await?,
            },
            students: StudentStats {
                total: self.repository.students.count_total().await?,
            },
            borrows: BorrowStats {
                active: self.repository.borrows.count_active().await?,
                overdue: self.repository.borrows.count_overdue().await?,
                returned: self.repository.borrows.count_returned().await?,
            },
        })
    }
}
