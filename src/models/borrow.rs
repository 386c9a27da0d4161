//! Borrow (loan) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::Book;
use super::student::Student;

/// Borrow model from database.
///
/// A borrow is open while `returned` is false; it closes exactly once,
/// either by an explicit return or by the overdue sweeper.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Borrow {
    pub id: i32,
    pub book_id: i32,
    pub student_id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned: bool,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Borrow {
    /// True iff the borrow is still open and past its due date
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        !self.returned && now > self.due_at
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }
}

/// Borrow with nested book and student, for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BorrowDetails {
    pub id: i32,
    pub borrowed_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub returned: bool,
    pub is_overdue: bool,
    pub student: Student,
    pub book: Book,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn borrow(due_offset: Duration, returned: bool) -> (Borrow, DateTime<Utc>) {
        let now = Utc::now();
        let b = Borrow {
            id: 1,
            book_id: 1,
            student_id: 1,
            borrowed_at: now - Duration::days(1),
            due_at: now + due_offset,
            returned,
            returned_at: if returned { Some(now) } else { None },
        };
        (b, now)
    }

    #[test]
    fn open_borrow_past_due_is_overdue() {
        let (b, now) = borrow(Duration::seconds(-1), false);
        assert!(b.is_overdue_at(now));
    }

    #[test]
    fn open_borrow_before_due_is_not_overdue() {
        let (b, now) = borrow(Duration::days(7), false);
        assert!(!b.is_overdue_at(now));
    }

    #[test]
    fn borrow_due_exactly_now_is_not_overdue() {
        let (b, now) = borrow(Duration::zero(), false);
        assert!(!b.is_overdue_at(now));
    }

    #[test]
    fn closed_borrow_is_never_overdue() {
        let (b, now) = borrow(Duration::days(-30), true);
        assert!(!b.is_overdue_at(now));
    }
}
