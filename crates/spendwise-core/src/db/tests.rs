//! Database tests

use super::*;
use crate::error::Error;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn new_expense(description: &str, amount: f64, category_id: Option<i64>) -> NewExpense {
        NewExpense {
            description: description.to_string(),
            amount,
            category_id,
            user_id: None,
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        assert!(db.list_categories().unwrap().is_empty());
        assert_eq!(db.total_expenses().unwrap(), 0.0);
    }

    #[test]
    fn test_seed_default_categories_is_idempotent() {
        let db = Database::in_memory().unwrap();

        let created = db.seed_default_categories().unwrap();
        assert_eq!(created, DEFAULT_CATEGORIES.len());

        let created_again = db.seed_default_categories().unwrap();
        assert_eq!(created_again, 0);

        let names: Vec<String> = db
            .list_categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted, "categories should be ordered by name");
    }

    #[test]
    fn test_upsert_and_find_category() {
        let db = Database::in_memory().unwrap();

        let id = db.upsert_category("Groceries").unwrap();
        assert_eq!(db.upsert_category("Groceries").unwrap(), id);

        let found = db.find_category("groceries").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(db.find_category("Travel").unwrap().is_none());
    }

    #[test]
    fn test_insert_and_total_expenses() {
        let db = Database::in_memory().unwrap();
        let food = db.upsert_category("Food").unwrap();

        db.insert_expense(&new_expense("Lunch", 12.5, Some(food)))
            .unwrap();
        db.insert_expense(&new_expense("Dinner", 30.0, Some(food)))
            .unwrap();
        db.insert_expense(&new_expense("Misc", 7.5, None)).unwrap();

        assert!((db.total_expenses().unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_insert_rejects_invalid_amount() {
        let db = Database::in_memory().unwrap();

        let result = db.insert_expense(&new_expense("Refund", -5.0, None));
        assert!(matches!(result, Err(Error::InvalidData(_))));

        let result = db.insert_expense(&new_expense("Broken", f64::INFINITY, None));
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_insert_rejects_unknown_category() {
        let db = Database::in_memory().unwrap();
        let result = db.insert_expense(&new_expense("Lunch", 10.0, Some(999)));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_expenses_newest_first() {
        let db = Database::in_memory().unwrap();
        let food = db.upsert_category("Food").unwrap();

        let first = db
            .insert_expense(&new_expense("First", 1.0, Some(food)))
            .unwrap();
        let second = db.insert_expense(&new_expense("Second", 2.0, None)).unwrap();

        let expenses = db.list_expenses(10).unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].id, second);
        assert_eq!(expenses[1].id, first);
        assert_eq!(expenses[1].category.as_deref(), Some("Food"));
        assert!(expenses[0].category.is_none());

        assert_eq!(db.list_expenses(1).unwrap().len(), 1);
    }

    #[test]
    fn test_expense_records_use_category_names() {
        let db = Database::in_memory().unwrap();
        let transport = db.upsert_category("Transport").unwrap();

        db.insert_expense(&new_expense("Bus pass", 120.0, Some(transport)))
            .unwrap();
        db.insert_expense(&new_expense("Gift", 40.0, None)).unwrap();

        let records = db.expense_records().unwrap();
        assert_eq!(
            records,
            vec![
                ExpenseRecord::new("Bus pass", 120.0, "Transport"),
                ExpenseRecord::new("Gift", 40.0, UNCATEGORIZED),
            ]
        );
    }

    #[test]
    fn test_category_totals() {
        let db = Database::in_memory().unwrap();
        let food = db.upsert_category("Food").unwrap();
        let bills = db.upsert_category("Bills").unwrap();

        db.insert_expense(&new_expense("Groceries", 80.0, Some(food)))
            .unwrap();
        db.insert_expense(&new_expense("Cafe", 20.0, Some(food)))
            .unwrap();
        db.insert_expense(&new_expense("Power", 180.0, Some(bills)))
            .unwrap();
        db.insert_expense(&new_expense("Misc", 5.0, None)).unwrap();

        let totals = db.category_totals().unwrap();
        assert_eq!(totals.len(), 3);
        assert_eq!(totals[0].category, "Bills");
        assert_eq!(totals[1].category, "Food");
        assert_eq!(totals[1].count, 2);
        assert!((totals[1].total - 100.0).abs() < 1e-9);
        assert_eq!(totals[2].category, UNCATEGORIZED);
    }

    #[test]
    fn test_user_credentials() {
        let db = Database::in_memory().unwrap();

        let id = db
            .create_user("ada@example.com", "Ada", "correct horse")
            .unwrap();

        let user = db
            .verify_credentials("ada@example.com", "correct horse")
            .unwrap()
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.name, "Ada");

        assert!(db
            .verify_credentials("ada@example.com", "wrong")
            .unwrap()
            .is_none());
        assert!(db
            .verify_credentials("nobody@example.com", "correct horse")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_duplicate_user_rejected() {
        let db = Database::in_memory().unwrap();
        db.create_user("ada@example.com", "Ada", "pw").unwrap();

        let result = db.create_user("ada@example.com", "Ada again", "pw");
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_expense_with_user() {
        let db = Database::in_memory().unwrap();
        let user_id = db.create_user("ada@example.com", "Ada", "pw").unwrap();

        let mut expense = new_expense("Book", 15.0, None);
        expense.user_id = Some(user_id);
        db.insert_expense(&expense).unwrap();

        let stored = db.list_expenses(1).unwrap();
        assert_eq!(stored[0].user_id, Some(user_id));

        expense.user_id = Some(user_id + 100);
        assert!(matches!(
            db.insert_expense(&expense),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_lookup_failures_are_errors_not_misses() {
        let db = Database::in_memory().unwrap();
        db.seed_default_categories().unwrap();
        db.create_user("ada@example.com", "Ada", "pw").unwrap();

        // Missing rows are still misses
        assert!(db.get_user(999).unwrap().is_none());
        assert!(db.get_category(999).unwrap().is_none());

        let conn = db.conn().unwrap();
        conn.execute_batch(
            "ALTER TABLE users RENAME TO users_moved;
             ALTER TABLE categories RENAME TO categories_moved;",
        )
        .unwrap();
        drop(conn);

        assert!(matches!(
            db.verify_credentials("ada@example.com", "pw"),
            Err(Error::Database(_))
        ));
        assert!(matches!(db.get_user(1), Err(Error::Database(_))));
        assert!(matches!(db.get_category(1), Err(Error::Database(_))));
        assert!(matches!(db.find_category("Food"), Err(Error::Database(_))));
        assert!(matches!(db.upsert_category("Pets"), Err(Error::Database(_))));
    }
}
