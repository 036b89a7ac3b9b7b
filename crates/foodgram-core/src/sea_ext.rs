use sea_orm::{DbErr, SqlErr, TransactionError};

/// Flatten the error of a `TransactionTrait::transaction` call.
///
/// Both variants mean the transaction did not commit.
pub trait TransactionErrorExt {
    fn into_db_err(self) -> DbErr;
}

impl TransactionErrorExt for TransactionError<DbErr> {
    fn into_db_err(self) -> DbErr {
        match self {
            TransactionError::Connection(e) | TransactionError::Transaction(e) => e,
        }
    }
}

/// A UNIQUE or PRIMARY KEY constraint rejected the write.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// A FOREIGN KEY constraint rejected the write (the referenced row is gone).
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
