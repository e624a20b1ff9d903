use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Identity not found")]
    NotFound,

    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, IdentityError>;
