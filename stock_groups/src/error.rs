use std::{error::Error, fmt::Debug};

use crate::constant::{BAD_REQUEST, CONFLICT, INTERNAL_ERROR, NOT_FOUND, UNAUTHORIZED};

#[derive(thiserror::Error)]
pub enum GroupError {
    #[error("Group name is required")]
    InvalidName,

    #[error("Group name must be 120 characters or fewer")]
    NameTooLong,

    #[error("At least one stock position is required")]
    EmptyPositions,

    #[error("Invalid position format")]
    MalformedEntry,

    #[error("Stock symbol is required for all positions")]
    MissingSymbol,

    #[error("Invalid amount invested for {0}. Must be a positive number.")]
    InvalidAmount(String),

    #[error("Duplicate stock symbols are not allowed")]
    DuplicateSymbol,

    #[error("Invite code is required")]
    MissingCode,

    #[error("Invalid group id")]
    InvalidGroupId,

    #[error("Group not found")]
    GroupNotFound,

    #[error("You already joined a group")]
    AlreadyMember,

    #[error("You are not a member of any group")]
    NotAMember,

    #[error("Unable to generate unique invite code")]
    GenerationExhausted,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Request body error")]
    BadRequest,

    #[error("Query error")]
    Database(#[from] sqlx::Error),

    #[error("Serde error")]
    Serde(#[source] serde_json::Error),
}

impl GroupError {
    pub fn http_status(&self) -> &'static str {
        match self {
            Self::InvalidName
            | Self::NameTooLong
            | Self::EmptyPositions
            | Self::MalformedEntry
            | Self::MissingSymbol
            | Self::InvalidAmount(_)
            | Self::DuplicateSymbol
            | Self::MissingCode
            | Self::InvalidGroupId
            | Self::BadRequest => BAD_REQUEST,
            Self::GroupNotFound | Self::NotAMember => NOT_FOUND,
            Self::AlreadyMember | Self::GenerationExhausted => CONFLICT,
            Self::Unauthorized => UNAUTHORIZED,
            Self::Database(_) | Self::Serde(_) => INTERNAL_ERROR,
        }
    }

    /// Message safe to surface to the caller. Internal faults stay generic.
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Serde(_) => "Something went wrong".to_string(),
            other => other.to_string(),
        }
    }
}

impl Debug for GroupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        if let Some(source) = self.source() {
            write!(f, " (Caused by: {})", source)?;
        }
        Ok(())
    }
}

/// `23505` is Postgres unique_violation. The unique indexes are the
/// authoritative uniqueness check; application pre-reads are only an
/// early exit.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        assert_eq!(GroupError::InvalidName.http_status(), BAD_REQUEST);
        assert_eq!(GroupError::EmptyPositions.http_status(), BAD_REQUEST);
        assert_eq!(
            GroupError::InvalidAmount("AAPL".into()).http_status(),
            BAD_REQUEST
        );
    }

    #[test]
    fn conflicts_and_lookups_map_to_their_statuses() {
        assert_eq!(GroupError::AlreadyMember.http_status(), CONFLICT);
        assert_eq!(GroupError::GenerationExhausted.http_status(), CONFLICT);
        assert_eq!(GroupError::GroupNotFound.http_status(), NOT_FOUND);
        assert_eq!(GroupError::NotAMember.http_status(), NOT_FOUND);
        assert_eq!(GroupError::Unauthorized.http_status(), UNAUTHORIZED);
    }

    #[test]
    fn internal_faults_stay_generic() {
        let err = GroupError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.http_status(), INTERNAL_ERROR);
        assert_eq!(err.public_message(), "Something went wrong");
    }

    #[test]
    fn row_not_found_is_not_a_unique_violation() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn invalid_amount_names_the_symbol() {
        let err = GroupError::InvalidAmount("TSLA".into());
        assert_eq!(
            err.to_string(),
            "Invalid amount invested for TSLA. Must be a positive number."
        );
    }
}
