//! Controllers sitting between an HTTP layer and the DAOs.


use futures::TryStreamExt as _;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    constants::{DUPLICATE_USER_WARNING, EMAIL_FIELD},
    dao::DocumentFinder,
    validation::looks_like_email,
    DaoError,
    Document,
    Fields,
    Result,
};

/// Resolves user documents.
///
/// The controller keeps no state of its own; it only holds the finder it
/// queries, which is a [`crate::DocumentStore`] bound to the `user` collection
/// in production.
#[derive(Debug, Clone)]
pub struct UserController<F> {
    dao: F,
}

impl<F> UserController<F>
where
    F: DocumentFinder,
{
    /// Creates a controller reading users through `dao`.
    pub const fn new(dao: F) -> Self {
        Self {
            dao,
        }
    }

    /// Returns the finder the controller reads through.
    pub const fn dao(&self) -> &F { &self.dao }

    /// Returns the single user registered with `email`.
    ///
    /// - An address without `@` fails with [`DaoError::InvalidEmail`] before the
    ///   store is queried.
    /// - No match fails with [`DaoError::UserNotFound`].
    /// - Several matches are logged as a warning and the first one is returned,
    ///   since email uniqueness may not hold for data written before the
    ///   constraint existed.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Document> {
        trace!("Looking up user by email");
        if !looks_like_email(email) {
            debug!("Rejected malformed email address");
            return Err(DaoError::InvalidEmail);
        }

        let mut query = Fields::new();
        query.insert(EMAIL_FIELD.to_owned(), Value::String(email.to_owned()));
        let mut users = self.dao.find(Value::Object(query));

        let Some(user) = users.try_next().await?
        else {
            debug!("No user found with mail {}", email);
            return Err(DaoError::UserNotFound {
                email: email.to_owned(),
            });
        };

        if users.try_next().await?.is_some() {
            warn!("{} {}", DUPLICATE_USER_WARNING, email);
        }
        Ok(user)
    }
}
