//! Outcome of a mutation scoped to the resource owner.

use std::fmt::Display;

use crate::domain::Error;

/// Result of an owner-scoped update or delete.
///
/// Stores resolve the three cases inside one atomic unit: the scoped write,
/// and on a miss, an unscoped existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedMutation<T> {
    /// The caller owns the resource and the change was committed.
    Applied(T),
    /// No resource with the id exists.
    NotFound,
    /// The resource exists but belongs to someone else.
    NotAllowed,
}

impl<T> OwnedMutation<T> {
    /// Transform the applied value, keeping the rejection cases.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OwnedMutation<U> {
        match self {
            Self::Applied(value) => OwnedMutation::Applied(f(value)),
            Self::NotFound => OwnedMutation::NotFound,
            Self::NotAllowed => OwnedMutation::NotAllowed,
        }
    }

    /// Classify the outcome into the service error taxonomy.
    ///
    /// `resource` names the entity in messages, e.g. `"post"`.
    pub fn into_result(self, resource: &str, id: impl Display) -> Result<T, Error> {
        match self {
            Self::Applied(value) => Ok(value),
            Self::NotFound => Err(Error::not_found(format!("{resource} {id} not found"))),
            Self::NotAllowed => Err(Error::forbidden(format!(
                "{resource} {id} belongs to another user"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn into_result_distinguishes_missing_from_foreign() {
        let missing = OwnedMutation::<()>::NotFound
            .into_result("post", 4)
            .expect_err("missing post");
        let foreign = OwnedMutation::<()>::NotAllowed
            .into_result("post", 4)
            .expect_err("foreign post");

        assert_eq!(missing.code(), ErrorCode::NotFound);
        assert_eq!(missing.message(), "post 4 not found");
        assert_eq!(foreign.code(), ErrorCode::Forbidden);
        assert_eq!(foreign.message(), "post 4 belongs to another user");
    }

    #[test]
    fn map_only_touches_applied() {
        assert_eq!(OwnedMutation::Applied(2).map(|v| v * 10), OwnedMutation::Applied(20));
        assert_eq!(OwnedMutation::<i32>::NotFound.map(|v| v * 10), OwnedMutation::NotFound);
        assert_eq!(
            OwnedMutation::<i32>::NotAllowed.map(|v| v * 10),
            OwnedMutation::NotAllowed
        );
    }
}
