//! Post aggregate and its validated inputs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::user::UserId;

/// Minimum title length, in characters.
pub const TITLE_MIN: usize = 3;
/// Maximum title length, in characters.
pub const TITLE_MAX: usize = 50;
/// Minimum post body length, in characters.
pub const POST_CONTENT_MIN: usize = 3;
/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
/// Largest page a caller may request.
pub const MAX_PAGE_LIMIT: u32 = 100;
/// Largest offset a store can address; SQL `OFFSET` is a signed 64-bit value.
pub const MAX_PAGE_OFFSET: u64 = i64::MAX as u64;

/// Validation errors for post inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    NonPositiveId,
    EmptyTitle,
    TitleTooShort { min: usize },
    TitleTooLong { max: usize },
    EmptyContent,
    ContentTooShort { min: usize },
    PageLimitOutOfRange { max: u32 },
    PageOffsetOutOfRange { max: u64 },
}

impl PostValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveId => "id",
            Self::EmptyTitle | Self::TitleTooShort { .. } | Self::TitleTooLong { .. } => "title",
            Self::EmptyContent | Self::ContentTooShort { .. } => "content",
            Self::PageLimitOutOfRange { .. } => "limit",
            Self::PageOffsetOutOfRange { .. } => "offset",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NonPositiveId => "invalid_id",
            Self::EmptyTitle | Self::EmptyContent => "empty",
            Self::TitleTooShort { .. } | Self::ContentTooShort { .. } => "too_short",
            Self::TitleTooLong { .. } => "too_long",
            Self::PageLimitOutOfRange { .. } | Self::PageOffsetOutOfRange { .. } => {
                "out_of_range"
            }
        }
    }
}

impl fmt::Display for PostValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveId => write!(f, "post id must be a positive integer"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooShort { min } => write!(f, "title must be at least {min} characters"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyContent => write!(f, "content must not be empty"),
            Self::ContentTooShort { min } => {
                write!(f, "content must be at least {min} characters")
            }
            Self::PageLimitOutOfRange { max } => write!(f, "limit must be between 1 and {max}"),
            Self::PageOffsetOutOfRange { max } => write!(f, "offset must be at most {max}"),
        }
    }
}

impl std::error::Error for PostValidationError {}

/// Store-assigned post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PostId(i64);

impl PostId {
    /// Validate and construct a [`PostId`].
    pub fn new(id: i64) -> Result<Self, PostValidationError> {
        if id <= 0 {
            return Err(PostValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PostId> for i64 {
    fn from(value: PostId) -> Self {
        value.0
    }
}

impl TryFrom<i64> for PostId {
    type Error = PostValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validated title and body for a new or edited post.
///
/// Both values are stored trimmed.
///
/// # Examples
/// ```
/// use blog_backend::domain::PostDraft;
///
/// let draft = PostDraft::new("  Hello there ", "Some words").expect("valid draft");
/// assert_eq!(draft.title(), "Hello there");
/// assert!(PostDraft::new("Hi", "Some words").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: String,
    content: String,
}

impl PostDraft {
    /// Validate a title and body, reporting the first failure.
    pub fn new(title: &str, content: &str) -> Result<Self, PostValidationError> {
        let title = title.trim();
        let title_len = title.chars().count();
        if title_len == 0 {
            return Err(PostValidationError::EmptyTitle);
        }
        if title_len < TITLE_MIN {
            return Err(PostValidationError::TitleTooShort { min: TITLE_MIN });
        }
        if title_len > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }

        let content = content.trim();
        let content_len = content.chars().count();
        if content_len == 0 {
            return Err(PostValidationError::EmptyContent);
        }
        if content_len < POST_CONTENT_MIN {
            return Err(PostValidationError::ContentTooShort {
                min: POST_CONTENT_MIN,
            });
        }

        Ok(Self {
            title: title.to_owned(),
            content: content.to_owned(),
        })
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn content(&self) -> &str {
        self.content.as_str()
    }
}

/// A published post.
///
/// ## Invariants
/// - `comment_count` equals the number of live comments on the post whenever
///   observed outside a store transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub owner: UserId,
    pub comment_count: u64,
}

/// Window over the newest-first post listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl PageRequest {
    /// Validate an optional limit and offset.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::PageRequest;
    ///
    /// let page = PageRequest::new(None, None).expect("defaults are valid");
    /// assert_eq!(page.limit(), 20);
    /// assert_eq!(page.offset(), 0);
    /// ```
    pub fn new(limit: Option<u32>, offset: Option<u64>) -> Result<Self, PostValidationError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(PostValidationError::PageLimitOutOfRange {
                max: MAX_PAGE_LIMIT,
            });
        }
        let offset = offset.unwrap_or(0);
        if offset > MAX_PAGE_OFFSET {
            return Err(PostValidationError::PageOffsetOutOfRange {
                max: MAX_PAGE_OFFSET,
            });
        }
        Ok(Self { limit, offset })
    }

    pub fn limit(self) -> u32 {
        self.limit
    }

    pub fn offset(self) -> u64 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "body text", PostValidationError::EmptyTitle)]
    #[case("   ", "body text", PostValidationError::EmptyTitle)]
    #[case("Hi", "body text", PostValidationError::TitleTooShort { min: TITLE_MIN })]
    #[case("Valid title", "", PostValidationError::EmptyContent)]
    #[case("Valid title", " ok ", PostValidationError::ContentTooShort { min: POST_CONTENT_MIN })]
    fn draft_rejects_invalid_fields(
        #[case] title: &str,
        #[case] content: &str,
        #[case] expected: PostValidationError,
    ) {
        assert_eq!(PostDraft::new(title, content), Err(expected));
    }

    #[rstest]
    fn draft_rejects_long_title() {
        let title = "t".repeat(TITLE_MAX + 1);
        assert_eq!(
            PostDraft::new(&title, "body text"),
            Err(PostValidationError::TitleTooLong { max: TITLE_MAX })
        );
    }

    #[rstest]
    fn draft_counts_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX);
        assert!(PostDraft::new(&title, "body text").is_ok());
    }

    #[rstest]
    #[case(Some(0))]
    #[case(Some(MAX_PAGE_LIMIT + 1))]
    fn page_rejects_out_of_range_limit(#[case] limit: Option<u32>) {
        assert!(PageRequest::new(limit, None).is_err());
    }

    #[rstest]
    #[case(Some(MAX_PAGE_OFFSET), true)]
    #[case(Some(MAX_PAGE_OFFSET + 1), false)]
    #[case(Some(u64::MAX), false)]
    fn page_offset_must_fit_a_signed_store_offset(
        #[case] offset: Option<u64>,
        #[case] accepted: bool,
    ) {
        let result = PageRequest::new(None, offset);
        assert_eq!(result.is_ok(), accepted);
        if let Err(err) = result {
            assert_eq!(err.field(), "offset");
            assert_eq!(err.code(), "out_of_range");
        }
    }

    #[rstest]
    fn post_id_rejects_zero() {
        assert_eq!(PostId::new(0), Err(PostValidationError::NonPositiveId));
    }
}
