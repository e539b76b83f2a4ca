use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{AppError, AppResult};

static OBJECT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("valid object id pattern"));

/// Identifier of the user whose expenses are shown.
///
/// Always a 24 character hexadecimal string (the document store's native id
/// format), normalised to lower case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Resolve the identity from the raw `user_id` query parameter.
    pub fn from_param(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            None | Some("") => Err(AppError::MissingUserId),
            Some(value) => Self::parse(value),
        }
    }

    pub fn parse(value: &str) -> AppResult<Self> {
        if OBJECT_ID_RE.is_match(value) {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(AppError::InvalidUserId(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
