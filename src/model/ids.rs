// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// A stable, opaque identifier for views, diagrams, owners and comments.
///
/// Ids are assigned by the store and never reused. An id is a non-empty token without `/`,
/// whitespace or control characters, so it can be used as a file name segment or a log field
/// as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        IdError::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsSlash,
    InvalidChar { ch: char },
}

impl IdError {
    fn check(value: &str) -> Result<(), Self> {
        if value.is_empty() {
            return Err(Self::Empty);
        }
        match value.chars().find(|ch| *ch == '/' || ch.is_whitespace() || ch.is_control()) {
            None => Ok(()),
            Some('/') => Err(Self::ContainsSlash),
            Some(ch) => Err(Self::InvalidChar { ch }),
        }
    }
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsSlash => f.write_str("id must not contain '/'"),
            Self::InvalidChar { ch } => write!(f, "id must not contain {ch:?}"),
        }
    }
}

impl std::error::Error for IdError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewIdTag {}
pub type ViewId = Id<ViewIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagramIdTag {}
pub type DiagramId = Id<DiagramIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OwnerIdTag {}
pub type OwnerId = Id<OwnerIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommentIdTag {}
pub type CommentId = Id<CommentIdTag>;

#[cfg(test)]
mod tests {
    use super::{Id, IdError, ViewId};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_slash() {
        let result: Result<ViewId, _> = "v/1".parse();
        assert_eq!(result, Err(IdError::ContainsSlash));
    }

    #[test]
    fn id_rejects_whitespace_and_controls() {
        assert_eq!(
            ViewId::new("my view"),
            Err(IdError::InvalidChar { ch: ' ' })
        );
        assert_eq!(
            ViewId::new("v1\n"),
            Err(IdError::InvalidChar { ch: '\n' })
        );
    }

    #[test]
    fn id_displays_raw_value() {
        let id = ViewId::new("v42").expect("view id");
        assert_eq!(id.to_string(), "v42");
        assert_eq!(id.into_string(), "v42");
    }
}
