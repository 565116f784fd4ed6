use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keys with a meaning to the default classification
pub mod keys {
    pub const MODEL_VALIDATION: &str = "ModelValidation";
    pub const MODEL_VALIDATION_ITEM: &str = "ModelValidationItem";
    pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFound";
    pub const FORBIDDEN: &str = "Forbidden";
}

/// One structured sub-message of a [`DomainError`], e.g. a failed validation rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailItem {
    pub key: String,
    pub message: String,
}

impl DetailItem {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// An expected, business-rule violation raised by application code.
///
/// The `key` names the category and drives the default status code
/// (`ModelValidation` → 406, `ResourceNotFound` → 404, anything else → 400).
/// Items keep the order they were added in.
///
/// # Example
/// ```
/// use faultline::exception::{DetailItem, DomainError};
///
/// let error = DomainError::new("OrderClosed", "The order can no longer be changed.")
///     .with_item(DetailItem::new("OrderId", "42"));
/// assert_eq!(error.items().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DomainError {
    key: String,
    message: String,
    items: Vec<DetailItem>,
}

impl DomainError {
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
            items: Vec::new(),
        }
    }

    /// One or more model validation rules failed.
    ///
    /// Every message becomes a `ModelValidationItem` detail item.
    pub fn model_validation<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            keys::MODEL_VALIDATION,
            "One or more errors occurred during model validation. Please check 'Items' for details.",
        )
        .with_items(
            messages
                .into_iter()
                .map(|message| DetailItem::new(keys::MODEL_VALIDATION_ITEM, message)),
        )
    }

    /// One or more requested resources do not exist.
    pub fn resource_not_found(items: impl IntoIterator<Item = DetailItem>) -> Self {
        Self::new(
            keys::RESOURCE_NOT_FOUND,
            "One or more resources were not found. Please check 'Items' for details.",
        )
        .with_items(items)
    }

    pub fn with_item(mut self, item: DetailItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = DetailItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn items(&self) -> &[DetailItem] {
        &self.items
    }

    pub fn is_model_validation(&self) -> bool {
        self.key == keys::MODEL_VALIDATION
    }

    pub fn is_resource_not_found(&self) -> bool {
        self.key == keys::RESOURCE_NOT_FOUND
    }
}
