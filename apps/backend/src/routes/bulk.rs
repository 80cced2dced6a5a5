//! Request bodies shared by the bulk endpoints of every content router.

use serde::Deserialize;
use uuid::Uuid;

use crate::errors::FieldErrors;

pub const MAX_BULK_ITEMS: usize = 100;

/// `{"items": [...]}`
#[derive(Debug, Deserialize)]
pub struct BulkCreate<T> {
    #[serde(default)]
    pub items: Option<Vec<T>>,
}

impl<T> BulkCreate<T> {
    /// Validate every item; errors are keyed `items[i].field`.
    pub fn validate_each<I>(
        self,
        validate: impl Fn(T) -> Result<I, FieldErrors>,
    ) -> Result<Vec<I>, FieldErrors> {
        let items = match self.items {
            Some(items) if !items.is_empty() => items,
            _ => return Err(FieldErrors::single("items", "Items must be a non-empty array")),
        };
        if items.len() > MAX_BULK_ITEMS {
            return Err(FieldErrors::single(
                "items",
                format!("Items cannot exceed {MAX_BULK_ITEMS} entries"),
            ));
        }

        let mut errors = FieldErrors::new();
        let mut valid = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match validate(item) {
                Ok(input) => valid.push(input),
                Err(item_errors) => errors.merge_prefixed(&format!("items[{i}]"), item_errors),
            }
        }
        errors.into_result()?;
        Ok(valid)
    }
}

/// `{"ids": [...], "isActive": bool}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkToggle {
    #[serde(default)]
    pub ids: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl BulkToggle {
    pub fn validate(self) -> Result<(Vec<Uuid>, bool), FieldErrors> {
        let mut errors = FieldErrors::new();

        let ids = match self.ids {
            Some(raw) if !raw.is_empty() => {
                let parsed: Result<Vec<Uuid>, _> =
                    raw.iter().map(|s| Uuid::parse_str(s.trim())).collect();
                parsed.unwrap_or_else(|_| {
                    errors.add("ids", "All ids must be valid identifiers");
                    Vec::new()
                })
            }
            _ => {
                errors.add("ids", "Ids must be a non-empty array");
                Vec::new()
            }
        };

        if self.is_active.is_none() {
            errors.add("isActive", "isActive must be a boolean");
        }

        errors.into_result()?;
        Ok((ids, self.is_active.unwrap_or_default()))
    }
}
