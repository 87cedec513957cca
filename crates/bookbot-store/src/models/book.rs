use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

pub const MAX_STAR_RATING: u8 = 5;

/// One catalog listing as produced by ingestion
///
/// The surrogate `id` is assigned by SQLite on insert and is absent from
/// records that have not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub price: f64,
    pub star_rating: u8,
    pub availability: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub quantity: u32,
}

impl BookRecord {
    pub fn new(
        title: impl Into<String>,
        price: f64,
        star_rating: u8,
        availability: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            price,
            star_rating,
            availability: availability.into(),
            description: description.into(),
            category: category.into(),
            quantity,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(StoreError::InvalidRecord(format!(
                "'{}' has price {}; expected a non-negative amount",
                self.title, self.price
            )));
        }
        if self.star_rating > MAX_STAR_RATING {
            return Err(StoreError::InvalidRecord(format!(
                "'{}' has star rating {}; expected 0-{}",
                self.title, self.star_rating, MAX_STAR_RATING
            )));
        }
        Ok(())
    }
}
