use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fixed palette offered by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum CategoryColor {
    #[serde(rename = "#EF4444")]
    #[sqlx(rename = "#EF4444")]
    Red,
    #[serde(rename = "#3B82F6")]
    #[sqlx(rename = "#3B82F6")]
    Blue,
    #[serde(rename = "#10B981")]
    #[sqlx(rename = "#10B981")]
    Green,
    #[serde(rename = "#F59E0B")]
    #[sqlx(rename = "#F59E0B")]
    Amber,
    #[serde(rename = "#F97316")]
    #[sqlx(rename = "#F97316")]
    Orange,
    #[serde(rename = "#8B5CF6")]
    #[sqlx(rename = "#8B5CF6")]
    Violet,
    #[serde(rename = "#EC4899")]
    #[sqlx(rename = "#EC4899")]
    Pink,
    #[serde(rename = "#14B8A6")]
    #[sqlx(rename = "#14B8A6")]
    Teal,
    #[serde(rename = "#6B7280")]
    #[sqlx(rename = "#6B7280")]
    Gray,
    #[serde(rename = "#000000")]
    #[sqlx(rename = "#000000")]
    Black,
    #[serde(rename = "#FFFFFF")]
    #[sqlx(rename = "#FFFFFF")]
    White,
}

impl CategoryColor {
    pub const ALL: [CategoryColor; 11] = [
        CategoryColor::Red,
        CategoryColor::Blue,
        CategoryColor::Green,
        CategoryColor::Amber,
        CategoryColor::Orange,
        CategoryColor::Violet,
        CategoryColor::Pink,
        CategoryColor::Teal,
        CategoryColor::Gray,
        CategoryColor::Black,
        CategoryColor::White,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            CategoryColor::Red => "#EF4444",
            CategoryColor::Blue => "#3B82F6",
            CategoryColor::Green => "#10B981",
            CategoryColor::Amber => "#F59E0B",
            CategoryColor::Orange => "#F97316",
            CategoryColor::Violet => "#8B5CF6",
            CategoryColor::Pink => "#EC4899",
            CategoryColor::Teal => "#14B8A6",
            CategoryColor::Gray => "#6B7280",
            CategoryColor::Black => "#000000",
            CategoryColor::White => "#FFFFFF",
        }
    }
}

impl Default for CategoryColor {
    fn default() -> Self {
        CategoryColor::Gray
    }
}

impl FromStr for CategoryColor {
    type Err = String;

    /// Hex codes are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryColor::ALL
            .into_iter()
            .find(|c| c.hex().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid color: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub color: CategoryColor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
