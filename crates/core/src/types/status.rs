//! Status enums for orders, items, and users.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Orders are created as `Order` and may transition to `Cancel` exactly once
/// through the cancellation operation. There are no other transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "lowercase")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Order,
    Cancel,
}

/// Item sell status.
///
/// `SoldOut` is derived from stock: placement flips it when stock reaches
/// zero, restoration flips it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "sell_status", rename_all = "snake_case")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SellStatus {
    #[default]
    Sell,
    SoldOut,
}

/// User role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Full access including item registration and order deletion.
    Admin,
    /// Regular shopper.
    #[default]
    User,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

impl std::str::FromStr for SellStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SELL" | "sell" => Ok(Self::Sell),
            "SOLD_OUT" | "sold_out" => Ok(Self::SoldOut),
            _ => Err(format!("invalid sell status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_roundtrip() {
        assert_eq!("admin".parse::<UserRole>(), Ok(UserRole::Admin));
        assert_eq!("user".parse::<UserRole>(), Ok(UserRole::User));
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_sell_status_parse() {
        assert_eq!("SELL".parse::<SellStatus>(), Ok(SellStatus::Sell));
        assert_eq!("SOLD_OUT".parse::<SellStatus>(), Ok(SellStatus::SoldOut));
        assert!("".parse::<SellStatus>().is_err());
    }

    #[test]
    fn test_order_status_serde_names() {
        let json = serde_json::to_string(&OrderStatus::Cancel).expect("serialize");
        assert_eq!(json, "\"CANCEL\"");
        let json = serde_json::to_string(&SellStatus::SoldOut).expect("serialize");
        assert_eq!(json, "\"SOLD_OUT\"");
    }
}
