//! Status and role enums.

use serde::{Deserialize, Serialize};

/// Order lifecycle status.
///
/// Transitions are forward-only: `pending -> processing -> shipped ->
/// delivered`. Cancellation is permitted from `pending` and `processing`
/// only; `shipped`, `delivered`, and `canceled` are terminal for
/// cancellation purposes. Status changes are driven exclusively by
/// administrators - checkout always creates orders as `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Canceled,
}

impl OrderStatus {
    /// Whether an order in this status may move to `next`.
    ///
    /// A no-op transition (same status) is always allowed so that a repeated
    /// admin submit is not an error.
    #[must_use]
    pub fn can_transition(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        match self {
            Self::Pending => matches!(next, Self::Processing | Self::Canceled),
            Self::Processing => matches!(next, Self::Shipped | Self::Canceled),
            Self::Shipped => matches!(next, Self::Delivered),
            Self::Delivered | Self::Canceled => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Canceled => "canceled",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Application role attached to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "app_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AppRole {
    /// Full access to the back-office.
    Admin,
    /// Review moderation only.
    Moderator,
    /// Regular shopper.
    User,
}

impl std::fmt::Display for AppRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Moderator => write!(f, "moderator"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for AppRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "moderator" => Ok(Self::Moderator),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OrderStatus::{Canceled, Delivered, Pending, Processing, Shipped};

    const ALL: [super::OrderStatus; 5] = [Pending, Processing, Shipped, Delivered, Canceled];

    #[test]
    fn full_transition_table() {
        // (from, to) pairs that are legal, excluding no-ops.
        let legal = [
            (Pending, Processing),
            (Pending, Canceled),
            (Processing, Shipped),
            (Processing, Canceled),
            (Shipped, Delivered),
        ];

        for from in ALL {
            for to in ALL {
                let expected = from == to || legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition(to),
                    expected,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn terminal_states_only_allow_self() {
        for to in ALL {
            assert_eq!(Delivered.can_transition(to), to == Delivered);
            assert_eq!(Canceled.can_transition(to), to == Canceled);
        }
    }

    #[test]
    fn status_roundtrips_through_str() {
        for status in ALL {
            let parsed: super::OrderStatus = status.to_string().parse().expect("roundtrip");
            assert_eq!(parsed, status);
        }
    }
}
