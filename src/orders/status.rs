use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "preparing")]
    Preparing,
    #[sea_orm(string_value = "driver_assigned")]
    #[serde(rename = "Driver Assigned")]
    DriverAssigned,
    #[sea_orm(string_value = "out_for_delivery")]
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Debug, Error, PartialEq)]
pub enum StatusTransitionError {
    #[error("order is already {0}")]
    Terminal(OrderStatus),
    #[error("cannot move an order from {from} to {to}")]
    NotAllowed { from: OrderStatus, to: OrderStatus },
    /// Someone else moved the order after it was read.
    #[error("order is no longer {0}, reload it and try again")]
    Stale(OrderStatus),
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Preparing,
        OrderStatus::DriverAssigned,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::DriverAssigned => "Driver Assigned",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// The single forward step from this status, if any.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::DriverAssigned),
            OrderStatus::DriverAssigned => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Preparing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Validate a status change: one step forward, or cancellation while the
    /// kitchen has not handed the order over yet.
    pub fn transition(self, to: OrderStatus) -> Result<OrderStatus, StatusTransitionError> {
        if self.is_terminal() {
            return Err(StatusTransitionError::Terminal(self));
        }
        let allowed = self.next() == Some(to) || (to == OrderStatus::Cancelled && self.can_cancel());
        if allowed {
            Ok(to)
        } else {
            Err(StatusTransitionError::NotAllowed { from: self, to })
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| {
                status.label().eq_ignore_ascii_case(wanted)
                    || status.to_value().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| format!("unknown order status: {wanted}"))
    }
}

/// Which orders the owner dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_chain() {
        let mut status = OrderStatus::Pending;
        let mut seen = vec![status];
        while let Some(next) = status.next() {
            status = status.transition(next).unwrap();
            seen.push(status);
        }

        assert_eq!(seen, OrderStatus::ALL[..6].to_vec());
    }

    #[test]
    fn test_no_skipping_or_regressing() {
        assert_eq!(
            OrderStatus::Pending.transition(OrderStatus::OutForDelivery),
            Err(StatusTransitionError::NotAllowed {
                from: OrderStatus::Pending,
                to: OrderStatus::OutForDelivery,
            })
        );
        assert!(OrderStatus::Delivered.transition(OrderStatus::Preparing).is_err());
        assert!(OrderStatus::Preparing.transition(OrderStatus::Preparing).is_err());
    }

    #[test]
    fn test_cancellation_window() {
        assert_eq!(
            OrderStatus::Pending.transition(OrderStatus::Cancelled),
            Ok(OrderStatus::Cancelled)
        );
        assert_eq!(
            OrderStatus::Preparing.transition(OrderStatus::Cancelled),
            Ok(OrderStatus::Cancelled)
        );
        assert!(OrderStatus::DriverAssigned.transition(OrderStatus::Cancelled).is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert_eq!(
            OrderStatus::Completed.transition(OrderStatus::Cancelled),
            Err(StatusTransitionError::Terminal(OrderStatus::Completed))
        );
        assert_eq!(
            OrderStatus::Cancelled.transition(OrderStatus::Pending),
            Err(StatusTransitionError::Terminal(OrderStatus::Cancelled))
        );
    }

    #[test]
    fn test_parse_labels_and_names() {
        assert_eq!("Out for Delivery".parse(), Ok(OrderStatus::OutForDelivery));
        assert_eq!("driver_assigned".parse(), Ok(OrderStatus::DriverAssigned));
        assert_eq!("pending".parse(), Ok(OrderStatus::Pending));
        assert!("To Ship".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_filter() {
        assert_eq!("all".parse(), Ok(StatusFilter::All));
        assert_eq!("Delivered".parse(), Ok(StatusFilter::Only(OrderStatus::Delivered)));

        let filter = StatusFilter::Only(OrderStatus::Pending);
        assert!(filter.matches(OrderStatus::Pending));
        assert!(!filter.matches(OrderStatus::Completed));
        assert!(StatusFilter::All.matches(OrderStatus::Cancelled));
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, r#""Out for Delivery""#);
    }
}
