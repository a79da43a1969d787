//! Dashboard aggregate queries.
//!
//! All figures include every order regardless of status, matching what the
//! back office has always shown; the aggregation runs in SQL instead of
//! fetching the whole order table.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::RepositoryError;
use crate::models::AdminOrder;

/// Revenue and order count for one calendar day.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DailySales {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub orders: i64,
}

/// The dashboard payload.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardMetrics {
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub total_products: i64,
    pub average_order_value: Decimal,
    /// Percent change of the last 30 days vs the 30 before, zero when the
    /// earlier window is empty.
    pub revenue_change: Decimal,
    pub orders_change: Decimal,
    /// Last 7 days, oldest first, days without orders included as zeroes.
    pub sales_by_day: Vec<DailySales>,
    /// Five most recent orders.
    pub recent_orders: Vec<AdminOrder>,
}

#[derive(Debug, FromRow)]
struct Totals {
    total_revenue: Decimal,
    total_orders: i64,
    recent_revenue: Decimal,
    recent_orders: i64,
    previous_revenue: Decimal,
    previous_orders: i64,
}

/// Repository for dashboard reads.
pub struct MetricsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MetricsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Assemble the full dashboard payload.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn dashboard(&self, total_products: i64) -> Result<DashboardMetrics, RepositoryError> {
        let totals: Totals = sqlx::query_as(
            "SELECT \
               COALESCE(SUM(total), 0) AS total_revenue, \
               COUNT(*) AS total_orders, \
               COALESCE(SUM(total) FILTER \
                 (WHERE created_at >= now() - interval '30 days'), 0) AS recent_revenue, \
               COUNT(*) FILTER \
                 (WHERE created_at >= now() - interval '30 days') AS recent_orders, \
               COALESCE(SUM(total) FILTER \
                 (WHERE created_at >= now() - interval '60 days' \
                    AND created_at < now() - interval '30 days'), 0) AS previous_revenue, \
               COUNT(*) FILTER \
                 (WHERE created_at >= now() - interval '60 days' \
                    AND created_at < now() - interval '30 days') AS previous_orders \
             FROM orders",
        )
        .fetch_one(self.pool)
        .await?;

        let sales_by_day: Vec<DailySales> = sqlx::query_as(
            "SELECT g.day::date AS date, \
                    COALESCE(SUM(o.total), 0) AS revenue, \
                    COUNT(o.id) AS orders \
             FROM generate_series(CURRENT_DATE - 6, CURRENT_DATE, interval '1 day') AS g(day) \
             LEFT JOIN orders o ON o.created_at::date = g.day::date \
             GROUP BY g.day ORDER BY g.day",
        )
        .fetch_all(self.pool)
        .await?;

        let recent_orders: Vec<AdminOrder> = sqlx::query_as(
            "SELECT o.id, o.user_id, u.email AS customer_email, o.status, o.subtotal, \
                    o.shipping_cost, o.tax, o.total, o.shipping_address, \
                    o.created_at, o.updated_at \
             FROM orders o \
             LEFT JOIN users u ON u.id = o.user_id \
             ORDER BY o.created_at DESC LIMIT 5",
        )
        .fetch_all(self.pool)
        .await?;

        let average_order_value = if totals.total_orders > 0 {
            (totals.total_revenue / Decimal::from(totals.total_orders)).round_dp(2)
        } else {
            Decimal::ZERO
        };

        Ok(DashboardMetrics {
            total_revenue: totals.total_revenue,
            total_orders: totals.total_orders,
            total_products,
            average_order_value,
            revenue_change: percent_change(totals.previous_revenue, totals.recent_revenue),
            orders_change: percent_change(
                Decimal::from(totals.previous_orders),
                Decimal::from(totals.recent_orders),
            ),
            sales_by_day,
            recent_orders,
        })
    }
}

/// Percent change between two windows, zero when the earlier one is empty.
fn percent_change(previous: Decimal, recent: Decimal) -> Decimal {
    if previous > Decimal::ZERO {
        ((recent - previous) / previous * Decimal::from(100)).round_dp(1)
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::percent_change;

    #[test]
    fn growth_and_decline_are_signed() {
        assert_eq!(percent_change(dec!(100), dec!(150)), dec!(50.0));
        assert_eq!(percent_change(dec!(200), dec!(150)), dec!(-25.0));
    }

    #[test]
    fn empty_previous_window_reports_zero() {
        assert_eq!(
            percent_change(rust_decimal::Decimal::ZERO, dec!(500)),
            rust_decimal::Decimal::ZERO
        );
    }
}
