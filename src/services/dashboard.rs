//! Dashboard statistics

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    error::{AppError, AppResult},
    models::{
        dashboard::{DashboardStats, DEFAULT_WINDOW_DAYS},
        enums::ServiceStatus,
        ticket::ServiceTicket,
    },
    repository::TicketStore,
};

/// Longest accepted window, ten years
pub const MAX_WINDOW_DAYS: i64 = 3650;

/// Aggregate tickets created within the trailing `window_days` before `now`.
///
/// Revenue counts done and archived tickets. The estimate projects the
/// average completed-ticket revenue onto the in-progress and
/// waiting-for-parts tickets, and is zero while nothing is completed.
pub fn compute_stats(tickets: &[ServiceTicket], window_days: i64, now: DateTime<Utc>) -> DashboardStats {
    let cutoff = now - Duration::days(window_days.clamp(0, MAX_WINDOW_DAYS));
    let mut stats = DashboardStats {
        window_days,
        generated_at: Some(now),
        ..Default::default()
    };

    let mut completed: u64 = 0;
    for ticket in tickets.iter().filter(|t| t.created_at >= cutoff) {
        stats.total_count += 1;
        match ticket.status {
            ServiceStatus::Todo => stats.todo_count += 1,
            ServiceStatus::InProgress => stats.in_progress_count += 1,
            ServiceStatus::WaitingForParts => stats.waiting_for_parts_count += 1,
            ServiceStatus::Done => stats.done_count += 1,
            ServiceStatus::Archived => stats.archived_count += 1,
        }
        if ticket.status.is_completed() {
            completed += 1;
            stats.total_revenue += ticket.revenue();
        }
    }

    let open = stats.in_progress_count + stats.waiting_for_parts_count;
    if completed > 0 {
        stats.estimated_revenue =
            (stats.total_revenue * Decimal::from(open) / Decimal::from(completed)).round_dp(2);
    }
    stats.total_revenue = stats.total_revenue.round_dp(2);
    stats
}

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn TicketStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn TicketStore>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, time_range: Option<i64>) -> AppResult<DashboardStats> {
        let days = time_range.unwrap_or(DEFAULT_WINDOW_DAYS);
        if !(1..=MAX_WINDOW_DAYS).contains(&days) {
            return Err(AppError::Validation(format!(
                "timeRange must be between 1 and {} days",
                MAX_WINDOW_DAYS
            )));
        }
        let now = Utc::now();
        let tickets = self.store.list_created_since(now - Duration::days(days)).await?;
        Ok(compute_stats(&tickets, days, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{customer::Customer, enums::ServiceType, receipt::Receipt},
        repository::MockTicketStore,
    };
    use uuid::Uuid;

    fn ticket(status: ServiceStatus, age_days: i64, total: Option<i64>) -> ServiceTicket {
        let created = Utc::now() - Duration::days(age_days);
        let customer_id = Uuid::new_v4();
        ServiceTicket {
            id: Uuid::new_v4(),
            service_request_id: Uuid::new_v4(),
            customer_id,
            customer: Customer {
                id: customer_id,
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "555-0199".to_string(),
                marketing_consent: true,
                created_at: created,
            },
            equipment_brand: "Trek".to_string(),
            service_type: ServiceType::FullService,
            recipient: "Self".to_string(),
            additional_details: String::new(),
            status,
            created_at: created,
            updated_at: created,
            mechanic_id: None,
            completion_date: None,
            total_cost: total.map(Decimal::from),
            comments: Vec::new(),
            parts_used: Vec::new(),
            receipt: None,
        }
    }

    #[test]
    fn test_estimated_revenue_from_average() {
        let mut tickets = vec![
            ticket(ServiceStatus::Done, 1, Some(150)),
            ticket(ServiceStatus::Done, 2, Some(50)),
        ];
        tickets.extend((0..4).map(|_| ticket(ServiceStatus::InProgress, 3, None)));

        let stats = compute_stats(&tickets, 30, Utc::now());
        assert_eq!(stats.done_count, 2);
        assert_eq!(stats.in_progress_count, 4);
        assert_eq!(stats.total_revenue, Decimal::from(200));
        assert_eq!(stats.estimated_revenue, Decimal::from(400));
    }

    #[test]
    fn test_no_completed_tickets_means_no_estimate() {
        let tickets: Vec<_> = (0..3).map(|_| ticket(ServiceStatus::InProgress, 1, Some(90))).collect();
        let stats = compute_stats(&tickets, 30, Utc::now());
        assert_eq!(stats.estimated_revenue, Decimal::ZERO);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let now = Utc::now();
        let stats = compute_stats(&[], 30, now);
        assert_eq!(
            stats,
            DashboardStats {
                window_days: 30,
                generated_at: Some(now),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_window_excludes_old_tickets() {
        let tickets = vec![
            ticket(ServiceStatus::Todo, 5, None),
            ticket(ServiceStatus::Done, 45, Some(100)),
        ];
        let stats = compute_stats(&tickets, 30, Utc::now());
        assert_eq!(stats.todo_count, 1);
        assert_eq!(stats.done_count, 0);
        assert_eq!(stats.total_count, 1);
    }

    #[test]
    fn test_receipt_total_preferred_over_total_cost() {
        let mut done = ticket(ServiceStatus::Archived, 1, Some(10));
        done.receipt = Some(Receipt {
            items: Vec::new(),
            total_amount: Decimal::from(45),
            generated_at: Utc::now(),
            mechanic: None,
            mechanic_id: None,
            pdf_url: None,
        });
        let stats = compute_stats(&[done], 30, Utc::now());
        assert_eq!(stats.archived_count, 1);
        assert_eq!(stats.total_revenue, Decimal::from(45));
    }

    #[test]
    fn test_waiting_for_parts_counts_toward_estimate() {
        let tickets = vec![
            ticket(ServiceStatus::Done, 1, Some(100)),
            ticket(ServiceStatus::WaitingForParts, 1, None),
            ticket(ServiceStatus::Todo, 1, None),
        ];
        let stats = compute_stats(&tickets, 30, Utc::now());
        assert_eq!(stats.estimated_revenue, Decimal::from(100));
    }

    #[test]
    fn test_compute_stats_is_repeatable() {
        let tickets = vec![
            ticket(ServiceStatus::Done, 1, Some(33)),
            ticket(ServiceStatus::InProgress, 1, None),
        ];
        let now = Utc::now();
        assert_eq!(compute_stats(&tickets, 7, now), compute_stats(&tickets, 7, now));
    }

    #[tokio::test]
    async fn test_non_positive_window_rejected() {
        let mut store = MockTicketStore::new();
        store.expect_list_created_since().never();
        let service = DashboardService::new(Arc::new(store));
        assert!(matches!(service.stats(Some(0)).await, Err(AppError::Validation(_))));
        assert!(matches!(service.stats(Some(-7)).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_default_window_is_thirty_days() {
        let mut store = MockTicketStore::new();
        store
            .expect_list_created_since()
            .withf(|cutoff| {
                let days = (Utc::now() - *cutoff).num_days();
                (29..=30).contains(&days)
            })
            .times(1)
            .returning(|_| Ok(Vec::new()));
        let stats = DashboardService::new(Arc::new(store)).stats(None).await.unwrap();
        assert_eq!(stats.window_days, 30);
    }
}
