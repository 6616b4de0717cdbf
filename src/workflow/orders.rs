// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order-confirmation mail. Independent of account state.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::WorkflowError;
use crate::{
    mailer::{templates, Mailer},
    validation::OrderNotice,
};

/// Mails an order confirmation to the buyer, then a notification to the
/// seller.
///
/// Delivery is best effort: the two sends are not atomic. If the buyer
/// email fails the seller email is not attempted; if the seller email
/// fails the buyer has already been mailed.
pub struct OrderNotificationWorkflow {
    mailer: Arc<dyn Mailer>,
    default_seller_email: String,
}

impl std::fmt::Debug for OrderNotificationWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderNotificationWorkflow")
            .field("default_seller_email", &self.default_seller_email)
            .finish_non_exhaustive()
    }
}

impl OrderNotificationWorkflow {
    pub fn new(mailer: Arc<dyn Mailer>, default_seller_email: impl Into<String>) -> Self {
        Self {
            mailer,
            default_seller_email: default_seller_email.into(),
        }
    }

    pub async fn notify(&self, notice: OrderNotice) -> Result<(), WorkflowError> {
        self.notify_at(notice, Utc::now()).await
    }

    /// Like [`notify`](Self::notify) with an explicit order date.
    pub async fn notify_at(
        &self,
        notice: OrderNotice,
        placed_at: DateTime<Utc>,
    ) -> Result<(), WorkflowError> {
        let seller = notice
            .seller_email
            .as_deref()
            .unwrap_or(&self.default_seller_email);
        let emails = templates::order_emails(&notice, seller, placed_at);

        if let Err(e) = self.mailer.send(&emails.buyer).await {
            tracing::error!(order_id = %notice.order_id, error = %e, "Order confirmation failed");
            return Err(e.into());
        }
        if let Err(e) = self.mailer.send(&emails.seller).await {
            tracing::error!(
                order_id = %notice.order_id,
                error = %e,
                "Seller notification failed after buyer was mailed"
            );
            return Err(e.into());
        }

        tracing::info!(order_id = %notice.order_id, "Order emails sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::OrderItem, testing::RecordingMailer};

    fn notice(seller_email: Option<&str>) -> OrderNotice {
        OrderNotice {
            order_id: "1001".to_string(),
            user_name: "Bob".to_string(),
            user_email: "bob@x.com".to_string(),
            items: vec![OrderItem {
                name: "Mug".to_string(),
                quantity: 1,
                price: 9.99,
            }],
            total: 9.99,
            seller_email: seller_email.map(str::to_string),
        }
    }

    fn workflow(mailer: &Arc<RecordingMailer>) -> OrderNotificationWorkflow {
        OrderNotificationWorkflow::new(mailer.clone(), "seller@example.com")
    }

    #[tokio::test]
    async fn sends_buyer_then_seller() {
        let mailer = Arc::new(RecordingMailer::new());
        workflow(&mailer).notify(notice(None)).await.unwrap();

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "bob@x.com");
        assert_eq!(sent[0].subject, "Order Confirmation #1001");
        assert_eq!(sent[1].to, "seller@example.com");
        assert_eq!(sent[1].subject, "New Order Received #1001");
    }

    #[tokio::test]
    async fn seller_override_is_used() {
        let mailer = Arc::new(RecordingMailer::new());
        workflow(&mailer)
            .notify(notice(Some("shop@x.com")))
            .await
            .unwrap();
        assert_eq!(mailer.sent()[1].to, "shop@x.com");
    }

    #[tokio::test]
    async fn buyer_failure_skips_seller() {
        let mailer = Arc::new(RecordingMailer::new());
        mailer.fail_for("bob@x.com");

        let result = workflow(&mailer).notify(notice(None)).await;
        assert!(matches!(result, Err(WorkflowError::Delivery(_))));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn seller_failure_is_reported_after_buyer_was_mailed() {
        let mailer = Arc::new(RecordingMailer::new());
        mailer.fail_for("seller@example.com");

        let result = workflow(&mailer).notify(notice(None)).await;
        assert!(matches!(result, Err(WorkflowError::Delivery(_))));
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "bob@x.com");
    }
}
