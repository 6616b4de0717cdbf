// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Email bodies.
//!
//! Every user-supplied value is passed through [`html_escape`] before it
//! is placed in HTML.

use chrono::{DateTime, Utc};

use super::OutgoingEmail;
use crate::validation::OrderNotice;

pub const VERIFICATION_SUBJECT: &str = "Verify your email";

/// Escape the five HTML-significant characters.
pub fn html_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Email carrying the verification link for a fresh signup.
pub fn verification_email(to: &str, name: &str, verify_url: &str) -> OutgoingEmail {
    let html = format!(
        "<p>Hello {name},</p>\n\
         <p>Click below to verify your email:</p>\n\
         <a href=\"{url}\">Verify Email</a>\n\
         <p>Link valid for 1 hour.</p>\n",
        name = html_escape(name),
        url = html_escape(verify_url),
    );
    let text = format!(
        "Hello {name},\n\n\
         Open the link below to verify your email:\n{verify_url}\n\n\
         Link valid for 1 hour.\n"
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: VERIFICATION_SUBJECT.to_string(),
        html,
        text,
    }
}

/// Buyer and seller emails for one order.
#[derive(Debug, Clone)]
pub struct OrderEmails {
    pub buyer: OutgoingEmail,
    pub seller: OutgoingEmail,
}

/// Render the buyer confirmation and the seller notification. The seller
/// email embeds the buyer's HTML body.
pub fn order_emails(notice: &OrderNotice, seller: &str, placed_at: DateTime<Utc>) -> OrderEmails {
    let order_id = html_escape(&notice.order_id);
    let user_name = html_escape(&notice.user_name);
    let date = placed_at.format("%-m/%-d/%Y").to_string();
    let total = format!("{:.2}", notice.total);

    let items_html: String = notice
        .items
        .iter()
        .map(|item| {
            format!(
                "<li>{} - {} × ${:.2}</li>\n",
                html_escape(&item.name),
                item.quantity,
                item.price
            )
        })
        .collect();

    let buyer_html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\n\
         <h2 style=\"color: #333;\">Order Confirmation #{order_id}</h2>\n\
         <p>Hello {user_name},</p>\n\
         <p>Thank you for your order! Here are your order details:</p>\n\
         <h3 style=\"color: #333;\">Order Summary</h3>\n\
         <p><strong>Order ID:</strong> {order_id}</p>\n\
         <p><strong>Date:</strong> {date}</p>\n\
         <p><strong>Total:</strong> ${total}</p>\n\
         <h4 style=\"color: #333;\">Items Ordered:</h4>\n\
         <ul>\n{items_html}</ul>\n\
         </div>\n"
    );

    let items_text: String = notice
        .items
        .iter()
        .map(|item| format!("- {} - {} × ${:.2}\n", item.name, item.quantity, item.price))
        .collect();
    let buyer_text = format!(
        "Hello {name},\n\n\
         Thank you for your order! Here are your order details:\n\n\
         Order ID: {id}\n\
         Date: {date}\n\
         Total: ${total}\n\n\
         Items Ordered:\n{items_text}",
        name = notice.user_name,
        id = notice.order_id,
    );

    let seller_html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\n\
         <h2 style=\"color: #333;\">New Order Notification</h2>\n\
         <p>You have received a new order from {user_name} ({user_email})</p>\n\
         {buyer_html}\
         </div>\n",
        user_email = html_escape(&notice.user_email),
    );
    let seller_text = format!(
        "You have received a new order from {} ({})\n\n{buyer_text}",
        notice.user_name, notice.user_email
    );

    OrderEmails {
        buyer: OutgoingEmail {
            to: notice.user_email.clone(),
            subject: format!("Order Confirmation #{}", notice.order_id),
            html: buyer_html,
            text: buyer_text,
        },
        seller: OutgoingEmail {
            to: seller.to_string(),
            subject: format!("New Order Received #{}", notice.order_id),
            html: seller_html,
            text: seller_text,
        },
    }
}
