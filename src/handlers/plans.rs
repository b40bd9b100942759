//! Pricing catalog handler

use axum::Json;

use crate::models::{PlanInfo, SubscriptionPlan};

/// Static subscription plan catalog. There is no payment flow behind this.
pub async fn list() -> Json<Vec<PlanInfo>> {
    let plans = vec![
        PlanInfo::new(
            SubscriptionPlan::Free,
            "Free",
            0,
            0,
            &[
                ("Up to 10 detections/month", true),
                ("Video detection", true),
                ("Image detection", true),
                ("Audio detection", false),
                ("Detailed reports", false),
                ("Batch processing", false),
                ("API access", false),
                ("Priority support", false),
            ],
        ),
        PlanInfo::new(
            SubscriptionPlan::Pro,
            "Pro",
            29,
            290,
            &[
                ("Up to 500 detections/month", true),
                ("Video detection", true),
                ("Image detection", true),
                ("Audio detection", true),
                ("Detailed reports", true),
                ("Batch processing", true),
                ("API access", false),
                ("Priority support", true),
            ],
        ),
        PlanInfo::new(
            SubscriptionPlan::Enterprise,
            "Enterprise",
            99,
            990,
            &[
                ("Unlimited detections", true),
                ("Video detection", true),
                ("Image detection", true),
                ("Audio detection", true),
                ("Detailed reports", true),
                ("Batch processing", true),
                ("API access", true),
                ("Priority support", true),
            ],
        ),
    ];

    Json(plans)
}
