use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// The closed set of subscription plans. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Free,
    Weekly,
    Monthly,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Free => "free",
            PlanType::Weekly => "weekly",
            PlanType::Monthly => "monthly",
        }
    }
}

impl FromStr for PlanType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PlanType::Free),
            "weekly" => Ok(PlanType::Weekly),
            "monthly" => Ok(PlanType::Monthly),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-user entitlement row: the consumable credit balance plus the
/// optional time-bounded subscription window.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub credits: i32,
    pub plan_type: String,
    pub plan_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn plan(&self) -> PlanType {
        self.plan_type.parse().unwrap_or(PlanType::Free)
    }

    /// A plan is active only while its expiry lies in the future. An
    /// expired paid plan behaves exactly like the free plan.
    pub fn has_active_plan(&self, now: DateTime<Utc>) -> bool {
        self.plan() != PlanType::Free && self.plan_expiry.is_some_and(|expiry| expiry > now)
    }

    pub fn status(&self, now: DateTime<Utc>) -> UserStatus {
        UserStatus {
            credits: self.credits,
            plan_type: self.plan_type.clone(),
            plan_expiry: self.plan_expiry,
            has_active_plan: self.has_active_plan(now),
        }
    }
}

/// The entitlement summary returned to the authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatus {
    pub credits: i32,
    pub plan_type: String,
    pub plan_expiry: Option<DateTime<Utc>>,
    pub has_active_plan: bool,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn profile(credits: i32, plan_type: &str, plan_expiry: Option<DateTime<Utc>>) -> Profile {
        let now = Utc::now();
        Profile {
            user_id: Uuid::new_v4(),
            credits,
            plan_type: plan_type.to_string(),
            plan_expiry,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn free_plan_is_never_active() {
        let now = Utc::now();
        let p = profile(50, "free", Some(now + Duration::days(7)));
        assert!(!p.has_active_plan(now));
    }

    #[test]
    fn expired_paid_plan_falls_back_to_credits() {
        let now = Utc::now();
        let p = profile(5, "weekly", Some(now - Duration::days(1)));
        assert!(!p.has_active_plan(now));
        assert!(!p.status(now).has_active_plan);
    }

    #[test]
    fn paid_plan_with_future_expiry_is_active() {
        let now = Utc::now();
        let p = profile(0, "monthly", Some(now + Duration::days(20)));
        assert!(p.has_active_plan(now));
    }

    #[test]
    fn unknown_plan_string_is_treated_as_free() {
        let now = Utc::now();
        let p = profile(50, "lifetime", Some(now + Duration::days(7)));
        assert_eq!(p.plan(), PlanType::Free);
        assert!(!p.has_active_plan(now));
    }
}
