use chrono::{DateTime, Utc};
use common::error::{AppError, Res};
use db::models::profile::Profile;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

/// Credits debited per generation for users without an active plan.
pub(crate) const GENERATION_COST: i32 = 10;

/// Gate applied before any provider call is made. Subscribers pass
/// unconditionally while their plan is active; everyone else needs a
/// sufficient credit balance.
pub(crate) fn check_eligibility(profile: &Profile, now: DateTime<Utc>) -> Res<()> {
    if profile.has_active_plan(now) || profile.credits >= GENERATION_COST {
        Ok(())
    } else {
        Err(AppError::PaymentRequired("insufficient_credits".to_string()))
    }
}

/// Charges for one generation. Plan users are charged nothing; free-plan
/// users go through the atomic conditional decrement, which re-checks
/// the balance in the same statement so a concurrent generation cannot
/// double-spend the last credits. Returns the amount actually charged.
pub(crate) async fn charge<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    profile: &Profile,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Res<i32> {
    if profile.has_active_plan(now) {
        return Ok(0);
    }

    let deducted = db::profile::try_deduct_credits(executor, user_id, GENERATION_COST).await?;
    if !deducted {
        return Err(AppError::PaymentRequired("insufficient_credits".to_string()));
    }
    Ok(GENERATION_COST)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use uuid::Uuid;

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
    fn denies_free_user_below_cost() {
        let now = Utc::now();
        let result = check_eligibility(&profile(5, "free", None), now);
        assert!(
            matches!(result, Err(AppError::PaymentRequired(ref reason)) if reason == "insufficient_credits")
        );
    }

    #[test]
    fn allows_free_user_at_or_above_cost() {
        let now = Utc::now();
        assert!(check_eligibility(&profile(GENERATION_COST, "free", None), now).is_ok());
        assert!(check_eligibility(&profile(50, "free", None), now).is_ok());
    }

    #[test]
    fn active_plan_bypasses_the_balance() {
        let now = Utc::now();
        let p = profile(0, "weekly", Some(now + Duration::days(3)));
        assert!(check_eligibility(&p, now).is_ok());
    }

    #[test]
    fn expired_plan_falls_back_to_credit_gating() {
        let now = Utc::now();
        let p = profile(5, "weekly", Some(now - Duration::hours(1)));
        assert!(check_eligibility(&p, now).is_err());
    }
}
