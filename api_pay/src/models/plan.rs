use common::error::{AppError, Res};
use db::models::profile::PlanType;

pub(crate) const CURRENCY: &str = "INR";

/// Fixed price table, in paise. Only paid plans can be purchased;
/// anything else is an input validation error with no side effects.
pub(crate) fn price_paise(plan: PlanType) -> Option<i64> {
    match plan {
        PlanType::Weekly => Some(3000),
        PlanType::Monthly => Some(10000),
        PlanType::Free => None,
    }
}

/// Subscription window granted on a verified payment.
pub(crate) fn duration_days(plan: PlanType) -> Option<i64> {
    match plan {
        PlanType::Weekly => Some(7),
        PlanType::Monthly => Some(30),
        PlanType::Free => None,
    }
}

/// Parses and validates a purchasable plan from its wire identifier.
pub(crate) fn parse_paid_plan(raw: &str) -> Res<PlanType> {
    raw.parse::<PlanType>()
        .ok()
        .filter(|plan| price_paise(*plan).is_some())
        .ok_or_else(|| AppError::BadRequest("Invalid plan type".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_plans_have_prices_and_durations() {
        assert_eq!(price_paise(PlanType::Weekly), Some(3000));
        assert_eq!(price_paise(PlanType::Monthly), Some(10000));
        assert_eq!(duration_days(PlanType::Weekly), Some(7));
        assert_eq!(duration_days(PlanType::Monthly), Some(30));
    }

    #[test]
    fn free_plan_cannot_be_purchased() {
        assert_eq!(price_paise(PlanType::Free), None);
        assert!(parse_paid_plan("free").is_err());
    }

    #[test]
    fn unknown_plan_identifiers_are_rejected() {
        assert!(parse_paid_plan("yearly").is_err());
        assert!(parse_paid_plan("").is_err());
        assert!(parse_paid_plan("weekly").is_ok());
        assert!(parse_paid_plan("monthly").is_ok());
    }
}
