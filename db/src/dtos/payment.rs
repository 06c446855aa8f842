use uuid::Uuid;

use crate::models::profile::PlanType;

/// Data needed to persist a freshly minted provider order as `pending`.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub amount_paise: i64,
    pub currency: String,
    pub plan_type: PlanType,
    pub provider_order_id: String,
}
