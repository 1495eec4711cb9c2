use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub seller_id: Uuid,
    pub client_id: Uuid,
    pub status: OrderStatus,
    pub total: f64,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELED")]
    Canceled,
}

impl OrderStatus {
    /// An order may only leave PENDING, and only once.
    pub fn can_transition(self, next: OrderStatus) -> bool {
        self == next
            || matches!(
                (self, next),
                (OrderStatus::Pending, OrderStatus::Completed)
                    | (OrderStatus::Pending, OrderStatus::Canceled)
            )
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::SellerId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
    #[sea_orm(has_many = "super::order_lines::Entity")]
    OrderLines,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::order_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::OrderStatus;

    #[test]
    fn pending_can_complete_or_cancel() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Completed));
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Canceled));
    }

    #[test]
    fn terminal_states_are_frozen() {
        assert!(!OrderStatus::Completed.can_transition(OrderStatus::Pending));
        assert!(!OrderStatus::Completed.can_transition(OrderStatus::Canceled));
        assert!(!OrderStatus::Canceled.can_transition(OrderStatus::Completed));
        assert!(!OrderStatus::Canceled.can_transition(OrderStatus::Pending));
    }

    #[test]
    fn identity_transition_is_allowed() {
        assert!(OrderStatus::Pending.can_transition(OrderStatus::Pending));
        assert!(OrderStatus::Completed.can_transition(OrderStatus::Completed));
    }
}
