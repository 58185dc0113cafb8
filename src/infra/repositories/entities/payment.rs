use sea_orm::entity::prelude::*;

use crate::domain::{Payment, PaymentMethod};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub order_id: i32,
    pub payment_method: String,
    pub is_paid: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Payment {
    fn from(model: Model) -> Self {
        let payment_method = model.payment_method.parse().unwrap_or_else(|_| {
            tracing::warn!(
                payment_id = model.id,
                method = %model.payment_method,
                "Unknown stored payment method"
            );
            PaymentMethod::default()
        });

        Payment {
            id: model.id,
            order_id: model.order_id,
            payment_method,
            is_paid: model.is_paid,
        }
    }
}
