use sea_orm::entity::prelude::*;

use crate::domain::Delivery;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "deliveries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub order_id: i32,
    pub address: String,
    pub estimated_delivery_time: DateTimeUtc,
    pub delivery_user_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::Id"
    )]
    Order,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DeliveryUserId",
        to = "super::user::Column::Id"
    )]
    DeliveryUser,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Delivery {
    fn from(model: Model) -> Self {
        Delivery {
            id: model.id,
            order_id: model.order_id,
            address: model.address,
            estimated_delivery_time: model.estimated_delivery_time,
            delivery_user_id: model.delivery_user_id,
        }
    }
}
