use sea_orm::entity::prelude::*;

use crate::domain::Restaurant;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: String,
    pub phone: String,
    /// Owner of special request placeholders
    pub is_house: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::food_item::Entity")]
    FoodItem,
}

impl Related<super::food_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Restaurant {
    fn from(model: Model) -> Self {
        Restaurant {
            id: model.id,
            name: model.name,
            address: model.address,
            phone: model.phone,
        }
    }
}
