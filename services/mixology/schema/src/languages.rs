use sea_orm::entity::prelude::*;

/// Instruction locale. Seeded by migration, read-only afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "languages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::users::Entity")]
    Users,
    #[sea_orm(has_many = "super::instructions::Entity")]
    Instructions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::instructions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
