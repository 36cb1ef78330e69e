use sea_orm::entity::prelude::*;

/// Cocktail recipe keyed by the upstream catalog id, or by an id from the
/// authored range when a user wrote it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "drinks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub author_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub image_attribution: Option<String>,
    pub video_url: Option<String>,
    pub alcoholic: bool,
    pub optional_alc: bool,
    pub category_id: Option<i32>,
    pub glass_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::glasses::Entity",
        from = "Column::GlassId",
        to = "super::glasses::Column::Id"
    )]
    Glass,
    #[sea_orm(has_many = "super::instructions::Entity")]
    Instructions,
    #[sea_orm(has_many = "super::drink_ingredients::Entity")]
    DrinkIngredients,
    #[sea_orm(has_many = "super::bookmarks::Entity")]
    Bookmarks,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::glasses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Glass.def()
    }
}

impl Related<super::instructions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instructions.def()
    }
}

impl Related<super::drink_ingredients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DrinkIngredients.def()
    }
}

impl Related<super::bookmarks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookmarks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
