use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of rounds (holes) in a game of Golf.
pub const ROUNDS_PER_GAME: usize = 9;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game_participants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "game_id")]
    pub game_id: i64,
    #[sea_orm(column_name = "player_id")]
    pub player_id: i64,
    /// Client-computed sum of the nine round scores, stored as submitted.
    #[sea_orm(column_name = "total_score")]
    pub total_score: i32,
    #[sea_orm(column_name = "round_1")]
    pub round_1: i32,
    #[sea_orm(column_name = "round_2")]
    pub round_2: i32,
    #[sea_orm(column_name = "round_3")]
    pub round_3: i32,
    #[sea_orm(column_name = "round_4")]
    pub round_4: i32,
    #[sea_orm(column_name = "round_5")]
    pub round_5: i32,
    #[sea_orm(column_name = "round_6")]
    pub round_6: i32,
    #[sea_orm(column_name = "round_7")]
    pub round_7: i32,
    #[sea_orm(column_name = "round_8")]
    pub round_8: i32,
    #[sea_orm(column_name = "round_9")]
    pub round_9: i32,
    pub won: bool,
}

impl Model {
    /// The nine round scores in playing order.
    pub fn rounds(&self) -> [i32; ROUNDS_PER_GAME] {
        [
            self.round_1,
            self.round_2,
            self.round_3,
            self.round_4,
            self.round_5,
            self.round_6,
            self.round_7,
            self.round_8,
            self.round_9,
        ]
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::games::Entity",
        from = "Column::GameId",
        to = "super::games::Column::Id"
    )]
    Game,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::PlayerId",
        to = "super::players::Column::Id"
    )]
    Player,
}

impl Related<super::games::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
