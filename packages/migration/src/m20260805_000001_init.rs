use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    GoogleSub,
    Email,
    Name,
    Picture,
    CreatedAt,
}

#[derive(Iden)]
enum Players {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    UserId,
    Date,
    Completed,
    CreatedAt,
}

#[derive(Iden)]
enum GameParticipants {
    Table,
    Id,
    GameId,
    PlayerId,
    TotalScore,
    #[iden = "round_1"]
    Round1,
    #[iden = "round_2"]
    Round2,
    #[iden = "round_3"]
    Round3,
    #[iden = "round_4"]
    Round4,
    #[iden = "round_5"]
    Round5,
    #[iden = "round_6"]
    Round6,
    #[iden = "round_7"]
    Round7,
    #[iden = "round_8"]
    Round8,
    #[iden = "round_9"]
    Round9,
    Won,
}

fn round_col(col: GameParticipants) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    def.integer().not_null().default(0);
    def
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Users::GoogleSub).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().null())
                    .col(ColumnDef::new(Users::Picture).string().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // unique index on users.google_sub
        manager
            .create_index(
                Index::create()
                    .name("idx_users_google_sub_unique")
                    .table(Users::Table)
                    .col(Users::GoogleSub)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // players
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Players::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Players::Name).string().not_null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // unique index on players.name; the save-game upsert relies on it
        manager
            .create_index(
                Index::create()
                    .name("idx_players_name_unique")
                    .table(Players::Table)
                    .col(Players::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // games
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(ColumnDef::new(Games::UserId).big_integer().null())
                    .col(ColumnDef::new(Games::Date).string().not_null())
                    .col(
                        ColumnDef::new(Games::Completed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_user_id")
                            .from(Games::Table, Games::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // index for the newest-first listing scoped by owner
        manager
            .create_index(
                Index::create()
                    .name("idx_games_user_id_created_at")
                    .table(Games::Table)
                    .col(Games::UserId)
                    .col(Games::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // game_participants
        manager
            .create_table(
                Table::create()
                    .table(GameParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameParticipants::Id)
                            .big_integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(GameParticipants::GameId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameParticipants::PlayerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameParticipants::TotalScore)
                            .integer()
                            .not_null(),
                    )
                    .col(&mut round_col(GameParticipants::Round1))
                    .col(&mut round_col(GameParticipants::Round2))
                    .col(&mut round_col(GameParticipants::Round3))
                    .col(&mut round_col(GameParticipants::Round4))
                    .col(&mut round_col(GameParticipants::Round5))
                    .col(&mut round_col(GameParticipants::Round6))
                    .col(&mut round_col(GameParticipants::Round7))
                    .col(&mut round_col(GameParticipants::Round8))
                    .col(&mut round_col(GameParticipants::Round9))
                    .col(
                        ColumnDef::new(GameParticipants::Won)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_participants_game_id")
                            .from(GameParticipants::Table, GameParticipants::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_participants_player_id")
                            .from(GameParticipants::Table, GameParticipants::PlayerId)
                            .to(Players::Table, Players::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // one row per (game, player)
        manager
            .create_index(
                Index::create()
                    .name("ux_game_participants_game_player")
                    .table(GameParticipants::Table)
                    .col(GameParticipants::GameId)
                    .col(GameParticipants::PlayerId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_participants_player_id")
                    .table(GameParticipants::Table)
                    .col(GameParticipants::PlayerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameParticipants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
