use rps_types::{Move, Outcome};
use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Choice {
    #[sea_orm(string_value = "rock")]
    Rock,
    #[sea_orm(string_value = "paper")]
    Paper,
    #[sea_orm(string_value = "scissors")]
    Scissors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RoundResult {
    #[sea_orm(string_value = "win")]
    Win,
    #[sea_orm(string_value = "lose")]
    Lose,
    #[sea_orm(string_value = "draw")]
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "game_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: Option<i32>,
    pub player_choice: Choice,
    pub computer_choice: Choice,
    pub result: RoundResult,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Move> for Choice {
    fn from(mv: Move) -> Self {
        match mv {
            Move::Rock => Choice::Rock,
            Move::Paper => Choice::Paper,
            Move::Scissors => Choice::Scissors,
        }
    }
}

impl From<Choice> for Move {
    fn from(choice: Choice) -> Self {
        match choice {
            Choice::Rock => Move::Rock,
            Choice::Paper => Move::Paper,
            Choice::Scissors => Move::Scissors,
        }
    }
}

impl From<Outcome> for RoundResult {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => RoundResult::Win,
            Outcome::Lose => RoundResult::Lose,
            Outcome::Draw => RoundResult::Draw,
        }
    }
}

impl From<RoundResult> for Outcome {
    fn from(result: RoundResult) -> Self {
        match result {
            RoundResult::Win => Outcome::Win,
            RoundResult::Lose => Outcome::Lose,
            RoundResult::Draw => Outcome::Draw,
        }
    }
}
