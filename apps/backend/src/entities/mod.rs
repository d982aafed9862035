pub mod game_participants;
pub mod games;
pub mod players;
pub mod users;
