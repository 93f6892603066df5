pub mod best;
pub mod clear;
pub mod init;
pub mod leaderboard;
pub mod play;
pub mod status;
