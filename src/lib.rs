pub mod clean;
pub mod config;
pub mod export;
pub mod fake_feed;
pub mod parse;
pub mod standings;
pub mod state;
pub mod vocabulary;
pub mod win_prob;
