pub mod health;
pub mod matching;
pub mod search;
