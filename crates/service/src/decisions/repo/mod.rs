pub mod seaorm;

pub use seaorm::SeaOrmDecisionStore;
