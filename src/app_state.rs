use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, States)]
pub enum AppState {
    #[default]
    Boot,
    InGame,
    GameOver,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, SubStates)]
#[source(AppState = AppState::InGame)]
pub enum PlayingState {
    #[default]
    LevelIntro,
    Playing,
    LevelCleared,
    LevelTransition,
}
