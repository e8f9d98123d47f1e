//! Shared test doubles for the Lantern bridge.

mod scripted;

pub use scripted::{
    FailingViewsProvider, RefusingProvider, ScriptedEngine, ScriptedProvider, LEAFLET_NUM,
    MAILBOX_NUM, PLAYER_NUM, ROOM_FIELD_NUM, ROOM_PORCH_NUM,
};
