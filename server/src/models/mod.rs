pub mod event;

pub use event::{
    take_id, Event, EventChanges, EventFilter, EventType, NewEvent, Stamped, EVENTS_COLLECTION,
};
