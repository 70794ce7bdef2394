//! Domain events

mod domain_event;

pub use domain_event::{
    is_control_plane, ChannelChangedEvent, DomainEvent, MessageCreatedEvent,
    ReactionToggledEvent, CHANNELS_REFRESH, CONTROL_PLANE_EVENTS,
};
