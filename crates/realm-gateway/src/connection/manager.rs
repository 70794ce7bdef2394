//! Registry of live sockets
//!
//! Sockets are keyed by session id. Identified sessions are also counted per
//! user so the process can report how many distinct users are online.

use super::Connection;
use crate::hub::{ChannelHub, PushOutcome};
use crate::protocol::GatewayMessage;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use realm_core::Snowflake;
use std::sync::Arc;

pub struct ConnectionManager {
    sessions: DashMap<String, Arc<Connection>>,
    /// Identified sessions per user
    users: DashMap<Snowflake, usize>,
    hub: Arc<ChannelHub>,
    queue_capacity: usize,
}

impl ConnectionManager {
    #[must_use]
    pub fn new(hub: Arc<ChannelHub>, queue_capacity: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            users: DashMap::new(),
            hub,
            queue_capacity,
        }
    }

    pub fn hub(&self) -> &Arc<ChannelHub> {
        &self.hub
    }

    /// Register a fresh, unidentified socket
    pub fn open(&self, session_id: String) -> Arc<Connection> {
        let connection = Connection::new(session_id.clone(), self.queue_capacity);
        self.sessions.insert(session_id, Arc::clone(&connection));
        connection
    }

    /// Forget a socket and end every subscription it holds. Idempotent.
    pub fn release(&self, connection: &Connection) {
        if self.sessions.remove(connection.session_id()).is_none() {
            return;
        }

        // Close first: a subscribe still checking access sees it and backs out
        connection.close();
        for handle in connection.take_subscriptions() {
            self.hub.unsubscribe(&handle);
        }

        if let Some(user_id) = connection.user_id() {
            if let Entry::Occupied(mut count) = self.users.entry(user_id) {
                *count.get_mut() -= 1;
                if *count.get() == 0 {
                    count.remove();
                }
            }
        }
    }

    /// Bind a socket to a user. `false` if it was already bound.
    pub fn bind_user(&self, connection: &Connection, user_id: Snowflake) -> bool {
        if !connection.identify(user_id) {
            return false;
        }
        *self.users.entry(user_id).or_insert(0) += 1;
        true
    }

    /// Drop a deleted channel from every socket's bookkeeping
    pub fn forget_channel(&self, channel_id: Snowflake) {
        for session in &self.sessions {
            session.untrack(channel_id);
        }
    }

    /// Queue a frame on every identified socket; returns how many accepted it
    pub fn broadcast_identified(&self, message: &GatewayMessage) -> usize {
        self.sessions
            .iter()
            .filter(|session| session.is_authenticated())
            .filter(|session| session.send(message.clone()) != PushOutcome::Closed)
            .count()
    }

    pub fn connection_count(&self) -> usize {
        self.sessions.len()
    }

    /// Distinct identified users
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("sessions", &self.sessions.len())
            .field("users", &self.users.len())
            .field("hub", &self.hub)
            .finish()
    }
}
