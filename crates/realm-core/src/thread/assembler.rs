//! Thread assembler
//!
//! Turns a time-ordered window of messages into a forest of reply trees in a
//! single pass. A message whose parent is not in the window (older than the
//! fetch limit, or simply unknown) becomes a root; that is the expected outcome
//! of paginated fetching, not an error.

use std::collections::HashMap;

use serde::Serialize;

use crate::entities::Message;
use crate::value_objects::Snowflake;

/// Anything that can be placed in a reply tree
pub trait Threaded {
    fn thread_id(&self) -> Snowflake;
    fn thread_parent(&self) -> Option<Snowflake>;
}

impl Threaded for Message {
    fn thread_id(&self) -> Snowflake {
        self.id
    }

    fn thread_parent(&self) -> Option<Snowflake> {
        self.parent_id
    }
}

/// A message and its replies, in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageNode<T> {
    #[serde(flatten)]
    pub message: T,
    pub replies: Vec<MessageNode<T>>,
}

impl<T> MessageNode<T> {
    /// Number of messages in this subtree, including the root
    pub fn size(&self) -> usize {
        1 + self.replies.iter().map(MessageNode::size).sum::<usize>()
    }
}

/// Assemble messages into reply trees.
///
/// Input order is preserved among roots and among siblings. Parents must precede
/// their replies in the input; a reply seen before its parent is a root.
/// Runs in O(n) time with one hash lookup per message.
pub fn assemble<T, I>(messages: I) -> Vec<MessageNode<T>>
where
    T: Threaded,
    I: IntoIterator<Item = T>,
{
    let mut slots: Vec<Option<(T, Vec<usize>)>> = Vec::new();
    let mut index: HashMap<Snowflake, usize> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for message in messages {
        let position = slots.len();
        let parent = message
            .thread_parent()
            .and_then(|parent_id| index.get(&parent_id).copied());

        match parent {
            Some(parent_position) => {
                if let Some((_, replies)) = slots[parent_position].as_mut() {
                    replies.push(position);
                }
            }
            None => roots.push(position),
        }
        index.insert(message.thread_id(), position);
        slots.push(Some((message, Vec::new())));
    }

    // Replies always sit after their parent, so building back to front means
    // every child node exists by the time its parent is assembled.
    let mut built: Vec<Option<MessageNode<T>>> = Vec::with_capacity(slots.len());
    built.resize_with(slots.len(), || None);

    for position in (0..slots.len()).rev() {
        if let Some((message, reply_positions)) = slots[position].take() {
            let replies = reply_positions
                .into_iter()
                .filter_map(|reply| built[reply].take())
                .collect();
            built[position] = Some(MessageNode { message, replies });
        }
    }

    roots
        .into_iter()
        .filter_map(|root| built[root].take())
        .collect()
}
