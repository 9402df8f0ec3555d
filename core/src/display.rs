//! Transcript model and the abstract UI surface the controller drives.

use crate::markdown::render_markdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// CSS class used for the bubble.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// Content of a transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Shown verbatim as text.
    Text(String),
    /// Already rendered markup, inserted as HTML.
    Markup(String),
}

impl MessageBody {
    pub fn as_str(&self) -> &str {
        match self {
            MessageBody::Text(s) | MessageBody::Markup(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageNode {
    pub id: NodeId,
    pub sender: Sender,
    pub body: MessageBody,
    /// Only streaming nodes may have their body replaced.
    pub streaming: bool,
}

/// Append-only list of rendered messages.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    nodes: Vec<MessageNode>,
    next_id: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sender: Sender, body: MessageBody, streaming: bool) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(MessageNode { id, sender, body, streaming });
        id
    }

    /// Swaps the body of a streaming node. Returns `false` for unknown or
    /// finished nodes, which are left untouched.
    pub fn replace(&mut self, id: NodeId, body: MessageBody) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) if node.streaming => {
                node.body = body;
                true
            }
            _ => false,
        }
    }

    pub fn finish(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.streaming = false;
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&MessageNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[MessageNode] {
        &self.nodes
    }

    pub fn last(&self) -> Option<&MessageNode> {
        self.nodes.last()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Operations the widget needs from whatever renders it.
///
/// Methods take `&self`: implementations sit on reactive signals or cells
/// and are called from a single thread.
pub trait ChatView {
    fn append_message(&self, sender: Sender, body: MessageBody, streaming: bool) -> NodeId;

    fn replace_message(&self, id: NodeId, body: MessageBody);

    /// Marks a streaming message as complete.
    fn finish_message(&self, id: NodeId);

    fn scroll_to_bottom(&self);

    /// Disables the input and send control and shows the loading indicator
    /// while `loading` is true.
    fn set_loading(&self, loading: bool);

    fn show_suggestions(&self, prompts: &[String]);

    fn input_value(&self) -> String;

    fn set_input_value(&self, value: &str);

    fn focus_input(&self);
}

/// Appends a message and scrolls to it. Bot text goes through the markdown
/// renderer; user text is kept as typed.
pub fn display_message<V: ChatView + ?Sized>(
    view: &V,
    sender: Sender,
    text: &str,
    streaming: bool,
) -> NodeId {
    let body = match sender {
        Sender::Bot => MessageBody::Markup(render_markdown(text)),
        Sender::User => MessageBody::Text(text.to_string()),
    };
    let id = view.append_message(sender, body, streaming);
    view.scroll_to_bottom();
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase_in_append_order() {
        let mut t = Transcript::new();
        let a = t.push(Sender::User, MessageBody::Text("hi".into()), false);
        let b = t.push(Sender::Bot, MessageBody::Markup("hello".into()), false);
        assert!(a < b);
        assert_eq!(t.len(), 2);
        assert_eq!(t.last().map(|n| n.id), Some(b));
    }

    #[test]
    fn only_streaming_nodes_are_replaced() {
        let mut t = Transcript::new();
        let id = t.push(Sender::Bot, MessageBody::Markup("Hel".into()), true);
        assert!(t.replace(id, MessageBody::Markup("Hello".into())));

        t.finish(id);
        assert!(!t.replace(id, MessageBody::Markup("changed".into())));
        assert_eq!(t.get(id).map(|n| n.body.as_str()), Some("Hello"));
    }

    #[test]
    fn replace_unknown_node_is_rejected() {
        let mut t = Transcript::new();
        let id = t.push(Sender::Bot, MessageBody::Markup("x".into()), true);
        assert!(!t.replace(NodeId(id.get() + 5), MessageBody::Markup("no".into())));
    }
}
