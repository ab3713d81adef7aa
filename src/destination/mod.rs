use std::fmt;

#[cfg(test)]
mod tests;

/// Whether a destination is point-to-point or publish/subscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DestinationKind {
    Queue,
    Topic,
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DestinationKind::Queue => f.write_str("queue"),
            DestinationKind::Topic => f.write_str("topic"),
        }
    }
}

/// Represents a queue or topic known to a broker
/// Identity is the name, the kind and the temporary flag
/// Two equal values address the same broker destination, so a `Destination` can be
/// cloned and passed around freely
/// Destinations are normally obtained from a session, which interns them with the broker;
/// the broker matches names case-insensitively and hands back the first spelling it saw
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    name: String,
    kind: DestinationKind,
    temporary: bool,
}

impl Destination {
    pub fn queue(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DestinationKind::Queue,
            temporary: false,
        }
    }

    pub fn topic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DestinationKind::Topic,
            temporary: false,
        }
    }

    pub(crate) fn temporary(name: impl Into<String>, kind: DestinationKind) -> Self {
        Self {
            name: name.into(),
            kind,
            temporary: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DestinationKind {
        self.kind
    }

    pub fn is_queue(&self) -> bool {
        self.kind == DestinationKind::Queue
    }

    pub fn is_topic(&self) -> bool {
        self.kind == DestinationKind::Topic
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.temporary {
            write!(f, "temporary {}://{}", self.kind, self.name)
        } else {
            write!(f, "{}://{}", self.kind, self.name)
        }
    }
}
