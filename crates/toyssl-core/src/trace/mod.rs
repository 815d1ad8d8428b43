pub mod sinks;


pub use sinks::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Tx,
    Rx,
}

impl Direction {
    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Tx => "->",
            Direction::Rx => "<-",
        }
    }
}

// One explained crypto step: ordered (label, value) pairs under a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub title: String,
    pub entries: Vec<(String, Vec<u8>)>,
}

impl Explanation {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), entries: Vec::new() }
    }

    pub fn push(&mut self, label: impl Into<String>, value: impl AsRef<[u8]>) -> &mut Self {
        self.entries.push((label.into(), value.as_ref().to_vec()));
        self
    }

    pub fn get(&self, label: &str) -> Option<&[u8]> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, v)| v.as_slice())
    }
}

/*
    Observer for everything a connection sends, receives and computes.
      - on_message: one call per application-layer message, with its payload bytes.
      - explain: one call per cryptographic step.
    Rendering is the sink's business.
*/
pub trait TraceSink: Send + Sync {
    fn on_message(&self, direction: Direction, label: &str, bytes: &[u8]);
    fn explain(&self, explanation: &Explanation);
}
