//! Serves recorded interactions back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, Interaction};

/// Per `(port, method)` queues of recorded interactions.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<Interaction>>,
}

impl CassetteReplayer {
    /// Index a loaded cassette by port and method, keeping recording order.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<(String, String), VecDeque<Interaction>> = HashMap::new();
        let mut ordered = cassette.interactions.clone();
        ordered.sort_by_key(|i| i.seq);
        for interaction in ordered {
            queues
                .entry((interaction.port.clone(), interaction.method.clone()))
                .or_default()
                .push_back(interaction);
        }
        Self { queues }
    }

    /// Number of interactions not yet served for `port`/`method`.
    #[must_use]
    pub fn remaining(&self, port: &str, method: &str) -> usize {
        self.queues.get(&(port.to_string(), method.to_string())).map_or(0, VecDeque::len)
    }

    /// Take the next interaction for `port`/`method`.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the pair.
    pub fn next_interaction(&mut self, port: &str, method: &str) -> Interaction {
        let key = (port.to_string(), method.to_string());
        if !self.queues.contains_key(&key) {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        }
        self.queues.get_mut(&key).and_then(VecDeque::pop_front).unwrap_or_else(|| {
            panic!(
                "Cassette exhausted: all interactions for port={port:?} method={method:?} \
                 have been consumed."
            )
        })
    }
}
