use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ActorDirectory, Portrait, ScriptEvaluator};

/// Actor images keyed by actor id, plus the party order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorRoster {
    #[serde(default)]
    actors: BTreeMap<i64, Portrait>,
    #[serde(default)]
    party: Vec<i64>,
}

impl ActorRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(
        mut self,
        actor_id: i64,
        image_name: impl Into<String>,
        image_index: u32,
    ) -> Self {
        self.actors.insert(
            actor_id,
            Portrait {
                image_name: image_name.into(),
                image_index,
            },
        );
        self
    }

    pub fn with_party(mut self, party: Vec<i64>) -> Self {
        self.party = party;
        self
    }

    pub fn party(&self) -> &[i64] {
        &self.party
    }
}

impl ActorDirectory for ActorRoster {
    fn portrait(&self, actor_id: i64) -> Option<Portrait> {
        self.actors.get(&actor_id).cloned()
    }

    fn portrait_by_slot(&self, slot: i64) -> Option<Portrait> {
        let slot = usize::try_from(slot).ok()?;
        let actor_id = self.party.get(slot)?;
        self.portrait(*actor_id)
    }
}

/// Script evaluator that records pass-through scripts instead of running them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptLog {
    entries: Vec<(String, String)>,
}

impl ScriptLog {
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn scripts_for<'a>(&'a self, character: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(owner, _)| owner == character)
            .map(|(_, text)| text.as_str())
    }
}

impl ScriptEvaluator for ScriptLog {
    fn evaluate(&mut self, character: &str, text: &str) {
        debug!(character, script = text, "script_passthrough");
        self.entries.push((character.to_string(), text.to_string()));
    }
}
