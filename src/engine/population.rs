use super::tree::Program;
use std::collections::HashSet;

/// Sub-group of a population; the leader is an index into `members`
#[derive(Debug, Default)]
pub struct Species {
    pub members: Vec<Program>,
    pub leader: Option<usize>,
}

impl Species {
    pub fn leader(&self) -> Option<&Program> {
        self.leader.and_then(|idx| self.members.get(idx))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct Population {
    pub species: Vec<Species>,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member_count(&self) -> usize {
        self.species.iter().map(Species::len).sum()
    }
}

/// Shared acceptance state for one population-fill pass.
///
/// Created fresh per pass and mutated only under the filler's insertion
/// lock. `seen` holds the canonical texts of accepted members; the attempt
/// loop reads it as a duplicate pre-check, but the durable reservation
/// happens in [`add_member`](FillState::add_member).
#[derive(Debug, Default)]
pub struct FillState {
    pub seen: HashSet<String>,
    pub members: Vec<Program>,
}

impl FillState {
    /// Sole durable acceptance point: assigns the owning-species index,
    /// appends the member, and reserves its canonical text. Callers hold
    /// the insertion lock for exactly this call.
    pub fn add_member(&mut self, mut program: Program, species_idx: usize) {
        program.species = Some(species_idx);
        self.seen.insert(program.canonical_text());
        self.members.push(program);
    }

    pub fn is_duplicate(&self, canonical_text: &str) -> bool {
        self.seen.contains(canonical_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tree::ExprNode;
    use crate::opcodes::primitives::FloatConst;
    use crate::types::Value;
    use std::sync::Arc;

    fn program(value: f64) -> Program {
        Program::new(ExprNode::new(
            Arc::new(FloatConst),
            Vec::new(),
            Some(Value::Float(value)),
        ))
    }

    #[test]
    fn add_member_reserves_canonical_text() {
        let mut state = FillState::default();
        assert!(!state.is_duplicate("1.5"));

        state.add_member(program(1.5), 0);
        assert!(state.is_duplicate("1.5"));
        assert_eq!(state.members.len(), 1);
        assert_eq!(state.members[0].species, Some(0));
    }

    #[test]
    fn species_leader_resolves_to_first_member() {
        let mut species = Species::default();
        species.members.push(program(2.0));
        species.members.push(program(3.0));
        species.leader = Some(0);
        assert_eq!(species.leader().unwrap().canonical_text(), "2");
    }
}
