//! Weighted random branches
//!
//! A weight set is a run of Weight commands at one indent, closed by End
//! Weight Branches. Each Weight command opens a branch that lasts until the
//! next sibling Weight or End. One branch per set is drawn, with probability
//! proportional to its weight.

use crate::command::{plugin, Command, EventAiCommand};
use ahash::AHashMap;
use rand::Rng;
use smallvec::SmallVec;
use tracing::warn;

/// One Weight or End Weight Branches command found by the pre-pass
#[derive(Debug, Clone, Copy, PartialEq)]
enum Marker {
    Weight(f64),
    End,
}

/// Jump table over one command list, built once per setup
#[derive(Debug, Clone, Default)]
pub struct BranchIndex {
    /// Index of the next sibling Weight/End (or the end of the enclosing block)
    next_sibling: AHashMap<usize, usize>,
    /// Index of the first Weight of the set each Weight belongs to
    set_of: AHashMap<usize, usize>,
    /// Members `(index, weight)` of each set, keyed by its first Weight
    sets: AHashMap<usize, Vec<(usize, f64)>>,
}

fn marker(command: &Command, plugin_name: &str) -> Option<Marker> {
    let plugin_command = command.as_plugin_command()?;
    if plugin_command.plugin != plugin_name {
        return None;
    }
    match plugin_command.name {
        plugin::WEIGHT => match EventAiCommand::decode(&plugin_command) {
            Ok(Some(EventAiCommand::Weight(weight))) => Some(Marker::Weight(weight)),
            _ => {
                warn!(weight = ?plugin_command.arg("weight"), "unreadable weight, counting as 0");
                Some(Marker::Weight(0.0))
            }
        },
        plugin::END_WEIGHT_BRANCHES => Some(Marker::End),
        _ => None,
    }
}

impl BranchIndex {
    pub fn build(list: &[Command], plugin_name: &str) -> Self {
        let markers: Vec<Option<Marker>> = list.iter().map(|c| marker(c, plugin_name)).collect();
        let mut index = Self::default();

        for (i, found) in markers.iter().enumerate() {
            let Some(Marker::Weight(weight)) = found else {
                continue;
            };
            let indent = list[i].indent;
            let next = (i + 1..list.len())
                .find(|&j| list[j].indent < indent || (list[j].indent == indent && markers[j].is_some()))
                .unwrap_or(list.len());
            index.next_sibling.insert(i, next);

            // A Weight directly after a sibling Weight's branch joins that set
            let set_id = index
                .next_sibling
                .iter()
                .find(|(&prev, &prev_next)| prev_next == i && list[prev].indent == indent)
                .and_then(|(prev, _)| index.set_of.get(prev).copied())
                .unwrap_or(i);
            index.set_of.insert(i, set_id);
            index.sets.entry(set_id).or_default().push((i, *weight));
        }
        index
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn next_sibling(&self, index: usize) -> Option<usize> {
        self.next_sibling.get(&index).copied()
    }

    /// The set a Weight command belongs to: its id and members
    pub fn set_of(&self, index: usize) -> Option<(usize, &[(usize, f64)])> {
        let set_id = *self.set_of.get(&index)?;
        self.sets.get(&set_id).map(|members| (set_id, members.as_slice()))
    }
}

/// Index of the branch where the running weight first exceeds `draw`
///
/// Non-positive and non-finite weights contribute nothing. A draw at or past
/// the total picks the last branch with positive weight.
pub fn select_branch(weights: &[f64], draw: f64) -> usize {
    let mut running = 0.0;
    let mut last_positive = 0;
    for (i, weight) in weights.iter().enumerate() {
        if !usable(*weight) {
            continue;
        }
        running += weight;
        last_positive = i;
        if running > draw {
            return i;
        }
    }
    last_positive
}

/// Draw a branch at random; a set without positive weight selects the first
pub fn draw_branch<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().copied().filter(|w| usable(*w)).sum();
    if total <= 0.0 {
        warn!(branches = weights.len(), "weight set has no positive weight, selecting first branch");
        return 0;
    }
    if !total.is_finite() {
        // The sum overflowed; the same proportions over the largest weight stay finite
        let largest = weights.iter().copied().filter(|w| usable(*w)).fold(0.0, f64::max);
        let scaled: SmallVec<[f64; 8]> = weights.iter().map(|w| w / largest).collect();
        return draw_branch(&scaled, rng);
    }
    select_branch(weights, rng.gen_range(0.0..total))
}

fn usable(weight: f64) -> bool {
    weight.is_finite() && weight > 0.0
}

/// A selection recorded for one indent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Selection {
    depth: u32,
    set_id: usize,
    selected: usize,
}

/// Selections of the weight sets currently open in one interpreter
#[derive(Debug, Clone, Default)]
pub struct WeightBranchState {
    selections: SmallVec<[Selection; 4]>,
}

impl WeightBranchState {
    /// Forget selections of scopes execution has left
    pub fn prune(&mut self, indent: u32) {
        self.selections.retain(|s| s.depth <= indent + 1);
    }

    /// Selected branch for the set at `depth`, if that set is the one recorded
    pub fn selection(&self, depth: u32, set_id: usize) -> Option<usize> {
        self.selections
            .iter()
            .find(|s| s.depth == depth && s.set_id == set_id)
            .map(|s| s.selected)
    }

    pub fn record(&mut self, depth: u32, set_id: usize, selected: usize) {
        self.selections.retain(|s| s.depth != depth);
        self.selections.push(Selection {
            depth,
            set_id,
            selected,
        });
    }

    /// Close every set at or below `depth`; false when none was open
    pub fn close(&mut self, depth: u32) -> bool {
        let before = self.selections.len();
        self.selections.retain(|s| s.depth < depth);
        self.selections.len() != before
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}
