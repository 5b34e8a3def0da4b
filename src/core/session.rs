// This module provides per-compilation statistics for the hebe code generator. SessionStats
// counts what one generate pass did: nodes lowered (with a per-kind breakdown), procedures
// defined, globals created, calls emitted and liveness-anchor stores. The generator records
// into it as it walks the tree and logs the summary at debug level once entry synthesis
// completes. Statistics are observational only and never influence code generation.

//! Compilation session statistics.

use std::collections::BTreeMap;
use std::fmt;

use crate::ast::NodeKind;

/// Counters gathered during one `generate_code` pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    /// Number of nodes passed through the lowering dispatch.
    pub nodes_lowered: usize,

    /// Count of each node kind lowered.
    pub node_counts: BTreeMap<&'static str, usize>,

    /// Procedures turned into functions.
    pub procedures_defined: usize,

    /// Globals created (not counting reuse through get-or-create).
    pub globals_created: usize,

    /// Procedure calls emitted.
    pub calls_emitted: usize,

    /// Values persisted into a liveness-anchor slot.
    pub anchor_stores: usize,
}

impl SessionStats {
    pub fn record_node(&mut self, kind: NodeKind) {
        self.nodes_lowered += 1;
        *self.node_counts.entry(kind.name()).or_insert(0) += 1;
    }

    pub fn record_procedure(&mut self) {
        self.procedures_defined += 1;
    }

    pub fn record_global(&mut self) {
        self.globals_created += 1;
    }

    pub fn record_call(&mut self, callee: &str) {
        self.calls_emitted += 1;
        log::debug!("Call site recorded: {}", callee);
    }

    pub fn record_anchor_store(&mut self) {
        self.anchor_stores += 1;
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Code Generation Statistics:")?;
        writeln!(f, "  Nodes lowered: {}", self.nodes_lowered)?;
        writeln!(f, "  Procedures defined: {}", self.procedures_defined)?;
        writeln!(f, "  Globals created: {}", self.globals_created)?;
        writeln!(f, "  Calls emitted: {}", self.calls_emitted)?;
        writeln!(f, "  Anchor stores: {}", self.anchor_stores)?;

        if !self.node_counts.is_empty() {
            writeln!(f, "  Node breakdown:")?;
            for (kind, count) in &self.node_counts {
                writeln!(f, "    {}: {}", kind, count)?;
            }
        }

        Ok(())
    }
}
