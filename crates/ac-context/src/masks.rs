//! Tool masking: marks a tool unavailable without removing it from the
//! catalog, preserving the stable prefix byte-for-byte.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskState {
    Available,
    Masked { reason: String, conditions: Option<String> },
    Hidden,
}

#[derive(Default)]
pub struct ToolMasks {
    masks: HashMap<String, MaskState>,
}

impl ToolMasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mask(&mut self, tool: impl Into<String>, reason: impl Into<String>, conditions: Option<String>) {
        self.masks.insert(
            tool.into(),
            MaskState::Masked {
                reason: reason.into(),
                conditions,
            },
        );
    }

    pub fn unmask(&mut self, tool: &str) {
        self.masks.remove(tool);
    }

    pub fn state(&self, tool: &str) -> &MaskState {
        self.masks.get(tool).unwrap_or(&MaskState::Available)
    }

    pub fn is_masked(&self, tool: &str) -> bool {
        matches!(self.state(tool), MaskState::Masked { .. } | MaskState::Hidden)
    }

    /// `[UNAVAILABLE TOOLS — Do not attempt to use:]` block listing masked
    /// tools with their reasons, or `None` if nothing is masked.
    pub fn render_block(&self) -> Option<String> {
        let mut entries: Vec<(&String, &String)> = self
            .masks
            .iter()
            .filter_map(|(tool, state)| match state {
                MaskState::Masked { reason, .. } => Some((tool, reason)),
                _ => None,
            })
            .collect();
        if entries.is_empty() {
            return None;
        }
        entries.sort_by(|a, b| a.0.cmp(b.0));
        let mut lines = vec!["[UNAVAILABLE TOOLS — Do not attempt to use:]".to_string()];
        for (tool, reason) in entries {
            lines.push(format!("- {tool} ({reason})"));
        }
        Some(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_tool_appears_with_reason_in_block() {
        let mut masks = ToolMasks::new();
        masks.mask("browser_use", "no GUI", None);
        let block = masks.render_block().unwrap();
        assert!(block.contains("- browser_use (no GUI)"));
    }

    #[test]
    fn unmask_removes_from_block() {
        let mut masks = ToolMasks::new();
        masks.mask("browser_use", "no GUI", None);
        masks.unmask("browser_use");
        assert!(masks.render_block().is_none());
    }

    #[test]
    fn no_masks_emits_no_block() {
        let masks = ToolMasks::new();
        assert!(masks.render_block().is_none());
    }
}
