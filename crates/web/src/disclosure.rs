//! Per-recommendation "explanation visible" flags.

use std::collections::HashMap;

use storefront_core::ProductId;

use crate::detail::RequestToken;

/// Which explanations are expanded in the currently displayed list.
///
/// Recommendation identifiers only mean something within one list, so the
/// flags are tied to the request that produced the list and dropped when a
/// different list is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisclosureTracker {
    scope: Option<RequestToken>,
    visible: HashMap<ProductId, bool>,
}

impl DisclosureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the flags to the list produced by `scope`, clearing them if they
    /// belonged to another list.
    pub fn rescope(&mut self, scope: RequestToken) {
        if self.scope != Some(scope) {
            self.visible.clear();
            self.scope = Some(scope);
        }
    }

    pub fn reset(&mut self) {
        self.visible.clear();
        self.scope = None;
    }

    /// Flip visibility for `id` and return the new value.
    pub fn toggle(&mut self, id: ProductId) -> bool {
        let flag = self.visible.entry(id).or_insert(false);
        *flag = !*flag;
        tracing::trace!(recommendation = %id, visible = *flag, "explanation toggled");
        *flag
    }

    /// Hidden unless explicitly toggled on.
    pub fn is_visible(&self, id: ProductId) -> bool {
        self.visible.get(&id).copied().unwrap_or(false)
    }
}
