//! Single-slot overlay state: at most one dropdown or menu is open at a
//! time, so outside-click dismissal is one operation instead of a flag per
//! widget.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Columns,
    Density,
    AccountMenu,
    CampaignDropdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    active: Option<Overlay>,
}

impl OverlayState {
    /// Open the overlay, or close it if it is already the active one.
    /// Opening one overlay closes whatever else was open.
    pub fn toggle(&mut self, overlay: Overlay) {
        self.active = if self.active == Some(overlay) {
            None
        } else {
            Some(overlay)
        };
    }

    pub fn dismiss(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<Overlay> {
        self.active
    }

    pub fn is_open(&self, overlay: Overlay) -> bool {
        self.active == Some(overlay)
    }
}
