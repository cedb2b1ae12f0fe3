//! Elements bound to one scanner, evaluated in registration order at the end of every sweep

use heapless::Vec;

use crate::bus::SimBus;
use crate::element::{Element, SwitchElement};
use crate::rows::RowState;

/// Index of an element in its scanner's registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElementId(u8);

pub struct ElementRegistry<'a, B: SimBus, const N: usize> {
    elements: Vec<SwitchElement<'a, B>, N>,
}

impl<'a, B: SimBus, const N: usize> ElementRegistry<'a, B, N> {
    pub fn new() -> Self {
        ElementRegistry {
            elements: Vec::new(),
        }
    }

    /// Appends an element, handing it back when the registry is full
    pub fn push(
        &mut self,
        element: SwitchElement<'a, B>,
    ) -> Result<ElementId, SwitchElement<'a, B>> {
        let id = ElementId(self.elements.len() as u8);
        if id.0 as usize >= u8::MAX as usize {
            return Err(element);
        }
        self.elements.push(element)?;
        Ok(id)
    }

    pub fn get(&self, id: ElementId) -> Option<&SwitchElement<'a, B>> {
        self.elements.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwitchElement<'a, B>> {
        self.elements.iter()
    }

    pub(crate) fn evaluate_all(&mut self, rows: &RowState, resync: bool, bus: &mut B) {
        for element in self.elements.iter_mut() {
            element.evaluate(rows, resync, bus);
        }
    }

    pub(crate) fn set_debug(&mut self, mask: u32) {
        for element in self.elements.iter_mut() {
            element.apply_debug_mask(mask);
        }
    }
}

impl<'a, B: SimBus, const N: usize> Default for ElementRegistry<'a, B, N> {
    fn default() -> Self {
        Self::new()
    }
}
