//! Display ordering of the persona list.

use crate::persona::Persona;

/// Orders personas for display: favorites before non-favorites, then by
/// most recent message within the same favorite status.
///
/// A persona with no messages carries a last-activity of 0 and sorts
/// last in its group. The sort is stable, so personas that tie keep
/// their collection order.
pub fn sorted_personas(personas: &[Persona]) -> Vec<&Persona> {
    let mut ordered: Vec<&Persona> = personas.iter().collect();
    ordered.sort_by(|a, b| {
        b.favorite
            .cmp(&a.favorite)
            .then_with(|| b.last_activity().cmp(&a.last_activity()))
    });
    ordered
}
