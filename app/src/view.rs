//! Plain-text rendering of a [`ViewModel`].

use crate::controller::ViewModel;
use crate::types::Filter;
use std::fmt;

/// Displays a [`ViewModel`] as the terminal list
///
/// ```text
/// Filter: active (all 3, active 2, completed 1)
///   [ ] 1735689600000  Buy milk
///   [ ] 1735689600002  Write report
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TextView<'a>(pub &'a ViewModel);

impl fmt::Display for TextView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.0;
        write!(f, "Filter: {} (", model.filter)?;
        for (i, filter) in Filter::ALL.into_iter().enumerate() {
            let count = match filter {
                Filter::All => model.total,
                Filter::Active => model.active,
                Filter::Completed => model.completed,
            };
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{filter} {count}")?;
        }
        f.write_str(")")?;

        for item in &model.items {
            let mark = if item.done { 'x' } else { ' ' };
            write!(f, "\n  [{mark}] {}  {}", item.id, item.text)?;
        }
        if let Some(message) = model.empty_message {
            write!(f, "\n  {message}")?;
        }
        if let Some(error) = &model.persistence_error {
            write!(f, "\n! Changes are not saved: {error}")?;
        }
        Ok(())
    }
}

/// Render `model` as text
#[must_use]
pub fn render(model: &ViewModel) -> String {
    TextView(model).to_string()
}
