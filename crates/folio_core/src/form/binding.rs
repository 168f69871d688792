use crate::model::draft::{DraftField, FieldValue};

/// Everything a widget needs to render one draft field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub field: DraftField,
    pub value: FieldValue,
    pub error: Option<String>,
    /// Set once the field was edited or a submit was attempted.
    pub touched: bool,
}

impl FieldBinding {
    /// Error to display; hidden until the field is touched.
    pub fn visible_error(&self) -> Option<&str> {
        if self.touched {
            self.error.as_deref()
        } else {
            None
        }
    }

    /// Change event for this field carrying `value`.
    pub fn change(&self, value: FieldValue) -> FieldChange {
        FieldChange {
            field: self.field,
            value,
        }
    }
}

/// Value emitted by a widget for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: DraftField,
    pub value: FieldValue,
}

/// Capability required from any field widget (text input, rich-text editor,
/// image upload). The form never looks inside the widget.
pub trait FieldControl {
    /// Shows the current value and error state.
    fn render(&mut self, binding: &FieldBinding);
    /// Returns the pending value-changed event, if the user changed something.
    fn take_change(&mut self) -> Option<FieldValue>;
}
