// src/ui/text.rs
/// A text input whose displayed value is exactly the state it holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlledText {
    value: String,
}

impl ControlledText {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Change event carrying the full new value
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Typed input appended at the end
    pub fn type_str(&mut self, input: &str) {
        self.value.push_str(input);
    }

    pub fn backspace(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
