//! Rendering options.

/// Controls which parts of a decoded function are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemangleOptions {
    /// Render the parameter list and the method qualifiers after it.
    pub params: bool,
    /// Render the return type of function templates.
    pub return_type: bool,
}

impl Default for DemangleOptions {
    fn default() -> Self {
        Self {
            params: true,
            return_type: true,
        }
    }
}

impl DemangleOptions {
    /// Full output: return type, name and parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only the qualified name, like `c++filt --no-params`.
    pub fn name_only() -> Self {
        Self {
            params: false,
            return_type: false,
        }
    }

    pub fn with_params(mut self, params: bool) -> Self {
        self.params = params;
        self
    }

    pub fn with_return_type(mut self, return_type: bool) -> Self {
        self.return_type = return_type;
        self
    }
}
