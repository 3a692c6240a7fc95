const ITN_SUFFIX: &str = ":itn";

/// Raw model identifier split into the model name and the inverse text
/// normalization toggle carried by a trailing `:itn` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ModelSpec {
    name: String,
    enable_itn: bool,
}

impl ModelSpec {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let split_at = raw.len().checked_sub(ITN_SUFFIX.len());

        match split_at {
            Some(idx)
                if raw.is_char_boundary(idx) && raw[idx..].eq_ignore_ascii_case(ITN_SUFFIX) =>
            {
                Self {
                    name: raw[..idx].to_string(),
                    enable_itn: true,
                }
            }
            _ => Self {
                name: raw.to_string(),
                enable_itn: false,
            },
        }
    }

    /// The model name, or `None` when the caller left it empty.
    pub fn name(&self) -> Option<&str> {
        if self.name.is_empty() {
            None
        } else {
            Some(&self.name)
        }
    }

    pub fn name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.name().unwrap_or(default)
    }

    pub fn enable_itn(&self) -> bool {
        self.enable_itn
    }
}
