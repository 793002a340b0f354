use crate::ast::*;

/// Serializer for markup that has no source text to copy from.
///
/// Used for synthesized elements and rewritten attributes; everything else is
/// copied verbatim by the [`LosslessSerializer`](crate::LosslessSerializer).
pub struct Serializer {
    output: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Serialize an attribute without its leading whitespace
    pub fn serialize_attribute(&mut self, attr: &Attribute) {
        match &attr.value {
            AttrValue::Presence => self.output.push_str(&attr.name),
            AttrValue::Quoted { value, quote } => {
                self.output.push_str(&attr.name);
                self.output.push('=');
                self.output.push(*quote);
                self.output.push_str(value);
                self.output.push(*quote);
            }
            AttrValue::Expression { source } => {
                self.output.push_str(&attr.name);
                self.output.push_str("={");
                self.output.push_str(source);
                self.output.push('}');
            }
            AttrValue::Spread { source } => {
                self.output.push_str("{...");
                self.output.push_str(source);
                self.output.push('}');
            }
        }
    }

    pub fn finish(self) -> String {
        self.output
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a single attribute (`name`, `name="v"`, `name={v}`, `{...v}`)
pub fn serialize_attribute(attr: &Attribute) -> String {
    let mut serializer = Serializer::new();
    serializer.serialize_attribute(attr);
    serializer.finish()
}

/// Whether text cannot appear literally between tags
pub fn needs_expression(text: &str) -> bool {
    text.contains(['{', '}', '<', '>'])
}

/// Quote a string as a JavaScript string literal
pub fn quote_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.replace('"', "\\\"")))
}
