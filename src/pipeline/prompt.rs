// file: src/pipeline/prompt.rs
// description: answer prompt template with placeholder substitution
// reference: Internal prompt standards

const DEFAULT_TEMPLATE: &str = r#"
You are an HR policy assistant.
User question: "{query}"

Relevant document:
{context}

Respond with ONLY the final answer in 1–2 sentences.
"#;

pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
        }
    }

    /// Substitutes `{query}` and `{context}` in a single pass over the
    /// template. Substituted values are never scanned again, so braces
    /// inside the question or the document come through verbatim.
    pub fn render(&self, query: &str, context: &str) -> String {
        let mut output =
            String::with_capacity(self.template.len() + query.len() + context.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find('{') {
            output.push_str(&rest[..start]);
            let tail = &rest[start..];

            if let Some(after) = tail.strip_prefix("{query}") {
                output.push_str(query);
                rest = after;
            } else if let Some(after) = tail.strip_prefix("{context}") {
                output.push_str(context);
                rest = after;
            } else {
                output.push('{');
                rest = &tail[1..];
            }
        }

        output.push_str(rest);
        output
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new()
    }
}
