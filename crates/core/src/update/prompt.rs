/// Instruction used when no `defaultPrompt` is configured.
pub const DEFAULT_PROMPT: &str = "Improve and optimize this code while maintaining its functionality. Add comments where necessary and follow best practices.";

/// Directive appended after the file content.
pub const RAW_OUTPUT_DIRECTIVE: &str = "Please provide only the updated file content without any additional explanation or markdown formatting.";

/// Build the generation prompt for a file rewrite.
///
/// The instruction comes first, followed by the file content inside a generic
/// fenced block and the raw output directive.
pub fn build_prompt(instruction: &str, content: &str) -> String {
    format!("{instruction}\n\nFile content:\n```\n{content}\n```\n\n{RAW_OUTPUT_DIRECTIVE}")
}
